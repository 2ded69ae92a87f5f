//! City population from Wikidata.
//!
//! Search the entity by label, then read its population claims (`P1082`) and
//! keep the most recent one according to the point-in-time qualifier (`P585`).

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::collect::global_variables::PLACEHOLDER;
use crate::commons::basic_functions::http_client;

const POPULATION: &str = "P1082";
const POINT_IN_TIME: &str = "P585";

/// Descriptions that mark a search hit as a settlement
const CITY_HINTS: [&str; 3] = ["commune", "city", "municipality"];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    search: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(default)]
    pub description: String,
}

/// First hit described as a commune, city or municipality, else the first hit
pub fn pick_entity(results: &[SearchResult]) -> Option<&str> {
    results
        .iter()
        .find(|r| {
            let description = r.description.to_lowercase();
            CITY_HINTS.iter().any(|hint| description.contains(hint))
        })
        .or_else(|| results.first())
        .map(|r| r.id.as_str())
}

/// Most recent population among the entity's `P1082` claims.
///
/// Claims are walked in order. The first usable one is kept, and a later one
/// replaces it only when its year is strictly greater. A claim without a year
/// never replaces, and a kept claim without a year counts as year 0.
pub fn latest_population(entity_data: &Value, entity_id: &str) -> Option<String> {
    let claims = entity_data
        .get("entities")?
        .get(entity_id)?
        .get("claims")?
        .get(POPULATION)?
        .as_array()?;

    let mut latest: Option<(String, Option<i64>)> = None;
    for claim in claims {
        let Some(amount) = claim
            .pointer("/mainsnak/datavalue/value/amount")
            .and_then(Value::as_str)
        else {
            continue;
        };
        let Ok(amount) = amount.trim_start_matches('+').parse::<f64>() else {
            continue;
        };
        let population = (amount as i64).to_string();
        let year = claim_year(claim);

        let replace = match &latest {
            None => true,
            Some((_, latest_year)) => match year {
                Some(y) => y > latest_year.unwrap_or(0),
                None => false,
            },
        };
        if replace {
            latest = Some((population, year));
        }
    }

    latest.map(|(population, _)| population)
}

/// Year of the first `P585` qualifier, from a time like `+2021-01-01T00:00:00Z`
fn claim_year(claim: &Value) -> Option<i64> {
    let time = claim
        .get("qualifiers")?
        .get(POINT_IN_TIME)?
        .get(0)?
        .pointer("/datavalue/value/time")?
        .as_str()?;
    let digits = time.strip_prefix('+')?;
    digits.get(..4)?.parse().ok()
}

fn fetch_population(
    client: &Client,
    api_url: &str,
    entity_url: &str,
    city: &str,
) -> Result<Option<String>> {
    let search: SearchResponse = client
        .get(api_url)
        .query(&[
            ("action", "wbsearchentities"),
            ("search", city),
            ("language", "en"),
            ("format", "json"),
            ("type", "item"),
        ])
        .timeout(Duration::from_secs(6))
        .send()
        .context("Failed to send Wikidata search request")?
        .json()
        .context("Failed to parse Wikidata search response")?;

    let Some(entity_id) = pick_entity(&search.search) else {
        return Ok(None);
    };

    let url = format!(
        "{}/{}.json",
        entity_url.trim_end_matches('/'),
        urlencoding::encode(entity_id)
    );
    let entity_data: Value = client
        .get(&url)
        .timeout(Duration::from_secs(8))
        .send()
        .context("Failed to send Wikidata entity request")?
        .json()
        .context("Failed to parse Wikidata entity data")?;

    Ok(latest_population(&entity_data, entity_id))
}

/// Population of `city` from Wikidata, or the placeholder on any failure
pub fn population(api_url: &str, entity_url: &str, city: &str) -> String {
    let result = http_client(Duration::from_secs(8))
        .context("Failed to create HTTP client")
        .and_then(|client| fetch_population(&client, api_url, entity_url, city));
    match result {
        Ok(Some(population)) => population,
        Ok(None) => PLACEHOLDER.to_string(),
        Err(e) => {
            log::warn!("Wikidata population lookup for {} failed: {:#}", city, e);
            PLACEHOLDER.to_string()
        }
    }
}
