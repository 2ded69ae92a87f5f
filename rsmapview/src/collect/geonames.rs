use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;

use crate::collect::global_variables::PLACEHOLDER;
use crate::commons::basic_functions::{http_client, value_to_text};

/// Public demo account, rate limited but enough for one lookup per run
const GEONAMES_USERNAME: &str = "demo";

/// Population of the first GeoNames hit, as upstream wrote it
pub fn population_from_search(response: &Value) -> String {
    value_to_text(response.pointer("/geonames/0/population"))
}

fn fetch(url: &str, city: &str) -> Result<Value> {
    http_client(Duration::from_secs(8))
        .context("Failed to create HTTP client")?
        .get(url)
        .query(&[("q", city), ("maxRows", "1"), ("username", GEONAMES_USERNAME)])
        .send()
        .context("Failed to send GeoNames request")?
        .json()
        .context("Failed to parse GeoNames response")
}

/// Secondary population source, placeholder on any failure
pub fn population(url: &str, city: &str) -> String {
    match fetch(url, city) {
        Ok(response) => population_from_search(&response),
        Err(e) => {
            log::warn!("GeoNames population lookup for {} failed: {:#}", city, e);
            PLACEHOLDER.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_population_from_search() {
        let response = json!({
            "totalResultsCount": 1,
            "geonames": [{"name": "Lyon", "population": 522969}]
        });
        assert_eq!(population_from_search(&response), "522969");
    }

    #[test]
    fn test_empty_or_error_response() {
        assert_eq!(population_from_search(&json!({"geonames": []})), "-");
        assert_eq!(
            population_from_search(&json!({"status": {"message": "daily limit exceeded"}})),
            "-"
        );
    }

    #[test]
    fn test_network_failure_gives_placeholder() {
        assert_eq!(population("http://127.0.0.1:9/searchJSON", "Lyon"), "-");
    }
}
