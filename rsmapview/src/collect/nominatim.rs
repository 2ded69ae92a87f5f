use geo::Point;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::collect::global_variables::UNKNOWN_FIELD;
use crate::commons::basic_functions::truncate_body;
use crate::error::FootprintError;

/// One entry of a Nominatim `/search?format=json` answer
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
    /// Only present with `addressdetails=1`
    #[serde(default)]
    pub address: HashMap<String, String>,
}

impl NominatimPlace {
    /// Place position as (lon, lat)
    pub fn point(&self) -> Result<Point<f64>, FootprintError> {
        let lat: f64 = self.lat.trim().parse().map_err(|_| FootprintError::Parse {
            what: "Nominatim latitude",
            detail: self.lat.clone(),
        })?;
        let lon: f64 = self.lon.trim().parse().map_err(|_| FootprintError::Parse {
            what: "Nominatim longitude",
            detail: self.lon.clone(),
        })?;
        Ok(Point::new(lon, lat))
    }

    pub fn country(&self) -> String {
        self.address
            .get("country")
            .cloned()
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string())
    }

    /// `state`, then `region`, then the unknown marker
    pub fn region(&self) -> String {
        self.address
            .get("state")
            .or_else(|| self.address.get("region"))
            .cloned()
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string())
    }
}

/// Geocode `city` and return the first match, or `None` when Nominatim knows
/// nothing about it.
pub fn search(
    client: &Client,
    url: &str,
    city: &str,
    address_details: bool,
) -> Result<Option<NominatimPlace>, FootprintError> {
    let mut query = vec![("q", city), ("format", "json"), ("limit", "1")];
    if address_details {
        query.push(("addressdetails", "1"));
    }

    let response = client
        .get(url)
        .query(&query)
        .send()
        .map_err(|source| FootprintError::Request {
            service: "Nominatim",
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(FootprintError::Status {
            service: "Nominatim",
            status: status.as_u16(),
            body: truncate_body(&body, 200),
        });
    }

    let body = response.text().map_err(|source| FootprintError::Request {
        service: "Nominatim",
        source,
    })?;
    let places: Vec<NominatimPlace> =
        serde_json::from_str(&body).map_err(|e| FootprintError::Parse {
            what: "Nominatim response",
            detail: e.to_string(),
        })?;

    Ok(places.into_iter().next())
}
