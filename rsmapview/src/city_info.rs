use anyhow::{Context, Result};
use geo::Point;
use std::time::Duration;

use crate::collect::global_variables::{Endpoints, DEFAULT_CITY, PLACEHOLDER};
use crate::collect::nominatim::{self, NominatimPlace};
use crate::collect::open_meteo::{self, CurrentWeather};
use crate::collect::{geonames, wikidata};
use crate::commons::basic_functions::http_client;

/// Everything the page shows about a city besides the map itself
#[derive(Debug, Clone, PartialEq)]
pub struct CityInfo {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    pub region: String,
    pub population: String,
    /// °C
    pub temp: String,
    /// km/h
    pub wind: String,
}

impl CityInfo {
    pub fn center(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// Wikidata first, GeoNames when Wikidata has nothing
pub fn population(endpoints: &Endpoints, city: &str) -> String {
    let population =
        wikidata::population(&endpoints.wikidata_api, &endpoints.wikidata_entity, city);
    if population != PLACEHOLDER {
        return population;
    }
    log::debug!("No Wikidata population for {}, trying GeoNames", city);
    geonames::population(&endpoints.geonames, city)
}

/// Geocode `city`, falling back to the default city when it is unknown
fn locate(endpoints: &Endpoints, city: &str) -> Result<NominatimPlace> {
    let client = http_client(Duration::from_secs(10)).context("Failed to create HTTP client")?;
    if let Some(place) = nominatim::search(&client, &endpoints.nominatim, city, true)
        .with_context(|| format!("Failed to geocode {}", city))?
    {
        return Ok(place);
    }

    log::warn!("{} not found, centering on {}", city, DEFAULT_CITY);
    nominatim::search(&client, &endpoints.nominatim, DEFAULT_CITY, true)
        .with_context(|| format!("Failed to geocode {}", DEFAULT_CITY))?
        .with_context(|| format!("Neither {} nor {} could be geocoded", city, DEFAULT_CITY))
}

/// Collect coordinates, region, population and weather for `city`.
///
/// Only geocoding can fail; population and weather degrade to placeholders.
pub fn get_city_infos(endpoints: &Endpoints, city: &str) -> Result<CityInfo> {
    let place = locate(endpoints, city)?;
    let center = place.point()?;

    let population = population(endpoints, city);
    let CurrentWeather {
        temperature,
        windspeed,
    } = open_meteo::current_weather(&endpoints.open_meteo, center);

    Ok(CityInfo {
        city: city.to_string(),
        lat: center.y(),
        lon: center.x(),
        country: place.country(),
        region: place.region(),
        population,
        temp: temperature,
        wind: windspeed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_offline_is_placeholder() {
        let endpoints = Endpoints::all("http://127.0.0.1:9");
        assert_eq!(population(&endpoints, "Lyon"), "-");
    }

    #[test]
    fn test_city_infos_offline_is_error() {
        let endpoints = Endpoints::all("http://127.0.0.1:9");
        let err = get_city_infos(&endpoints, "Lyon").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to geocode Lyon"));
    }

    #[test]
    fn test_center_is_lon_lat() {
        let info = CityInfo {
            city: "Lyon".to_string(),
            lat: 45.76,
            lon: 4.83,
            country: "France".to_string(),
            region: "Auvergne-Rhône-Alpes".to_string(),
            population: "-".to_string(),
            temp: "-".to_string(),
            wind: "-".to_string(),
        };
        assert_eq!(info.center(), Point::new(4.83, 45.76));
    }
}
