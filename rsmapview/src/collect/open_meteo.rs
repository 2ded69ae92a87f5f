use anyhow::{Context, Result};
use geo::Point;
use serde_json::Value;
use std::time::Duration;

use crate::collect::global_variables::PLACEHOLDER;
use crate::commons::basic_functions::{http_client, value_to_text};

/// Current temperature (°C) and wind speed (km/h), as display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentWeather {
    pub temperature: String,
    pub windspeed: String,
}

impl CurrentWeather {
    pub fn unknown() -> Self {
        CurrentWeather {
            temperature: PLACEHOLDER.to_string(),
            windspeed: PLACEHOLDER.to_string(),
        }
    }

    /// Read `current_weather` from a forecast answer; missing fields become
    /// the placeholder
    pub fn from_forecast(response: &Value) -> Result<Self> {
        let current = response
            .get("current_weather")
            .context("Forecast has no current_weather block")?;
        Ok(CurrentWeather {
            temperature: value_to_text(current.get("temperature")),
            windspeed: value_to_text(current.get("windspeed")),
        })
    }
}

fn fetch(url: &str, center: Point<f64>) -> Result<CurrentWeather> {
    let response: Value = http_client(Duration::from_secs(8))
        .context("Failed to create HTTP client")?
        .get(url)
        .query(&[
            ("latitude", center.y().to_string()),
            ("longitude", center.x().to_string()),
            ("current_weather", "true".to_string()),
        ])
        .send()
        .context("Failed to send Open-Meteo request")?
        .json()
        .context("Failed to parse Open-Meteo response")?;
    CurrentWeather::from_forecast(&response)
}

/// Current weather at `center` (lon, lat), placeholders on any failure
pub fn current_weather(url: &str, center: Point<f64>) -> CurrentWeather {
    fetch(url, center).unwrap_or_else(|e| {
        log::warn!("Open-Meteo weather lookup failed: {:#}", e);
        CurrentWeather::unknown()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_forecast() {
        let response = json!({
            "latitude": 48.86,
            "longitude": 2.34,
            "current_weather": {"temperature": 14.2, "windspeed": 9.0, "weathercode": 3}
        });
        let weather = CurrentWeather::from_forecast(&response).unwrap();
        assert_eq!(weather.temperature, "14.2");
        assert_eq!(weather.windspeed, "9.0");
    }

    #[test]
    fn test_partial_block() {
        let weather =
            CurrentWeather::from_forecast(&json!({"current_weather": {"temperature": -3.5}}))
                .unwrap();
        assert_eq!(weather.temperature, "-3.5");
        assert_eq!(weather.windspeed, "-");
    }

    #[test]
    fn test_missing_block_is_error() {
        assert!(CurrentWeather::from_forecast(&json!({"error": true, "reason": "bad"})).is_err());
    }

    #[test]
    fn test_network_failure_gives_placeholders() {
        let weather = current_weather("http://127.0.0.1:9/v1/forecast", Point::new(2.34, 48.86));
        assert_eq!(weather, CurrentWeather::unknown());
    }
}
