use std::time::Duration;

/// User agent sent to every public API (Nominatim rejects anonymous clients)
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; rsmapview/0.1)";

/// Placeholder shown in the page when a metadata lookup fails
pub const PLACEHOLDER: &str = "-";

/// Placeholder for address fields missing from the geocoder answer
pub const UNKNOWN_FIELD: &str = "?";

/// City used when neither the CLI nor the prompt provide one, and as the
/// geocoding fallback for city info
pub const DEFAULT_CITY: &str = "New York";

/// Half-width of the building query box, in degrees
pub const DEFAULT_HALF_WIDTH: f64 = 0.02;

pub const BUILDINGS_CACHE_FILENAME: &str = "buildings_cache.geojson";
pub const HTML_FILENAME: &str = "temp_map_viewer.html";

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const WIKIDATA_API_URL: &str = "https://www.wikidata.org/w/api.php";
pub const WIKIDATA_ENTITY_URL: &str = "https://www.wikidata.org/wiki/Special:EntityData";
pub const GEONAMES_URL: &str = "http://api.geonames.org/searchJSON";
pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

pub const CONNECTIVITY_URL: &str = "https://www.google.com";
pub const CONNECTIVITY_HOST: &str = "8.8.8.8:53";

/// Overpass server-side timeout, also used as the client read timeout
pub const OVERPASS_TIMEOUT: Duration = Duration::from_secs(60);

/// Base URLs of every remote service, overridable for tests and mirrors
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub nominatim: String,
    pub overpass: String,
    pub wikidata_api: String,
    pub wikidata_entity: String,
    pub geonames: String,
    pub open_meteo: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            nominatim: NOMINATIM_URL.to_string(),
            overpass: OVERPASS_URL.to_string(),
            wikidata_api: WIKIDATA_API_URL.to_string(),
            wikidata_entity: WIKIDATA_ENTITY_URL.to_string(),
            geonames: GEONAMES_URL.to_string(),
            open_meteo: OPEN_METEO_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Every endpoint pointed at the same base URL
    pub fn all(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Endpoints {
            nominatim: format!("{}/search", base),
            overpass: format!("{}/api/interpreter", base),
            wikidata_api: format!("{}/w/api.php", base),
            wikidata_entity: format!("{}/wiki/Special:EntityData", base),
            geonames: format!("{}/searchJSON", base),
            open_meteo: format!("{}/v1/forecast", base),
        }
    }
}
