use geo::{Coord, LineString, Point, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::collect::global_variables::{
    Endpoints, BUILDINGS_CACHE_FILENAME, DEFAULT_HALF_WIDTH, OVERPASS_TIMEOUT,
};
use crate::collect::nominatim;
use crate::commons::basic_functions::{http_client, truncate_body};
use crate::error::FootprintError;
use crate::geo_core::BoundingBox;

/// Tags listed first in every feature's properties, in this order, when present
pub const PREFERRED_KEYS: [&str; 21] = [
    "name",
    "building",
    "building:levels",
    "height",
    "roof:shape",
    "roof:material",
    "roof:height",
    "addr:street",
    "addr:housenumber",
    "addr:postcode",
    "addr:city",
    "start_date",
    "amenity",
    "shop",
    "office",
    "industrial",
    "website",
    "brand",
    "condition",
    "surface",
    "source",
];

/// OpenStreetMap building footprints around a city, fetched from Overpass
pub struct OsmBuildings {
    /// Output path for the GeoJSON file
    output_path: PathBuf,
    /// Half-width of the query box, in degrees
    half_width: f64,
    endpoints: Endpoints,
    /// Geocoded city center (lon, lat), set by `run`
    center: Option<Point<f64>>,
    geojson: Option<GeoJson>,
}

/// Overpass `[out:json]` answer
#[derive(Deserialize)]
struct OverpassResponse {
    /// Set when the server gave up on the query, `elements` is then truncated
    #[serde(default)]
    remark: Option<String>,
    elements: Vec<OverpassElement>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum OverpassElement {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        tags: JsonObject,
    },
    Relation {},
}

impl OsmBuildings {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        OsmBuildings {
            output_path: output_path.into(),
            half_width: DEFAULT_HALF_WIDTH,
            endpoints: Endpoints::default(),
            center: None,
            geojson: None,
        }
    }

    pub fn set_half_width(&mut self, half_width: f64) {
        self.half_width = half_width;
    }

    pub fn set_endpoints(&mut self, endpoints: Endpoints) {
        self.endpoints = endpoints;
    }

    /// Geocode `city`, query Overpass around it and keep the feature collection
    pub fn run(mut self, city: &str) -> Result<Self, FootprintError> {
        self.run_internal(city)?;
        Ok(self)
    }

    fn run_internal(&mut self, city: &str) -> Result<(), FootprintError> {
        let client = http_client(OVERPASS_TIMEOUT + Duration::from_secs(30)).map_err(|source| {
            FootprintError::Request {
                service: "HTTP client",
                source,
            }
        })?;

        let place = nominatim::search(&client, &self.endpoints.nominatim, city, false)?
            .ok_or_else(|| FootprintError::CityNotFound(city.to_string()))?;
        let center = place.point()?;
        let bbox = BoundingBox::around(center, self.half_width);
        log::debug!("Building query box for {}: {:?}", city, bbox);

        let response = query_overpass(&client, &self.endpoints.overpass, &bbox)?;
        let collection = features_from_overpass(response)?;

        self.center = Some(center);
        self.geojson = Some(GeoJson::from(collection));
        Ok(())
    }

    pub fn get_geojson(&self) -> Option<&GeoJson> {
        self.geojson.as_ref()
    }

    pub fn get_center(&self) -> Option<Point<f64>> {
        self.center
    }

    /// Number of footprints fetched by the last run
    pub fn len(&self) -> usize {
        match &self.geojson {
            Some(GeoJson::FeatureCollection(fc)) => fc.features.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Save to `<output_path>/<name>`, `buildings_cache.geojson` by default
    pub fn to_geojson(&self, name: Option<&str>) -> Result<PathBuf, FootprintError> {
        let geojson = self.geojson.as_ref().ok_or(FootprintError::Parse {
            what: "building footprints",
            detail: "no GeoJSON data available, call run() first".to_string(),
        })?;

        let output_file = self
            .output_path
            .join(name.unwrap_or(BUILDINGS_CACHE_FILENAME));
        std::fs::write(&output_file, geojson.to_string()).map_err(|source| {
            FootprintError::Io {
                path: output_file.display().to_string(),
                source,
            }
        })?;

        log::info!(
            "Buildings saved to {} ({} buildings)",
            output_file.display(),
            self.len()
        );
        Ok(output_file)
    }

    pub fn get_output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Fetch the footprints around `city` and write them to
/// `<output_path>/buildings_cache.geojson`, returning the building count
pub fn export_osm_buildings(
    output_path: &Path,
    city: &str,
    half_width: f64,
    endpoints: &Endpoints,
) -> Result<usize, FootprintError> {
    let mut buildings = OsmBuildings::new(output_path);
    buildings.set_half_width(half_width);
    buildings.set_endpoints(endpoints.clone());
    let buildings = buildings.run(city)?;
    buildings.to_geojson(None)?;
    Ok(buildings.len())
}

/// Overpass QL for every building way and relation in `bbox`, with the
/// member nodes needed to rebuild their outlines
pub fn overpass_query(bbox: &BoundingBox) -> String {
    let bbox = bbox.to_overpass();
    format!(
        r#"[out:json][timeout:{timeout}];
(
  way["building"]({bbox});
  relation["building"]({bbox});
);
out body;
>;
out skel qt;"#,
        timeout = OVERPASS_TIMEOUT.as_secs(),
        bbox = bbox
    )
}

fn query_overpass(
    client: &Client,
    url: &str,
    bbox: &BoundingBox,
) -> Result<OverpassResponse, FootprintError> {
    let query = overpass_query(bbox);
    let response = client
        .post(url)
        .form(&[("data", query.as_str())])
        .send()
        .map_err(|source| FootprintError::Request {
            service: "Overpass",
            source,
        })?;

    let status = response.status();
    let body = response.text().map_err(|source| FootprintError::Request {
        service: "Overpass",
        source,
    })?;
    if !status.is_success() {
        return Err(FootprintError::Status {
            service: "Overpass",
            status: status.as_u16(),
            body: truncate_body(&body, 200),
        });
    }

    let response: OverpassResponse =
        serde_json::from_str(&body).map_err(|e| FootprintError::Parse {
            what: "Overpass response",
            detail: e.to_string(),
        })?;
    check_remark(&response)?;
    Ok(response)
}

/// Runtime errors (timeout, out of memory) arrive with status 200 and a partial
/// element list
fn check_remark(response: &OverpassResponse) -> Result<(), FootprintError> {
    match &response.remark {
        Some(remark) if remark.trim_start().starts_with("runtime error") => {
            Err(FootprintError::Overpass {
                remark: remark.clone(),
            })
        }
        Some(remark) => {
            log::warn!("Overpass remark: {}", remark);
            Ok(())
        }
        None => Ok(()),
    }
}

/// Build one polygon feature per way, in response order.
///
/// Relation members come back as untagged skeleton ways and become features
/// too; a way listed twice keeps its first (tagged) occurrence. A way pointing
/// at a node absent from the response aborts the whole conversion.
fn features_from_overpass(
    response: OverpassResponse,
) -> Result<FeatureCollection, FootprintError> {
    let mut nodes: HashMap<i64, Coord<f64>> = HashMap::new();
    for element in &response.elements {
        if let OverpassElement::Node { id, lat, lon } = element {
            nodes.insert(*id, Coord { x: *lon, y: *lat });
        }
    }

    let mut seen = HashSet::new();
    let mut features = Vec::new();
    for element in &response.elements {
        let OverpassElement::Way {
            id,
            nodes: refs,
            tags,
        } = element
        else {
            continue;
        };
        if refs.is_empty() || !seen.insert(*id) {
            continue;
        }

        let ring = refs
            .iter()
            .map(|node| {
                nodes.get(node).copied().ok_or(FootprintError::MissingNode {
                    way: *id,
                    node: *node,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        features.push(building_feature(ring, tags));
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Polygon feature from an outline and its OSM tags.
///
/// The outline is closed if the last point differs from the first.
pub fn building_feature(ring: Vec<Coord<f64>>, tags: &JsonObject) -> Feature {
    // Polygon::new closes the exterior ring
    let polygon = Polygon::new(LineString::from(ring), vec![]);
    let geometry = Geometry::new(geojson::Value::from(&polygon));

    let mut feature = Feature::from(geometry);
    feature.properties = Some(building_properties(tags));
    feature
}

/// Preferred keys first (fixed order, present ones only), then every other
/// tag in upstream order. Values are copied verbatim.
pub fn building_properties(tags: &JsonObject) -> JsonObject {
    let mut properties = JsonObject::new();
    for key in PREFERRED_KEYS {
        if let Some(value) = tags.get(key) {
            properties.insert(key.to_string(), value.clone());
        }
    }
    for (key, value) in tags {
        if !properties.contains_key(key) {
            properties.insert(key.clone(), value.clone());
        }
    }
    properties
}

/// Empty `FeatureCollection`, the placeholder written when no data is available
pub fn empty_collection() -> GeoJson {
    GeoJson::from(FeatureCollection {
        bbox: None,
        features: vec![],
        foreign_members: None,
    })
}
