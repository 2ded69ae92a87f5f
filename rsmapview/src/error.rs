use thiserror::Error;

/// Failures of the building-footprint extraction.
///
/// The extraction is all-or-nothing: any of these aborts it and the caller
/// falls back to an empty feature collection.
#[derive(Debug, Error)]
pub enum FootprintError {
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} error {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("City {0} not found or no data found!")]
    CityNotFound(String),

    #[error("Failed to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },

    #[error("Overpass error: {remark}")]
    Overpass { remark: String },

    #[error("Overpass error: way {way} references missing node {node}")]
    MissingNode { way: i64, node: i64 },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
