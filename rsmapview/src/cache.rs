//! On-disk cache of building footprints, reused across runs.

use anyhow::{Context, Result};
use std::fmt::Display;
use std::fs;
use std::path::Path;

use crate::geometric::osm_buildings::empty_collection;

/// What `ensure_building_cache` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Existing non-empty file kept (not fetched, or the fetch failed)
    Reused,
    /// Fresh extraction with this many buildings
    Fetched(usize),
    /// Nothing usable on disk, empty collection written
    Placeholder,
}

fn is_missing_or_empty(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => metadata.len() == 0,
        Err(_) => true,
    }
}

/// Extraction is needed when forced, or when the file is missing or empty
pub fn should_extract(path: &Path, force: bool) -> bool {
    force || is_missing_or_empty(path)
}

/// Write `{"type":"FeatureCollection","features":[]}` to `path`
pub fn write_empty_collection(path: &Path) -> Result<()> {
    fs::write(path, empty_collection().to_string())
        .with_context(|| format!("Failed to write GeoJSON file: {}", path.display()))
}

/// Make sure `path` holds a feature collection.
///
/// `fetch` runs only when `should_extract` says so; it writes the file itself
/// and returns the building count. Its error is logged, never returned.
/// Whatever happened, a missing or empty file is then replaced by an empty
/// collection, so the page always has something to load.
pub fn ensure_building_cache<F, E>(path: &Path, force: bool, fetch: F) -> Result<CacheOutcome>
where
    F: FnOnce() -> std::result::Result<usize, E>,
    E: Display,
{
    let mut fetched = None;
    if should_extract(path, force) {
        log::info!("Extracting OSM buildings cache…");
        match fetch() {
            Ok(count) => fetched = Some(count),
            Err(e) => log::error!("OSM extraction failed: {}", e),
        }
    }

    let outcome = if is_missing_or_empty(path) {
        log::info!("Creating empty GeoJSON cache file: {}.", path.display());
        write_empty_collection(path)?;
        CacheOutcome::Placeholder
    } else {
        fetched.map_or(CacheOutcome::Reused, CacheOutcome::Fetched)
    };

    log::info!(
        "OSM cache found: {}. Preparing for browser loading.",
        path.display()
    );
    Ok(outcome)
}
