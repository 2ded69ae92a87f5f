use anyhow::Result;
use geojson::GeoJson;
use rsmapview::geometric::osm_buildings::OsmBuildings;

/// Example: extracting OSM building footprints around a city from Overpass
fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    println!("=== Example: OSM buildings around La Rochelle ===\n");

    std::fs::create_dir_all("./output")?;
    let mut buildings = OsmBuildings::new("./output");
    // about 1 km each side at this latitude
    buildings.set_half_width(0.01);

    println!("Geocoding with Nominatim, then querying Overpass...");
    let buildings = buildings.run("La Rochelle")?;

    if let Some(center) = buildings.get_center() {
        println!("  - Center: ({:.6}, {:.6})", center.x(), center.y());
    }
    println!("  - Number of buildings: {}", buildings.len());

    if let Some(GeoJson::FeatureCollection(fc)) = buildings.get_geojson() {
        println!("\nFirst 5 buildings:");
        for (idx, feature) in fc.features.iter().take(5).enumerate() {
            let name = feature
                .property("name")
                .and_then(|v| v.as_str())
                .unwrap_or("(unnamed)");
            let kind = feature
                .property("building")
                .and_then(|v| v.as_str())
                .unwrap_or("-");
            println!("  {}. {} [{}]", idx + 1, name, kind);
        }
    }

    let path = buildings.to_geojson(Some("la_rochelle_buildings.geojson"))?;
    println!("\nSaved to {}", path.display());
    println!("  - Output folder: {:?}", buildings.get_output_path());

    Ok(())
}
