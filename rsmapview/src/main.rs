use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use rsmapview::cache::ensure_building_cache;
use rsmapview::city_info::get_city_infos;
use rsmapview::collect::connectivity::internet_connection;
use rsmapview::collect::global_variables::{
    Endpoints, BUILDINGS_CACHE_FILENAME, DEFAULT_CITY, DEFAULT_HALF_WIDTH,
};
use rsmapview::commons::prompt::prompt_city;
use rsmapview::geometric::osm_buildings::export_osm_buildings;
use rsmapview::viewer::page::MapPage;

/// Show a city as an interactive 3D map: OSM building footprints, terrain,
/// satellite imagery, population and current weather
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output directory for the building cache and the HTML page
    #[arg(long, alias = "Path", default_value = ".")]
    path: PathBuf,

    /// MapTiler API key
    #[arg(
        long,
        alias = "API_KEY",
        env = "MAPTILER_API_KEY",
        hide_env_values = true,
        default_value = ""
    )]
    api_key: String,

    /// City name
    #[arg(long, alias = "City", default_value = DEFAULT_CITY)]
    city: String,

    /// Ask for the city name on the terminal
    #[arg(long, alias = "AskCity")]
    ask_city: bool,

    /// Extract the OSM building cache even if it already exists
    #[arg(long, alias = "ForceOSM")]
    force_osm: bool,

    /// Half-width of the building query box, in degrees
    #[arg(long, default_value_t = DEFAULT_HALF_WIDTH)]
    half_width: f64,

    /// Write the page without opening a window
    #[arg(long)]
    no_window: bool,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .format_timestamp(None)
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut city = cli.city.clone();
    if cli.ask_city {
        match prompt_city(io::stdin().lock(), io::stdout())? {
            Some(answer) => city = answer,
            None => return Ok(ExitCode::SUCCESS),
        }
    }

    if !internet_connection() {
        log::error!("No Internet Connection !!!");
        return Ok(ExitCode::from(1));
    }

    std::fs::create_dir_all(&cli.path)
        .with_context(|| format!("Failed to create directory: {}", cli.path.display()))?;

    let endpoints = Endpoints::default();
    let cache_path = cli.path.join(BUILDINGS_CACHE_FILENAME);
    ensure_building_cache(&cache_path, cli.force_osm, || {
        export_osm_buildings(&cli.path, &city, cli.half_width, &endpoints)
    })?;

    let infos = match get_city_infos(&endpoints, &city) {
        Ok(infos) => infos,
        Err(e) => {
            log::error!("Cannot locate {}: {:#}", city, e);
            return Ok(ExitCode::SUCCESS);
        }
    };
    log::info!(
        "{}: {:.5}, {:.5} ({}, {}), population {}, {}°C, wind {} km/h",
        infos.city,
        infos.center().y(),
        infos.center().x(),
        infos.country,
        infos.region,
        infos.population,
        infos.temp,
        infos.wind
    );

    let page = MapPage {
        info: &infos,
        api_key: &cli.api_key,
        geojson_filename: BUILDINGS_CACHE_FILENAME,
    };
    let html_path = page.write(&cli.path)?;

    if cli.no_window {
        log::info!(
            "Open {} through a local web server to view the map.",
            html_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }
    show(&cli.path, &city);
    Ok(ExitCode::SUCCESS)
}

#[cfg(feature = "viewer")]
fn show(dir: &std::path::Path, city: &str) {
    use rsmapview::collect::global_variables::HTML_FILENAME;
    use rsmapview::viewer::{page::title, window::open_window};

    if let Err(e) = open_window(dir, HTML_FILENAME, &title(city)) {
        log::error!("Error when starting webview: {:#}", e);
    }
}

#[cfg(not(feature = "viewer"))]
fn show(dir: &std::path::Path, _city: &str) {
    log::warn!(
        "Built without the `viewer` feature, serve {} over HTTP to view the map.",
        dir.display()
    );
}

#[cfg(test)]
mod tests {
    use crate::Cli;
    use clap::Parser;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["rsmapview"]).unwrap();
        assert_eq!(cli.path.to_str(), Some("."));
        assert_eq!(cli.city, "New York");
        assert!(!cli.ask_city);
        assert!(!cli.force_osm);
        assert!(!cli.no_window);
        assert_eq!(cli.half_width, 0.02);
    }

    #[test]
    fn long_flags() {
        let cli = Cli::try_parse_from([
            "rsmapview",
            "--path",
            "out",
            "--api-key",
            "abc",
            "--city",
            "La Rochelle",
            "--ask-city",
            "--force-osm",
            "--half-width",
            "0.045",
            "--no-window",
        ])
        .unwrap();
        assert_eq!(cli.path.to_str(), Some("out"));
        assert_eq!(cli.api_key, "abc");
        assert_eq!(cli.city, "La Rochelle");
        assert!(cli.ask_city);
        assert!(cli.force_osm);
        assert!(cli.no_window);
        assert_eq!(cli.half_width, 0.045);
    }

    #[test]
    fn original_flag_spellings() {
        let cli = Cli::try_parse_from([
            "rsmapview",
            "--Path",
            "out",
            "--API_KEY",
            "abc",
            "--City",
            "Paris",
            "--AskCity",
            "--ForceOSM",
        ])
        .unwrap();
        assert_eq!(cli.path.to_str(), Some("out"));
        assert_eq!(cli.api_key, "abc");
        assert_eq!(cli.city, "Paris");
        assert!(cli.ask_city);
        assert!(cli.force_osm);
    }

    #[test]
    fn help() {
        let err = Cli::try_parse_from(["rsmapview", "--help"])
            .unwrap_err()
            .to_string();
        assert!(err.contains("Usage: rsmapview [OPTIONS]"));
        assert!(err.contains("--force-osm"));
    }
}
