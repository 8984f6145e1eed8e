#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front end for the region crime view.
//!
//! Mounts a [`RegionCrimeView`] over a headless [`TerminalMap`], lets the
//! mount query land against the live police API, optionally runs a place
//! search that re-centres the region, and prints what a user of the map
//! would see: the inline status, a per-category breakdown and the popups
//! of the first few markers.

mod terminal_map;

use std::path::PathBuf;

use clap::Parser;
use crime_region_crime_models::{CategoryCounts, YearMonth, format_title};
use crime_region_geocoder::PlaceSearch as _;
use crime_region_geocoder::nominatim::NominatimSearch;
use crime_region_geocoder::service_registry::nominatim_service;
use crime_region_geography_models::{LatLng, Place};
use crime_region_source::police_uk::PoliceUkSource;
use crime_region_source::registry;
use crime_region_view::driver::{self, event_channel};
use crime_region_view::{RegionCrimeView, ViewConfig, ViewEvent};
use terminal_map::TerminalMap;

/// Show street-level crimes reported around a region.
#[derive(Parser)]
#[command(name = "crime_region")]
#[command(about = "Show street-level crimes reported around a region")]
struct Cli {
    /// View config TOML (initial centre, zoom, region size, month).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Latitude of the initial region centre.
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude of the initial region centre.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,

    /// Month to query, as YYYY-MM.
    #[arg(long)]
    month: Option<YearMonth>,

    /// Place to search for once the initial region has loaded.
    #[arg(long)]
    search: Option<String>,

    /// Number of marker popups to print.
    #[arg(long, default_value = "5")]
    popups: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ViewConfig::load(path)?,
        None => ViewConfig::default(),
    };
    if let (Some(lat), Some(lng)) = (cli.lat, cli.lng) {
        config.initial_center = LatLng::new(lat, lng);
    }
    if let Some(month) = cli.month {
        config.month = month;
    }
    let config = config.validated()?;

    let definition = registry::default_source();
    log::info!("Querying {} for {}", definition.name, config.month);
    let attribution = definition.attribution.clone();
    let source = PoliceUkSource::new(reqwest::Client::new(), definition);

    let (mut view, pending) = RegionCrimeView::mount(TerminalMap::default(), config);
    let (tx, mut rx) = event_channel::<TerminalMap>();
    drop(tx);
    driver::run(&mut view, &source, pending, &mut rx).await;

    if let Some(query) = &cli.search {
        let place = search_place(query).await;
        let (tx, mut rx) = event_channel::<TerminalMap>();
        tx.send(ViewEvent::PlaceChanged(place))?;
        drop(tx);
        driver::run(&mut view, &source, None, &mut rx).await;
    }

    report(&mut view, cli.popups);
    if let Some(attribution) = attribution {
        println!();
        println!("{attribution}");
    }

    let map = view.unmount();
    log::debug!("Unmounted, {} markers left on the map", map.markers().count());
    Ok(())
}

/// Resolves `query` to a place. A provider failure is reported to the
/// view as a place without geometry so it surfaces as a search error.
async fn search_place(query: &str) -> Option<Place> {
    let search = match NominatimSearch::new(nominatim_service()) {
        Ok(search) => search,
        Err(e) => {
            log::error!("Failed to build search client: {e}");
            return Some(unresolved(query));
        }
    };

    match search.search(query).await {
        Ok(Some(place)) => Some(place),
        Ok(None) => {
            log::warn!("No place matched {query:?}");
            None
        }
        Err(e) => {
            log::warn!("Search for {query:?} failed: {e}");
            Some(unresolved(query))
        }
    }
}

fn unresolved(query: &str) -> Place {
    Place {
        name: Some(query.to_string()),
        geometry: None,
    }
}

fn report(view: &mut RegionCrimeView<TerminalMap>, popups: usize) {
    let state = view.state();
    let map = view.map();

    if let Some(center) = map.center() {
        println!(
            "Map centred on {center} at zoom {}",
            map.zoom().unwrap_or_default()
        );
    }
    if let Some(bounds) = map.rectangle() {
        println!(
            "Region {} to {}",
            bounds.south_west, bounds.north_east
        );
    }
    if let Some(polygon) = &state.polygon {
        println!("Polygon query: {polygon}");
    }
    if state.loading {
        println!("Loading...");
    }
    if let Some(message) = state.status_message() {
        println!("{message}");
    }

    println!("{} crimes in {}", state.records.len(), state.month);

    let counts = CategoryCounts::tally(state.records.iter());
    for (category, count) in counts.known() {
        println!("  {count:>5}  {}", category.label());
    }
    for (slug, count) in counts.unknown() {
        println!("  {count:>5}  {} (unlisted category)", format_title(slug));
    }

    let shown: Vec<(u64, LatLng)> = map.markers().take(popups).collect();
    if !shown.is_empty() {
        println!();
    }
    for (handle, position) in shown {
        if let Some(content) = view.on_marker_clicked(&handle) {
            println!("{position}  {}", content.replace("<br />", " | "));
        }
    }
    if let Some((anchor, _)) = view.map().popup() {
        log::debug!("Popup left open on marker #{anchor}");
    }
}
