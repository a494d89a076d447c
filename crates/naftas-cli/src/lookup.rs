//! Read-only commands backed by the upstream feeds.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use naftas_core::{
    aggregate_prices, attractiveness_score, load_brands, nearest, AggregateOptions, AppConfig,
    BrandAllowList, CityIndex, ClientStore, Confidence, Coordinate, GlobalAverages, Located,
    PriceBoard, ScoreBand, Zone,
};
use naftas_feeds::{
    build_http_client, FeedQuery, IncreasesClient, PriceFeed, PriceSource, StationsClient,
};

fn http_client(config: &AppConfig) -> anyhow::Result<reqwest::Client> {
    Ok(build_http_client(
        config.request_timeout_secs,
        &config.user_agent,
    )?)
}

fn brand_allow_list(config: &AppConfig) -> anyhow::Result<BrandAllowList> {
    Ok(match &config.brands_path {
        Some(path) => load_brands(path)?,
        None => BrandAllowList::default(),
    })
}

/// Print the latest price per brand and fuel for `city`, falling back to
/// the city saved in the client store.
///
/// # Errors
///
/// Returns an error if no city is known, or the feed or store fails.
pub(crate) async fn run_prices(
    config: &AppConfig,
    store_path: &Path,
    city: Option<&str>,
    as_json: bool,
) -> anyhow::Result<()> {
    let city = match city {
        Some(city) => city.to_owned(),
        None => ClientStore::load(store_path)?
            .city
            .context("no city given and none stored; use --city or `city set`")?,
    };

    let feed = PriceFeed::from_config(config, http_client(config)?);
    let records = feed.fetch_raw_records(&FeedQuery::locality(city.clone())).await?;
    let board = aggregate_prices(records, &brand_allow_list(config)?, AggregateOptions::default());

    if as_json {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    if board.is_empty() {
        println!("no prices found for {city}");
        return Ok(());
    }

    for line in board_lines(&board, Utc::now().naive_utc()) {
        println!("{line}");
    }
    Ok(())
}

/// Render the board as a plain table, one brand header per group with its
/// score, followed by its fuels.
pub(crate) fn board_lines(board: &PriceBoard, now: chrono::NaiveDateTime) -> Vec<String> {
    let global = GlobalAverages::from_board(board);
    let mut lines = Vec::new();

    for (locality, prices) in &board.localities {
        lines.push(locality.clone());
        for (brand, fuels) in &prices.brands {
            let score = global
                .as_ref()
                .and_then(|g| attractiveness_score(fuels, g))
                .map_or_else(String::new, |s| {
                    format!("  score {s:.1} ({})", ScoreBand::from_score(s))
                });
            lines.push(format!("  {brand}{score}"));
            for (name, price) in fuels.iter() {
                let confidence = Confidence::classify(Some(&price.effective_date), now);
                lines.push(format!(
                    "    {name:<24}{:>10}  {:<20}{confidence}",
                    price.price.round_dp(2).to_string(),
                    price.effective_date.as_str()
                ));
            }
        }
    }
    lines
}

/// # Errors
///
/// Returns an error if the feed request fails.
pub(crate) async fn run_nearest(config: &AppConfig, lat: f64, long: f64) -> anyhow::Result<()> {
    let target = Coordinate::from_parts(Some(lat), Some(long))
        .context("latitude and longitude must be finite numbers")?;

    let feed = PriceFeed::from_config(config, http_client(config)?);
    let records = feed
        .fetch_raw_records(&FeedQuery::brand(config.location_brand.clone()))
        .await?;

    match nearest(target, &records) {
        Some(record) => {
            let distance = record
                .coordinate()
                .map_or_else(String::new, |c| format!(" ({:.1} km)", c.distance_km(&target)));
            println!("{}{distance}", record.locality);
        }
        None => println!("no locality with coordinates found"),
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if any station request fails.
pub(crate) async fn run_stations(config: &AppConfig, zone: &str) -> anyhow::Result<()> {
    let zone = Zone::parse_or_default(zone);
    let client = StationsClient::new(http_client(config)?, &config.stations_url);
    let board = client.fetch_board(zone.anchor()).await?;

    if board.is_empty() {
        println!("no stations found around {}", zone.as_str());
        return Ok(());
    }

    for station in &board {
        let distance = station
            .distancia
            .map_or_else(|| "?".to_string(), |d| format!("{d:.1} km"));
        println!(
            "{} - {} ({})  {distance}",
            station.nombre,
            station.direccion.as_deref().unwrap_or("-"),
            station.localidad.as_deref().unwrap_or("-"),
        );
        for price in station.precios.values() {
            println!(
                "    {:<24}{:>10}  {}",
                price.nombre,
                price.precio.round_dp(2).to_string(),
                price.fecha_vigencia
            );
        }
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the city list cannot be loaded, the query is too
/// short, or nothing matches.
pub(crate) fn run_search(cities_path: &Path, query: &str) -> anyhow::Result<()> {
    let index = CityIndex::load(cities_path)?;
    for city in index.search(query)? {
        println!("{}", city.nombre);
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the prediction endpoint fails.
pub(crate) async fn run_increases(config: &AppConfig) -> anyhow::Result<()> {
    let client = IncreasesClient::new(http_client(config)?, &config.increases_url);
    let body = client.fetch().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
