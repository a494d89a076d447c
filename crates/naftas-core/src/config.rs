use crate::app_config::{AppConfig, Environment, FeedKind};
use crate::ConfigError;

pub const DEFAULT_DATASTORE_URL: &str =
    "http://datos.energia.gob.ar/api/3/action/datastore_search";
pub const DEFAULT_DATASTORE_RESOURCE_ID: &str = "80ac25de-a44a-4445-9215-090cf55cfda5";
pub const DEFAULT_CSV_URL: &str = "http://datos.energia.gob.ar/dataset/1c181390-5045-475e-94dc-410429be4b17/resource/80ac25de-a44a-4445-9215-090cf55cfda5/download/precios-en-surtidor-resolucin-3142016.csv";
pub const DEFAULT_STATIONS_URL: &str =
    "https://preciosensurtidor.energia.gob.ar/ws/rest/rest/server.php";
pub const DEFAULT_INCREASES_URL: &str =
    "https://magicloops.dev/api/loop/e55875c3-65a5-4f90-8e31-fb8b7c0311e5/run";

/// Read `NAFTAS_*` settings, loading a `.env` file first if one exists.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] but only looks at the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Assemble an [`AppConfig`] from `lookup`, applying defaults for unset
/// variables.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("NAFTAS_ENV", "development"));

    let bind_addr = or_default("NAFTAS_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("NAFTAS_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("NAFTAS_LOG_LEVEL", "info");

    let price_feed = or_default("NAFTAS_PRICE_FEED", "datastore")
        .parse::<FeedKind>()
        .map_err(|e| invalid("NAFTAS_PRICE_FEED", e))?;

    let datastore_url = or_default("NAFTAS_DATASTORE_URL", DEFAULT_DATASTORE_URL);
    let datastore_resource_id =
        or_default("NAFTAS_DATASTORE_RESOURCE_ID", DEFAULT_DATASTORE_RESOURCE_ID);
    let datastore_limit = parse_u32("NAFTAS_DATASTORE_LIMIT", "40000")?;
    if datastore_limit == 0 {
        return Err(invalid(
            "NAFTAS_DATASTORE_LIMIT",
            "must be greater than zero".to_string(),
        ));
    }
    let csv_url = or_default("NAFTAS_CSV_URL", DEFAULT_CSV_URL);
    let stations_url = or_default("NAFTAS_STATIONS_URL", DEFAULT_STATIONS_URL);
    let increases_url = or_default("NAFTAS_INCREASES_URL", DEFAULT_INCREASES_URL);

    let location_brand = or_default("NAFTAS_LOCATION_BRAND", "YPF");
    if location_brand.trim().is_empty() {
        return Err(invalid(
            "NAFTAS_LOCATION_BRAND",
            "must be non-empty".to_string(),
        ));
    }

    let cities_path = PathBuf::from(or_default("NAFTAS_CITIES_PATH", "./config/cities.json"));
    let brands_path = lookup("NAFTAS_BRANDS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let request_timeout_secs = parse_u64("NAFTAS_REQUEST_TIMEOUT_SECS", "60")?;
    let user_agent = or_default("NAFTAS_USER_AGENT", "naftas/0.1 (fuel-prices)");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        price_feed,
        datastore_url,
        datastore_resource_id,
        datastore_limit,
        csv_url,
        stations_url,
        increases_url,
        location_brand,
        cities_path,
        brands_path,
        request_timeout_secs,
        user_agent,
    })
}

/// Anything other than `production` or `test` is development.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
