use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which upstream format backs the price aggregation routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// CKAN `datastore_search` JSON API.
    Datastore,
    /// Full dataset CSV export.
    Csv,
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedKind::Datastore => write!(f, "datastore"),
            FeedKind::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for FeedKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "datastore" | "json" => Ok(FeedKind::Datastore),
            "csv" => Ok(FeedKind::Csv),
            other => Err(format!("unknown price feed '{other}'; expected datastore or csv")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub price_feed: FeedKind,
    pub datastore_url: String,
    pub datastore_resource_id: String,
    pub datastore_limit: u32,
    pub csv_url: String,
    pub stations_url: String,
    pub increases_url: String,
    /// Brand used to filter candidates when resolving the nearest locality.
    pub location_brand: String,
    pub cities_path: PathBuf,
    /// Optional YAML override for the brand allow-list.
    pub brands_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}
