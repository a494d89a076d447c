pub mod aggregate;
pub mod app_config;
pub mod brands;
pub mod cities;
pub mod config;
pub mod confidence;
pub mod fuel;
pub mod geo;
pub mod records;
pub mod score;
pub mod store;
pub mod zones;

pub use aggregate::{aggregate_prices, AggregateOptions, BrandFuels, FuelPrice, LocalityPrices, PriceBoard};
pub use app_config::{AppConfig, Environment, FeedKind};
pub use brands::{load_brands, BrandAllowList, BrandsFile, DEFAULT_BRANDS};
pub use cities::{City, CityIndex, SearchError, MIN_QUERY_LEN};
pub use config::{load_app_config, load_app_config_from_env};
pub use confidence::Confidence;
pub use fuel::{fuel_name, FuelGrade, UNKNOWN_FUEL};
pub use geo::{calculate_distance, nearest, Coordinate, Located, EARTH_RADIUS_KM};
pub use records::{EffectiveDate, PriceRecord};
pub use score::{attractiveness_score, GlobalAverages, ScoreBand};
pub use store::{Bookmark, ClientStore, StoreError};
pub use zones::Zone;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse brands file: {0}")]
    BrandsFileParse(#[source] serde_yaml::Error),

    #[error("failed to parse cities file: {0}")]
    CitiesFileParse(#[source] serde_json::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
