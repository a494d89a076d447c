pub mod client;
pub mod csv_feed;
pub mod datastore;
pub mod error;
pub mod increases;
pub mod source;
pub mod stations;
pub mod types;

pub use client::build_http_client;
pub use csv_feed::CsvFeed;
pub use datastore::DatastoreFeed;
pub use error::FeedError;
pub use increases::IncreasesClient;
pub use source::{FeedQuery, PriceFeed, PriceSource};
pub use stations::{StationPrice, StationSummary, StationsClient};
