//! The price-record capability shared by every upstream format.

use std::future::Future;

use naftas_core::{AppConfig, FeedKind, PriceRecord};
use reqwest::Client;

use crate::csv_feed::CsvFeed;
use crate::datastore::DatastoreFeed;
use crate::error::FeedError;

/// Narrows what an upstream returns. Both fields match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub locality: Option<String>,
    pub brand: Option<String>,
}

impl FeedQuery {
    #[must_use]
    pub fn locality(locality: impl Into<String>) -> Self {
        Self {
            locality: Some(locality.into()),
            brand: None,
        }
    }

    #[must_use]
    pub fn brand(brand: impl Into<String>) -> Self {
        Self {
            locality: None,
            brand: Some(brand.into()),
        }
    }

    pub(crate) fn matches(&self, locality: &str, brand: &str) -> bool {
        self.locality.as_deref().is_none_or(|l| l == locality)
            && self.brand.as_deref().is_none_or(|b| b == brand)
    }
}

/// A source of raw [`PriceRecord`]s.
pub trait PriceSource {
    /// Fetches every record matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] on network failure, non-2xx status, an upstream
    /// failure flag, or a payload that cannot be parsed.
    fn fetch_raw_records(
        &self,
        query: &FeedQuery,
    ) -> impl Future<Output = Result<Vec<PriceRecord>, FeedError>> + Send;
}

/// The configured [`PriceSource`].
#[derive(Debug, Clone)]
pub enum PriceFeed {
    Datastore(DatastoreFeed),
    Csv(CsvFeed),
}

impl PriceFeed {
    /// Picks the strategy named by `config.price_feed`.
    #[must_use]
    pub fn from_config(config: &AppConfig, client: Client) -> Self {
        match config.price_feed {
            FeedKind::Datastore => PriceFeed::Datastore(DatastoreFeed::new(
                client,
                &config.datastore_url,
                &config.datastore_resource_id,
                config.datastore_limit,
            )),
            FeedKind::Csv => PriceFeed::Csv(CsvFeed::new(client, &config.csv_url)),
        }
    }

    #[must_use]
    pub fn kind(&self) -> FeedKind {
        match self {
            PriceFeed::Datastore(_) => FeedKind::Datastore,
            PriceFeed::Csv(_) => FeedKind::Csv,
        }
    }
}

impl PriceSource for PriceFeed {
    async fn fetch_raw_records(&self, query: &FeedQuery) -> Result<Vec<PriceRecord>, FeedError> {
        match self {
            PriceFeed::Datastore(feed) => feed.fetch_raw_records(query).await,
            PriceFeed::Csv(feed) => feed.fetch_raw_records(query).await,
        }
    }
}
