//! Client-side state: the selected city and saved price bookmarks.
//!
//! The store is an explicit value. Callers `load` it once at start-up and
//! `save` it after each user action; nothing is written implicitly.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access store at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize store: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// A price the user chose to keep an eye on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub brand: String,
    pub fuel_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub date: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub liters: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub total: Option<Decimal>,
}

impl Bookmark {
    /// Builds a bookmark, deriving its id from brand, fuel and city and the
    /// total from `liters × price`. The total is `None` if that product
    /// overflows.
    #[must_use]
    pub fn new(
        brand: &str,
        fuel_type: &str,
        price: Decimal,
        date: &str,
        city: &str,
        liters: Option<Decimal>,
    ) -> Self {
        Self {
            id: bookmark_id(brand, fuel_type, city),
            brand: brand.to_owned(),
            fuel_type: fuel_type.to_owned(),
            price,
            date: date.to_owned(),
            city: city.to_owned(),
            liters,
            total: liters
                .and_then(|l| l.checked_mul(price))
                .map(|t| t.round_dp(2)),
        }
    }
}

/// URL-safe id such as `ypf-super-berisso`.
#[must_use]
pub fn bookmark_id(brand: &str, fuel_type: &str, city: &str) -> String {
    format!("{brand} {fuel_type} {city}")
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

impl ClientStore {
    /// Reads the store from `path`; a missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        serde_json::from_str(&content).map_err(|e| StoreError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Writes the store to `path`, creating parent directories as needed.
    ///
    /// The file is written next to its destination and renamed into place
    /// so a crash never leaves a truncated store behind.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on serialization or filesystem failure.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |e| StoreError::Io {
            path: path.display().to_string(),
            source: e,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(StoreError::Serialize)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = Some(city.into());
    }

    /// Adds `bookmark`, replacing any bookmark with the same id.
    pub fn save_bookmark(&mut self, bookmark: Bookmark) {
        match self.bookmarks.iter_mut().find(|b| b.id == bookmark.id) {
            Some(existing) => *existing = bookmark,
            None => self.bookmarks.push(bookmark),
        }
    }

    /// Returns `true` if a bookmark was removed.
    pub fn remove_bookmark(&mut self, id: &str) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.id != id);
        self.bookmarks.len() != before
    }
}
