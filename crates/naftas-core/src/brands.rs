use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Flags tracked when no brands file is configured, spelled as the dataset
/// publishes them in `empresabandera`.
pub const DEFAULT_BRANDS: [&str; 4] = ["YPF", "SHELL C.A.P.S.A.", "AXION", "PUMA"];

#[derive(Debug, Deserialize)]
pub struct BrandsFile {
    pub brands: Vec<String>,
}

/// The set of station flags whose prices are kept during aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandAllowList {
    brands: Vec<String>,
}

impl Default for BrandAllowList {
    fn default() -> Self {
        Self {
            brands: DEFAULT_BRANDS.iter().map(|b| (*b).to_owned()).collect(),
        }
    }
}

impl BrandAllowList {
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for empty or duplicate brand names.
    pub fn new<I, S>(brands: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let brands: Vec<String> = brands.into_iter().map(Into::into).collect();
        validate_brands(&brands)?;
        Ok(Self { brands })
    }

    /// Exact match against the dataset spelling.
    #[must_use]
    pub fn contains(&self, brand: &str) -> bool {
        self.brands.iter().any(|b| b == brand)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.brands
    }
}

/// Load the brand allow-list from a YAML file of the form
/// `brands: [YPF, AXION, ...]`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_brands(path: &Path) -> Result<BrandAllowList, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: BrandsFile = serde_yaml::from_str(&content).map_err(ConfigError::BrandsFileParse)?;
    BrandAllowList::new(file.brands)
}

fn validate_brands(brands: &[String]) -> Result<(), ConfigError> {
    if brands.is_empty() {
        return Err(ConfigError::Validation(
            "brand allow-list must not be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for brand in brands {
        if brand.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand name must be non-empty".to_string(),
            ));
        }
        if !seen.insert(brand.to_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand name: '{brand}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "brands_test.rs"]
mod tests;
