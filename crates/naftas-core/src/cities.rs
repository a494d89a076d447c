//! The bundled list of cities offered by the search box.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::{Coordinate, Located};
use crate::ConfigError;

/// Shortest query (in characters, after trimming) that is searched.
pub const MIN_QUERY_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitud: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitud: Option<f64>,
}

impl Located for City {
    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitud, self.longitud)
    }
}

#[derive(Debug, Deserialize)]
struct CitiesFile {
    cities: Vec<City>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("query must be at least {min} characters long")]
    QueryTooShort { min: usize },
    #[error("no cities match the query")]
    NoMatch,
}

#[derive(Debug, Clone, Default)]
pub struct CityIndex {
    cities: Vec<City>,
}

impl CityIndex {
    #[must_use]
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// Parse a `{ "cities": [...] }` document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CitiesFileParse`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: CitiesFile = serde_json::from_str(json).map_err(ConfigError::CitiesFileParse)?;
        Ok(Self::new(file.cities))
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Case-insensitive substring search on the city name.
    ///
    /// # Errors
    ///
    /// [`SearchError::QueryTooShort`] below [`MIN_QUERY_LEN`] characters,
    /// [`SearchError::NoMatch`] when nothing matches.
    pub fn search(&self, query: &str) -> Result<Vec<&City>, SearchError> {
        let needle = query.trim().to_lowercase();
        if needle.chars().count() < MIN_QUERY_LEN {
            return Err(SearchError::QueryTooShort { min: MIN_QUERY_LEN });
        }

        let matches: Vec<&City> = self
            .cities
            .iter()
            .filter(|c| c.nombre.to_lowercase().contains(&needle))
            .collect();

        if matches.is_empty() {
            return Err(SearchError::NoMatch);
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> CityIndex {
        CityIndex::from_json(
            r#"{ "cities": [
                { "nombre": "BERISSO", "latitud": -34.87, "longitud": -57.88 },
                { "nombre": "CAPITAL FEDERAL", "latitud": -34.60, "longitud": -58.38 },
                { "nombre": "SAN MIGUEL DE TUCUMÁN" },
                { "nombre": "SAN MIGUEL" }
            ] }"#,
        )
        .unwrap()
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let idx = index();
        let names: Vec<&str> = idx
            .search("miguel")
            .unwrap()
            .iter()
            .map(|c| c.nombre.as_str())
            .collect();
        assert_eq!(names, vec!["SAN MIGUEL DE TUCUMÁN", "SAN MIGUEL"]);
    }

    #[test]
    fn search_handles_accented_names() {
        let idx = index();
        assert_eq!(idx.search("tucumán").unwrap().len(), 1);
    }

    #[test]
    fn short_query_is_rejected() {
        let idx = index();
        assert_eq!(
            idx.search("sa"),
            Err(SearchError::QueryTooShort { min: MIN_QUERY_LEN })
        );
        assert_eq!(
            idx.search("  "),
            Err(SearchError::QueryTooShort { min: MIN_QUERY_LEN })
        );
    }

    #[test]
    fn no_match_is_reported() {
        assert_eq!(index().search("ushuaia"), Err(SearchError::NoMatch));
    }

    #[test]
    fn optional_coordinates_are_omitted_on_output() {
        let idx = index();
        let city = idx.search("tucum").unwrap()[0];
        let json = serde_json::to_value(city).unwrap();
        assert_eq!(json, serde_json::json!({ "nombre": "SAN MIGUEL DE TUCUMÁN" }));
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let result = CityIndex::from_json("{ \"towns\": [] }");
        assert!(matches!(result, Err(ConfigError::CitiesFileParse(_))));
    }
}
