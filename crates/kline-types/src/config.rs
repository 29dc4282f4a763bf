//! Run configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Category, DayBoundary, KlineError, Result};

/// Configuration shared by every pipeline of a run.
///
/// Loaded from an optional JSON file; every field has a default so a file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KlineConfig {
    /// Root of the trade archive tree (`<root>/<category>/<date>/*.zip`).
    pub archive_root: PathBuf,
    /// Root under which kline tables are written.
    pub output_root: PathBuf,
    /// Where each trading day starts.
    pub boundary: DayBoundary,
    /// Categories processed by a run.
    pub categories: Vec<Category>,
    /// Output format name (`csv`, `json`, `ndjson`, `parquet`).
    pub format: String,
}

impl Default for KlineConfig {
    fn default() -> Self {
        Self {
            archive_root: PathBuf::from("/share/agg_database/bn"),
            output_root: PathBuf::from("/share"),
            boundary: DayBoundary::default(),
            categories: Category::all().to_vec(),
            format: "csv".to_string(),
        }
    }
}

impl KlineConfig {
    /// Parses a configuration from JSON text and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are invalid.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            KlineError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Checks the configuration for values no run can use.
    ///
    /// # Errors
    ///
    /// Returns [`KlineError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.boundary.validate()?;
        if self.categories.is_empty() {
            return Err(KlineError::Config("no categories configured".to_string()));
        }
        if self.archive_root.as_os_str().is_empty() {
            return Err(KlineError::Config("archive_root is empty".to_string()));
        }
        if self.output_root.as_os_str().is_empty() {
            return Err(KlineError::Config("output_root is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = KlineConfig::default();
        assert_eq!(config.categories, vec![Category::Spot, Category::UsdMargined]);
        assert_eq!(config.boundary, DayBoundary::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = KlineConfig::from_json_str(
            r#"{"archive_root": "/data/bn", "categories": ["um"], "boundary": {"hour": 0, "utc_offset_minutes": 0}}"#,
        )
        .unwrap();

        assert_eq!(config.archive_root, PathBuf::from("/data/bn"));
        assert_eq!(config.output_root, PathBuf::from("/share"));
        assert_eq!(config.categories, vec![Category::UsdMargined]);
        assert_eq!(config.boundary, DayBoundary::utc_midnight());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            KlineConfig::from_json_str("{\"archive_root\": 3}"),
            Err(KlineError::Json(_))
        ));
        assert!(matches!(
            KlineConfig::from_json_str("{\"unknown\": true}"),
            Err(KlineError::Json(_))
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            KlineConfig::from_json_str(r#"{"categories": []}"#),
            Err(KlineError::Config(_))
        ));
        assert!(matches!(
            KlineConfig::from_json_str(r#"{"boundary": {"hour": 30}}"#),
            Err(KlineError::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"output_root": "/tmp/klines"}}"#).unwrap();

        let config = KlineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.output_root, PathBuf::from("/tmp/klines"));
    }

    #[test]
    fn test_missing_file() {
        let result = KlineConfig::from_file(Path::new("/nonexistent/kline.json"));
        assert!(matches!(result, Err(KlineError::Config(_))));
    }
}
