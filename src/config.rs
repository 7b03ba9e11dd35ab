//! Application Configuration
//! Window geometry, CSV parsing options and chart export settings.

use serde::Deserialize;
use std::path::Path;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "csv_explorer.json";

/// Spellings treated as missing when parsing CSV (same set pandas uses).
/// Empty fields are always missing and need no entry here.
pub const DEFAULT_NULL_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// CSV parsing options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub infer_schema_length: usize,
    pub null_values: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: 10000,
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub csv: CsvOptions,
    pub export_width: u32,
    pub export_height: u32,
    pub table_max_height: f32,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            window_size: [1400.0, 800.0],
            min_window_size: [1000.0, 600.0],
            csv: CsvOptions::default(),
            export_width: 1200,
            export_height: 800,
            table_max_height: 280.0,
        }
    }
}

impl ExplorerConfig {
    /// Load `csv_explorer.json` from the working directory, or defaults.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(text) => match Self::from_json(&text) {
                Ok(config) => {
                    log::info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring malformed {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ExplorerConfig::from_json(r#"{"export_width": 640, "csv": {"null_values": ["-"]}}"#)
                .unwrap();

        assert_eq!(config.export_width, 640);
        assert_eq!(config.export_height, 800);
        assert_eq!(config.csv.null_values, vec!["-".to_string()]);
        assert_eq!(config.csv.infer_schema_length, 10000);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(ExplorerConfig::load_from(&path), ExplorerConfig::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ExplorerConfig::load_from(&dir.path().join(CONFIG_FILE));
        assert_eq!(config, ExplorerConfig::default());
    }
}
