//! # Report Configuration
//!
//! Optional YAML file controlling where summaries are read from, which tables
//! make up the report and how pages are sized. Every key is optional:
//!
//! ```yaml
//! data_dir: ./data
//! output_dir: ./out
//! region_types: [cousub, tract, blockgroup]
//! buffer_sizes: [25000, 45000, 65000]
//! histogram_bins: 100
//! neighbor_bin_limit: 60
//! page_width: 960
//! page_height: 720
//! null_cbsa: 99999
//! ```

use crate::{pages::PageSettings, region::null_cbsa_code, region::RegionType};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Directory holding the `segregation_*_norm.csv.gz` summaries.
    pub data_dir: PathBuf,
    /// Directory the PDF is written to.
    pub output_dir: PathBuf,
    pub region_types: Vec<RegionType>,
    /// Population buffer sizes, ignored for county subdivisions.
    pub buffer_sizes: Vec<u32>,
    pub histogram_bins: usize,
    /// Neighbor histogram edges are `0..neighbor_bin_limit`.
    pub neighbor_bin_limit: u32,
    /// Page raster width in pixels.
    pub page_width: u32,
    /// Page raster height in pixels.
    pub page_height: u32,
    /// Overrides the null CBSA code derived from the year.
    pub null_cbsa: Option<u32>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            region_types: RegionType::ALL.to_vec(),
            buffer_sizes: vec![25000, 45000, 65000],
            histogram_bins: 100,
            neighbor_bin_limit: 60,
            page_width: 960,
            page_height: 720,
            null_cbsa: None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

impl ReportConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: ReportConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region_types.is_empty() {
            return Err(ConfigError::Invalid("region_types must not be empty"));
        }
        if self.histogram_bins == 0 {
            return Err(ConfigError::Invalid("histogram_bins must be positive"));
        }
        if self.neighbor_bin_limit < 2 {
            return Err(ConfigError::Invalid("neighbor_bin_limit must be at least 2"));
        }
        if self.page_width == 0 || self.page_height == 0 {
            return Err(ConfigError::Invalid("page dimensions must be positive"));
        }
        Ok(())
    }

    /// Page derivation settings for a given census year.
    pub fn page_settings(&self, year: u32) -> PageSettings {
        PageSettings {
            histogram_bins: self.histogram_bins,
            neighbor_bin_limit: self.neighbor_bin_limit,
            null_cbsa: self.null_cbsa.unwrap_or_else(|| null_cbsa_code(year)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(ReportConfig::from_yaml("").unwrap(), ReportConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let yaml = r#"
            data_dir: /srv/census
            region_types: [tract]
            buffer_sizes: [45000]
        "#;
        let config = ReportConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/census"));
        assert_eq!(config.region_types, vec![RegionType::Tract]);
        assert_eq!(config.buffer_sizes, vec![45000]);
        assert_eq!(config.histogram_bins, 100);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            ReportConfig::from_yaml("bins: 10"),
            Err(ConfigError::YamlError(_))
        ));
    }

    #[test]
    fn test_unknown_region_type_rejected() {
        match ReportConfig::from_yaml("region_types: [tract, county]") {
            Err(ConfigError::YamlError(err)) => {
                assert!(err.to_string().contains("Unknown region type 'county'"))
            }
            other => panic!("Expected YAML error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            ReportConfig::from_yaml("histogram_bins: 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ReportConfig::from_yaml("region_types: []"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ReportConfig::from_yaml("neighbor_bin_limit: 1"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_null_cbsa_override() {
        let config = ReportConfig::default();
        assert_eq!(config.page_settings(2000).null_cbsa, 9999);
        assert_eq!(config.page_settings(2010).null_cbsa, 99999);

        let config = ReportConfig::from_yaml("null_cbsa: 12345").unwrap();
        assert_eq!(config.page_settings(2010).null_cbsa, 12345);
    }

    #[test]
    fn test_file_loading() -> Result<(), ConfigError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("report.yaml");
        std::fs::write(&path, "page_width: 640\npage_height: 480\n")?;

        let config = ReportConfig::load_from_file(&path)?;
        assert_eq!((config.page_width, config.page_height), (640, 480));
        Ok(())
    }
}
