//! Configuration loaded from `bakeqc.toml`.
//!
//! [`BakeqcConfig`] holds every tunable. Keys missing from the file use
//! defaults. The `BAKEQC_DATA_FILE` environment variable takes precedence over
//! the file for the product store location.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::clinic::DEFAULT_PAGE_SIZE;
use crate::quality::{ComplianceMode, DEFAULT_VALIDITY_DAYS};

pub const DEFAULT_CONFIG_FILE: &str = "bakeqc.toml";
pub const DATA_FILE_ENV: &str = "BAKEQC_DATA_FILE";

#[derive(Debug, Clone, Deserialize)]
pub struct BakeqcConfig {
    /// Whether compliance and certification rejections are errors or `false`.
    #[serde(default)]
    pub compliance_mode: ComplianceMode,

    /// Days a certificate stays valid after issuance.
    #[serde(default = "default_validity_days")]
    pub certificate_validity_days: u64,

    /// JSON file holding the products.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// JSON file holding the clinic records.
    #[serde(default = "default_clinic_file")]
    pub clinic_file: PathBuf,

    /// Records per page when listing pets.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_validity_days() -> u64 {
    DEFAULT_VALIDITY_DAYS
}

fn default_data_file() -> PathBuf {
    PathBuf::from("bakeqc-products.json")
}

fn default_clinic_file() -> PathBuf {
    PathBuf::from("bakeqc-pets.json")
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for BakeqcConfig {
    fn default() -> Self {
        Self {
            compliance_mode: ComplianceMode::default(),
            certificate_validity_days: default_validity_days(),
            data_file: default_data_file(),
            clinic_file: default_clinic_file(),
            page_size: default_page_size(),
        }
    }
}

impl BakeqcConfig {
    /// Loads `path` (or `bakeqc.toml` in the working directory). A missing
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<BakeqcConfig>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        Ok(config.with_data_file_override(std::env::var(DATA_FILE_ENV).ok()))
    }

    fn with_data_file_override(mut self, value: Option<String>) -> Self {
        if let Some(file) = value
            && !file.is_empty()
        {
            self.data_file = PathBuf::from(file);
        }
        self
    }
}
