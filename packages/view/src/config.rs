//! View configuration.
//!
//! Defaults show central London in September 2017. A TOML file may override
//! any subset of the fields:
//!
//! ```toml
//! month = "2018-01"
//! zoom = 14
//!
//! [initial_center]
//! lat = 53.4808
//! lng = -2.2426
//! ```

use std::path::Path;

use crime_region_crime_models::YearMonth;
use crime_region_geography_models::LatLng;
use serde::{Deserialize, Serialize};

/// Errors loading a [`ViewConfig`] from disk.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid config TOML.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value parsed but is unusable.
    #[error("Invalid config: {message}")]
    Invalid {
        /// What is wrong.
        message: String,
    },
}

/// Settings fixed for the lifetime of a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Where the map and the first region are centred on mount.
    pub initial_center: LatLng,
    /// Zoom level on mount and after every place search.
    pub zoom: u8,
    /// Region width in metres.
    pub region_width_m: f64,
    /// Region height in metres.
    pub region_height_m: f64,
    /// Month every query is scoped to.
    pub month: YearMonth,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_center: LatLng::new(51.5203, -0.1202),
            zoom: 15,
            region_width_m: 1000.0,
            region_height_m: 1000.0,
            month: YearMonth::default(),
        }
    }
}

impl ViewConfig {
    /// Parses a config from TOML text, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or a value is out
    /// of range.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validated()
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded view config from {}", path.display());
        Ok(config)
    }

    /// Checks the centre is a real coordinate and the region size is
    /// positive. Run after any field is changed by hand.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending value.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let center = self.initial_center;
        if !(-90.0..=90.0).contains(&center.lat) || !(-180.0..=180.0).contains(&center.lng) {
            return Err(ConfigError::Invalid {
                message: format!("initial_center {center} is not a valid coordinate"),
            });
        }
        if !(self.region_width_m > 0.0 && self.region_height_m > 0.0) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "region size {}x{} m must be positive",
                    self.region_width_m, self.region_height_m
                ),
            });
        }
        Ok(self)
    }
}
