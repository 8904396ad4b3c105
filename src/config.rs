//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! wave-config.toml file. It covers the forecast zone to extract, the buoy
//! feed and its row layout, and the fetcher's HTTP settings.
//!
//! Every section carries serde defaults, so a file that only overrides the
//! zone (or nothing at all) still produces a usable configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "wave-config.toml";

/// Errors raised while writing configuration back to disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config serialization: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),
}

/// Application configuration loaded from wave-config.toml
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Zone forecast source and extraction settings
    pub forecast: ForecastConfig,
    /// Buoy feed source and row layout
    pub buoy: BuoyConfig,
    /// HTTP client settings
    pub fetch: FetchConfig,
}

/// What to do with a forecast period whose text matches no wave pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// Drop the period entirely
    #[default]
    Omit,
    /// Keep the period as a truncated raw-text line
    Truncate,
}

/// Zone forecast configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Forecast product URL (NDBC HTML rendering of the zone forecast)
    pub url: String,
    /// Literal zone code marking the start of the span of interest
    pub zone: String,
    /// Human-readable zone description for the card
    pub zone_name: String,
    /// Regex marking the end of the zone span (the next zone code)
    pub zone_terminator: String,
    /// Maximum number of forecast periods retained
    pub max_periods: usize,
    /// Handling of periods with no recognizable wave data
    pub unmatched: UnmatchedPolicy,
    /// Character budget for truncated raw-text lines
    pub truncate_chars: usize,
    /// Line shown when nothing could be extracted
    pub fallback_text: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            url: "https://www.ndbc.noaa.gov/data/Forecasts/FZCA52.TJSJ.html".to_string(),
            zone: "AMZ726".to_string(),
            zone_name: "Coastal waters east of Puerto Rico".to_string(),
            zone_terminator: r"AMZ\d{3}".to_string(),
            max_periods: 6,
            unmatched: UnmatchedPolicy::Omit,
            truncate_chars: 48,
            fallback_text: "Wave forecast temporarily unavailable.".to_string(),
        }
    }
}

/// Buoy document layout selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuoyFormatSetting {
    /// Probe the document: HTML table if it has one, columnar text otherwise
    #[default]
    Auto,
    Columnar,
    Table,
}

/// Buoy feed configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct BuoyConfig {
    /// Feed URL (realtime2 text file or station page)
    pub url: String,
    /// NDBC station identifier, shown on the card
    pub station: String,
    /// Document layout
    pub format: BuoyFormatSetting,
    /// Line index of the latest observation in columnar feeds.
    /// realtime2 files carry a units line, so the first data row is line 2.
    pub row_offset: usize,
    /// Convert wave heights from meters to feet before display
    pub convert_meters_to_feet: bool,
}

impl Default for BuoyConfig {
    fn default() -> Self {
        BuoyConfig {
            url: "https://www.ndbc.noaa.gov/data/realtime2/41043.spec".to_string(),
            station: "41043".to_string(),
            format: BuoyFormatSetting::Auto,
            row_offset: 2,
            convert_meters_to_feet: false,
        }
    }
}

/// HTTP client configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent to NDBC
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout_secs: 20,
            user_agent: concat!("wave-card/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Load configuration from wave-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        zone = %config.forecast.zone,
                        station = %config.buoy.station,
                        "Loaded configuration from {}",
                        path.display()
                    );
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format: {}", e);
                    warn!("Using default configuration (AMZ726 / buoy 41043)");
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file found, using default configuration (AMZ726 / buoy 41043)");
                Self::default()
            }
        }
    }

    /// Save current configuration as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
