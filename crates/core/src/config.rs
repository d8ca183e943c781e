//! Configuration structures for the trade-surveillance system.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration for the surveillance system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Manipulation detector configuration.
    pub detector: DetectorConfig,
}

impl Config {
    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that every section holds usable values.
    pub fn validate(&self) -> Result<()> {
        self.detector.validate()
    }
}

/// Windowed order/trade detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Trailing window before each trade in which orders are considered (ms).
    pub window_ms: i64,
    /// Price tolerance around the trade price, as a fraction (0.10 = 10%).
    pub price_range_pct: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_ms: 30 * 60 * 1000,
            price_range_pct: 0.10,
        }
    }
}

impl DetectorConfig {
    /// Window length as a duration.
    pub fn window(&self) -> Result<Duration> {
        Duration::try_milliseconds(self.window_ms).ok_or_else(|| {
            Error::config(format!(
                "detector.window_ms is out of range, got {}",
                self.window_ms
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_ms <= 0 {
            return Err(Error::config(format!(
                "detector.window_ms must be positive, got {}",
                self.window_ms
            )));
        }
        if !self.price_range_pct.is_finite() || self.price_range_pct < 0.0 {
            return Err(Error::config(format!(
                "detector.price_range_pct must be a non-negative number, got {}",
                self.price_range_pct
            )));
        }
        Ok(())
    }
}
