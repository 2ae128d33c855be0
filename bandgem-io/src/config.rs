//! Instrument placement configuration.
//!
//! The constants that position the generated instrument (sample, bank,
//! panel, and monitor z positions, bank angles, validity dates) live in
//! a JSON-loadable configuration whose defaults match the LOKI Band-GEM
//! prototype layout.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Instrument placement configuration.
///
/// Every field has a default, so a partial JSON document overrides only
/// what it names.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentConfig {
    /// Instrument name written to the IDF header.
    pub name: String,
    /// Number of detector banks the panel array is replicated into.
    pub banks: u32,
    /// Sample holder position along the beam, metres.
    pub sample_z_m: f64,
    /// Bank placement distance along the beam, metres.
    pub bank_z_m: f64,
    /// Panel position within a bank, metres.
    pub panel_z_m: f64,
    /// Beam monitor position, metres.
    pub monitor_z_m: f64,
    /// Angle of the first bank, degrees.
    pub first_bank_angle_deg: f64,
    /// Angle step between consecutive banks, degrees.
    pub bank_angle_step_deg: f64,
    /// IDF validity start date.
    pub valid_from: String,
    /// IDF validity end date.
    pub valid_to: String,
    /// IDF last-modified stamp.
    pub last_modified: String,
    /// Physical detector ID of the beam monitor; when absent the map
    /// writer uses the largest pad ID + 1.
    pub monitor_id: Option<u32>,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            name: "LOKI".to_string(),
            banks: 1,
            sample_z_m: 25.300,
            bank_z_m: 25.300,
            panel_z_m: 3.406,
            monitor_z_m: 25.760,
            first_bank_angle_deg: 90.0,
            bank_angle_step_deg: 45.0,
            valid_from: "1900-01-31 23:59:59".to_string(),
            valid_to: "2100-01-31 23:59:59".to_string(),
            last_modified: "2010-11-16 12:02:05".to_string(),
            monitor_id: None,
        }
    }
}

impl InstrumentConfig {
    /// Loads and validates a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for usable values.
    pub fn validate(&self) -> Result<()> {
        if self.banks == 0 {
            return Err(Error::InvalidConfig(
                "banks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
