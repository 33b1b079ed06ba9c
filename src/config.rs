//! # Compile Options
//!
//! Settings that steer a pipeline run, loadable from a YAML file:
//!
//! ```yaml
//! bpm: 178
//! offset-ms: 50
//! order: timestamp
//! ```
//!
//! Every key is optional. `bpm` and `offset-ms` override the chart header's `BPM` and
//! `Offset`; `order` picks how each hand's command list is ordered.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chart::Header;
use crate::error::StageError;

/// Ordering applied to a compiled command list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandOrder {
    /// Note order, then the fixed per-note emission order
    #[default]
    Generation,
    /// Stable sort by timestamp
    Timestamp,
}

impl FromStr for CommandOrder {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generation" => Ok(CommandOrder::Generation),
            "timestamp" => Ok(CommandOrder::Timestamp),
            _ => Err(StageError::Config(format!(
                "unknown order '{}' (expected generation or timestamp)",
                s
            ))),
        }
    }
}

impl fmt::Display for CommandOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOrder::Generation => f.write_str("generation"),
            CommandOrder::Timestamp => f.write_str("timestamp"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Tempo override; the header's BPM is used when absent
    pub bpm: Option<f64>,
    /// Offset override; the header's `Offset` is used when absent
    pub offset_ms: Option<i64>,
    pub order: CommandOrder,
}

impl CompileOptions {
    /// Parse options from YAML text. Blank text gives the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, StageError> {
        if content.trim().is_empty() {
            return Ok(CompileOptions::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| StageError::Config(format!("Failed to parse options: {}", e)))
    }

    /// Read options from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StageError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn resolve_bpm(&self, header: &Header) -> f64 {
        self.bpm.unwrap_or(header.bpm)
    }

    pub fn resolve_offset_ms(&self, header: &Header) -> i64 {
        self.offset_ms.unwrap_or(header.offset)
    }
}
