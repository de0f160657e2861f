//! Tunable policy: anomaly thresholds and run-level settings.
//!
//! The anomaly flags are heuristics rather than correctness conditions, so
//! the thresholds live here as data and can be overridden from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HunterError, Result};

/// Symbol used to right-pad tokens shorter than the longest in a batch.
pub const PAD_SYMBOL: char = '\0';

/// A position is flagged when its most frequent symbol exceeds this share.
pub const DEFAULT_MAX_DOMINANCE: f64 = 0.6;

/// A position is flagged when its observed entropy falls below this many bits.
pub const DEFAULT_MIN_ENTROPY_BITS: f64 = 1.0;

/// Number of candidates the CLI previews when no output file is given.
pub const DEFAULT_PREVIEW_LIMIT: usize = 50;

/// Thresholds for the per-position anomaly flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyThresholds {
    /// Flag when `dominance_ratio > max_dominance`.
    pub max_dominance: f64,
    /// Flag when `entropy < min_entropy_bits`.
    pub min_entropy_bits: f64,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            max_dominance: DEFAULT_MAX_DOMINANCE,
            min_entropy_bits: DEFAULT_MIN_ENTROPY_BITS,
        }
    }
}

impl AnomalyThresholds {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_dominance > 0.0 && self.max_dominance <= 1.0) {
            return Err(HunterError::Config(format!(
                "max_dominance must be in (0, 1], got {}",
                self.max_dominance
            )));
        }
        if !self.min_entropy_bits.is_finite() || self.min_entropy_bits < 0.0 {
            return Err(HunterError::Config(format!(
                "min_entropy_bits must be a non-negative number, got {}",
                self.min_entropy_bits
            )));
        }
        Ok(())
    }

    /// Whether a position with these statistics should be flagged.
    pub fn is_anomalous(&self, dominance_ratio: f64, entropy: f64) -> bool {
        dominance_ratio > self.max_dominance || entropy < self.min_entropy_bits
    }
}

/// Settings loaded from `--config`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HunterConfig {
    pub anomaly: AnomalyThresholds,
    /// Candidates shown on stdout when `generate` has no output file.
    pub preview_limit: usize,
    /// Worker threads for candidate generation (1 = sequential).
    pub workers: usize,
}

impl Default for HunterConfig {
    fn default() -> Self {
        Self {
            anomaly: AnomalyThresholds::default(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            workers: 1,
        }
    }
}

impl HunterConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| HunterError::io(e, Some(path.to_path_buf())))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.anomaly.validate()?;
        if self.workers == 0 {
            return Err(HunterError::Config("workers must be at least 1".into()));
        }
        Ok(())
    }
}
