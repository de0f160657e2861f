//! Closed-form predictions for the biased-subset model, no corpus required.

use serde::{Deserialize, Serialize};

use crate::entropy::{expected_matches, subtle_predict_bits};
use crate::error::{HunterError, Result};
use crate::model::{DEFAULT_FAV_WEIGHT, DEFAULT_LENGTH, DEFAULT_SUBSET_K};

pub const DEFAULT_SAMPLE_SIZE: u64 = 50_000;
pub const DEFAULT_GUESSES: u64 = 100_000;

/// `(per_position_bits, total_bits)` for subset size `subset_k`, favored
/// weight `fav_weight` and `length` positions.
pub fn predict(subset_k: usize, fav_weight: f64, length: usize) -> Result<(f64, f64)> {
    subtle_predict_bits(subset_k, fav_weight, length)
}

/// Inputs to a planning run.
///
/// There is no alphabet here, so `subset_k` is only bounded below (k ≥ 2).
/// Subsets larger than the alphabet a real generator uses are still valid
/// inputs to the closed form; [`ModelParams`](crate::ModelParams) enforces
/// `k ≤ |alphabet|` when a model is actually built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TheoryParams {
    pub subset_k: usize,
    pub fav_weight: f64,
    pub length: usize,
    /// Size of the captured token set.
    pub sample_size: u64,
    /// Number of attack guesses.
    pub guesses: u64,
}

impl Default for TheoryParams {
    fn default() -> Self {
        Self {
            subset_k: DEFAULT_SUBSET_K,
            fav_weight: DEFAULT_FAV_WEIGHT,
            length: DEFAULT_LENGTH,
            sample_size: DEFAULT_SAMPLE_SIZE,
            guesses: DEFAULT_GUESSES,
        }
    }
}

/// Everything the planner derives from [`TheoryParams`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TheoryReport {
    pub params: TheoryParams,
    pub per_position_bits: f64,
    pub total_bits: f64,
    /// `2^total_bits`.
    pub effective_space: f64,
    /// `2^-total_bits`.
    pub hit_probability: f64,
    pub expected_matches: f64,
}

impl TheoryReport {
    pub fn compute(params: TheoryParams) -> Result<Self> {
        if params.sample_size == 0 {
            return Err(HunterError::invalid("sample size must be at least 1"));
        }
        if params.guesses == 0 {
            return Err(HunterError::invalid("guess count must be at least 1"));
        }
        let (per_position_bits, total_bits) =
            predict(params.subset_k, params.fav_weight, params.length)?;
        Ok(Self {
            params,
            per_position_bits,
            total_bits,
            effective_space: total_bits.exp2(),
            hit_probability: (-total_bits).exp2(),
            expected_matches: expected_matches(total_bits, params.sample_size, params.guesses),
        })
    }
}
