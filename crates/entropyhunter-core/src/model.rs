//! The biased-subset token model.
//!
//! Each position draws a random `k`-symbol subset of the alphabet once, when
//! the model is built, and marks one member as favored with weight `w`; the
//! other members weigh 1. Tokens sampled from a built model are what a
//! subtly weak generator would hand out, and the model's entropy has a
//! closed form (see [`crate::entropy::subtle_per_position_entropy`]).

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::entropy::subtle_predict_bits;
use crate::error::{HunterError, Result};

/// URL-safe base64 alphabet.
pub const DEFAULT_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
pub const DEFAULT_SUBSET_K: usize = 8;
pub const DEFAULT_FAV_WEIGHT: f64 = 6.0;
pub const DEFAULT_LENGTH: usize = 24;

/// Parameters of a biased-subset model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub alphabet: String,
    pub subset_k: usize,
    pub fav_weight: f64,
    pub length: usize,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.to_string(),
            subset_k: DEFAULT_SUBSET_K,
            fav_weight: DEFAULT_FAV_WEIGHT,
            length: DEFAULT_LENGTH,
        }
    }
}

impl ModelParams {
    pub fn new(subset_k: usize, fav_weight: f64, length: usize) -> Self {
        Self {
            subset_k,
            fav_weight,
            length,
            ..Self::default()
        }
    }

    pub fn with_alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.alphabet = alphabet.into();
        self
    }

    /// Check the model invariants: a non-empty alphabet of distinct symbols,
    /// `2 <= k <= |alphabet|`, and a positive finite weight.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for sym in self.alphabet.chars() {
            if !seen.insert(sym) {
                return Err(HunterError::invalid(format!(
                    "alphabet contains {sym:?} more than once"
                )));
            }
        }
        let size = seen.len();
        if size == 0 {
            return Err(HunterError::invalid("alphabet must not be empty"));
        }
        if self.subset_k < 2 || self.subset_k > size {
            return Err(HunterError::invalid(format!(
                "subset size k must be between 2 and the alphabet size ({size}), got {}",
                self.subset_k
            )));
        }
        if !self.fav_weight.is_finite() || self.fav_weight <= 0.0 {
            return Err(HunterError::invalid(format!(
                "favored weight must be a positive finite number, got {}",
                self.fav_weight
            )));
        }
        Ok(())
    }
}

/// One position of a built model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsetPosition {
    /// Subset members in draw order.
    pub symbols: Vec<char>,
    /// Index of the favored member in `symbols`.
    pub favored: usize,
    cumulative: Vec<f64>,
}

impl SubsetPosition {
    fn new(symbols: Vec<char>, favored: usize, fav_weight: f64) -> Self {
        let mut acc = 0.0;
        let cumulative = (0..symbols.len())
            .map(|i| {
                acc += if i == favored { fav_weight } else { 1.0 };
                acc
            })
            .collect();
        Self {
            symbols,
            favored,
            cumulative,
        }
    }

    pub fn favored_symbol(&self) -> char {
        self.symbols[self.favored]
    }

    /// Symbol for `u` in `[0, total weight)`: the first whose cumulative
    /// weight reaches `u`, clamped to the last member.
    fn select(&self, u: f64) -> char {
        let idx = self.cumulative.partition_point(|&cum| cum < u);
        self.symbols[idx.min(self.symbols.len() - 1)]
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        self.select(rng.random::<f64>() * total)
    }
}

/// A built, immutable biased-subset model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiasedSubsetModel {
    pub params: ModelParams,
    pub positions: Vec<SubsetPosition>,
    per_position_bits: f64,
}

impl BiasedSubsetModel {
    /// Draw the per-position subsets and favored symbols.
    pub fn build<R: Rng + ?Sized>(params: ModelParams, rng: &mut R) -> Result<Self> {
        params.validate()?;
        let (per_position_bits, _) =
            subtle_predict_bits(params.subset_k, params.fav_weight, params.length)?;
        let alphabet: Vec<char> = params.alphabet.chars().collect();
        let positions = (0..params.length)
            .map(|_| {
                let subset: Vec<char> = alphabet
                    .choose_multiple(rng, params.subset_k)
                    .copied()
                    .collect();
                let favored = rng.random_range(0..subset.len());
                SubsetPosition::new(subset, favored, params.fav_weight)
            })
            .collect();
        Ok(Self {
            params,
            positions,
            per_position_bits,
        })
    }

    pub fn length(&self) -> usize {
        self.positions.len()
    }

    /// Closed-form `(per_position_bits, total_bits)` for this model.
    pub fn predict(&self) -> (f64, f64) {
        (
            self.per_position_bits,
            self.per_position_bits * self.length() as f64,
        )
    }

    /// Sample one token.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.positions.iter().map(|p| p.draw(rng)).collect()
    }

    /// Sample `n` tokens.
    pub fn sample_many<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<String> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}
