//! Entropy math: Shannon entropy of observed counts and the closed form for
//! the biased-subset token model.
//!
//! Every quantity here is in bits. Totals across positions assume the
//! positions are independent, which over- or under-counts whenever they are
//! not; callers treat the result as a coarse estimate.

use crate::error::{HunterError, Result};

/// Shannon entropy in bits of a categorical distribution given as counts.
///
/// Zero counts are skipped so `log2(0)` is never evaluated. A zero `total`
/// yields `0.0`. A single nonzero count equal to `total` yields exactly `0.0`.
pub fn shannon_entropy<I>(counts: I, total: u64) -> f64
where
    I: IntoIterator<Item = u64>,
{
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    let mut h = 0.0;
    for c in counts {
        if c == 0 {
            continue;
        }
        let p = c as f64 / n;
        h -= p * p.log2();
    }
    // -(1.0 * log2(1.0)) is -0.0; report a clean zero.
    if h <= 0.0 { 0.0 } else { h }
}

/// Upper bound on entropy for `unique` equally likely symbols.
pub fn max_entropy(unique: usize) -> f64 {
    if unique == 0 {
        0.0
    } else {
        (unique as f64).log2()
    }
}

fn check_model_params(subset_k: usize, fav_weight: f64) -> Result<()> {
    if subset_k < 2 {
        return Err(HunterError::invalid(format!(
            "subset size k must be at least 2, got {subset_k}"
        )));
    }
    if !fav_weight.is_finite() || fav_weight <= 0.0 {
        return Err(HunterError::invalid(format!(
            "favored weight must be a positive finite number, got {fav_weight}"
        )));
    }
    Ok(())
}

/// Entropy of one position under the biased-subset model.
///
/// One of the `subset_k` symbols carries weight `fav_weight`, the remaining
/// `k - 1` carry weight 1.
pub fn subtle_per_position_entropy(subset_k: usize, fav_weight: f64) -> Result<f64> {
    check_model_params(subset_k, fav_weight)?;
    let others = (subset_k - 1) as f64;
    let norm = fav_weight + others;
    let p_fav = fav_weight / norm;
    let p_other = 1.0 / norm;
    let h = -(p_fav * p_fav.log2() + others * p_other * p_other.log2());
    Ok(h.max(0.0))
}

/// Per-position and total entropy of a `length`-symbol token under the
/// biased-subset model. The total is the per-position value times `length`.
pub fn subtle_predict_bits(subset_k: usize, fav_weight: f64, length: usize) -> Result<(f64, f64)> {
    let per_position = subtle_per_position_entropy(subset_k, fav_weight)?;
    Ok((per_position, per_position * length as f64))
}

/// Expected number of coincidental collisions between `sample_size` real
/// tokens and `guesses` candidates drawn from a space of `2^total_bits`.
///
/// No birthday correction is applied, so this overcounts slightly once
/// `guesses * sample_size` approaches the space size.
pub fn expected_matches(total_bits: f64, sample_size: u64, guesses: u64) -> f64 {
    (guesses as f64) * (sample_size as f64) * (-total_bits).exp2()
}
