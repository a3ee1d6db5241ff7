use super::msa::MultipleAlignment;
use crate::core::alphabet;
use serde::Deserialize;

/// Symbol classes used for counting: 20 residues, gap, and unknown.
const SYMBOL_CLASSES: usize = alphabet::PROFILE_WIDTH + 1;
const UNKNOWN_CLASS: usize = alphabet::PROFILE_WIDTH;

/// Sequence weighting scheme applied before residue frequencies are summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Every contributing sequence weighs the same.
    None,
    /// Position-based weights (Henikoff & Henikoff).
    #[default]
    Henikoff,
    /// Information-based weights derived from the window's symbol distribution.
    Psic,
}

/// Per-sequence weights for one alignment column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWeights {
    /// One weight per alignment row; rows that do not cover the column weigh 0.
    pub weights: Vec<f64>,
    /// Estimated number of independent sequences behind the column.
    pub effective_sequences: f64,
}

pub(crate) fn symbol_class(symbol: char) -> usize {
    if alphabet::is_gap(symbol) {
        alphabet::GAP_INDEX
    } else {
        alphabet::residue_index(symbol).unwrap_or(UNKNOWN_CLASS)
    }
}

/// Computes sequence weights for `column` of `msa`.
///
/// Contributing sequences are those whose non-gap span covers the column. The
/// weighting window is the intersection of their spans, truncated to
/// `column ± max_radius` when a radius is given.
pub fn column_weights(
    msa: &MultipleAlignment,
    column: usize,
    scheme: Weighting,
    max_radius: Option<usize>,
) -> ColumnWeights {
    let n = msa.num_sequences();
    let contributing: Vec<usize> = (0..n)
        .filter(|&s| {
            msa.span(s)
                .is_some_and(|(start, end)| start <= column && column <= end)
        })
        .collect();

    let mut weights = vec![0.0; n];
    if contributing.is_empty() {
        return ColumnWeights {
            weights,
            effective_sequences: 0.0,
        };
    }

    let (mut left, mut right) = window_bounds(msa, &contributing);
    if let Some(radius) = max_radius {
        left = left.max(column.saturating_sub(radius));
        right = right.min(column + radius);
    }
    let window_len = (right - left + 1) as f64;

    let effective_sequences = match scheme {
        Weighting::None => {
            for &s in &contributing {
                weights[s] = 1.0;
            }
            contributing.len() as f64
        }
        Weighting::Henikoff => {
            for k in left..=right {
                let counts = class_counts(msa, &contributing, k);
                let distinct = counts.iter().filter(|&&c| c > 0).count() as f64;
                for &s in &contributing {
                    let shared = counts[symbol_class(msa.symbol(s, k))] as f64;
                    weights[s] += 1.0 / (distinct * shared);
                }
            }
            for &s in &contributing {
                weights[s] /= window_len;
            }
            normalize(&mut weights);
            let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
            if sum_sq > 0.0 { 1.0 / sum_sq } else { 0.0 }
        }
        Weighting::Psic => {
            let total = contributing.len() as f64;
            let mut entropy_sum = 0.0;
            for k in left..=right {
                let counts = class_counts(msa, &contributing, k);
                entropy_sum -= counts
                    .iter()
                    .filter(|&&c| c > 0)
                    .map(|&c| {
                        let p = c as f64 / total;
                        p * p.ln()
                    })
                    .sum::<f64>();
                for &s in &contributing {
                    let p = counts[symbol_class(msa.symbol(s, k))] as f64 / total;
                    weights[s] -= p.ln();
                }
            }
            // Identical sequences carry no distinguishing information.
            if contributing.iter().all(|&s| weights[s] <= 0.0) {
                for &s in &contributing {
                    weights[s] = 1.0;
                }
            }
            (entropy_sum / window_len).exp()
        }
    };

    normalize(&mut weights);
    ColumnWeights {
        weights,
        effective_sequences,
    }
}

fn window_bounds(msa: &MultipleAlignment, contributing: &[usize]) -> (usize, usize) {
    contributing
        .iter()
        .filter_map(|&s| msa.span(s))
        .fold((0, usize::MAX), |(left, right), (start, end)| {
            (left.max(start), right.min(end))
        })
}

fn class_counts(msa: &MultipleAlignment, rows: &[usize], column: usize) -> [usize; SYMBOL_CLASSES] {
    let mut counts = [0usize; SYMBOL_CLASSES];
    for &s in rows {
        counts[symbol_class(msa.symbol(s, column))] += 1;
    }
    counts
}

fn normalize(weights: &mut [f64]) {
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        for w in weights.iter_mut() {
            *w /= total;
        }
    }
}
