//! Position-specific frequency profiles built from multiple alignments.
//!
//! A [`Profile`] has one column per non-gap position of the alignment's target
//! row. Each column holds 20 residue frequencies followed by the gap frequency,
//! and sums to 1. Sequences are weighted column by column with one of the
//! [`Weighting`] schemes before their symbols are counted, so that clusters of
//! near-identical templates do not dominate the profile.

pub mod msa;
pub mod weighting;

pub use msa::MultipleAlignment;
pub use weighting::{ColumnWeights, Weighting, column_weights};

use crate::core::alphabet::{self, ALPHABET_SIZE, GAP_INDEX, PROFILE_WIDTH};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProfileError {
    #[error("Alignment row {row} has length {found}, expected {expected}")]
    LengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Target row of the alignment contains no residues")]
    EmptyAlignment,
    #[error("Profile column {column} has no weighted observations")]
    ArithmeticDegeneracy { column: usize },
}

/// A frequency profile over the amino-acid alphabet plus gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    sequence: String,
    columns: Vec<[f64; PROFILE_WIDTH]>,
    effective_sequences: Vec<f64>,
}

impl Profile {
    /// Builds a profile from a multiple alignment.
    ///
    /// `max_radius` bounds the weighting window around each column; `None`
    /// uses the full intersection of contributing spans.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::ArithmeticDegeneracy`] when a column ends up with
    /// a zero total weight.
    pub fn from_alignment(
        msa: &MultipleAlignment,
        weighting: Weighting,
        max_radius: Option<usize>,
    ) -> Result<Self, ProfileError> {
        let mut columns = Vec::new();
        let mut effective_sequences = Vec::new();

        for column in 0..msa.width() {
            if alphabet::is_gap(msa.symbol(0, column)) {
                continue;
            }
            let cw = column_weights(msa, column, weighting, max_radius);

            let mut freqs = [0.0; PROFILE_WIDTH];
            for (row, &w) in cw.weights.iter().enumerate() {
                if w > 0.0 {
                    add_symbol(&mut freqs, msa.symbol(row, column), w);
                }
            }
            let profile_column = columns.len();
            normalize_column(&mut freqs)
                .ok_or(ProfileError::ArithmeticDegeneracy { column: profile_column })?;

            columns.push(freqs);
            effective_sequences.push(cw.effective_sequences);
        }

        debug!(
            "Built profile of {} columns from {} sequences ({:?} weighting).",
            columns.len(),
            msa.num_sequences(),
            weighting
        );

        Ok(Self {
            sequence: msa.target_sequence(),
            columns,
            effective_sequences,
        })
    }

    /// One-hot profile of a single sequence.
    ///
    /// Unknown residues spread their mass evenly over the 20 residue types.
    pub fn from_sequence(sequence: &str) -> Self {
        let columns = sequence
            .chars()
            .map(|c| {
                let mut freqs = [0.0; PROFILE_WIDTH];
                add_symbol(&mut freqs, c.to_ascii_uppercase(), 1.0);
                freqs
            })
            .collect::<Vec<_>>();
        let effective_sequences = vec![1.0; columns.len()];
        Self {
            sequence: sequence.to_ascii_uppercase(),
            columns,
            effective_sequences,
        }
    }

    /// The ungapped target sequence the profile was built for.
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, position: usize) -> &[f64; PROFILE_WIDTH] {
        &self.columns[position]
    }

    pub fn columns(&self) -> &[[f64; PROFILE_WIDTH]] {
        &self.columns
    }

    /// Frequency of residue type `residue` (alphabet index, or [`GAP_INDEX`]).
    pub fn frequency(&self, position: usize, residue: usize) -> f64 {
        self.columns[position][residue]
    }

    pub fn gap_frequency(&self, position: usize) -> f64 {
        self.columns[position][GAP_INDEX]
    }

    /// Effective number of independent sequences behind a column.
    pub fn effective_sequences(&self, position: usize) -> f64 {
        self.effective_sequences[position]
    }

    pub(crate) fn from_parts(
        sequence: String,
        columns: Vec<[f64; PROFILE_WIDTH]>,
        effective_sequences: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(columns.len(), effective_sequences.len());
        Self {
            sequence,
            columns,
            effective_sequences,
        }
    }
}

fn add_symbol(freqs: &mut [f64; PROFILE_WIDTH], symbol: char, weight: f64) {
    if alphabet::is_gap(symbol) {
        freqs[GAP_INDEX] += weight;
    } else if let Some(idx) = alphabet::residue_index(symbol) {
        freqs[idx] += weight;
    } else {
        let share = weight / ALPHABET_SIZE as f64;
        for f in freqs.iter_mut().take(ALPHABET_SIZE) {
            *f += share;
        }
    }
}

fn normalize_column(freqs: &mut [f64; PROFILE_WIDTH]) -> Option<()> {
    let total: f64 = freqs.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    for f in freqs.iter_mut() {
        *f /= total;
    }
    Some(())
}
