//! Match scores for pairs of positions.
//!
//! A [`ScoringScheme`] is built once for a concrete pair of sequences or
//! profiles and then answers `score(i, j)` for 1-based positions of the DP
//! recurrence. Every variant is a pure lookup over immutable state, so a scheme
//! can be cloned freely alongside the engine that owns it.

pub mod matrix;
pub mod profile;

pub use matrix::SubstitutionMatrix;

use crate::core::alphabet::{ALPHABET_SIZE, RESIDUES};
use crate::core::profile::Profile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Scoring table for sequence {which} covers {found} positions, expected {expected}")]
    DimensionMismatch {
        which: usize,
        expected: usize,
        found: usize,
    },
    #[error("Column {column} of profile {which} has zero variance")]
    ZeroVariance { which: usize, column: usize },
    #[error("Symbol '{0}' cannot be scored by the substitution matrix")]
    UnknownSymbol(char),
    #[error("Unknown substitution matrix '{0}'")]
    UnknownMatrix(String),
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Matrix parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Strategy producing the diagonal score of the DP recurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringScheme {
    /// Substitution-matrix lookup of two encoded sequences.
    Substitution {
        matrix: SubstitutionMatrix,
        seq1: Vec<usize>,
        seq2: Vec<usize>,
    },
    /// Dot product of two profiles' residue frequencies.
    ProfileDotProduct { profile1: Profile, profile2: Profile },
    /// Expected substitution score of profile 1 against the residues of sequence 2.
    ProfileToSequence {
        profile1: Profile,
        matrix: SubstitutionMatrix,
        seq2: Vec<usize>,
    },
    /// Pearson correlation of two profiles' residue frequencies.
    ProfileCorrelation {
        columns1: Vec<[f64; ALPHABET_SIZE]>,
        columns2: Vec<[f64; ALPHABET_SIZE]>,
    },
}

impl ScoringScheme {
    pub fn substitution(
        matrix: SubstitutionMatrix,
        seq1: &str,
        seq2: &str,
    ) -> Result<Self, ScoringError> {
        let seq1 = matrix.encode(seq1)?;
        let seq2 = matrix.encode(seq2)?;
        Ok(Self::Substitution { matrix, seq1, seq2 })
    }

    pub fn profile_dot_product(profile1: Profile, profile2: Profile) -> Self {
        Self::ProfileDotProduct { profile1, profile2 }
    }

    pub fn profile_to_sequence(
        profile1: Profile,
        matrix: SubstitutionMatrix,
        seq2: &str,
    ) -> Result<Self, ScoringError> {
        let seq2 = matrix.encode(seq2)?;
        Ok(Self::ProfileToSequence {
            profile1,
            matrix,
            seq2,
        })
    }

    /// # Errors
    ///
    /// Returns [`ScoringError::ZeroVariance`] for a column whose 20 residue
    /// frequencies are all equal, since its correlation is undefined.
    pub fn profile_correlation(profile1: &Profile, profile2: &Profile) -> Result<Self, ScoringError> {
        let standardize = |which: usize, p: &Profile| {
            p.columns()
                .iter()
                .enumerate()
                .map(|(column, c)| {
                    profile::centered_unit(c).ok_or(ScoringError::ZeroVariance { which, column })
                })
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(Self::ProfileCorrelation {
            columns1: standardize(1, profile1)?,
            columns2: standardize(2, profile2)?,
        })
    }

    /// Number of positions covered on each side.
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            Self::Substitution { seq1, seq2, .. } => (seq1.len(), seq2.len()),
            Self::ProfileDotProduct { profile1, profile2 } => (profile1.len(), profile2.len()),
            Self::ProfileToSequence { profile1, seq2, .. } => (profile1.len(), seq2.len()),
            Self::ProfileCorrelation { columns1, columns2 } => (columns1.len(), columns2.len()),
        }
    }

    /// Checks that the scheme covers sequences of length `n` and `m`.
    pub fn check_dimensions(&self, n: usize, m: usize) -> Result<(), ScoringError> {
        let (n_found, m_found) = self.dimensions();
        if n_found != n {
            return Err(ScoringError::DimensionMismatch {
                which: 1,
                expected: n,
                found: n_found,
            });
        }
        if m_found != m {
            return Err(ScoringError::DimensionMismatch {
                which: 2,
                expected: m,
                found: m_found,
            });
        }
        Ok(())
    }

    /// Score of aligning position `i` of sequence 1 with position `j` of
    /// sequence 2, both 1-based.
    ///
    /// # Panics
    ///
    /// Panics if either index is 0 or beyond the sequence length.
    pub fn score(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i >= 1 && j >= 1, "scoring positions are 1-based");
        let (a, b) = (i - 1, j - 1);
        match self {
            Self::Substitution { matrix, seq1, seq2 } => matrix.score_indices(seq1[a], seq2[b]),
            Self::ProfileDotProduct { profile1, profile2 } => {
                profile::dot_product(profile1.column(a), profile2.column(b))
            }
            Self::ProfileToSequence {
                profile1,
                matrix,
                seq2,
            } => profile1
                .column(a)
                .iter()
                .take(ALPHABET_SIZE)
                .enumerate()
                .filter(|&(_, &f)| f > 0.0)
                .map(|(t, &f)| {
                    let row = matrix.index_of(RESIDUES[t]);
                    row.map_or(0.0, |r| f * matrix.score_indices(r, seq2[b]))
                })
                .sum(),
            Self::ProfileCorrelation { columns1, columns2 } => {
                profile::correlation(&columns1[a], &columns2[b])
            }
        }
    }
}
