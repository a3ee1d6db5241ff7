use thiserror::Error;

use super::config::ConfigError;
use super::state::{Generation, MatrixState};
use crate::core::gaps::{GapError, StructureDataError};
use crate::core::profile::ProfileError;
use crate::core::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("No DP candidate reproduces the value chosen at cell ({i}, {j})")]
    InconsistentTraceback { i: usize, j: usize },

    #[error("Stale matrix generation: expected {expected}, found {found}")]
    StaleGeneration {
        expected: Generation,
        found: Generation,
    },

    #[error("Cannot run {operation} while matrices are {state}")]
    InvalidState {
        operation: &'static str,
        state: MatrixState,
    },

    #[error("Scoring error: {source}")]
    Scoring {
        #[from]
        source: ScoringError,
    },

    #[error("Gap penalty error: {source}")]
    Gap {
        #[from]
        source: GapError,
    },

    #[error("Profile error: {source}")]
    Profile {
        #[from]
        source: ProfileError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}

impl From<StructureDataError> for AlignError {
    fn from(source: StructureDataError) -> Self {
        Self::Gap {
            source: GapError::StructureData(source),
        }
    }
}
