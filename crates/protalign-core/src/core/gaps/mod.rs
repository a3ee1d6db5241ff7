//! Gap penalties for the DP recurrence.
//!
//! Penalties are positive magnitudes that the recurrence subtracts. Positions
//! are 0-based indices into sequence 2, the template whose structure backs the
//! [`VariableGapPenalty`]. Gap functions carry no mutable state: the engine
//! passes the current run length to [`GapFunction::extension_penalty`], so a
//! decaying schedule needs no counter of its own.

pub mod variable;

pub use variable::{
    ExtensionDecay, GapProfile, StructureDataError, VariableGapPenalty, VgpParams, VgpWeights,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GapError {
    #[error("Structure data error: {0}")]
    StructureData(#[from] StructureDataError),
    #[error("Invalid extension decay selector {0} (expected 0, 1 or 2)")]
    InvalidDecay(u8),
    #[error("Gap table covers {found} template positions, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GapFunction {
    /// Constant open and extension penalties.
    Affine { open: f64, extension: f64 },
    /// Structure-derived penalties indexed by template position.
    Variable(VariableGapPenalty),
}

impl GapFunction {
    pub fn affine(open: f64, extension: f64) -> Self {
        Self::Affine { open, extension }
    }

    /// Penalty for opening a gap at `position`.
    pub fn open_penalty(&self, position: usize) -> f64 {
        match self {
            Self::Affine { open, .. } => *open,
            Self::Variable(vgp) => vgp.open_penalty(position),
        }
    }

    /// Penalty for extending a gap run that already spans `run` positions.
    pub fn extension_penalty(&self, position: usize, run: usize) -> f64 {
        match self {
            Self::Affine { extension, .. } => *extension,
            Self::Variable(vgp) => vgp.extension_penalty(position, run),
        }
    }

    /// Checks that a position-dependent table covers a template of length `m`.
    pub fn check_length(&self, m: usize) -> Result<(), GapError> {
        match self {
            Self::Affine { .. } => Ok(()),
            Self::Variable(vgp) if vgp.len() == m => Ok(()),
            Self::Variable(vgp) => Err(GapError::LengthMismatch {
                expected: m,
                found: vgp.len(),
            }),
        }
    }
}

impl From<VariableGapPenalty> for GapFunction {
    fn from(vgp: VariableGapPenalty) -> Self {
        Self::Variable(vgp)
    }
}
