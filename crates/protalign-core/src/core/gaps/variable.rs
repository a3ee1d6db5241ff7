use crate::core::io::pdb::{PdbError, PdbFile};
use crate::core::io::traits::StructureFile;
use crate::core::models::chain::Chain;
use crate::core::models::residue::SecondaryStructure;
use crate::core::utils::geometry;
use nalgebra::Point3;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use super::GapError;

/// Backbone atoms every residue must carry for the structural terms.
pub const REQUIRED_BACKBONE_ATOMS: [&str; 3] = ["N", "CA", "C"];

const BURIAL_CUTOFF: f64 = 10.0;
const BURIAL_SATURATION: f64 = 24.0;
const CONTACT_CUTOFF: f64 = 8.0;
const CONTACT_MIN_SEPARATION: usize = 4;
const CONTACT_SATURATION: f64 = 8.0;
const TERMINAL_CURVATURE: f64 = 0.5;
const LINEAR_DECAY_STEPS: f64 = 10.0;

#[derive(Debug, Error)]
pub enum StructureDataError {
    #[error("Failed to read structure file: {0}")]
    File(#[from] PdbError),
    #[error("Residue {residue} is missing backbone atom '{atom}'")]
    MissingAtom { residue: isize, atom: &'static str },
    #[error("Chain '{0}' not found in structure")]
    ChainNotFound(char),
    #[error("Structure contains no residues")]
    EmptyStructure,
}

/// How the extension penalty changes along a gap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum ExtensionDecay {
    #[default]
    Constant,
    /// Falls linearly to zero over ten extensions.
    Linear,
    /// Halves roughly every 1.4 extensions (`e·exp(-k/2)`).
    Exponential,
}

impl TryFrom<u8> for ExtensionDecay {
    type Error = GapError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(Self::Constant),
            1 => Ok(Self::Linear),
            2 => Ok(Self::Exponential),
            other => Err(GapError::InvalidDecay(other)),
        }
    }
}

impl ExtensionDecay {
    /// Penalty of the `k`-th extension (0-based) given the base penalty.
    pub fn apply(self, base: f64, k: usize) -> f64 {
        let k = k as f64;
        match self {
            Self::Constant => base,
            Self::Linear => base * ((LINEAR_DECAY_STEPS - k) / LINEAR_DECAY_STEPS).max(0.0),
            Self::Exponential => base * (-k / 2.0).exp(),
        }
    }
}

/// Weights of the five structural terms of the open penalty.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct VgpWeights {
    pub helix: f64,
    pub strand: f64,
    pub burial: f64,
    pub curvature: f64,
    pub proximity: f64,
}

impl Default for VgpWeights {
    fn default() -> Self {
        Self {
            helix: 1.0,
            strand: 1.0,
            burial: 1.0,
            curvature: 1.0,
            proximity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct VgpParams {
    pub base_open: f64,
    pub base_extension: f64,
    pub decay: ExtensionDecay,
    pub weights: VgpWeights,
}

impl Default for VgpParams {
    fn default() -> Self {
        Self {
            base_open: 14.0,
            base_extension: 1.0,
            decay: ExtensionDecay::Constant,
            weights: VgpWeights::default(),
        }
    }
}

/// Per-residue structural terms of a template chain, each in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GapProfile {
    pub helix: Vec<f64>,
    pub strand: Vec<f64>,
    pub burial: Vec<f64>,
    pub curvature: Vec<f64>,
    pub proximity: Vec<f64>,
}

impl GapProfile {
    /// Derives the structural terms from a chain's backbone.
    ///
    /// # Errors
    ///
    /// Returns [`StructureDataError::EmptyStructure`] for a chain without
    /// residues and [`StructureDataError::MissingAtom`] for the first residue
    /// lacking one of [`REQUIRED_BACKBONE_ATOMS`].
    pub fn from_chain(chain: &Chain) -> Result<Self, StructureDataError> {
        let residues = chain.residues();
        if residues.is_empty() {
            return Err(StructureDataError::EmptyStructure);
        }

        let mut ca: Vec<Point3<f64>> = Vec::with_capacity(residues.len());
        for residue in residues {
            for atom in REQUIRED_BACKBONE_ATOMS {
                if residue.atom(atom).is_none() {
                    return Err(StructureDataError::MissingAtom {
                        residue: residue.number,
                        atom,
                    });
                }
            }
            if let Some(atom) = residue.atom("CA") {
                ca.push(atom.position);
            }
        }

        let n = residues.len();
        let continues = |p: usize, state: SecondaryStructure| -> f64 {
            let both = p + 1 < n
                && residues[p].secondary == state
                && residues[p + 1].secondary == state;
            if both { 1.0 } else { 0.0 }
        };

        let helix = (0..n).map(|p| continues(p, SecondaryStructure::Helix)).collect();
        let strand = (0..n).map(|p| continues(p, SecondaryStructure::Strand)).collect();

        let burial = (0..n)
            .map(|p| {
                let count = geometry::count_within(&ca[p], &ca, BURIAL_CUTOFF, |q| q == p);
                (count as f64 / BURIAL_SATURATION).min(1.0)
            })
            .collect();

        let curvature = (0..n)
            .map(|p| {
                if p == 0 || p + 1 == n {
                    return TERMINAL_CURVATURE;
                }
                geometry::straightness(&ca[p - 1], &ca[p], &ca[p + 1]).unwrap_or(TERMINAL_CURVATURE)
            })
            .collect();

        let proximity = (0..n)
            .map(|p| {
                let count = geometry::count_within(&ca[p], &ca, CONTACT_CUTOFF, |q| {
                    q.abs_diff(p) < CONTACT_MIN_SEPARATION
                });
                (count as f64 / CONTACT_SATURATION).min(1.0)
            })
            .collect();

        Ok(Self {
            helix,
            strand,
            burial,
            curvature,
            proximity,
        })
    }

    pub fn len(&self) -> usize {
        self.helix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helix.is_empty()
    }

    fn weighted_sum(&self, p: usize, w: &VgpWeights) -> f64 {
        w.helix * self.helix[p]
            + w.strand * self.strand[p]
            + w.burial * self.burial[p]
            + w.curvature * self.curvature[p]
            + w.proximity * self.proximity[p]
    }
}

/// Structure-derived gap penalty.
///
/// Open penalties are precomputed per template position; extension penalties
/// depend only on the decay schedule and the run length.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableGapPenalty {
    params: VgpParams,
    profile: GapProfile,
    open: Vec<f64>,
}

impl VariableGapPenalty {
    pub fn from_profile(profile: GapProfile, params: VgpParams) -> Self {
        let open = (0..profile.len())
            .map(|p| params.base_open + profile.weighted_sum(p, &params.weights))
            .collect();
        Self {
            params,
            profile,
            open,
        }
    }

    pub fn from_chain(chain: &Chain, params: VgpParams) -> Result<Self, StructureDataError> {
        let profile = GapProfile::from_chain(chain)?;
        debug!(
            "Derived gap profile for chain '{}' ({} residues).",
            chain.id,
            profile.len()
        );
        Ok(Self::from_profile(profile, params))
    }

    /// Reads a PDB file and derives the penalty from one of its chains.
    ///
    /// `chain` selects the chain by identifier; `None` takes the first chain.
    pub fn from_path(
        path: &Path,
        chain: Option<char>,
        params: VgpParams,
    ) -> Result<Self, StructureDataError> {
        info!("Loading gap-penalty template from {}", path.display());
        let structure = PdbFile::read_from_path(path)?;
        let selected = structure.select_chain(chain).ok_or(match chain {
            Some(id) => StructureDataError::ChainNotFound(id),
            None => StructureDataError::EmptyStructure,
        })?;
        Self::from_chain(selected, params)
    }

    pub fn params(&self) -> &VgpParams {
        &self.params
    }

    pub fn profile(&self) -> &GapProfile {
        &self.profile
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn open_penalty(&self, position: usize) -> f64 {
        self.open[position]
    }

    /// Penalty for extending a run that already spans `run` positions.
    pub fn extension_penalty(&self, _position: usize, run: usize) -> f64 {
        self.params
            .decay
            .apply(self.params.base_extension, run.saturating_sub(1))
    }
}
