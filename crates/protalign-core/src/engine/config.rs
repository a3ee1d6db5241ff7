use crate::core::gaps::{ExtensionDecay, VgpParams, VgpWeights};
use crate::core::profile::Weighting;
use crate::core::scoring::{ScoringError, SubstitutionMatrix};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_PENALTY_MUL: f64 = 0.98;
pub const DEFAULT_PENALTY_ADD: f64 = 0.0;
pub const DEFAULT_AFFINE_OPEN: f64 = 10.0;
pub const DEFAULT_AFFINE_EXTENSION: f64 = 1.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Boundary rules of the DP recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Leading and trailing gaps are free; the alignment may end anywhere on
    /// the last row or column.
    #[default]
    FreeShift,
    /// Global alignment ending at `(n, m)` with terminal gaps waived.
    NoTerminalGaps,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multiplier applied to a cell's magnitude when a found path is suppressed.
    pub penalty_mul: f64,
    /// Constant subtracted from a cell when a found path is suppressed.
    pub penalty_add: f64,
    pub algorithm: Algorithm,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            penalty_mul: DEFAULT_PENALTY_MUL,
            penalty_add: DEFAULT_PENALTY_ADD,
            algorithm: Algorithm::FreeShift,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.penalty_mul.is_finite() || self.penalty_mul < 0.0 || self.penalty_mul > 1.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "penalty_mul",
                reason: format!("{} is outside [0, 1]", self.penalty_mul),
            });
        }
        if !self.penalty_add.is_finite() || self.penalty_add < 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "penalty_add",
                reason: format!("{} is negative or not finite", self.penalty_add),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct EngineConfigBuilder {
    penalty_mul: Option<f64>,
    penalty_add: Option<f64>,
    algorithm: Option<Algorithm>,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn penalty_mul(mut self, mul: f64) -> Self {
        self.penalty_mul = Some(mul);
        self
    }
    pub fn penalty_add(mut self, add: f64) -> Self {
        self.penalty_add = Some(add);
        self
    }
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let config = EngineConfig {
            penalty_mul: self.penalty_mul.unwrap_or(DEFAULT_PENALTY_MUL),
            penalty_add: self.penalty_add.unwrap_or(DEFAULT_PENALTY_ADD),
            algorithm: self.algorithm.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    /// Built-in matrix name; ignored when `matrix_path` is set.
    pub matrix: String,
    pub matrix_path: Option<PathBuf>,
    /// Scores of the `identity` matrix.
    pub match_score: f64,
    pub mismatch_score: f64,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            matrix: "blosum62".to_string(),
            matrix_path: None,
            match_score: 1.0,
            mismatch_score: -1.0,
        }
    }
}

impl ScoringSection {
    pub fn substitution_matrix(&self) -> Result<SubstitutionMatrix, ScoringError> {
        if let Some(path) = &self.matrix_path {
            return SubstitutionMatrix::load(path);
        }
        if self.matrix.eq_ignore_ascii_case("identity") {
            return Ok(SubstitutionMatrix::identity(
                self.match_score,
                self.mismatch_score,
            ));
        }
        SubstitutionMatrix::from_name(&self.matrix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapModel {
    #[default]
    Affine,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GapSection {
    pub model: GapModel,
    pub open: Option<f64>,
    pub extension: Option<f64>,
    pub decay: ExtensionDecay,
    pub weights: VgpWeights,
    /// Template structure backing the variable gap penalty.
    pub template: Option<PathBuf>,
    pub chain: Option<char>,
}

impl GapSection {
    /// Affine `(open, extension)` penalties, with defaults for unset values.
    pub fn affine_penalties(&self) -> (f64, f64) {
        (
            self.open.unwrap_or(DEFAULT_AFFINE_OPEN),
            self.extension.unwrap_or(DEFAULT_AFFINE_EXTENSION),
        )
    }

    pub fn vgp_params(&self) -> VgpParams {
        let defaults = VgpParams::default();
        VgpParams {
            base_open: self.open.unwrap_or(defaults.base_open),
            base_extension: self.extension.unwrap_or(defaults.base_extension),
            decay: self.decay,
            weights: self.weights,
        }
    }

    pub fn template(&self) -> Result<&Path, ConfigError> {
        self.template
            .as_deref()
            .ok_or(ConfigError::MissingParameter("gaps.template"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (parameter, value) in [("gaps.open", self.open), ("gaps.extension", self.extension)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ConfigError::InvalidValue {
                        parameter,
                        reason: format!("penalties are non-negative magnitudes, got {v}"),
                    });
                }
            }
        }
        if self.model == GapModel::Variable {
            self.template()?;
        }
        Ok(())
    }
}

/// Column score used when two profiles are aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileScore {
    #[default]
    DotProduct,
    Correlation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ProfileSection {
    pub weighting: Weighting,
    pub max_radius: Option<usize>,
    pub score: ProfileScore,
}

/// Complete alignment settings as read from a TOML file.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    pub engine: EngineConfig,
    pub scoring: ScoringSection,
    pub gaps: GapSection,
    pub profile: ProfileSection,
}

impl AlignmentConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.gaps.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("align.toml");
        let mut file = File::create(&path).unwrap();
        write!(file, "{content}").unwrap();
        (dir, path)
    }

    #[test]
    fn engine_config_defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.penalty_mul, 0.98);
        assert_eq!(config.penalty_add, 0.0);
        assert_eq!(config.algorithm, Algorithm::FreeShift);
    }

    #[test]
    fn builder_succeeds_with_partial_parameters() {
        let config = EngineConfigBuilder::new()
            .algorithm(Algorithm::NoTerminalGaps)
            .penalty_add(0.5)
            .build()
            .unwrap();
        assert_eq!(config.algorithm, Algorithm::NoTerminalGaps);
        assert_eq!(config.penalty_add, 0.5);
        assert_eq!(config.penalty_mul, DEFAULT_PENALTY_MUL);
    }

    #[test]
    fn builder_rejects_out_of_range_multiplier() {
        let result = EngineConfigBuilder::new().penalty_mul(1.5).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                parameter: "penalty_mul",
                ..
            })
        ));
    }

    #[test]
    fn load_succeeds_with_full_document() {
        let (_dir, path) = write_config(
            r#"
            [engine]
            algorithm = "no-terminal-gaps"
            penalty_mul = 0.9
            penalty_add = 1.0

            [scoring]
            matrix = "identity"
            match_score = 2.0
            mismatch_score = -3.0

            [gaps]
            model = "variable"
            template = "template.pdb"
            chain = "B"
            open = 12.0
            decay = 2

            [gaps.weights]
            helix = 0.5

            [profile]
            weighting = "psic"
            max_radius = 15
            score = "correlation"
            "#,
        );
        let config = AlignmentConfig::load(&path).unwrap();

        assert_eq!(config.engine.algorithm, Algorithm::NoTerminalGaps);
        assert_eq!(config.engine.penalty_mul, 0.9);
        let matrix = config.scoring.substitution_matrix().unwrap();
        assert_eq!(matrix.score('A', 'A'), Some(2.0));
        assert_eq!(matrix.score('A', 'C'), Some(-3.0));

        assert_eq!(config.gaps.model, GapModel::Variable);
        assert_eq!(config.gaps.chain, Some('B'));
        let params = config.gaps.vgp_params();
        assert_eq!(params.base_open, 12.0);
        assert_eq!(params.base_extension, 1.0);
        assert_eq!(params.decay, ExtensionDecay::Exponential);
        assert_eq!(params.weights.helix, 0.5);
        assert_eq!(params.weights.strand, 1.0);

        assert_eq!(config.profile.weighting, Weighting::Psic);
        assert_eq!(config.profile.max_radius, Some(15));
        assert_eq!(config.profile.score, ProfileScore::Correlation);
    }

    #[test]
    fn load_applies_defaults_for_empty_document() {
        let (_dir, path) = write_config("");
        let config = AlignmentConfig::load(&path).unwrap();
        assert_eq!(config, AlignmentConfig::default());
        assert_eq!(config.gaps.affine_penalties(), (10.0, 1.0));
        assert_eq!(config.scoring.substitution_matrix().unwrap().name(), "BLOSUM62");
        assert_eq!(config.profile.weighting, Weighting::Henikoff);
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = AlignmentConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn load_fails_for_malformed_toml() {
        let (_dir, path) = write_config("[engine\npenalty_mul = 0.9");
        assert!(matches!(
            AlignmentConfig::load(&path),
            Err(ConfigError::Toml { .. })
        ));
    }

    #[test]
    fn load_fails_for_unknown_decay_selector() {
        let (_dir, path) = write_config("[gaps]\ndecay = 7\n");
        assert!(matches!(
            AlignmentConfig::load(&path),
            Err(ConfigError::Toml { .. })
        ));
    }

    #[test]
    fn variable_gap_model_requires_template() {
        let (_dir, path) = write_config("[gaps]\nmodel = \"variable\"\n");
        assert!(matches!(
            AlignmentConfig::load(&path),
            Err(ConfigError::MissingParameter("gaps.template"))
        ));
    }

    #[test]
    fn negative_gap_penalty_is_rejected() {
        let (_dir, path) = write_config("[gaps]\nopen = -2.0\n");
        assert!(matches!(
            AlignmentConfig::load(&path),
            Err(ConfigError::InvalidValue {
                parameter: "gaps.open",
                ..
            })
        ));
    }
}
