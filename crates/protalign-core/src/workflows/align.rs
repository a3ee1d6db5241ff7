use crate::core::gaps::{GapFunction, VariableGapPenalty};
use crate::core::profile::{MultipleAlignment, Profile};
use crate::core::scoring::ScoringScheme;
use crate::engine::aligner::Aligner;
use crate::engine::alignment::Alignment;
use crate::engine::config::{AlignmentConfig, GapModel, GapSection, ProfileScore};
use crate::engine::data::{AlignmentData, ProfileData, SequenceData};
use crate::engine::error::AlignError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct NamedSequence {
    pub name: String,
    pub sequence: String,
}

impl NamedSequence {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }
}

/// A multiple alignment whose first row is the sequence being profiled.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedAlignment {
    pub name: String,
    pub msa: MultipleAlignment,
}

impl NamedAlignment {
    pub fn new(name: impl Into<String>, msa: MultipleAlignment) -> Self {
        Self {
            name: name.into(),
            msa,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileAlignmentResult {
    /// Ranked alignments, best first.
    pub alignments: Vec<Alignment>,
    /// Merged profile over the columns of the best alignment.
    pub consensus: Option<Profile>,
}

/// Builds the gap strategy described by the `[gaps]` section.
///
/// The variable model reads its template structure from disk.
pub fn build_gap_function(section: &GapSection) -> Result<GapFunction, AlignError> {
    match section.model {
        GapModel::Affine => {
            let (open, extension) = section.affine_penalties();
            Ok(GapFunction::affine(open, extension))
        }
        GapModel::Variable => {
            let template = section.template()?;
            let vgp = VariableGapPenalty::from_path(template, section.chain, section.vgp_params())?;
            Ok(GapFunction::from(vgp))
        }
    }
}

/// Aligns two plain sequences and returns up to `num_matches` ranked alignments.
#[instrument(skip_all, name = "sequence_alignment_workflow")]
pub fn align_sequences(
    query: &NamedSequence,
    template: &NamedSequence,
    config: &AlignmentConfig,
    num_matches: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<Alignment>, AlignError> {
    require_matches(num_matches)?;

    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    info!(
        query = %query.name,
        template = %template.name,
        "Starting sequence alignment workflow."
    );
    let matrix = config.scoring.substitution_matrix()?;
    let scoring = ScoringScheme::substitution(matrix, &query.sequence, &template.sequence)?;
    let gaps = build_gap_function(&config.gaps)?;
    let data = SequenceData::new(
        &query.name,
        &query.sequence,
        &template.name,
        &template.sequence,
    );
    reporter.report(Progress::PhaseFinish);

    let mut aligner = compute(data, scoring, gaps, config, reporter)?;
    extract_ranked(&mut aligner, num_matches, reporter, |_, _| {})
}

/// Builds a profile from each multiple alignment and aligns the two profiles.
#[instrument(skip_all, name = "profile_alignment_workflow")]
pub fn align_profiles(
    query: &NamedAlignment,
    template: &NamedAlignment,
    config: &AlignmentConfig,
    num_matches: usize,
    reporter: &ProgressReporter,
) -> Result<ProfileAlignmentResult, AlignError> {
    require_matches(num_matches)?;

    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    info!(
        query = %query.name,
        template = %template.name,
        query_sequences = query.msa.num_sequences(),
        template_sequences = template.msa.num_sequences(),
        "Starting profile alignment workflow."
    );
    let profile1 = build_profile(&query.msa, config)?;
    let profile2 = build_profile(&template.msa, config)?;
    let scoring = match config.profile.score {
        ProfileScore::DotProduct => {
            ScoringScheme::profile_dot_product(profile1.clone(), profile2.clone())
        }
        ProfileScore::Correlation => ScoringScheme::profile_correlation(&profile1, &profile2)?,
    };
    let gaps = build_gap_function(&config.gaps)?;
    let data = ProfileData::new(&query.name, profile1, &template.name, profile2);
    reporter.report(Progress::PhaseFinish);

    let mut aligner = compute(data, scoring, gaps, config, reporter)?;
    collect_with_consensus(&mut aligner, num_matches, reporter)
}

/// Aligns the profile of a multiple alignment against a plain template sequence.
#[instrument(skip_all, name = "profile_sequence_alignment_workflow")]
pub fn align_profile_to_sequence(
    query: &NamedAlignment,
    template: &NamedSequence,
    config: &AlignmentConfig,
    num_matches: usize,
    reporter: &ProgressReporter,
) -> Result<ProfileAlignmentResult, AlignError> {
    require_matches(num_matches)?;

    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    info!(
        query = %query.name,
        template = %template.name,
        "Starting profile-to-sequence alignment workflow."
    );
    let profile1 = build_profile(&query.msa, config)?;
    let matrix = config.scoring.substitution_matrix()?;
    let scoring = ScoringScheme::profile_to_sequence(profile1.clone(), matrix, &template.sequence)?;
    let gaps = build_gap_function(&config.gaps)?;
    let data = ProfileData::new(
        &query.name,
        profile1,
        &template.name,
        Profile::from_sequence(&template.sequence),
    );
    reporter.report(Progress::PhaseFinish);

    let mut aligner = compute(data, scoring, gaps, config, reporter)?;
    collect_with_consensus(&mut aligner, num_matches, reporter)
}

fn require_matches(num_matches: usize) -> Result<(), AlignError> {
    if num_matches == 0 {
        return Err(AlignError::Precondition(
            "at least one alignment must be requested".to_string(),
        ));
    }
    Ok(())
}

fn build_profile(msa: &MultipleAlignment, config: &AlignmentConfig) -> Result<Profile, AlignError> {
    let profile = Profile::from_alignment(msa, config.profile.weighting, config.profile.max_radius)?;
    debug!(
        columns = profile.len(),
        weighting = ?config.profile.weighting,
        "Profile built."
    );
    Ok(profile)
}

fn compute<D: AlignmentData>(
    data: D,
    scoring: ScoringScheme,
    gaps: GapFunction,
    config: &AlignmentConfig,
    reporter: &ProgressReporter,
) -> Result<Aligner<D>, AlignError> {
    reporter.report(Progress::PhaseStart {
        name: "Matrix Computation",
    });
    let aligner = Aligner::new(data, scoring, gaps, config.engine)?;
    let (n, m) = aligner.dimensions();
    info!(n, m, score = aligner.score(), b0 = %aligner.b0(), "DP matrices ready.");
    reporter.report(Progress::PhaseFinish);
    Ok(aligner)
}

fn collect_with_consensus(
    aligner: &mut Aligner<ProfileData>,
    num_matches: usize,
    reporter: &ProgressReporter,
) -> Result<ProfileAlignmentResult, AlignError> {
    let mut consensus = None;
    let alignments = extract_ranked(aligner, num_matches, reporter, |rank, data| {
        if rank == 0 {
            consensus = data.consensus().cloned();
        }
    })?;
    Ok(ProfileAlignmentResult {
        alignments,
        consensus,
    })
}

/// Pulls ranked alignments one at a time so each can be reported and
/// inspected while the data object still holds it.
///
/// The best alignment comes from the optimal-suffix walk, which keeps the
/// leading overhang a full-chain walk stops short of; a full-chain walk from
/// the same start then suppresses it before the suboptimal ranks.
fn extract_ranked<D, F>(
    aligner: &mut Aligner<D>,
    num_matches: usize,
    reporter: &ProgressReporter,
    mut on_match: F,
) -> Result<Vec<Alignment>, AlignError>
where
    D: AlignmentData,
    F: FnMut(usize, &D),
{
    reporter.report(Progress::PhaseStart {
        name: "Extraction",
    });
    reporter.report(Progress::TaskStart {
        total_steps: num_matches as u64,
    });

    let mut alignments = Vec::with_capacity(num_matches);
    for rank in 0..num_matches {
        if !aligner.can_extract() {
            warn!(rank, "No further alignment can be extracted; stopping early.");
            break;
        }
        let alignment = if rank == 0 {
            aligner.extract_optimal_suffix()?;
            let best = aligner.alignment();
            on_match(rank, aligner.data());
            aligner.extract_full_chain()?;
            best
        } else {
            aligner.extract_full_chain()?;
            on_match(rank, aligner.data());
            aligner.alignment()
        };
        let Some(alignment) = alignment else {
            break;
        };
        reporter.report(Progress::MatchExtracted {
            rank,
            score: alignment.score,
        });
        reporter.report(Progress::TaskIncrement);
        alignments.push(alignment);
    }

    reporter.report(Progress::TaskFinish);
    info!(
        requested = num_matches,
        extracted = alignments.len(),
        best_score = alignments.first().map(|a| a.score),
        "Alignment extraction finished."
    );
    reporter.report(Progress::PhaseFinish);
    Ok(alignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::tests::atom_line;
    use crate::engine::config::{Algorithm, ConfigError};
    use crate::engine::progress::tests::recording;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn config_from(content: &str) -> (tempfile::TempDir, AlignmentConfig) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("align.toml");
        let mut file = File::create(&path).unwrap();
        write!(file, "{content}").unwrap();
        drop(file);
        let config = AlignmentConfig::load(&path).unwrap();
        (dir, config)
    }

    fn write_template(dir: &std::path::Path, residues: isize) -> std::path::PathBuf {
        let path = dir.join("template.pdb");
        let mut file = File::create(&path).unwrap();
        let mut serial = 1;
        for k in 1..=residues {
            let x = 3.8 * k as f64;
            for (name, dx) in [("N", -0.5), ("CA", 0.0), ("C", 0.5)] {
                writeln!(file, "{}", atom_line(serial, name, "ALA", 'A', k, [x + dx, 0.0, 0.0]))
                    .unwrap();
                serial += 1;
            }
        }
        writeln!(file, "END").unwrap();
        path
    }

    #[test]
    fn align_sequences_with_default_configuration() {
        let alignments = align_sequences(
            &NamedSequence::new("query", "MKTAYIAKQR"),
            &NamedSequence::new("template", "MKTAYIAKQR"),
            &AlignmentConfig::default(),
            1,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(alignments.len(), 1);
        assert_eq!(alignments[0].aligned1, "MKTAYIAKQR");
        assert_eq!(alignments[0].name2, "template");
        assert_eq!(alignments[0].identity(), 1.0);
    }

    #[test]
    fn align_sequences_follows_loaded_configuration() {
        let (_dir, config) = config_from(
            r#"
            [engine]
            algorithm = "no-terminal-gaps"

            [scoring]
            matrix = "identity"

            [gaps]
            open = 10.0
            "#,
        );
        assert_eq!(config.engine.algorithm, Algorithm::NoTerminalGaps);

        let alignments = align_sequences(
            &NamedSequence::new("q", "CDEFAAA"),
            &NamedSequence::new("t", "CDEF"),
            &config,
            1,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(alignments[0].score, 4.0);
        assert_eq!(alignments[0].aligned2, "CDEF---");
    }

    #[test]
    fn best_alignment_keeps_leading_overhang_without_terminal_gaps() {
        let (_dir, config) = config_from(
            r#"
            [engine]
            algorithm = "no-terminal-gaps"

            [scoring]
            matrix = "identity"

            [gaps]
            open = 10.0
            "#,
        );

        let alignments = align_sequences(
            &NamedSequence::new("q", "AAACDEF"),
            &NamedSequence::new("t", "CDEF"),
            &config,
            2,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(alignments[0].score, 4.0);
        assert_eq!(alignments[0].aligned1, "AAACDEF");
        assert_eq!(alignments[0].aligned2, "---CDEF");
        assert_eq!(alignments.len(), 2);
        assert_ne!(alignments[1], alignments[0]);
    }

    #[test]
    fn align_sequences_reports_phases_and_matches() {
        let (events, reporter) = recording();
        let alignments = align_sequences(
            &NamedSequence::new("q", "WW"),
            &NamedSequence::new("t", "W"),
            &AlignmentConfig::default(),
            2,
            &reporter,
        )
        .unwrap();
        assert_eq!(alignments.len(), 2);

        let events = events.lock().unwrap();
        let extracted: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                Progress::MatchExtracted { rank, .. } => Some(*rank),
                _ => None,
            })
            .collect();
        assert_eq!(extracted, vec![0, 1]);
        let phases = events
            .iter()
            .filter(|e| matches!(e, Progress::PhaseStart { .. }))
            .count();
        assert_eq!(phases, 3);
    }

    #[test]
    fn zero_requested_matches_is_rejected() {
        let result = align_sequences(
            &NamedSequence::new("q", "A"),
            &NamedSequence::new("t", "A"),
            &AlignmentConfig::default(),
            0,
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(AlignError::Precondition(_))));
    }

    #[test]
    fn variable_gap_model_reads_template_structure() {
        let dir = tempdir().unwrap();
        let template = write_template(dir.path(), 4);
        let (_config_dir, config) = config_from(&format!(
            r#"
            [gaps]
            model = "variable"
            template = "{}"
            chain = "A"
            "#,
            template.display()
        ));

        let gaps = build_gap_function(&config.gaps).unwrap();
        assert!(matches!(&gaps, GapFunction::Variable(vgp) if vgp.len() == 4));

        let alignments = align_sequences(
            &NamedSequence::new("q", "AAAAA"),
            &NamedSequence::new("t", "AAAA"),
            &config,
            1,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(alignments.len(), 1);
    }

    #[test]
    fn variable_gap_model_rejects_template_of_wrong_length() {
        let dir = tempdir().unwrap();
        let template = write_template(dir.path(), 3);
        let mut config = AlignmentConfig::default();
        config.gaps.model = GapModel::Variable;
        config.gaps.template = Some(template);

        let result = align_sequences(
            &NamedSequence::new("q", "AAAAA"),
            &NamedSequence::new("t", "AAAA"),
            &config,
            1,
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(AlignError::Gap { .. })));
    }

    #[test]
    fn variable_gap_model_without_template_is_a_config_error() {
        let mut section = GapSection::default();
        section.model = GapModel::Variable;
        assert!(matches!(
            build_gap_function(&section),
            Err(AlignError::Config {
                source: ConfigError::MissingParameter(_)
            })
        ));
    }

    #[test]
    fn align_profiles_returns_consensus_of_best_match() {
        let query = NamedAlignment::new(
            "query",
            MultipleAlignment::new("ACDEFG", &["ACDEFG", "ACEEFG"]).unwrap(),
        );
        let template = NamedAlignment::new(
            "template",
            MultipleAlignment::new("ACD-FG", &["ACDWFG"]).unwrap(),
        );
        let mut config = AlignmentConfig::default();
        config.gaps.open = Some(0.5);
        config.gaps.extension = Some(0.5);

        let result =
            align_profiles(&query, &template, &config, 1, &ProgressReporter::new()).unwrap();

        assert_eq!(result.alignments.len(), 1);
        let best = &result.alignments[0];
        let consensus = result.consensus.unwrap();
        assert_eq!(consensus.len(), best.len());
        assert!(best.score > 0.0);
    }

    #[test]
    fn align_profile_to_sequence_scores_against_matrix() {
        let query = NamedAlignment::new(
            "query",
            MultipleAlignment::new("MKTAY", &["MKSAY"]).unwrap(),
        );
        let template = NamedSequence::new("template", "MKTAY");
        let result = align_profile_to_sequence(
            &query,
            &template,
            &AlignmentConfig::default(),
            1,
            &ProgressReporter::new(),
        )
        .unwrap();

        let best = &result.alignments[0];
        assert_eq!(best.aligned1, "MKTAY");
        assert_eq!(best.aligned2, "MKTAY");
        assert_eq!(result.consensus.unwrap().len(), 5);
    }
}
