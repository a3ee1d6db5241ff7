use super::aligner::Aligner;
use super::alignment::Alignment;
use super::config::EngineConfig;
use super::data::SequenceData;
use super::error::AlignError;
use super::progress::{Progress, ProgressReporter};
use crate::core::gaps::GapFunction;
use crate::core::scoring::{ScoringScheme, SubstitutionMatrix};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Two named sequences to align against each other.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencePair {
    pub name1: String,
    pub seq1: String,
    pub name2: String,
    pub seq2: String,
}

impl SequencePair {
    pub fn new(
        name1: impl Into<String>,
        seq1: impl Into<String>,
        name2: impl Into<String>,
        seq2: impl Into<String>,
    ) -> Self {
        Self {
            name1: name1.into(),
            seq1: seq1.into(),
            name2: name2.into(),
            seq2: seq2.into(),
        }
    }
}

type PairResult = Result<Vec<Alignment>, AlignError>;

/// Aligns every pair with its own engine and returns the ranked matches per
/// pair, in input order.
///
/// Pairs share no state, so with the `parallel` feature they are processed on
/// the rayon pool. The first failing pair aborts the batch with its error.
#[instrument(skip_all, name = "batch_alignment_task")]
pub fn run(
    pairs: &[SequencePair],
    matrix: &SubstitutionMatrix,
    gaps: &GapFunction,
    config: &EngineConfig,
    num_matches: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<Vec<Alignment>>, AlignError> {
    info!(
        pairs = pairs.len(),
        num_matches,
        matrix = matrix.name(),
        "Starting batch alignment."
    );
    reporter.report(Progress::PhaseStart {
        name: "Batch Alignment",
    });

    if pairs.is_empty() {
        warn!("Batch contains no sequence pairs. Returning empty result.");
        reporter.report(Progress::PhaseFinish);
        return Ok(Vec::new());
    }

    reporter.report(Progress::TaskStart {
        total_steps: pairs.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = pairs.iter();

    #[cfg(feature = "parallel")]
    let iterator = pairs.par_iter();

    let results: Vec<PairResult> = iterator
        .map(|pair| {
            let result = align_pair(pair, matrix, gaps, config, num_matches);
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let alignments = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    info!(
        alignments = alignments.iter().map(Vec::len).sum::<usize>(),
        "Batch alignment finished."
    );
    reporter.report(Progress::PhaseFinish);
    Ok(alignments)
}

fn align_pair(
    pair: &SequencePair,
    matrix: &SubstitutionMatrix,
    gaps: &GapFunction,
    config: &EngineConfig,
    num_matches: usize,
) -> PairResult {
    let scoring = ScoringScheme::substitution(matrix.clone(), &pair.seq1, &pair.seq2)?;
    let data = SequenceData::new(&pair.name1, &pair.seq1, &pair.name2, &pair.seq2);
    let mut aligner = Aligner::new(data, scoring, gaps.clone(), *config)?;
    debug!(
        name1 = %pair.name1,
        name2 = %pair.name2,
        score = aligner.score(),
        "Pair aligned."
    );
    aligner.multi_matches(num_matches)
}
