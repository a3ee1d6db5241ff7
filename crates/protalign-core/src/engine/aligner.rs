use super::alignment::Alignment;
use super::config::{Algorithm, EngineConfig};
use super::data::{AlignmentData, Side};
use super::error::AlignError;
use super::state::{Generation, Lifecycle, MatrixState};
use super::traceback::{Step, Traceback};
use crate::core::gaps::GapFunction;
use crate::core::scoring::ScoringScheme;
use nalgebra::DMatrix;
use tracing::{debug, trace, warn};

/// Tolerance used when matching a cell value against its candidates.
pub const EPSILON: f64 = 1e-9;
/// Value of a reset score cell, far below any reachable score.
pub const INVALID_SCORE: f64 = -1e9;
/// Smallest amount a perturbation subtracts from a cell, so zero-valued cells
/// are lowered too.
pub const MIN_PERTURBATION: f64 = 1e-6;

#[inline]
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    OptimalSuffix,
    FullChain,
}

#[derive(Debug, Clone, PartialEq)]
struct SupportWeights {
    v1: Vec<u32>,
    v2: Vec<u32>,
}

/// Dynamic-programming pairwise aligner.
///
/// Owns the score matrix F, the traceback matrix B, the start-of-traceback cell
/// B0, and the strategies that fill them. Cloning performs a deep copy of all of
/// it, so a clone can be recomputed or perturbed without affecting the original.
#[derive(Debug, Clone, PartialEq)]
pub struct Aligner<D: AlignmentData> {
    data: D,
    scoring: ScoringScheme,
    gaps: GapFunction,
    config: EngineConfig,
    n: usize,
    m: usize,
    f: DMatrix<f64>,
    b: DMatrix<Traceback>,
    runs: DMatrix<usize>,
    /// Moves already taken out of each cell by a full-chain extraction, as
    /// [`Step::mask_bit`] flags.
    suppressed: DMatrix<u8>,
    b0: Traceback,
    weights: Option<SupportWeights>,
    res1: Vec<Option<usize>>,
    res2: Vec<Option<usize>>,
    match_score: Option<f64>,
    lifecycle: Lifecycle,
}

impl<D: AlignmentData> Aligner<D> {
    /// Allocates the matrices for the data's two sequences and computes them.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::Precondition`] for an empty sequence, and a
    /// scoring or gap error when a strategy does not cover the sequences.
    pub fn new(
        data: D,
        scoring: ScoringScheme,
        gaps: GapFunction,
        config: EngineConfig,
    ) -> Result<Self, AlignError> {
        config.validate()?;
        let n = data.sequence(Side::First).chars().count();
        let m = data.sequence(Side::Second).chars().count();
        if n == 0 || m == 0 {
            return Err(AlignError::Precondition(format!(
                "cannot align empty sequences (lengths {n} and {m})"
            )));
        }
        scoring.check_dimensions(n, m)?;
        gaps.check_length(m)?;

        debug!(n, m, algorithm = ?config.algorithm, "Allocating DP matrices.");
        let mut aligner = Self {
            data,
            scoring,
            gaps,
            config,
            n,
            m,
            f: DMatrix::from_element(n + 1, m + 1, INVALID_SCORE),
            b: DMatrix::from_element(n + 1, m + 1, Traceback::INVALID),
            runs: DMatrix::from_element(n + 1, m + 1, 0),
            suppressed: DMatrix::from_element(n + 1, m + 1, 0),
            b0: Traceback::INVALID,
            weights: None,
            res1: Vec::new(),
            res2: Vec::new(),
            match_score: None,
            lifecycle: Lifecycle::new(),
        };
        aligner.calculate_matrix(true)?;
        Ok(aligner)
    }

    /// Runs the recurrence over every interior cell and relocates B0.
    ///
    /// With `update == false` F is left as it is (it may hold perturbed
    /// values) and only B, the gap-run lengths and B0 are rebuilt from it;
    /// moves already taken by a full-chain extraction are skipped unless a
    /// cell has no other move left. A full recompute forgets those moves.
    pub fn calculate_matrix(&mut self, update: bool) -> Result<(), AlignError> {
        if update {
            self.suppressed.fill(0);
        } else {
            self.lifecycle.mark_recomputed()?;
        }

        self.initialize_boundary(update);
        for i in 1..=self.n {
            for j in 1..=self.m {
                self.fill_cell(i, j, update)?;
            }
        }
        self.b0 = self.locate_b0();

        if update {
            self.lifecycle.mark_computed();
        }
        debug!(
            update,
            b0 = %self.b0,
            score = self.score(),
            generation = %self.lifecycle.generation(),
            "DP matrices computed."
        );
        Ok(())
    }

    /// Recomputes with the diagonal score scaled by `min(v1[i-1], v2[j-1])`.
    ///
    /// The weights stay attached to the engine for later recomputes.
    pub fn calculate_weighted_matrix(&mut self, v1: &[u32], v2: &[u32]) -> Result<(), AlignError> {
        if v1.len() != self.n || v2.len() != self.m {
            return Err(AlignError::Precondition(format!(
                "support weights have lengths {} and {}, sequences have {} and {}",
                v1.len(),
                v2.len(),
                self.n,
                self.m
            )));
        }
        self.weights = Some(SupportWeights {
            v1: v1.to_vec(),
            v2: v2.to_vec(),
        });
        self.calculate_matrix(true)
    }

    /// Drops the support weights and recomputes unweighted.
    pub fn clear_weights(&mut self) -> Result<(), AlignError> {
        self.weights = None;
        self.calculate_matrix(true)
    }

    /// Resets F, B and the match vectors, then recomputes from scratch.
    pub fn recalculate_matrix(&mut self) -> Result<(), AlignError> {
        self.f.fill(INVALID_SCORE);
        self.b.fill(Traceback::INVALID);
        self.runs.fill(0);
        self.b0 = Traceback::INVALID;
        self.res1.clear();
        self.res2.clear();
        self.match_score = None;
        self.data.reset_match();
        self.calculate_matrix(true)
    }

    /// Walks from B0 until the first cell that points to itself.
    ///
    /// Reports every step to the data object, stores the match position
    /// vectors and returns the two gapped strings.
    pub fn extract_optimal_suffix(&mut self) -> Result<(String, String), AlignError> {
        let score = self.score();
        let strings = self.walk(Walk::OptimalSuffix)?;
        self.data.get_match();
        self.match_score = Some(score);
        Ok(strings)
    }

    /// Walks from B0 until either index reaches 0, penalising every visited
    /// cell and marking the move taken out of it, then rebuilds B and B0.
    ///
    /// The rebuilt B never repeats a marked move while another one exists, so
    /// the next walk from the same B0 leaves it differently. The data object
    /// materialises the extracted match afterwards.
    pub fn extract_full_chain(&mut self) -> Result<(), AlignError> {
        let score = self.score();
        self.walk(Walk::FullChain)?;
        self.calculate_matrix(false)?;
        self.data.get_match();
        self.match_score = Some(score);
        Ok(())
    }

    /// Whether B0 names an interior cell that still has an untaken move.
    pub fn can_extract(&self) -> bool {
        self.b0.i != 0
            && self.b0.j != 0
            && self.suppressed[(self.b0.i, self.b0.j)] != Step::ALL_MOVES
    }

    /// Extracts up to `num` successive alignments, best first.
    ///
    /// Each alignment carries the score read at B0 before its extraction.
    /// Extraction stops early once B0 no longer names an interior cell with
    /// an untaken move.
    pub fn multi_matches(&mut self, num: usize) -> Result<Vec<Alignment>, AlignError> {
        let mut matches = Vec::with_capacity(num);
        for rank in 0..num {
            if !self.can_extract() {
                warn!(
                    requested = num,
                    found = rank,
                    "No aligned cell left; stopping multi-match extraction early."
                );
                break;
            }
            let score = self.score();
            let end = self.b0;
            self.extract_full_chain()?;
            trace!(rank, score, end = %end, "Extracted alignment.");
            matches.push(self.data.generate_match(score));
        }
        Ok(matches)
    }

    /// Penalises one score cell: `F ← F − max(|F|·(1 − mul) + add, MIN_PERTURBATION)`.
    ///
    /// `token` must be the current [`Generation`]; a token from before the
    /// last recompute is rejected.
    pub fn perturb_cell(&mut self, i: usize, j: usize, token: Generation) -> Result<(), AlignError> {
        if i > self.n || j > self.m {
            return Err(AlignError::Precondition(format!(
                "cell ({i}, {j}) is outside a {}x{} matrix",
                self.n + 1,
                self.m + 1
            )));
        }
        self.lifecycle.mark_perturbed(token)?;
        let value = self.f[(i, j)];
        let penalty = value.abs() * (1.0 - self.config.penalty_mul) + self.config.penalty_add;
        self.f[(i, j)] = value - penalty.max(MIN_PERTURBATION);
        Ok(())
    }

    pub fn set_penalties(&mut self, mul: f64, add: f64) {
        self.config.penalty_mul = mul;
        self.config.penalty_add = add;
    }

    /// Score at B0.
    pub fn score(&self) -> f64 {
        self.f[(self.b0.i, self.b0.j)]
    }

    pub fn b0(&self) -> Traceback {
        self.b0
    }

    /// Position vectors of the last extracted match; `None` marks a gap.
    pub fn match_subset(&self) -> (&[Option<usize>], &[Option<usize>]) {
        (&self.res1, &self.res2)
    }

    /// The last extracted match with the score B0 held before its extraction.
    ///
    /// `None` until a match has been extracted.
    pub fn alignment(&self) -> Option<Alignment> {
        self.match_score
            .map(|score| self.data.generate_match(score))
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }

    pub fn scoring(&self) -> &ScoringScheme {
        &self.scoring
    }

    pub fn gaps(&self) -> &GapFunction {
        &self.gaps
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> MatrixState {
        self.lifecycle.state()
    }

    pub fn generation(&self) -> Generation {
        self.lifecycle.generation()
    }

    /// Sequence lengths `(n, m)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.n, self.m)
    }

    pub fn score_matrix(&self) -> &DMatrix<f64> {
        &self.f
    }

    pub fn traceback_matrix(&self) -> &DMatrix<Traceback> {
        &self.b
    }

    fn initialize_boundary(&mut self, update: bool) {
        if update {
            for i in 0..=self.n {
                self.f[(i, 0)] = 0.0;
            }
            for j in 0..=self.m {
                self.f[(0, j)] = 0.0;
            }
        }
        for i in 0..=self.n {
            self.runs[(i, 0)] = 0;
        }
        for j in 0..=self.m {
            self.runs[(0, j)] = 0;
        }

        match self.config.algorithm {
            Algorithm::FreeShift => {
                for i in 0..=self.n {
                    self.b[(i, 0)] = Traceback::new(i, 0);
                }
                for j in 0..=self.m {
                    self.b[(0, j)] = Traceback::new(0, j);
                }
            }
            Algorithm::NoTerminalGaps => {
                self.b[(0, 0)] = Traceback::new(0, 0);
                for i in 1..=self.n {
                    self.b[(i, 0)] = Traceback::new(i - 1, 0);
                }
                for j in 1..=self.m {
                    self.b[(0, j)] = Traceback::new(0, j - 1);
                }
            }
        }
    }

    fn fill_cell(&mut self, i: usize, j: usize, update: bool) -> Result<(), AlignError> {
        let terminal_free = self.config.algorithm == Algorithm::NoTerminalGaps;

        let diagonal = self.f[(i - 1, j - 1)] + self.diagonal_score(i, j);
        let (horizontal, h_run) =
            self.gap_candidate(i, j - 1, Step::Horizontal, j - 1, terminal_free && i == self.n);
        let (vertical, v_run) =
            self.gap_candidate(i - 1, j, Step::Vertical, j - 1, terminal_free && j == self.m);

        // Listed in tie priority order.
        let candidates = [
            (Step::Diagonal, diagonal, Traceback::new(i - 1, j - 1), 0),
            (Step::Horizontal, horizontal, Traceback::new(i, j - 1), h_run),
            (Step::Vertical, vertical, Traceback::new(i - 1, j), v_run),
        ];
        let taken = if update { 0 } else { self.suppressed[(i, j)] };
        let allowed = |step: Step| taken == Step::ALL_MOVES || taken & step.mask_bit() == 0;

        let best = candidates
            .iter()
            .filter(|c| allowed(c.0))
            .map(|c| c.1)
            .fold(f64::NEG_INFINITY, f64::max);
        let Some(&(_, _, pointer, run)) = candidates
            .iter()
            .filter(|c| allowed(c.0))
            .find(|c| approx_eq(c.1, best))
        else {
            return Err(AlignError::InconsistentTraceback { i, j });
        };

        if update {
            self.f[(i, j)] = best;
        }
        self.b[(i, j)] = pointer;
        self.runs[(i, j)] = run;
        Ok(())
    }

    /// Candidate value and resulting run length for a gap move out of
    /// `(pi, pj)` in `direction`.
    fn gap_candidate(
        &self,
        pi: usize,
        pj: usize,
        direction: Step,
        position: usize,
        free: bool,
    ) -> (f64, usize) {
        let on_edge = match direction {
            Step::Horizontal => pj == 0,
            _ => pi == 0,
        };
        let extends = !on_edge && Step::classify(pi, pj, self.b[(pi, pj)]) == Some(direction);

        let (penalty, run) = if extends {
            let run = self.runs[(pi, pj)];
            (self.gaps.extension_penalty(position, run), run + 1)
        } else {
            (self.gaps.open_penalty(position), 1)
        };
        let penalty = if free { 0.0 } else { penalty };
        (self.f[(pi, pj)] - penalty, run)
    }

    fn diagonal_score(&self, i: usize, j: usize) -> f64 {
        let score = self.scoring.score(i, j);
        match &self.weights {
            Some(w) => score * f64::from(w.v1[i - 1].min(w.v2[j - 1])),
            None => score,
        }
    }

    fn locate_b0(&self) -> Traceback {
        let (n, m) = (self.n, self.m);
        match self.config.algorithm {
            Algorithm::NoTerminalGaps => Traceback::new(n, m),
            Algorithm::FreeShift => {
                let mut best = Traceback::new(n, m);
                let mut best_score = self.f[(n, m)];
                let last_column = (0..n).rev().map(|i| (i, m));
                let last_row = (0..m).rev().map(|j| (n, j));
                for (i, j) in last_column.chain(last_row) {
                    if self.f[(i, j)] > best_score {
                        best_score = self.f[(i, j)];
                        best = Traceback::new(i, j);
                    }
                }
                best
            }
        }
    }

    fn walk(&mut self, mode: Walk) -> Result<(String, String), AlignError> {
        if !self.b0.is_valid() {
            return Err(AlignError::InvalidState {
                operation: "traceback",
                state: self.lifecycle.state(),
            });
        }
        let seq1: Vec<char> = self.data.sequence(Side::First).chars().collect();
        let seq2: Vec<char> = self.data.sequence(Side::Second).chars().collect();
        let token = self.lifecycle.generation();

        self.data.reset_match();
        self.match_score = None;
        self.res1.clear();
        self.res2.clear();
        let mut out1 = Vec::new();
        let mut out2 = Vec::new();

        let (mut i, mut j) = (self.b0.i, self.b0.j);
        loop {
            if mode == Walk::FullChain && (i == 0 || j == 0) {
                break;
            }
            let pointer = self.b[(i, j)];
            let step = Step::classify(i, j, pointer)
                .ok_or(AlignError::InconsistentTraceback { i, j })?;
            if step == Step::Stationary {
                if mode == Walk::FullChain {
                    return Err(AlignError::InconsistentTraceback { i, j });
                }
                break;
            }
            if mode == Walk::FullChain {
                self.perturb_cell(i, j, token)?;
                self.suppressed[(i, j)] |= step.mask_bit();
            }

            let (c1, r1) = if step == Step::Horizontal {
                ('-', None)
            } else {
                (seq1[i - 1], Some(i - 1))
            };
            let (c2, r2) = if step == Step::Vertical {
                ('-', None)
            } else {
                (seq2[j - 1], Some(j - 1))
            };
            out1.push(c1);
            out2.push(c2);
            self.res1.push(r1);
            self.res2.push(r2);
            self.data.calculate_match(i, pointer.i, j, pointer.j);

            i = pointer.i;
            j = pointer.j;
        }

        out1.reverse();
        out2.reverse();
        self.res1.reverse();
        self.res2.reverse();
        debug_assert_eq!(self.res1.len(), self.res2.len());
        Ok((out1.into_iter().collect(), out2.into_iter().collect()))
    }
}
