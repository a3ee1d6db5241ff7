//! # Engine Module
//!
//! This module implements the stateful dynamic-programming core of protalign: the score
//! and traceback matrices, the recurrences that fill them, and the traversals that turn
//! them into alignments.
//!
//! ## Overview
//!
//! An [`aligner::Aligner`] owns everything one pairwise alignment needs: the two inputs
//! (through an [`data::AlignmentData`] implementation), a scoring strategy, a gap
//! strategy, and the matrices F (scores), B (traceback pointers) and the start cell B0.
//! Matrices are computed eagerly on construction. Suboptimal alignments are obtained by
//! penalising the cells of each extracted path and rebuilding B and B0 over the
//! perturbed scores, so successive extractions never repeat a path.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Engine knobs, the alignment algorithm variant and
//!   TOML-backed settings for complete workflows
//! - **Matrices** ([`traceback`]) - Back-pointers and move classification; F and B are
//!   `nalgebra::DMatrix` values
//! - **Lifecycle** ([`state`]) - Matrix state machine and generation tokens that guard
//!   perturbation against stale matrices
//! - **Inputs and Results** ([`data`], [`alignment`]) - Match collectors for sequences
//!   and profiles, and the realised alignment value
//! - **Batch Processing** ([`batch`]) - Independent pairs, optionally on the rayon pool
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine error taxonomy
//!
//! ## Key Capabilities
//!
//! - **Two alignment variants**: free end-shift and global without terminal gap penalties
//! - **Affine and structure-dependent gap penalties** with decaying extension schedules
//! - **Support-weighted recurrence** for secondary-structure element alignment
//! - **Ranked suboptimal alignments** by successive path suppression

pub mod aligner;
pub mod alignment;
pub mod batch;
pub mod config;
pub mod data;
pub mod error;
pub mod progress;
pub mod state;
pub mod traceback;
