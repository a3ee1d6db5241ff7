//! # protalign Core Library
//!
//! Pairwise and profile alignment for homology-based protein modeling, with gap penalties
//! that can follow the structure of the template.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture with a clear separation of concerns.
//!
//! - **[`core`]: The Foundation.** Stateless building blocks: the amino-acid alphabet,
//!   substitution matrices and profile scoring (`scoring`), affine and structure-derived
//!   gap penalties (`gaps`), multiple alignments and weighted profiles (`profile`), and the
//!   minimal structure model and PDB reader the gap penalties are derived from.
//!
//! - **[`engine`]: The Logic Core.** The stateful dynamic-programming aligner. It owns the
//!   score and traceback matrices, the free-shift and no-terminal-gap recurrences, the
//!   traceback walks, and the path-suppression scheme that yields ranked suboptimal
//!   alignments. It also holds the configuration types and batch processing.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together: builds the
//!   strategies from an `AlignmentConfig` and returns ranked alignments for sequence and
//!   profile inputs.

pub mod core;
pub mod engine;
pub mod workflows;
