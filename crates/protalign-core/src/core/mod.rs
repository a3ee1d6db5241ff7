//! # Core Module
//!
//! This module provides the stateless building blocks of the alignment toolkit:
//! the residue alphabet, the strategies that feed the dynamic-programming engine,
//! and the thin structure layer needed to derive structural gap penalties.
//!
//! ## Overview
//!
//! Everything in `core` is immutable once constructed. Scoring schemes, gap
//! functions and profiles are plain values that the [`crate::engine`] layer owns
//! and clones together with its matrices.
//!
//! ## Architecture
//!
//! - **Alphabet** ([`alphabet`]) - The 20 amino-acid symbols, gap handling and residue-name mapping
//! - **Scoring** ([`scoring`]) - Substitution matrices and profile scoring behind one `ScoringScheme`
//! - **Gap Penalties** ([`gaps`]) - Affine and structure-derived variable gap penalties
//! - **Profiles** ([`profile`]) - Multiple alignments, Henikoff/PSIC sequence weights and frequency profiles
//! - **Structure Model** ([`models`]) - Minimal chain/residue/atom representation with secondary structure
//! - **File I/O** ([`io`]) - The `StructureFile` trait and a PDB coordinate reader
//! - **Geometry** ([`utils`]) - CA-trace helpers used by the structural gap terms
//!
//! ## Key Capabilities
//!
//! - **Closed strategy sets** expressed as enums, so engines deep-copy without boxing
//! - **Precomputed structural tables** so no file or geometry work reaches the DP hot path
//! - **Sequence weighting** that keeps redundant templates from dominating a profile

pub mod alphabet;
pub mod gaps;
pub mod io;
pub mod models;
pub mod profile;
pub mod scoring;
pub mod utils;
