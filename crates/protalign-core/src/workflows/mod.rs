//! # Workflows Module
//!
//! This module provides the high-level entry points that turn inputs and a configuration
//! into ranked alignments.
//!
//! ## Overview
//!
//! A workflow resolves everything an [`crate::engine::aligner::Aligner`] needs from an
//! [`crate::engine::config::AlignmentConfig`]: the substitution matrix, the gap strategy
//! (including reading a template structure for variable gap penalties) and, for profile
//! inputs, the sequence weighting. It then computes the matrices and extracts the
//! requested number of alignments, reporting progress along the way.
//!
//! ## Architecture
//!
//! - **Alignment Workflows** ([`align`]) - Sequence-sequence, profile-profile and
//!   profile-sequence alignment
//!
//! ## Key Capabilities
//!
//! - **Configuration-driven setup** from a single TOML document
//! - **Ranked suboptimal alignments** with per-match progress events
//! - **Consensus profiles** for profile-profile alignment

pub mod align;
