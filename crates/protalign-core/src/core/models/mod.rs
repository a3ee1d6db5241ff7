//! # Structure Models
//!
//! Minimal coordinate models consumed by the structure-dependent gap penalty.
//! Only what the gap derivation needs is represented: chains of residues,
//! named atom positions and a per-residue secondary-structure state.
//!
//! - [`atom`] - Named atom position
//! - [`residue`] - Residue with its atoms and [`residue::SecondaryStructure`] state
//! - [`chain`] - Ordered residues of one polypeptide chain
//! - [`structure`] - All chains of the first model in a file
//! - [`builder`] - Incremental construction used by readers

pub mod atom;
pub mod builder;
pub mod chain;
pub mod residue;
pub mod structure;
