//! Reading of coordinate files.
//!
//! Only the records needed to derive structural gap penalties are understood:
//! atom coordinates of the first model and HELIX/SHEET secondary-structure ranges.

pub mod pdb;
pub mod traits;
