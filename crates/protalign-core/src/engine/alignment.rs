use crate::core::alphabet;
use std::fmt;
use std::io::{self, Write};

/// A realised pairwise alignment and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub name1: String,
    pub name2: String,
    /// Sequence 1 with `-` at gap positions.
    pub aligned1: String,
    /// Sequence 2 with `-` at gap positions.
    pub aligned2: String,
    pub score: f64,
}

impl Alignment {
    pub fn new(
        name1: impl Into<String>,
        name2: impl Into<String>,
        aligned1: impl Into<String>,
        aligned2: impl Into<String>,
        score: f64,
    ) -> Self {
        let alignment = Self {
            name1: name1.into(),
            name2: name2.into(),
            aligned1: aligned1.into(),
            aligned2: aligned2.into(),
            score,
        };
        debug_assert_eq!(
            alignment.aligned1.chars().count(),
            alignment.aligned2.chars().count()
        );
        alignment
    }

    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.aligned1.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned1.is_empty()
    }

    fn paired_columns(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.aligned1
            .chars()
            .zip(self.aligned2.chars())
            .filter(|&(a, b)| !alphabet::is_gap(a) && !alphabet::is_gap(b))
    }

    /// Fraction of residue-residue columns with identical residues.
    ///
    /// Returns 0 for an alignment without residue pairs.
    pub fn identity(&self) -> f64 {
        let (pairs, identical) = self
            .paired_columns()
            .fold((0usize, 0usize), |(p, id), (a, b)| {
                (p + 1, id + usize::from(a.eq_ignore_ascii_case(&b)))
            });
        if pairs == 0 {
            0.0
        } else {
            identical as f64 / pairs as f64
        }
    }

    /// Fraction of the shorter sequence's residues that are paired with a residue.
    pub fn coverage(&self) -> f64 {
        let residues = |s: &str| s.chars().filter(|&c| !alphabet::is_gap(c)).count();
        let shorter = residues(&self.aligned1).min(residues(&self.aligned2));
        if shorter == 0 {
            0.0
        } else {
            self.paired_columns().count() as f64 / shorter as f64
        }
    }

    /// Writes the two aligned lines and the score, without headers.
    pub fn write_plain<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.aligned1)?;
        writeln!(writer, "{}", self.aligned2)?;
        writeln!(writer, "Score = {}", self.score)
    }
}

impl fmt::Display for Alignment {
    /// FASTA-like dump: one header and gapped line per sequence, then the score.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "> {}", self.name1)?;
        writeln!(f, "{}", self.aligned1)?;
        writeln!(f)?;
        writeln!(f, "> {}", self.name2)?;
        writeln!(f, "{}", self.aligned2)?;
        writeln!(f)?;
        writeln!(f, "Score = {}", self.score)
    }
}

/// Shifts every non-gap entry of a position map by `offset`; gaps stay `None`.
pub fn shift_match_subset(positions: &mut [Option<usize>], offset: usize) {
    for pos in positions.iter_mut().flatten() {
        *pos += offset;
    }
}
