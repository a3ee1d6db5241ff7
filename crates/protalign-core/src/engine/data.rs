use super::alignment::Alignment;
use crate::core::alphabet::{GAP_CHAR, PROFILE_WIDTH};
use crate::core::profile::Profile;

/// Which of the two aligned inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

/// Owner of the two inputs and collector of the traceback path.
///
/// The engine reports every step of a walk through [`calculate_match`], from
/// the end of the alignment toward its start, then calls [`get_match`] once to
/// let the implementation materialise what it collected.
///
/// [`calculate_match`]: AlignmentData::calculate_match
/// [`get_match`]: AlignmentData::get_match
pub trait AlignmentData: Clone {
    fn sequence(&self, side: Side) -> &str;

    /// Records one traceback step from cell `(i, j)` to its predecessor
    /// `(pi, pj)`. A coordinate that does not change is a gap on that side.
    fn calculate_match(&mut self, i: usize, pi: usize, j: usize, pj: usize);

    /// Finalises the steps recorded since the last reset.
    fn get_match(&mut self);

    /// Builds the alignment value for the last finalised match.
    fn generate_match(&self, score: f64) -> Alignment;

    /// Discards recorded steps and the finalised match.
    fn reset_match(&mut self);
}

/// Two plain named sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceData {
    name1: String,
    name2: String,
    seq1: String,
    seq2: String,
    residues1: Vec<char>,
    residues2: Vec<char>,
    pending1: Vec<char>,
    pending2: Vec<char>,
    aligned1: String,
    aligned2: String,
}

impl SequenceData {
    pub fn new(
        name1: impl Into<String>,
        seq1: impl Into<String>,
        name2: impl Into<String>,
        seq2: impl Into<String>,
    ) -> Self {
        let seq1 = seq1.into().to_ascii_uppercase();
        let seq2 = seq2.into().to_ascii_uppercase();
        Self {
            name1: name1.into(),
            name2: name2.into(),
            residues1: seq1.chars().collect(),
            residues2: seq2.chars().collect(),
            seq1,
            seq2,
            pending1: Vec::new(),
            pending2: Vec::new(),
            aligned1: String::new(),
            aligned2: String::new(),
        }
    }

    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::First => &self.name1,
            Side::Second => &self.name2,
        }
    }

    /// The gapped strings of the last finalised match.
    pub fn aligned(&self) -> (&str, &str) {
        (&self.aligned1, &self.aligned2)
    }
}

impl AlignmentData for SequenceData {
    fn sequence(&self, side: Side) -> &str {
        match side {
            Side::First => &self.seq1,
            Side::Second => &self.seq2,
        }
    }

    fn calculate_match(&mut self, i: usize, pi: usize, j: usize, pj: usize) {
        if i == pi && j == pj {
            return;
        }
        self.pending1
            .push(if i != pi { self.residues1[i - 1] } else { GAP_CHAR });
        self.pending2
            .push(if j != pj { self.residues2[j - 1] } else { GAP_CHAR });
    }

    fn get_match(&mut self) {
        self.aligned1 = self.pending1.drain(..).rev().collect();
        self.aligned2 = self.pending2.drain(..).rev().collect();
    }

    fn generate_match(&self, score: f64) -> Alignment {
        Alignment::new(
            self.name1.clone(),
            self.name2.clone(),
            self.aligned1.clone(),
            self.aligned2.clone(),
            score,
        )
    }

    fn reset_match(&mut self) {
        self.pending1.clear();
        self.pending2.clear();
        self.aligned1.clear();
        self.aligned2.clear();
    }
}

/// Two named profiles; the finalised match also yields a merged profile.
///
/// Columns where both profiles are aligned average their frequencies; a
/// column opposite a gap keeps the frequencies of the side that is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileData {
    sequences: SequenceData,
    profile1: Profile,
    profile2: Profile,
    pending: Vec<([f64; PROFILE_WIDTH], f64)>,
    consensus: Option<Profile>,
}

impl ProfileData {
    pub fn new(
        name1: impl Into<String>,
        profile1: Profile,
        name2: impl Into<String>,
        profile2: Profile,
    ) -> Self {
        Self {
            sequences: SequenceData::new(name1, profile1.sequence(), name2, profile2.sequence()),
            profile1,
            profile2,
            pending: Vec::new(),
            consensus: None,
        }
    }

    /// Merged profile of the last finalised match.
    pub fn consensus(&self) -> Option<&Profile> {
        self.consensus.as_ref()
    }
}

impl AlignmentData for ProfileData {
    fn sequence(&self, side: Side) -> &str {
        self.sequences.sequence(side)
    }

    fn calculate_match(&mut self, i: usize, pi: usize, j: usize, pj: usize) {
        let column = match (i != pi, j != pj) {
            (true, true) => {
                let (a, b) = (self.profile1.column(i - 1), self.profile2.column(j - 1));
                let mut merged = [0.0; PROFILE_WIDTH];
                for (m, (x, y)) in merged.iter_mut().zip(a.iter().zip(b)) {
                    *m = (x + y) / 2.0;
                }
                let neff = (self.profile1.effective_sequences(i - 1)
                    + self.profile2.effective_sequences(j - 1))
                    / 2.0;
                (merged, neff)
            }
            (true, false) => (
                *self.profile1.column(i - 1),
                self.profile1.effective_sequences(i - 1),
            ),
            (false, true) => (
                *self.profile2.column(j - 1),
                self.profile2.effective_sequences(j - 1),
            ),
            (false, false) => return,
        };
        self.pending.push(column);
        self.sequences.calculate_match(i, pi, j, pj);
    }

    fn get_match(&mut self) {
        self.sequences.get_match();
        let (columns, neff): (Vec<_>, Vec<_>) = self.pending.drain(..).rev().unzip();
        let (aligned1, aligned2) = self.sequences.aligned();
        let sequence = aligned1
            .chars()
            .zip(aligned2.chars())
            .map(|(a, b)| if a == GAP_CHAR { b } else { a })
            .collect();
        self.consensus = Some(Profile::from_parts(sequence, columns, neff));
    }

    fn generate_match(&self, score: f64) -> Alignment {
        self.sequences.generate_match(score)
    }

    fn reset_match(&mut self) {
        self.sequences.reset_match();
        self.pending.clear();
        self.consensus = None;
    }
}
