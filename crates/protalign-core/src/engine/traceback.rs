use std::fmt;

/// Back-pointer of a DP cell: the coordinates of its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Traceback {
    pub i: usize,
    pub j: usize,
}

impl Traceback {
    /// Marker for a cell whose back-pointer has been reset and not recomputed.
    pub const INVALID: Self = Self {
        i: usize::MAX,
        j: usize::MAX,
    };

    pub const fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl fmt::Display for Traceback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "({}, {})", self.i, self.j)
        } else {
            write!(f, "(invalid)")
        }
    }
}

/// DP transition encoded by a back-pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Both sequences advance: match or mismatch.
    Diagonal,
    /// Only sequence 2 advances: gap in sequence 1.
    Horizontal,
    /// Only sequence 1 advances: gap in sequence 2.
    Vertical,
    /// The pointer references its own cell; a chain start.
    Stationary,
}

impl Step {
    /// Classifies the move from cell `(i, j)` to `pointer`.
    ///
    /// Returns `None` for an invalid pointer or one that is not a single DP move.
    pub fn classify(i: usize, j: usize, pointer: Traceback) -> Option<Self> {
        if !pointer.is_valid() {
            return None;
        }
        let di = i.checked_sub(pointer.i)?;
        let dj = j.checked_sub(pointer.j)?;
        match (di, dj) {
            (1, 1) => Some(Self::Diagonal),
            (0, 1) => Some(Self::Horizontal),
            (1, 0) => Some(Self::Vertical),
            (0, 0) => Some(Self::Stationary),
            _ => None,
        }
    }

    /// Every move out of an interior cell, as [`Step::mask_bit`] flags.
    pub(crate) const ALL_MOVES: u8 = 0b111;

    /// Flag for this move in a per-cell set of taken moves.
    pub(crate) fn mask_bit(self) -> u8 {
        match self {
            Self::Diagonal => 0b001,
            Self::Horizontal => 0b010,
            Self::Vertical => 0b100,
            Self::Stationary => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_recognises_all_moves() {
        assert_eq!(Step::classify(3, 4, Traceback::new(2, 3)), Some(Step::Diagonal));
        assert_eq!(Step::classify(3, 4, Traceback::new(3, 3)), Some(Step::Horizontal));
        assert_eq!(Step::classify(3, 4, Traceback::new(2, 4)), Some(Step::Vertical));
        assert_eq!(Step::classify(3, 4, Traceback::new(3, 4)), Some(Step::Stationary));
    }

    #[test]
    fn classify_rejects_invalid_and_non_adjacent_pointers() {
        assert_eq!(Step::classify(3, 4, Traceback::INVALID), None);
        assert_eq!(Step::classify(3, 4, Traceback::new(1, 4)), None);
        assert_eq!(Step::classify(3, 4, Traceback::new(4, 4)), None);
    }

    #[test]
    fn mask_bits_of_the_three_moves_cover_all_moves() {
        let all =
            Step::Diagonal.mask_bit() | Step::Horizontal.mask_bit() | Step::Vertical.mask_bit();
        assert_eq!(all, Step::ALL_MOVES);
        assert_eq!(Step::Stationary.mask_bit(), 0);
    }

    #[test]
    fn display_marks_invalid_pointer() {
        assert_eq!(Traceback::new(1, 2).to_string(), "(1, 2)");
        assert_eq!(Traceback::INVALID.to_string(), "(invalid)");
    }
}
