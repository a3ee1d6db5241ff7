use super::error::AlignError;
use std::fmt;

/// Where the engine's matrices are in their compute/perturb cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixState {
    /// Allocated but never computed.
    Uninitialized,
    /// F and B hold a full recurrence result.
    Computed,
    /// Some F cells were penalised after the last recompute; B and B0 are stale.
    Perturbed,
    /// B and B0 were rebuilt over a perturbed F.
    Recomputed,
}

impl fmt::Display for MatrixState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Computed => "computed",
            Self::Perturbed => "perturbed",
            Self::Recomputed => "recomputed",
        };
        f.write_str(name)
    }
}

/// Token naming one matrix generation.
///
/// Every full or partial recompute starts a new generation. Perturbing a cell
/// requires the token of the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lifecycle {
    state: MatrixState,
    generation: Generation,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Self {
            state: MatrixState::Uninitialized,
            generation: Generation(0),
        }
    }

    pub(crate) fn state(&self) -> MatrixState {
        self.state
    }

    pub(crate) fn generation(&self) -> Generation {
        self.generation
    }

    /// A full recurrence finished.
    pub(crate) fn mark_computed(&mut self) -> Generation {
        self.state = MatrixState::Computed;
        self.advance()
    }

    /// B and B0 were rebuilt without touching F.
    pub(crate) fn mark_recomputed(&mut self) -> Result<Generation, AlignError> {
        if self.state == MatrixState::Uninitialized {
            return Err(AlignError::InvalidState {
                operation: "partial recompute",
                state: self.state,
            });
        }
        self.state = MatrixState::Recomputed;
        Ok(self.advance())
    }

    /// Validates `token` and records that F is about to be penalised.
    pub(crate) fn mark_perturbed(&mut self, token: Generation) -> Result<(), AlignError> {
        if self.state == MatrixState::Uninitialized {
            return Err(AlignError::InvalidState {
                operation: "perturbation",
                state: self.state,
            });
        }
        if token != self.generation {
            return Err(AlignError::StaleGeneration {
                expected: self.generation,
                found: token,
            });
        }
        self.state = MatrixState::Perturbed;
        Ok(())
    }

    fn advance(&mut self) -> Generation {
        self.generation = Generation(self.generation.0 + 1);
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lifecycle_is_uninitialized() {
        let lc = Lifecycle::new();
        assert_eq!(lc.state(), MatrixState::Uninitialized);
        assert_eq!(lc.generation(), Generation(0));
    }

    #[test]
    fn full_cycle_advances_generation_on_every_recompute() {
        let mut lc = Lifecycle::new();
        let g1 = lc.mark_computed();
        assert_eq!(lc.state(), MatrixState::Computed);

        lc.mark_perturbed(g1).unwrap();
        lc.mark_perturbed(g1).unwrap();
        assert_eq!(lc.state(), MatrixState::Perturbed);

        let g2 = lc.mark_recomputed().unwrap();
        assert!(g2 > g1);
        assert_eq!(lc.state(), MatrixState::Recomputed);

        lc.mark_perturbed(g2).unwrap();
        assert_eq!(lc.state(), MatrixState::Perturbed);

        let g3 = lc.mark_computed();
        assert!(g3 > g2);
        assert_eq!(lc.state(), MatrixState::Computed);
    }

    #[test]
    fn stale_token_is_rejected() {
        let mut lc = Lifecycle::new();
        let old = lc.mark_computed();
        let current = lc.mark_computed();
        let result = lc.mark_perturbed(old);
        assert!(matches!(
            result,
            Err(AlignError::StaleGeneration { expected, found }) if expected == current && found == old
        ));
        assert_eq!(lc.state(), MatrixState::Computed);
    }

    #[test]
    fn uninitialized_matrices_cannot_be_perturbed_or_recomputed() {
        let mut lc = Lifecycle::new();
        assert!(matches!(
            lc.mark_perturbed(Generation(0)),
            Err(AlignError::InvalidState { .. })
        ));
        assert!(matches!(lc.mark_recomputed(), Err(AlignError::InvalidState { .. })));
    }
}
