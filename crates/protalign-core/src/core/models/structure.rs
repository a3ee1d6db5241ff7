use super::chain::Chain;

/// A parsed coordinate model: the chains of the first model in a structure file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    pub(crate) chains: Vec<Chain>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, id: char) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    pub fn chain_mut(&mut self, id: char) -> Option<&mut Chain> {
        self.chains.iter_mut().find(|c| c.id == id)
    }

    /// Selects a chain by identifier, or the first chain when no identifier is given.
    pub fn select_chain(&self, id: Option<char>) -> Option<&Chain> {
        match id {
            Some(id) => self.chain(id),
            None => self.chains.first(),
        }
    }

    pub fn push_chain(&mut self, chain: Chain) {
        self.chains.push(chain);
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(Chain::len).sum()
    }
}
