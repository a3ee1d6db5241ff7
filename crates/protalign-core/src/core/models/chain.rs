use super::residue::{Residue, SecondaryStructure};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: char,                                  // Chain identifier (e.g., 'A', 'B')
    pub(crate) residues: Vec<Residue>,             // Residues in sequence order
    pub(crate) residue_map: HashMap<isize, usize>, // Residue number -> index in `residues`
}

impl Chain {
    pub fn new(id: char) -> Self {
        Self {
            id,
            residues: Vec::new(),
            residue_map: HashMap::new(),
        }
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn residue(&self, number: isize) -> Option<&Residue> {
        self.residue_map.get(&number).map(|&idx| &self.residues[idx])
    }

    pub fn push_residue(&mut self, residue: Residue) -> usize {
        let idx = self.residues.len();
        self.residue_map.insert(residue.number, idx);
        self.residues.push(residue);
        idx
    }

    /// One-letter sequence of the chain, unknown residues as `X`.
    pub fn sequence(&self) -> String {
        self.residues.iter().map(Residue::one_letter_code).collect()
    }

    /// Marks every residue numbered within `start..=end` with the given state.
    pub fn assign_secondary(&mut self, start: isize, end: isize, state: SecondaryStructure) {
        for residue in self
            .residues
            .iter_mut()
            .filter(|r| r.number >= start && r.number <= end)
        {
            residue.secondary = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_with(names: &[&str]) -> Chain {
        let mut chain = Chain::new('A');
        for (i, name) in names.iter().enumerate() {
            chain.push_residue(Residue::new(i as isize + 1, name));
        }
        chain
    }

    #[test]
    fn sequence_is_built_from_one_letter_codes() {
        let chain = chain_with(&["ALA", "CYS", "HOH", "GLY"]);
        assert_eq!(chain.sequence(), "ACXG");
    }

    #[test]
    fn residue_lookup_uses_residue_number() {
        let chain = chain_with(&["ALA", "CYS"]);
        assert_eq!(chain.residue(2).map(|r| r.name.as_str()), Some("CYS"));
        assert!(chain.residue(3).is_none());
    }

    #[test]
    fn assign_secondary_marks_inclusive_range() {
        let mut chain = chain_with(&["ALA", "CYS", "ASP", "GLU"]);
        chain.assign_secondary(2, 3, SecondaryStructure::Helix);
        let states: Vec<_> = chain.residues().iter().map(|r| r.secondary).collect();
        assert_eq!(
            states,
            vec![
                SecondaryStructure::Coil,
                SecondaryStructure::Helix,
                SecondaryStructure::Helix,
                SecondaryStructure::Coil
            ]
        );
    }
}
