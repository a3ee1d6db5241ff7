use super::atom::Atom;
use super::chain::Chain;
use super::residue::Residue;
use super::structure::Structure;
use std::collections::HashMap;

/// Incremental builder used by file readers to assemble a [`Structure`] record by record.
pub struct StructureBuilder {
    structure: Structure,

    // --- Builder-specific state for efficient construction ---
    chain_id_map: HashMap<char, usize>,
    current_chain_idx: Option<usize>,
    current_residue_idx: Option<usize>,
}

impl Default for StructureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self {
            structure: Structure::new(),
            chain_id_map: HashMap::new(),
            current_chain_idx: None,
            current_residue_idx: None,
        }
    }

    pub fn start_chain(&mut self, id: char) -> &mut Self {
        let idx = *self.chain_id_map.entry(id).or_insert_with(|| {
            let index = self.structure.chains.len();
            self.structure.chains.push(Chain::new(id));
            index
        });
        self.current_chain_idx = Some(idx);
        self.current_residue_idx = None;
        self
    }

    /// Starts (or resumes) a residue in the current chain, implicitly opening
    /// chain `' '` if no chain has been started.
    pub fn start_residue(&mut self, number: isize, name: &str) -> &mut Self {
        let chain_idx = match self.current_chain_idx {
            Some(idx) => idx,
            None => {
                self.start_chain(' ');
                self.chain_id_map[&' ']
            }
        };
        let chain = &mut self.structure.chains[chain_idx];
        let res_idx = match chain.residue_map.get(&number) {
            Some(&idx) => idx,
            None => chain.push_residue(Residue::new(number, name)),
        };
        self.current_residue_idx = Some(res_idx);
        self
    }

    /// Adds an atom to the current residue. Atoms given before any residue are ignored.
    pub fn add_atom(&mut self, atom: Atom) -> &mut Self {
        if let (Some(c), Some(r)) = (self.current_chain_idx, self.current_residue_idx) {
            self.structure.chains[c].residues[r].add_atom(atom);
        }
        self
    }

    pub fn build(self) -> Structure {
        self.structure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn builder_groups_atoms_by_chain_and_residue() {
        let mut builder = StructureBuilder::new();
        builder
            .start_chain('A')
            .start_residue(1, "ALA")
            .add_atom(Atom::new(1, "N", Point3::origin()))
            .add_atom(Atom::new(2, "CA", Point3::new(1.5, 0.0, 0.0)))
            .start_residue(2, "GLY")
            .add_atom(Atom::new(3, "CA", Point3::new(3.8, 0.0, 0.0)));
        builder
            .start_chain('B')
            .start_residue(1, "SER")
            .add_atom(Atom::new(4, "CA", Point3::origin()));
        let structure = builder.build();

        assert_eq!(structure.chains().len(), 2);
        let chain_a = structure.chain('A').unwrap();
        assert_eq!(chain_a.sequence(), "AG");
        assert_eq!(chain_a.residues()[0].atoms().len(), 2);
        assert_eq!(structure.chain('B').unwrap().sequence(), "S");
    }

    #[test]
    fn restarting_a_chain_resumes_it() {
        let mut builder = StructureBuilder::new();
        builder.start_chain('A').start_residue(1, "ALA");
        builder.start_chain('B').start_residue(1, "GLY");
        builder.start_chain('A').start_residue(2, "CYS");
        let structure = builder.build();
        assert_eq!(structure.chain('A').unwrap().sequence(), "AC");
    }

    #[test]
    fn residue_without_chain_opens_blank_chain() {
        let mut builder = StructureBuilder::new();
        builder.start_residue(1, "ALA");
        let structure = builder.build();
        assert_eq!(structure.chain(' ').unwrap().len(), 1);
    }
}
