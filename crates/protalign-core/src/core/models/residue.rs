use super::atom::Atom;
use crate::core::alphabet;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Secondary-structure state of a residue, as assigned by HELIX/SHEET records
/// or supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SecondaryStructure {
    Helix,
    Strand,
    #[default]
    Coil,
}

#[derive(Debug, Error)]
#[error("Invalid secondary structure code: '{0}'")]
pub struct ParseSecondaryStructureError(pub String);

impl FromStr for SecondaryStructure {
    type Err = ParseSecondaryStructureError;

    /// Accepts DSSP-style one-letter codes as well as full names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H" | "G" | "I" | "HELIX" => Ok(SecondaryStructure::Helix),
            "E" | "B" | "STRAND" | "SHEET" => Ok(SecondaryStructure::Strand),
            "C" | "L" | "T" | "S" | "-" | "" | "COIL" => Ok(SecondaryStructure::Coil),
            _ => Err(ParseSecondaryStructureError(s.to_string())),
        }
    }
}

impl fmt::Display for SecondaryStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            SecondaryStructure::Helix => 'H',
            SecondaryStructure::Strand => 'E',
            SecondaryStructure::Coil => 'C',
        };
        write!(f, "{}", code)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub number: isize,                     // Residue sequence number from source file
    pub name: String,                      // Three-letter residue name (e.g., "ALA")
    pub secondary: SecondaryStructure,     // Assigned secondary-structure state
    pub(crate) atoms: Vec<Atom>,           // Atoms in file order
    atom_name_map: HashMap<String, usize>, // Map from atom name to its index in `atoms`
}

impl Residue {
    pub fn new(number: isize, name: &str) -> Self {
        Self {
            number,
            name: name.trim().to_string(),
            secondary: SecondaryStructure::default(),
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    /// Adds an atom; a later atom with the same name replaces the earlier one.
    pub fn add_atom(&mut self, atom: Atom) {
        if let Some(&idx) = self.atom_name_map.get(&atom.name) {
            self.atoms[idx] = atom;
        } else {
            self.atom_name_map.insert(atom.name.clone(), self.atoms.len());
            self.atoms.push(atom);
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atom_name_map.get(name).map(|&idx| &self.atoms[idx])
    }

    pub fn one_letter_code(&self) -> char {
        alphabet::one_letter_code(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let residue = Residue::new(10, " GLY");
        assert_eq!(residue.number, 10);
        assert_eq!(residue.name, "GLY");
        assert_eq!(residue.secondary, SecondaryStructure::Coil);
        assert!(residue.atoms().is_empty());
        assert!(residue.atom("CA").is_none());
    }

    #[test]
    fn add_atom_adds_atom_and_maps_name() {
        let mut residue = Residue::new(5, "ALA");
        residue.add_atom(Atom::new(1, "CA", Point3::new(1.0, 0.0, 0.0)));
        residue.add_atom(Atom::new(2, "CB", Point3::new(2.0, 0.0, 0.0)));
        assert_eq!(residue.atoms().len(), 2);
        assert_eq!(residue.atom("CB").map(|a| a.serial), Some(2));
    }

    #[test]
    fn add_atom_with_duplicate_name_replaces_previous_atom() {
        let mut residue = Residue::new(5, "ALA");
        residue.add_atom(Atom::new(1, "CA", Point3::new(1.0, 0.0, 0.0)));
        residue.add_atom(Atom::new(9, "CA", Point3::new(3.0, 0.0, 0.0)));
        assert_eq!(residue.atoms().len(), 1);
        assert_eq!(residue.atom("CA").map(|a| a.serial), Some(9));
    }

    #[test]
    fn one_letter_code_uses_residue_name() {
        assert_eq!(Residue::new(1, "TRP").one_letter_code(), 'W');
        assert_eq!(Residue::new(1, "LIG").one_letter_code(), 'X');
    }

    #[test]
    fn secondary_structure_parses_dssp_codes() {
        assert_eq!("H".parse::<SecondaryStructure>().unwrap(), SecondaryStructure::Helix);
        assert_eq!("g".parse::<SecondaryStructure>().unwrap(), SecondaryStructure::Helix);
        assert_eq!("E".parse::<SecondaryStructure>().unwrap(), SecondaryStructure::Strand);
        assert_eq!("-".parse::<SecondaryStructure>().unwrap(), SecondaryStructure::Coil);
        assert!("Q".parse::<SecondaryStructure>().is_err());
    }

    #[test]
    fn secondary_structure_displays_as_one_letter_code() {
        assert_eq!(SecondaryStructure::Helix.to_string(), "H");
        assert_eq!(SecondaryStructure::Strand.to_string(), "E");
        assert_eq!(SecondaryStructure::Coil.to_string(), "C");
    }
}
