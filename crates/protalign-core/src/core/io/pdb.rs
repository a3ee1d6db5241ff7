use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::builder::StructureBuilder;
use crate::core::models::residue::SecondaryStructure;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_int(line: &str, line_num: usize, start: usize, end: usize) -> Result<isize, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn chain_char(line: &str, col: usize) -> char {
    line.get(col..col + 1)
        .and_then(|s| s.chars().next())
        .unwrap_or(' ')
}

struct SecondaryRange {
    chain_id: char,
    start: isize,
    end: isize,
    state: SecondaryStructure,
}

/// Reader for the ATOM/HETATM, HELIX and SHEET records of PDB coordinate files.
///
/// Only the first model is read; alternate locations other than blank or `A`
/// are skipped.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut builder = StructureBuilder::new();
        let mut ranges: Vec<SecondaryRange> = Vec::new();
        let mut atom_count = 0usize;

        let mut current_chain_id: Option<char> = None;
        let mut current_residue: Option<(isize, char)> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "ATOM" | "HETATM" => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }
                    let alt_loc = chain_char(&line, 16);
                    if alt_loc != ' ' && alt_loc != 'A' {
                        continue;
                    }

                    let name = slice_and_trim(&line, 12, 16);
                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    let serial = parse_int(&line, line_num, 6, 11)?.max(0) as usize;
                    let res_name = slice_and_trim(&line, 17, 20);
                    let chain_id = chain_char(&line, 21);
                    let res_seq = parse_int(&line, line_num, 22, 26)?;
                    let insertion = chain_char(&line, 26);
                    let x = parse_float(&line, line_num, 30, 38)?;
                    let y = parse_float(&line, line_num, 38, 46)?;
                    let z = parse_float(&line, line_num, 46, 54)?;

                    if current_chain_id != Some(chain_id) {
                        builder.start_chain(chain_id);
                        current_chain_id = Some(chain_id);
                        current_residue = None;
                    }
                    // Insertion codes are not tracked; an inserted residue is skipped.
                    if current_residue.is_some_and(|(seq, _)| seq == res_seq)
                        && current_residue.map(|(_, icode)| icode) != Some(insertion)
                    {
                        continue;
                    }
                    if current_residue.map(|(seq, _)| seq) != Some(res_seq) {
                        builder.start_residue(res_seq, res_name);
                        current_residue = Some((res_seq, insertion));
                    }
                    builder.add_atom(Atom::new(serial, name, Point3::new(x, y, z)));
                    atom_count += 1;
                }
                "HELIX" => {
                    ranges.push(SecondaryRange {
                        chain_id: chain_char(&line, 19),
                        start: parse_int(&line, line_num, 21, 25)?,
                        end: parse_int(&line, line_num, 33, 37)?,
                        state: SecondaryStructure::Helix,
                    });
                }
                "SHEET" => {
                    ranges.push(SecondaryRange {
                        chain_id: chain_char(&line, 21),
                        start: parse_int(&line, line_num, 22, 26)?,
                        end: parse_int(&line, line_num, 33, 37)?,
                        state: SecondaryStructure::Strand,
                    });
                }
                "ENDMDL" | "END" => break,
                _ => {}
            }
        }

        if atom_count == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }

        let mut structure = builder.build();
        for range in ranges {
            if let Some(chain) = structure.chain_mut(range.chain_id) {
                chain.assign_secondary(range.start, range.end, range.state);
            }
        }
        Ok(structure)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs::File;
    use std::io::{Cursor, Write};
    use tempfile::tempdir;

    pub(crate) fn atom_line(
        serial: usize,
        name: &str,
        res_name: &str,
        chain: char,
        res_seq: isize,
        pos: [f64; 3],
    ) -> String {
        format!(
            "ATOM  {:>5} {:<4} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00",
            serial, name, res_name, chain, res_seq, pos[0], pos[1], pos[2]
        )
    }

    pub(crate) fn helix_line(chain: char, start: isize, end: isize) -> String {
        format!(
            "HELIX  {:>3} {:>3} {:>3} {} {:>4}  {:>3} {} {:>4}",
            1, 1, "ALA", chain, start, "ALA", chain, end
        )
    }

    pub(crate) fn sheet_line(chain: char, start: isize, end: isize) -> String {
        format!(
            "SHEET  {:>3} {:>3}{:>2} {:>3} {}{:>4}  {:>3} {}{:>4}",
            1, "A", 2, "VAL", chain, start, "VAL", chain, end
        )
    }

    fn read(content: &str) -> Result<Structure, PdbError> {
        PdbFile::read_from(&mut Cursor::new(content.as_bytes()))
    }

    #[test]
    fn test_line_helpers_place_fields_in_pdb_columns() {
        let line = atom_line(12, "CA", "GLY", 'B', 7, [1.0, -2.5, 3.25]);
        assert_eq!(slice_and_trim(&line, 6, 11), "12");
        assert_eq!(slice_and_trim(&line, 12, 16), "CA");
        assert_eq!(slice_and_trim(&line, 17, 20), "GLY");
        assert_eq!(chain_char(&line, 21), 'B');
        assert_eq!(slice_and_trim(&line, 22, 26), "7");
        assert_eq!(slice_and_trim(&line, 38, 46), "-2.500");

        let helix = helix_line('A', 2, 5);
        assert_eq!(chain_char(&helix, 19), 'A');
        assert_eq!(slice_and_trim(&helix, 21, 25), "2");
        assert_eq!(slice_and_trim(&helix, 33, 37), "5");

        let sheet = sheet_line('A', 8, 11);
        assert_eq!(chain_char(&sheet, 21), 'A');
        assert_eq!(slice_and_trim(&sheet, 22, 26), "8");
        assert_eq!(slice_and_trim(&sheet, 33, 37), "11");
    }

    #[test]
    fn reads_atoms_grouped_into_chains_and_residues() {
        let content = [
            atom_line(1, "N", "ALA", 'A', 1, [0.0, 0.0, 0.0]),
            atom_line(2, "CA", "ALA", 'A', 1, [1.5, 0.0, 0.0]),
            atom_line(3, "CA", "GLY", 'A', 2, [3.8, 0.0, 0.0]),
            atom_line(4, "CA", "SER", 'B', 1, [0.0, 5.0, 0.0]),
            "END".to_string(),
        ]
        .join("\n");
        let structure = read(&content).unwrap();

        assert_eq!(structure.chains().len(), 2);
        let chain_a = structure.chain('A').unwrap();
        assert_eq!(chain_a.sequence(), "AG");
        let ca = chain_a.residues()[0].atom("CA").unwrap();
        assert_eq!(ca.position, Point3::new(1.5, 0.0, 0.0));
        assert_eq!(structure.chain('B').unwrap().sequence(), "S");
    }

    #[test]
    fn assigns_secondary_structure_from_helix_and_sheet_records() {
        let mut lines = vec![helix_line('A', 2, 3), sheet_line('A', 4, 4)];
        for i in 1..=5 {
            lines.push(atom_line(i as usize, "CA", "ALA", 'A', i, [i as f64, 0.0, 0.0]));
        }
        let structure = read(&lines.join("\n")).unwrap();
        let states: String = structure
            .chain('A')
            .unwrap()
            .residues()
            .iter()
            .map(|r| r.secondary.to_string())
            .collect();
        assert_eq!(states, "CHHEC");
    }

    #[test]
    fn reads_only_the_first_model() {
        let content = [
            "MODEL        1".to_string(),
            atom_line(1, "CA", "ALA", 'A', 1, [0.0, 0.0, 0.0]),
            "ENDMDL".to_string(),
            "MODEL        2".to_string(),
            atom_line(2, "CA", "GLY", 'A', 2, [0.0, 0.0, 0.0]),
            "ENDMDL".to_string(),
        ]
        .join("\n");
        let structure = read(&content).unwrap();
        assert_eq!(structure.chain('A').unwrap().sequence(), "A");
    }

    #[test]
    fn returns_error_for_invalid_coordinate() {
        let mut line = atom_line(1, "CA", "ALA", 'A', 1, [0.0, 0.0, 0.0]);
        line.replace_range(30..38, "   abc  ");
        let result = read(&line);
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::InvalidFloat { .. }
            })
        ));
    }

    #[test]
    fn returns_error_for_truncated_atom_line() {
        let result = read("ATOM      1  CA  ALA A   1");
        assert!(matches!(
            result,
            Err(PdbError::Parse {
                kind: PdbParseErrorKind::LineTooShort,
                ..
            })
        ));
    }

    #[test]
    fn returns_error_when_no_atoms_present() {
        let result = read("HEADER    TEST\nEND\n");
        assert!(matches!(result, Err(PdbError::MissingRecord(_))));
    }

    #[test]
    fn read_from_path_reads_file_and_reports_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.pdb");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", atom_line(1, "CA", "TRP", 'A', 1, [0.0, 0.0, 0.0])).unwrap();
        drop(file);

        let structure = PdbFile::read_from_path(&path).unwrap();
        assert_eq!(structure.chain('A').unwrap().sequence(), "W");

        let missing = PdbFile::read_from_path(dir.path().join("missing.pdb"));
        assert!(matches!(missing, Err(PdbError::Io(_))));
    }
}
