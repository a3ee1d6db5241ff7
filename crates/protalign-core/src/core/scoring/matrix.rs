use super::ScoringError;
use crate::core::alphabet::{RESIDUES, UNKNOWN_RESIDUE};
use std::collections::HashMap;
use std::path::Path;

const NCBI_SYMBOLS: &str = "ARNDCQEGHILKMFPSTWYVBZX*";

#[rustfmt::skip]
const BLOSUM62: [i8; 24 * 24] = [
//   A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V   B   Z   X   *
     4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4, // A
    -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4, // R
    -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4, // N
    -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4, // D
     0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4, // C
    -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4, // Q
    -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // E
     0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4, // G
    -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4, // H
    -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4, // I
    -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4, // L
    -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4, // K
    -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4, // M
    -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4, // F
    -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4, // P
     1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4, // S
     0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4, // T
    -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4, // W
    -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4, // Y
     0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4, // V
    -2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4, // B
    -1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // Z
     0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4, // X
    -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1, // *
];

/// A square residue substitution matrix.
///
/// Lookups are case-insensitive. Symbols missing from the matrix fall back to
/// the `X` row/column when the matrix has one.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionMatrix {
    name: String,
    symbols: Vec<char>,
    index: HashMap<char, usize>,
    scores: Vec<f64>,
}

impl SubstitutionMatrix {
    fn from_table(name: &str, symbols: Vec<char>, scores: Vec<f64>) -> Self {
        debug_assert_eq!(scores.len(), symbols.len() * symbols.len());
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self {
            name: name.to_string(),
            symbols,
            index,
            scores,
        }
    }

    /// The NCBI BLOSUM62 matrix.
    pub fn blosum62() -> Self {
        Self::from_table(
            "BLOSUM62",
            NCBI_SYMBOLS.chars().collect(),
            BLOSUM62.iter().map(|&s| s as f64).collect(),
        )
    }

    /// Match/mismatch matrix over the 20 residues plus `X`.
    ///
    /// `X` never matches, not even itself.
    pub fn identity(match_score: f64, mismatch_score: f64) -> Self {
        let mut symbols: Vec<char> = RESIDUES.to_vec();
        symbols.push(UNKNOWN_RESIDUE);
        let n = symbols.len();
        let unknown = n - 1;
        let scores = (0..n * n)
            .map(|k| {
                let (a, b) = (k / n, k % n);
                if a == b && a != unknown {
                    match_score
                } else {
                    mismatch_score
                }
            })
            .collect();
        Self::from_table("IDENTITY", symbols, scores)
    }

    /// Resolves a built-in matrix by name (`blosum62`, `identity`).
    pub fn from_name(name: &str) -> Result<Self, ScoringError> {
        match name.to_ascii_lowercase().as_str() {
            "blosum62" => Ok(Self::blosum62()),
            "identity" => Ok(Self::identity(1.0, -1.0)),
            _ => Err(ScoringError::UnknownMatrix(name.to_string())),
        }
    }

    /// Loads an NCBI-format matrix file.
    ///
    /// Lines starting with `#` are comments. The first remaining line lists
    /// the column symbols; every following line starts with its row symbol.
    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScoringError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_default();
        Self::parse(&name, &content)
    }

    pub(crate) fn parse(name: &str, content: &str) -> Result<Self, ScoringError> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(n, l)| (n + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

        let (header_line, header) = lines.next().ok_or(ScoringError::Parse {
            line: 0,
            message: "matrix file has no header row".into(),
        })?;
        let symbols = header
            .split_whitespace()
            .map(|t| single_symbol(t).map(|c| c.to_ascii_uppercase()))
            .collect::<Option<Vec<char>>>()
            .ok_or_else(|| ScoringError::Parse {
                line: header_line,
                message: "header symbols must be single characters".into(),
            })?;
        let n = symbols.len();
        let column_of: HashMap<char, usize> =
            symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();

        let mut scores = vec![0.0; n * n];
        let mut seen = vec![false; n];
        for (line, row) in lines {
            let mut tokens = row.split_whitespace();
            let row_token = tokens.next().unwrap_or_default();
            let row_idx = single_symbol(row_token)
                .and_then(|c| column_of.get(&c.to_ascii_uppercase()).copied())
                .ok_or_else(|| ScoringError::Parse {
                    line,
                    message: format!("row symbol '{row_token}' is not in the header"),
                })?;
            let values = tokens
                .map(|t| t.parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ScoringError::Parse {
                    line,
                    message: e.to_string(),
                })?;
            if values.len() != n {
                return Err(ScoringError::Parse {
                    line,
                    message: format!("expected {} scores, found {}", n, values.len()),
                });
            }
            scores[row_idx * n..(row_idx + 1) * n].copy_from_slice(&values);
            seen[row_idx] = true;
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(ScoringError::Parse {
                line: header_line,
                message: format!("no row for symbol '{}'", symbols[missing]),
            });
        }

        Ok(Self::from_table(name, symbols, scores))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Row/column index of a symbol, falling back to `X`.
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        let upper = symbol.to_ascii_uppercase();
        self.index
            .get(&upper)
            .or_else(|| self.index.get(&UNKNOWN_RESIDUE))
            .copied()
    }

    /// Maps a whole sequence to matrix indices.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::UnknownSymbol`] for a symbol the matrix cannot
    /// score, which only happens for matrices without an `X` row.
    pub fn encode(&self, sequence: &str) -> Result<Vec<usize>, ScoringError> {
        sequence
            .chars()
            .map(|c| self.index_of(c).ok_or(ScoringError::UnknownSymbol(c)))
            .collect()
    }

    pub fn score_indices(&self, a: usize, b: usize) -> f64 {
        self.scores[a * self.symbols.len() + b]
    }

    pub fn score(&self, a: char, b: char) -> Option<f64> {
        Some(self.score_indices(self.index_of(a)?, self.index_of(b)?))
    }
}

fn single_symbol(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
