use phf::{Map, phf_map};

/// Number of standard amino-acid residue types.
pub const ALPHABET_SIZE: usize = 20;
/// Column index of the gap state in a profile row.
pub const GAP_INDEX: usize = 20;
/// Width of a profile column: 20 residue types plus the gap state.
pub const PROFILE_WIDTH: usize = ALPHABET_SIZE + 1;

pub const GAP_CHAR: char = '-';
pub const UNKNOWN_RESIDUE: char = 'X';

/// Residue letters in canonical (NCBI matrix) order.
pub const RESIDUES: [char; ALPHABET_SIZE] = [
    'A', 'R', 'N', 'D', 'C', 'Q', 'E', 'G', 'H', 'I', 'L', 'K', 'M', 'F', 'P', 'S', 'T', 'W',
    'Y', 'V',
];

static RESIDUE_INDICES: Map<char, usize> = phf_map! {
    'A' => 0, 'R' => 1, 'N' => 2, 'D' => 3, 'C' => 4,
    'Q' => 5, 'E' => 6, 'G' => 7, 'H' => 8, 'I' => 9,
    'L' => 10, 'K' => 11, 'M' => 12, 'F' => 13, 'P' => 14,
    'S' => 15, 'T' => 16, 'W' => 17, 'Y' => 18, 'V' => 19,
};

static THREE_LETTER_CODES: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    "HSE" => 'H', "HSD" => 'H', "HSP" => 'H', "HID" => 'H', "HIE" => 'H', "HIP" => 'H',
    "MSE" => 'M', "CYX" => 'C', "ASX" => 'B', "GLX" => 'Z',
};

/// Returns the 0-based alphabet index of a residue letter, case-insensitively.
///
/// Gaps, ambiguity codes and unknown residues have no index.
pub fn residue_index(symbol: char) -> Option<usize> {
    RESIDUE_INDICES.get(&symbol.to_ascii_uppercase()).copied()
}

pub fn is_gap(symbol: char) -> bool {
    matches!(symbol, '-' | '.')
}

/// Maps a three-letter residue name to its one-letter code; unrecognised names map to `X`.
pub fn one_letter_code(residue_name: &str) -> char {
    THREE_LETTER_CODES
        .get(residue_name.trim().to_ascii_uppercase().as_str())
        .copied()
        .unwrap_or(UNKNOWN_RESIDUE)
}
