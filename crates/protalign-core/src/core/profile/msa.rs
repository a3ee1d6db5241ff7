use super::ProfileError;
use crate::core::alphabet;

/// A multiple alignment of one target row and any number of template rows.
///
/// All rows share the same length; `-` and `.` are gaps. Rows are stored
/// upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleAlignment {
    rows: Vec<Vec<char>>,
    spans: Vec<Option<(usize, usize)>>,
}

impl MultipleAlignment {
    /// Builds an alignment from a target row and its template rows.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::EmptyAlignment`] if the target row is empty or
    /// only gaps, and [`ProfileError::LengthMismatch`] if any template row has
    /// a different length from the target.
    pub fn new<S: AsRef<str>>(target: &str, templates: &[S]) -> Result<Self, ProfileError> {
        let target_row: Vec<char> = target.chars().map(|c| c.to_ascii_uppercase()).collect();
        if target_row.iter().all(|&c| alphabet::is_gap(c)) {
            return Err(ProfileError::EmptyAlignment);
        }

        let mut rows = vec![target_row];
        for (idx, template) in templates.iter().enumerate() {
            let row: Vec<char> = template
                .as_ref()
                .chars()
                .map(|c| c.to_ascii_uppercase())
                .collect();
            if row.len() != rows[0].len() {
                return Err(ProfileError::LengthMismatch {
                    row: idx + 1,
                    expected: rows[0].len(),
                    found: row.len(),
                });
            }
            rows.push(row);
        }

        let spans = rows.iter().map(|row| non_gap_span(row)).collect();
        Ok(Self { rows, spans })
    }

    /// Number of alignment columns.
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    /// Number of rows, target included.
    pub fn num_sequences(&self) -> usize {
        self.rows.len()
    }

    pub fn symbol(&self, row: usize, column: usize) -> char {
        self.rows[row][column]
    }

    pub fn row(&self, row: usize) -> &[char] {
        &self.rows[row]
    }

    /// First and last non-gap column of a row, or `None` for an all-gap row.
    pub fn span(&self, row: usize) -> Option<(usize, usize)> {
        self.spans[row]
    }

    /// The target row with its gaps removed.
    pub fn target_sequence(&self) -> String {
        self.rows[0]
            .iter()
            .filter(|&&c| !alphabet::is_gap(c))
            .collect()
    }
}

fn non_gap_span(row: &[char]) -> Option<(usize, usize)> {
    let first = row.iter().position(|&c| !alphabet::is_gap(c))?;
    let last = row.iter().rposition(|&c| !alphabet::is_gap(c))?;
    Some((first, last))
}
