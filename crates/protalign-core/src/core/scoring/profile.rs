use crate::core::alphabet::{ALPHABET_SIZE, PROFILE_WIDTH};

/// Sum of `f1(t)·f2(t)` over the 20 residue types; gap frequencies are ignored.
pub fn dot_product(a: &[f64; PROFILE_WIDTH], b: &[f64; PROFILE_WIDTH]) -> f64 {
    a.iter().zip(b).take(ALPHABET_SIZE).map(|(x, y)| x * y).sum()
}

/// Centres a column's residue frequencies and scales them to unit length.
///
/// Returns `None` when all 20 frequencies are equal.
pub fn centered_unit(column: &[f64; PROFILE_WIDTH]) -> Option<[f64; ALPHABET_SIZE]> {
    let mean = column[..ALPHABET_SIZE].iter().sum::<f64>() / ALPHABET_SIZE as f64;
    let mut centered = [0.0; ALPHABET_SIZE];
    for (c, f) in centered.iter_mut().zip(&column[..ALPHABET_SIZE]) {
        *c = f - mean;
    }
    let norm = centered.iter().map(|c| c * c).sum::<f64>().sqrt();
    if norm < 1e-12 {
        return None;
    }
    for c in centered.iter_mut() {
        *c /= norm;
    }
    Some(centered)
}

/// Pearson correlation of two columns already passed through [`centered_unit`].
pub fn correlation(a: &[f64; ALPHABET_SIZE], b: &[f64; ALPHABET_SIZE]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
