use nalgebra::Point3;
use std::f64::consts::PI;

/// Angle in radians at `b` formed by `a-b-c`, or `None` when either arm is degenerate.
pub fn virtual_bond_angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<f64> {
    let ba = a - b;
    let bc = c - b;
    let norms = ba.norm() * bc.norm();
    if norms < 1e-9 {
        return None;
    }
    let cos = (ba.dot(&bc) / norms).clamp(-1.0, 1.0);
    Some(cos.acos())
}

/// Straightness of a CA trace at `b`, from 0 (fully folded back) to 1 (collinear).
pub fn straightness(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<f64> {
    virtual_bond_angle(a, b, c).map(|angle| angle / PI)
}

/// Number of points in `others` within `cutoff` of `center`, excluding indices in `skip`.
pub fn count_within<F>(center: &Point3<f64>, others: &[Point3<f64>], cutoff: f64, skip: F) -> usize
where
    F: Fn(usize) -> bool,
{
    let cutoff_sq = cutoff * cutoff;
    others
        .iter()
        .enumerate()
        .filter(|(idx, p)| !skip(*idx) && (*p - center).norm_squared() < cutoff_sq)
        .count()
}
