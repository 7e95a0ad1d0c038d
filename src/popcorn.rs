//! Point-set generator for Thomae's ("popcorn") function.
//!
//! For every reduced-or-not fraction j/i with 2 <= i <= depth and 1 <= j < i
//! the generator emits the point (j/i, 1/i). Duplicates are intentional
//! (1/2 reappears for every even i); the overdraw is invisible and keeping
//! the raw sequence makes the output a pure function of `depth`.

use crate::error::{PeaklineError, PeaklineResult};

/// Depth used by the logo composition.
pub const LOGO_DEPTH: u32 = 110;

/// Generate the popcorn point cloud up to `depth`.
///
/// Returns points in generation order: for each denominator i ascending,
/// numerators j = 1..i ascending. The first emitted point is the apex dot
/// (1/2, 1/2), which the composer drops because it belongs to neither
/// mountain.
pub fn popcorn(depth: u32) -> PeaklineResult<Vec<(f64, f64)>> {
    if depth < 2 {
        return Err(PeaklineError::configuration(format!(
            "popcorn depth must be >= 2 (got {depth})"
        )));
    }

    let count: usize = (2..=depth).map(|i| (i - 1) as usize).sum();
    let mut points = Vec::with_capacity(count);
    for i in 2..=depth {
        let inv = 1.0 / f64::from(i);
        for j in 1..i {
            points.push((f64::from(j) * inv, inv));
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_depth_below_two() {
        assert!(popcorn(0).is_err());
        assert!(popcorn(1).is_err());
    }

    #[test]
    fn point_count_is_triangular() {
        for depth in [2u32, 3, 7, 50, 110] {
            let expected: usize = (2..=depth).map(|i| (i - 1) as usize).sum();
            assert_eq!(popcorn(depth).unwrap().len(), expected);
        }
    }

    #[test]
    fn y_is_reciprocal_of_generating_denominator() {
        let pts = popcorn(9).unwrap();
        let mut k = 0;
        for i in 2..=9u32 {
            for j in 1..i {
                let (x, y) = pts[k];
                assert!((y - 1.0 / f64::from(i)).abs() < 1e-15);
                assert!((x - f64::from(j) / f64::from(i)).abs() < 1e-15);
                k += 1;
            }
        }
    }

    #[test]
    fn x_strictly_inside_unit_interval() {
        for (x, _) in popcorn(110).unwrap() {
            assert!(x > 0.0 && x < 1.0);
        }
    }

    #[test]
    fn first_point_is_the_apex_dot() {
        let pts = popcorn(110).unwrap();
        assert_eq!(pts[0], (0.5, 0.5));
    }
}
