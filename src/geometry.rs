//! Shared geometric helpers and tolerances
//!
//! Every tolerance used when comparing or welding positions lives here so
//! that split-point synthesis and fragment assembly agree on what "the same
//! point" means.

use glam::DVec3;

/// Distance below which two positions are welded into one vertex
///
/// Also the cell size of the welding grid: positions closer than this fall
/// in the same or an adjacent cell, see [`weld_neighborhood`].
pub const WELD_EPSILON: f64 = 1e-9;

/// Length / area / volume below which an edge, face or tetrahedron is
/// treated as degenerate
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// Fraction of an edge kept clear at both ends when placing a split point
///
/// Split weights are clamped to `[SPLIT_MARGIN, 1 - SPLIT_MARGIN]`, so a
/// split point never lands on (or welds onto) a corner of its edge. Faces
/// between a corner and two split points near it keep an area of roughly
/// `(SPLIT_MARGIN * edge length)²`, above [`DEGENERATE_EPSILON`] for edges
/// longer than about `1e-3`.
pub const SPLIT_MARGIN: f64 = 1e-3;

/// Signed volume of the tetrahedron `(a, b, c, d)`
///
/// Positive when `d` lies on the side of triangle `(a, b, c)` its
/// right-handed normal points to.
#[inline]
pub fn signed_tetrahedron_volume(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> f64 {
    (b - a).cross(c - a).dot(d - a) / 6.0
}

/// Unsigned volume of the tetrahedron `(a, b, c, d)`
#[inline]
pub fn tetrahedron_volume(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> f64 {
    signed_tetrahedron_volume(a, b, c, d).abs()
}

/// Unnormalized normal of triangle `(a, b, c)` (twice its area in length)
#[inline]
pub fn face_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    (b - a).cross(c - a)
}

/// Whether triangle `(a, b, c)` has (near) zero area
#[inline]
pub fn is_degenerate_face(a: DVec3, b: DVec3, c: DVec3) -> bool {
    face_normal(a, b, c).length_squared() <= DEGENERATE_EPSILON * DEGENERATE_EPSILON
}

/// Cell of the welding grid containing `p`
#[inline]
pub fn weld_key(p: DVec3) -> [i64; 3] {
    let q = (p / WELD_EPSILON).floor();
    [q.x as i64, q.y as i64, q.z as i64]
}

/// The 27 welding cells around `key`, `key` itself included
///
/// Any position within [`WELD_EPSILON`] of a point in cell `key` lies in one
/// of these cells.
pub fn weld_neighborhood(key: [i64; 3]) -> impl Iterator<Item = [i64; 3]> {
    (-1..=1).flat_map(move |dx| {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| [key[0] + dx, key[1] + dy, key[2] + dz]))
    })
}

/// Average of a set of positions (zero for an empty slice)
pub fn centroid(points: &[DVec3]) -> DVec3 {
    if points.is_empty() {
        return DVec3::ZERO;
    }
    points.iter().copied().sum::<DVec3>() / points.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_tetrahedron_volume() {
        let v = signed_tetrahedron_volume(DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z);
        assert_relative_eq!(v, 1.0 / 6.0, epsilon = 1e-12);

        // Swapping two corners flips the sign only
        let flipped = signed_tetrahedron_volume(DVec3::ZERO, DVec3::Y, DVec3::X, DVec3::Z);
        assert_relative_eq!(flipped, -1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(
            tetrahedron_volume(DVec3::ZERO, DVec3::Y, DVec3::X, DVec3::Z),
            1.0 / 6.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_degenerate_face() {
        assert!(is_degenerate_face(DVec3::ZERO, DVec3::X, DVec3::X * 2.0));
        assert!(!is_degenerate_face(DVec3::ZERO, DVec3::X, DVec3::Y));
    }

    #[test]
    fn test_weld_neighborhood_covers_close_points() {
        let p = DVec3::new(0.25, -1.5, 3.0);
        let cells: Vec<[i64; 3]> = weld_neighborhood(weld_key(p)).collect();
        assert_eq!(cells.len(), 27);
        assert!(cells.contains(&weld_key(p)));

        for offset in [
            DVec3::splat(WELD_EPSILON * 0.1),
            DVec3::splat(-WELD_EPSILON * 0.5),
            DVec3::X * WELD_EPSILON * 0.9,
        ] {
            assert!(cells.contains(&weld_key(p + offset)));
        }
        assert!(!cells.contains(&weld_key(p + DVec3::X * 1e-6)));
    }

    #[test]
    fn test_weld_key_splits_at_cell_boundary() {
        // Closer than the tolerance, but on both sides of a cell boundary
        let below = DVec3::X * (WELD_EPSILON * 0.999);
        let above = DVec3::X * (WELD_EPSILON * 1.001);
        assert_ne!(weld_key(below), weld_key(above));
        assert!(weld_neighborhood(weld_key(below)).any(|cell| cell == weld_key(above)));
    }

    #[test]
    fn test_centroid() {
        let c = centroid(&[DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), DVec3::new(1.0, 3.0, 0.0)]);
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 1.0);
        assert_eq!(centroid(&[]), DVec3::ZERO);
    }
}
