//! Geometric primitives backing the constrained random-walk generator.
//!
//! Bridging a chain means sampling a point that is simultaneously reachable
//! from two fixed neighbors, which reduces to intersection queries on circles
//! and disks.
use glam::DVec2;

pub mod chain;
pub mod circle;

pub use chain::random_chain;
pub use circle::Circle;

/// Unsigned angle between two nonzero vectors, in `[0, pi]`.
pub(crate) fn angle_between(a: DVec2, b: DVec2) -> f64 {
    debug_assert!(
        a != DVec2::ZERO && b != DVec2::ZERO,
        "cannot compute angle with a zero vector"
    );
    let cos = a.normalize().dot(b.normalize()).clamp(-1.0, 1.0);
    cos.acos()
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn angle_between_is_unsigned() {
        let right = DVec2::new(1.0, 0.0);
        let up = DVec2::new(0.0, 2.0);
        let down = DVec2::new(0.0, -2.0);
        assert!((angle_between(right, up) - PI / 2.0).abs() < 1e-12);
        assert!((angle_between(right, down) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn angle_between_opposite_vectors_is_pi() {
        let a = DVec2::new(3.0, 1.0);
        assert!((angle_between(a, -a) - PI).abs() < 1e-12);
    }

    #[test]
    fn angle_between_parallel_vectors_is_zero() {
        let a = DVec2::new(0.3, -0.4);
        assert!(angle_between(a, a * 5.0) < 1e-7);
    }
}
