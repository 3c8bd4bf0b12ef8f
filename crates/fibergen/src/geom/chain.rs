//! Constrained random walks by recursive midpoint bridging.
//!
//! A naive random walk with a post-hoc rescale biases the path shape, so
//! chains are built by recursively inserting midpoints: each bridge point is
//! sampled from the intersection of the regions reachable from both fixed
//! neighbors in the remaining number of steps.
use glam::DVec2;
use rand::rand_core::RngCore;

use crate::error::{Error, Result};
use crate::geom::circle::{self, Circle, BUFF};
use crate::rng::rand01;

/// Generate `n_steps + 1` points with fixed endpoints where every consecutive
/// pair is exactly `step_length` apart.
///
/// Fails with [`Error::InvalidConfig`] for a non-positive step count or step
/// length, and with [`Error::Infeasible`] when the endpoints are further apart
/// than the chain can span.
pub fn random_chain(
    start: DVec2,
    end: DVec2,
    n_steps: usize,
    step_length: f64,
    rng: &mut dyn RngCore,
) -> Result<Vec<DVec2>> {
    if n_steps == 0 {
        return Err(Error::InvalidConfig(
            "chain must have at least one step".into(),
        ));
    }
    if step_length <= 0.0 {
        return Err(Error::InvalidConfig("step length must be positive".into()));
    }
    let span = start.distance(end);
    if span > n_steps as f64 * step_length + BUFF {
        return Err(Error::Infeasible(format!(
            "endpoints {span} apart cannot be bridged by {n_steps} steps of length {step_length}"
        )));
    }

    let mut points = vec![DVec2::ZERO; n_steps + 1];
    points[0] = start;
    points[n_steps] = end;
    bridge(&mut points, 0, n_steps, step_length, rng)?;
    Ok(points)
}

/// Fill the open index range `(i_start, i_end)` of `points`.
///
/// The midpoint must lie at distance `step_length * (i_bridge - i_start)` from
/// `points[i_start]` and `step_length * (i_end - i_bridge)` from
/// `points[i_end]`. Which intersection query applies depends on whether each
/// neighbor is exactly one step away (point on the circle boundary) or further
/// (point anywhere in the reachable disk).
fn bridge(
    points: &mut [DVec2],
    i_start: usize,
    i_end: usize,
    step_length: f64,
    rng: &mut dyn RngCore,
) -> Result<()> {
    if i_end - i_start <= 1 {
        return Ok(());
    }

    let i_bridge = (i_start + i_end) / 2;
    let circle1 = Circle::new(points[i_start], step_length * (i_bridge - i_start) as f64);
    let circle2 = Circle::new(points[i_end], step_length * (i_end - i_bridge) as f64);

    let bridge_point = if i_bridge > i_start + 1 && i_bridge < i_end - 1 {
        circle::disk_disk_intersect(circle1, circle2, rng)?
    } else if i_bridge == i_start + 1 && i_bridge == i_end - 1 {
        // Random tie-break between the two lobes; a fixed order would bias
        // the path geometry.
        let intersects = circle::circle_circle_intersect(circle1, circle2)?;
        if rand01(rng) < 0.5 {
            intersects[0]
        } else {
            intersects[1]
        }
    } else if i_bridge == i_start + 1 {
        circle::disk_circle_intersect(circle2, circle1, rng)?
    } else {
        circle::disk_circle_intersect(circle1, circle2, rng)?
    };
    points[i_bridge] = bridge_point;

    bridge(points, i_start, i_bridge, step_length, rng)?;
    bridge(points, i_bridge, i_end, step_length, rng)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn links_are_exactly_step_length_apart() {
        let mut rng = StdRng::seed_from_u64(1);
        let n_steps = 23;
        let step = 7.0;
        let start = DVec2::new(0.0, 0.0);
        let end = DVec2::new(-1.0, 1.0).normalize() * (0.7 * n_steps as f64 * step);

        let chain = random_chain(start, end, n_steps, step, &mut rng).unwrap();
        assert_eq!(chain.len(), n_steps + 1);
        assert_eq!(chain[0], start);
        assert_eq!(chain[n_steps], end);
        for pair in chain.windows(2) {
            assert!((pair[1].distance(pair[0]) - step).abs() < 1e-6);
        }
    }

    #[test]
    fn single_step_chain_is_just_the_endpoints() {
        let mut rng = StdRng::seed_from_u64(2);
        let start = DVec2::new(1.0, 1.0);
        let end = DVec2::new(1.0, 4.0);
        let chain = random_chain(start, end, 1, 3.0, &mut rng).unwrap();
        assert_eq!(chain, vec![start, end]);
    }

    #[test]
    fn two_step_chain_bridges_on_both_circles() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = DVec2::new(0.0, 0.0);
        let end = DVec2::new(3.0, 0.0);
        let chain = random_chain(start, end, 2, 2.0, &mut rng).unwrap();
        assert!((chain[1].distance(start) - 2.0).abs() < 1e-9);
        assert!((chain[1].distance(end) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn taut_chain_is_feasible() {
        // Endpoint distance equals n * step exactly; every bridge is a
        // tangent intersection absorbed by the epsilon buffer.
        let mut rng = StdRng::seed_from_u64(4);
        let start = DVec2::new(0.0, 0.0);
        let end = DVec2::new(8.0, 0.0);
        let chain = random_chain(start, end, 4, 2.0, &mut rng).unwrap();
        for pair in chain.windows(2) {
            assert!((pair[1].distance(pair[0]) - 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn invalid_inputs_are_config_errors() {
        let mut rng = StdRng::seed_from_u64(5);
        let start = DVec2::new(0.0, 0.0);
        let end = DVec2::new(10.0, 0.0);
        assert!(matches!(
            random_chain(start, end, 0, 1.0, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            random_chain(start, end, 5, 0.0, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            random_chain(start, end, 5, -7.0, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn unbridgeable_span_is_infeasible() {
        let mut rng = StdRng::seed_from_u64(6);
        let n_steps = 23;
        let step = 7.0;
        let start = DVec2::new(0.0, 0.0);
        let end = DVec2::new(-1.0, 1.0).normalize() * (1.1 * n_steps as f64 * step);
        let err = random_chain(start, end, n_steps, step, &mut rng).unwrap_err();
        assert!(err.is_infeasible());
    }

    #[test]
    fn determinism_for_same_seed() {
        let start = DVec2::new(0.0, 0.0);
        let end = DVec2::new(20.0, 10.0);
        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);
        let a = random_chain(start, end, 32, 1.5, &mut rng_a).unwrap();
        let b = random_chain(start, end, 32, 1.5, &mut rng_b).unwrap();
        assert_eq!(a, b);

        let mut rng_c = StdRng::seed_from_u64(456);
        let c = random_chain(start, end, 32, 1.5, &mut rng_c).unwrap();
        assert_ne!(a, c);
    }
}
