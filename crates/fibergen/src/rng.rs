//! Random draw helpers shared by the geometry and image pipelines.
//!
//! Every stochastic function in this crate takes an explicit [`RngCore`]
//! handle; seeding happens once at the call site. Draw order is part of the
//! reproducibility contract, so helpers consume a fixed number of words per
//! call (Gaussian draws always burn two uniforms, no caching).
use std::f64::consts::PI;

use glam::DVec2;
use rand::rand_core::RngCore;

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    // 53 significant bits, the standard u64-to-f64 mapping.
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Uniform draw in `[min, max)`. Returns `min` when the range is empty.
#[inline]
pub(crate) fn random_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    debug_assert!(min <= max, "random bounds are inverted");
    min + rand01(rng) * (max - min)
}

/// Uniform point in the axis-aligned box `[x_min, x_max) x [y_min, y_max)`.
pub(crate) fn random_point(
    rng: &mut dyn RngCore,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) -> DVec2 {
    let x = random_range(rng, x_min, x_max);
    let y = random_range(rng, y_min, y_max);
    DVec2::new(x, y)
}

/// Uniform index in `[0, len)`.
#[inline]
pub(crate) fn random_index(rng: &mut dyn RngCore, len: usize) -> usize {
    debug_assert!(len > 0, "random index range must be nonempty");
    ((rand01(rng) * len as f64) as usize).min(len - 1)
}

/// Standard normal draw via the Box-Muller transform.
pub(crate) fn gaussian(rng: &mut dyn RngCore) -> f64 {
    let u1 = (1.0 - rand01(rng)).clamp(f64::MIN_POSITIVE, 1.0);
    let u2 = rand01(rng);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Poisson draw using Knuth's product-of-uniforms method.
pub(crate) fn poisson(lambda: f64, rng: &mut dyn RngCore) -> u32 {
    if !lambda.is_finite() || lambda <= 0.0 {
        return 0;
    }

    let l = (-lambda).exp();
    let mut k: u32 = 0;
    let mut p: f64 = 1.0;

    loop {
        k += 1;
        p *= rand01(rng);
        if p <= l {
            return k - 1;
        }

        if k > 10_000_000 {
            return k - 1;
        }
    }
}
