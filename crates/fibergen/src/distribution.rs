//! Bounded sampling distributions for fiber attributes.
//!
//! A [`Distribution`] is a two-case sum type rather than a trait hierarchy;
//! sampling dispatches with a `match`. Every variant carries an inclusive
//! `[lower, upper]` clamp and never returns a value outside it.
use rand::rand_core::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::rng::{gaussian, random_range};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Distribution {
    /// Normal distribution. The mean need not lie within the clamp; sampling
    /// then draws from the admissible tail by rejection.
    Gaussian {
        mean: f64,
        sigma: f64,
        lower: f64,
        upper: f64,
    },
    /// Uniform over `[min, max)`, narrowed into the clamp at construction.
    Uniform {
        min: f64,
        max: f64,
        lower: f64,
        upper: f64,
    },
}

impl Distribution {
    pub fn gaussian(mean: f64, sigma: f64, lower: f64, upper: f64) -> Self {
        debug_assert!(lower <= upper, "clamp bounds are inverted");
        Self::Gaussian {
            mean,
            sigma,
            lower,
            upper,
        }
    }

    pub fn uniform(min: f64, max: f64, lower: f64, upper: f64) -> Self {
        debug_assert!(lower <= upper, "clamp bounds are inverted");
        let min = min.max(lower);
        let max = max.min(upper);
        debug_assert!(min <= max, "uniform range is empty after clamping");
        Self::Uniform {
            min,
            max,
            lower,
            upper,
        }
    }

    /// The inclusive clamp this distribution never escapes.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::Gaussian { lower, upper, .. } | Self::Uniform { lower, upper, .. } => {
                (lower, upper)
            }
        }
    }

    /// Draw one value. Gaussian variants may consume several uniform pairs if
    /// the clamp sits in a tail of the distribution.
    pub fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        match *self {
            Self::Gaussian {
                mean,
                sigma,
                lower,
                upper,
            } => loop {
                let val = gaussian(rng) * sigma + mean;
                if val >= lower && val <= upper {
                    return val;
                }
            },
            Self::Uniform { min, max, .. } => random_range(rng, min, max),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn gaussian_samples_stay_in_clamp() {
        let mut rng = StdRng::seed_from_u64(8);
        let dist = Distribution::gaussian(2.0, 3.0, 1.0, 5.0);
        for _ in 0..100 {
            let v = dist.sample(&mut rng);
            assert!((1.0..=5.0).contains(&v));
        }
    }

    #[test]
    fn gaussian_in_a_far_tail_still_terminates() {
        let mut rng = StdRng::seed_from_u64(9);
        let dist = Distribution::gaussian(0.0, 1.0, 3.0, 4.0);
        let v = dist.sample(&mut rng);
        assert!((3.0..=4.0).contains(&v));
    }

    #[test]
    fn uniform_samples_inside_declared_range() {
        let mut rng = StdRng::seed_from_u64(10);
        let dist = Distribution::uniform(-8.0, 12.0, -10.0, 17.0);
        for _ in 0..100 {
            let v = dist.sample(&mut rng);
            assert!(v >= -8.0 && v < 12.0);
        }
    }

    #[test]
    fn uniform_narrows_into_clamp_at_construction() {
        let dist = Distribution::uniform(-15.0, 17.5, -10.0, 17.0);
        assert_eq!(
            dist,
            Distribution::Uniform {
                min: -10.0,
                max: 17.0,
                lower: -10.0,
                upper: 17.0,
            }
        );

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let v = dist.sample(&mut rng);
            assert!(v >= -10.0 && v < 17.0);
        }
    }

    #[test]
    fn bounds_are_reported_per_variant() {
        assert_eq!(Distribution::gaussian(0.0, 1.0, -1.0, 1.0).bounds(), (-1.0, 1.0));
        assert_eq!(Distribution::uniform(0.0, 1.0, 0.0, 2.0).bounds(), (0.0, 2.0));
    }

    #[test]
    fn determinism_for_same_seed() {
        let dist = Distribution::gaussian(5.0, 2.0, 0.0, 10.0);
        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);
        let a: Vec<f64> = (0..32).map(|_| dist.sample(&mut rng_a)).collect();
        let b: Vec<f64> = (0..32).map(|_| dist.sample(&mut rng_b)).collect();
        assert_eq!(a, b);
    }
}
