#![forbid(unsafe_code)]
//! fibergen: synthetic fiber image generation for ground-truth test data.
//!
//! Modules:
//! - geom: circle/disk intersection primitives and constrained random-walk chains
//! - distribution: bounded Gaussian/Uniform sampling for fiber attributes
//! - fiber: fiber skeletons with per-segment widths and smoothing passes
//! - image: population synthesis, stroke rasterization, and raster filters
//! - stack: sequential batch generation of images from one seeded generator
//!
//! All randomness flows through an explicitly passed [`rand::RngCore`] handle;
//! a run is reproducible from a single `StdRng::seed_from_u64` seed.
pub mod distribution;
pub mod error;
pub mod fiber;
pub mod geom;
pub mod image;
pub mod stack;

pub(crate) mod rng;

/// Convenient re-exports for common types. Import with `use fibergen::prelude::*;`.
pub mod prelude {
    pub use crate::distribution::Distribution;
    pub use crate::error::{Error, Result};
    pub use crate::fiber::{Fiber, FiberSpec, Segment};
    pub use crate::geom::chain::random_chain;
    pub use crate::geom::circle::Circle;
    pub use crate::image::raster::GrayRaster;
    pub use crate::image::{synthesize, FiberImage, ImageConfig};
    pub use crate::stack::ImageStack;
}
