//! Sequential batch generation of fiber images.
//!
//! A stack runs one seeded generator through every image in order, so the
//! whole batch is reproducible from the config seed. Parallelizing the loop
//! would reorder draws and change output for a given seed; it is deliberately
//! not offered.
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::error::Result;
use crate::image::{synthesize, FiberImage, ImageConfig};

/// A batch of images generated from one configuration.
#[derive(Debug)]
pub struct ImageStack {
    images: Vec<FiberImage>,
}

impl ImageStack {
    /// Generate `n_images` images sequentially, seeding from the config seed
    /// or OS entropy. Fails fast on the first infeasible image; a failed
    /// batch produces no partial output.
    pub fn generate(config: &ImageConfig, n_images: usize) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut images = Vec::with_capacity(n_images);
        for index in 0..n_images {
            let image = synthesize(config.clone(), &mut rng)?;
            info!(index, "generated image");
            images.push(image);
        }
        Ok(Self { images })
    }

    pub fn images(&self) -> &[FiberImage] {
        &self.images
    }

    pub fn into_images(self) -> Vec<FiberImage> {
        self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Distribution;

    fn small_config() -> ImageConfig {
        ImageConfig::new(64, 64)
            .with_n_fibers(4)
            .with_segment_length(5.0)
            .with_edge_buffer(4)
            .with_length_distribution(Distribution::uniform(15.0, 40.0, 0.0, f64::INFINITY))
            .with_width_distribution(Distribution::uniform(1.0, 3.0, 0.0, f64::INFINITY))
            .with_straightness_distribution(Distribution::uniform(0.8, 1.0, 0.0, 1.0))
            .with_seed(7)
    }

    #[test]
    fn generates_the_requested_count() {
        let stack = ImageStack::generate(&small_config(), 3).unwrap();
        assert_eq!(stack.len(), 3);
        for image in stack.images() {
            assert_eq!(image.raster().size(), (64, 64));
        }
    }

    #[test]
    fn seeded_batches_are_reproducible() {
        let a = ImageStack::generate(&small_config(), 2).unwrap();
        let b = ImageStack::generate(&small_config(), 2).unwrap();
        for (left, right) in a.images().iter().zip(b.images()) {
            assert_eq!(left.raster(), right.raster());
            assert_eq!(left.fibers(), right.fibers());
        }
    }

    #[test]
    fn images_within_a_batch_differ() {
        let stack = ImageStack::generate(&small_config(), 2).unwrap();
        assert_ne!(stack.images()[0].raster(), stack.images()[1].raster());
    }

    #[test]
    fn empty_batch_is_fine() {
        let stack = ImageStack::generate(&small_config(), 0).unwrap();
        assert!(stack.is_empty());
    }
}
