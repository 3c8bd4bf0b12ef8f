//! Fiber population synthesis and the raster pipeline.
//!
//! A [`FiberImage`] runs forward through four stages: generate fibers, smooth,
//! rasterize, apply effects. There are no backward transitions; a new image is
//! a fresh instance.
use glam::DVec2;
use rand::rand_core::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::fiber::{Fiber, FiberSpec};
use crate::geom::random_chain;
use crate::rng::random_range;

pub mod draw;
pub mod filters;
pub mod raster;

pub(crate) mod scalebar;

pub use raster::GrayRaster;

/// Parameters for one image. Effect fields are `Some(magnitude)` when the
/// effect is enabled.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageConfig {
    /// Number of fibers to generate.
    pub n_fibers: usize,
    /// Length in pixels of fiber segments.
    pub segment_length: f64,
    /// How close fibers are to the mean angle on average, 0 = isotropic,
    /// 1 = all parallel. Defined modulo pi: a fiber has no arrowhead.
    pub alignment: f64,
    /// Average fiber angle in degrees.
    pub mean_angle: f64,
    /// Maximum segment-to-segment width change of a fiber, in pixels.
    pub width_change: f64,
    /// Image width in pixels.
    pub image_width: usize,
    /// Image height in pixels.
    pub image_height: usize,
    /// Size of the empty border around the edge of the image, in pixels.
    pub edge_buffer: usize,
    /// Distribution of fiber end-to-end lengths, in pixels.
    pub length: Distribution,
    /// Distribution of fiber starting widths, in pixels.
    pub width: Distribution,
    /// Distribution of fiber straightness ratios.
    pub straightness: Distribution,
    /// Fixed generator seed for reproducible runs.
    pub seed: Option<u64>,
    /// Scale bar overlay, in pixels per micron.
    pub scale: Option<f64>,
    /// Downsampling ratio of final size to original size.
    pub down_sample: Option<f64>,
    /// Gaussian blur radius, in pixels.
    pub blur: Option<f64>,
    /// Poisson noise mean, on a 0-255 scale.
    pub noise: Option<f64>,
    /// Distance-filter intensity falloff per pixel.
    pub distance: Option<f64>,
    /// Bubble smoothing pass count.
    pub bubble: Option<usize>,
    /// Swap smoothing ratio of swaps to segment count.
    pub swap: Option<usize>,
    /// Spline smoothing interpolated points per segment.
    pub spline: Option<usize>,
}

impl ImageConfig {
    /// Create a config with the given raster size and neutral defaults: a
    /// moderately aligned population with all effects disabled.
    pub fn new(image_width: usize, image_height: usize) -> Self {
        Self {
            n_fibers: 15,
            segment_length: 10.0,
            alignment: 0.5,
            mean_angle: 0.0,
            width_change: 0.5,
            image_width,
            image_height,
            edge_buffer: 32,
            length: Distribution::uniform(20.0, 200.0, 0.0, f64::INFINITY),
            width: Distribution::uniform(1.0, 5.0, 0.0, f64::INFINITY),
            straightness: Distribution::uniform(0.8, 1.0, 0.0, 1.0),
            seed: None,
            scale: None,
            down_sample: None,
            blur: None,
            noise: None,
            distance: None,
            bubble: None,
            swap: None,
            spline: None,
        }
    }

    pub fn with_n_fibers(mut self, n_fibers: usize) -> Self {
        self.n_fibers = n_fibers;
        self
    }

    pub fn with_segment_length(mut self, segment_length: f64) -> Self {
        self.segment_length = segment_length;
        self
    }

    pub fn with_alignment(mut self, alignment: f64) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_mean_angle(mut self, mean_angle: f64) -> Self {
        self.mean_angle = mean_angle;
        self
    }

    pub fn with_width_change(mut self, width_change: f64) -> Self {
        self.width_change = width_change;
        self
    }

    pub fn with_edge_buffer(mut self, edge_buffer: usize) -> Self {
        self.edge_buffer = edge_buffer;
        self
    }

    pub fn with_length_distribution(mut self, length: Distribution) -> Self {
        self.length = length;
        self
    }

    pub fn with_width_distribution(mut self, width: Distribution) -> Self {
        self.width = width;
        self
    }

    pub fn with_straightness_distribution(mut self, straightness: Distribution) -> Self {
        self.straightness = straightness;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_scale(mut self, pixels_per_micron: f64) -> Self {
        self.scale = Some(pixels_per_micron);
        self
    }

    pub fn with_down_sample(mut self, ratio: f64) -> Self {
        self.down_sample = Some(ratio);
        self
    }

    pub fn with_blur(mut self, radius: f64) -> Self {
        self.blur = Some(radius);
        self
    }

    pub fn with_noise(mut self, mean: f64) -> Self {
        self.noise = Some(mean);
        self
    }

    pub fn with_distance(mut self, falloff: f64) -> Self {
        self.distance = Some(falloff);
        self
    }

    pub fn with_bubble(mut self, passes: usize) -> Self {
        self.bubble = Some(passes);
        self
    }

    pub fn with_swap(mut self, ratio: usize) -> Self {
        self.swap = Some(ratio);
        self
    }

    pub fn with_spline(mut self, ratio: usize) -> Self {
        self.spline = Some(ratio);
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.n_fibers == 0 {
            return Err(Error::InvalidConfig("n_fibers must be > 0".into()));
        }
        if self.segment_length <= 0.0 {
            return Err(Error::InvalidConfig("segment_length must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.alignment) {
            return Err(Error::InvalidConfig("alignment must be in [0, 1]".into()));
        }
        if self.width_change < 0.0 {
            return Err(Error::InvalidConfig("width_change must be >= 0".into()));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(Error::InvalidConfig(
                "image dimensions must be > 0 in both components".into(),
            ));
        }
        if self.scale.is_some_and(|v| v <= 0.0) {
            return Err(Error::InvalidConfig("scale must be > 0".into()));
        }
        if self.down_sample.is_some_and(|v| v <= 0.0) {
            return Err(Error::InvalidConfig("down_sample must be > 0".into()));
        }
        if self.blur.is_some_and(|v| v <= 0.0) {
            return Err(Error::InvalidConfig("blur must be > 0".into()));
        }
        if self.noise.is_some_and(|v| v < 0.0) {
            return Err(Error::InvalidConfig("noise must be >= 0".into()));
        }
        if self.distance.is_some_and(|v| v <= 0.0) {
            return Err(Error::InvalidConfig("distance must be > 0".into()));
        }
        Ok(())
    }
}

/// A population of fibers and the raster they render into.
#[derive(Debug, Clone)]
pub struct FiberImage {
    config: ImageConfig,
    fibers: Vec<Fiber>,
    raster: GrayRaster,
}

impl FiberImage {
    pub fn try_new(config: ImageConfig) -> Result<Self> {
        config.validate()?;
        let raster = GrayRaster::new(config.image_width, config.image_height);
        Ok(Self {
            config,
            fibers: Vec::new(),
            raster,
        })
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    pub fn fibers(&self) -> &[Fiber] {
        &self.fibers
    }

    pub fn raster(&self) -> &GrayRaster {
        &self.raster
    }

    pub fn into_raster(self) -> GrayRaster {
        self.raster
    }

    /// Generate the fiber population: directions with the configured
    /// alignment and mean angle, attributes drawn per fiber, placement inside
    /// the buffered image bounds.
    pub fn generate_fibers(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        let directions = self.generate_directions(rng)?;

        self.fibers = Vec::with_capacity(directions.len());
        for direction in directions {
            let n_segments = (self.config.length.sample(rng) / self.config.segment_length).round();
            let straightness = self.config.straightness.sample(rng);
            let start_width = self.config.width.sample(rng);

            let n_segments = n_segments.max(0.0) as usize;
            let end_distance = n_segments as f64 * self.config.segment_length * straightness;
            let start = self.find_fiber_start(end_distance, direction, rng);

            let spec = FiberSpec {
                n_segments,
                segment_length: self.config.segment_length,
                straightness,
                start_width,
                width_change: self.config.width_change,
                start,
                end: start + direction * end_distance,
            };
            self.fibers.push(Fiber::generate(&spec, rng)?);
        }

        info!(n_fibers = self.fibers.len(), "generated fiber population");
        Ok(())
    }

    /// Apply the configured smoothing passes to every fiber, in the fixed
    /// order bubble, swap, spline.
    pub fn smooth(&mut self, rng: &mut dyn RngCore) {
        for fiber in &mut self.fibers {
            if let Some(passes) = self.config.bubble {
                fiber.bubble_smooth(passes);
            }
            if let Some(ratio) = self.config.swap {
                fiber.swap_smooth(ratio, rng);
            }
            if let Some(ratio) = self.config.spline {
                fiber.spline_smooth(ratio);
            }
        }
    }

    /// Rasterize every fiber's segments as round-capped, round-joined strokes
    /// of the segment's width, antialiasing disabled.
    pub fn draw_fibers(&mut self) {
        for fiber in &self.fibers {
            draw::draw_fiber(&mut self.raster, fiber);
        }
        info!(
            foreground = self.raster.foreground_count(),
            "rasterized fibers"
        );
    }

    /// Apply the enabled effects in the fixed order distance transform,
    /// noise, blur, scale bar, downsample.
    pub fn apply_effects(&mut self, rng: &mut dyn RngCore) {
        if let Some(falloff) = self.config.distance {
            self.raster = filters::distance_transform(&self.raster, falloff);
        }
        if let Some(mean) = self.config.noise {
            filters::add_noise(&mut self.raster, mean, rng);
        }
        if let Some(radius) = self.config.blur {
            self.raster = filters::gaussian_blur(&self.raster, radius);
        }
        if let Some(pixels_per_micron) = self.config.scale {
            scalebar::draw_scale_bar(&mut self.raster, pixels_per_micron);
        }
        if let Some(ratio) = self.config.down_sample {
            self.raster = filters::scale(&self.raster, ratio);
        }
    }

    /// Per-fiber unit directions whose doubled-angle resultant has magnitude
    /// `alignment * n_fibers` and the configured mean angle.
    ///
    /// Directions live in doubled-angle space so the +-pi ambiguity of fiber
    /// orientation cancels: a constrained chain of unit steps from the origin
    /// to the target resultant yields unit deltas whose angles, halved, give
    /// the fiber directions.
    fn generate_directions(&self, rng: &mut dyn RngCore) -> Result<Vec<DVec2>> {
        // Negated because raster y grows downward.
        let sum_angle = -self.config.mean_angle.to_radians();
        let sum_direction = DVec2::new((2.0 * sum_angle).cos(), (2.0 * sum_angle).sin());
        let sum = sum_direction * (self.config.alignment * self.config.n_fibers as f64);

        let chain = random_chain(DVec2::ZERO, sum, self.config.n_fibers, 1.0, rng)?;
        Ok(chain
            .windows(2)
            .map(|pair| {
                let delta = pair[1] - pair[0];
                let angle = delta.y.atan2(delta.x) / 2.0;
                DVec2::new(angle.cos(), angle.sin())
            })
            .collect())
    }

    fn find_fiber_start(&self, length: f64, direction: DVec2, rng: &mut dyn RngCore) -> DVec2 {
        let direction = direction.normalize_or_zero();
        let x = find_start(
            direction.x * length,
            self.config.image_width,
            self.config.edge_buffer,
            rng,
        );
        let y = find_start(
            direction.y * length,
            self.config.image_height,
            self.config.edge_buffer,
            rng,
        );
        DVec2::new(x, y)
    }
}

/// Pick a start coordinate along one axis so a fiber spanning `length` fits
/// inside the buffered `[0, dimension]` range when possible. A fiber larger
/// than the whole dimension falls back to an unconstrained position.
fn find_start(length: f64, dimension: usize, buffer: usize, rng: &mut dyn RngCore) -> f64 {
    let dimension = dimension as f64;
    let mut buffer = (length / 2.0).max(buffer as f64);

    if length.abs() > dimension {
        warn!(
            span = length.abs(),
            dimension, "fiber span exceeds the image; placing without edge buffer"
        );
        let min = (dimension - length).min(dimension);
        let max = (-length).max(0.0);
        return random_range(rng, min, max);
    }

    if length.abs() > dimension - 2.0 * buffer {
        buffer = 0.0;
    }
    let min = buffer.max(buffer - length);
    let max = (dimension - buffer - length).min(dimension - buffer);
    random_range(rng, min, max)
}

/// Run the whole pipeline for one image: generate, smooth, rasterize, apply
/// effects.
pub fn synthesize(config: ImageConfig, rng: &mut dyn RngCore) -> Result<FiberImage> {
    let mut image = FiberImage::try_new(config)?;
    image.generate_fibers(rng)?;
    image.smooth(rng);
    image.draw_fibers();
    image.apply_effects(rng);
    Ok(image)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn test_config() -> ImageConfig {
        ImageConfig::new(256, 256)
            .with_n_fibers(10)
            .with_segment_length(5.0)
            .with_alignment(0.8)
            .with_mean_angle(70.0)
            .with_width_change(0.5)
            .with_edge_buffer(16)
            .with_length_distribution(Distribution::uniform(20.0, 100.0, 0.0, f64::INFINITY))
            .with_width_distribution(Distribution::uniform(1.0, 5.0, 0.0, f64::INFINITY))
            .with_straightness_distribution(Distribution::uniform(0.7, 1.0, 0.0, 1.0))
    }

    /// Mean of doubled-angle unit vectors over the population.
    fn complex_mean(image: &FiberImage) -> DVec2 {
        let mut sum = DVec2::ZERO;
        for fiber in image.fibers() {
            let theta = fiber.direction().y.atan2(fiber.direction().x);
            sum += DVec2::new((2.0 * theta).cos(), (2.0 * theta).sin());
        }
        sum / image.fibers().len() as f64
    }

    #[test]
    fn population_alignment_matches_config() {
        let mut rng = StdRng::seed_from_u64(61);
        let mut image = FiberImage::try_new(test_config()).unwrap();
        image.generate_fibers(&mut rng).unwrap();
        assert!((complex_mean(&image).length() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn population_mean_angle_matches_config() {
        let mut rng = StdRng::seed_from_u64(62);
        let mut image = FiberImage::try_new(test_config()).unwrap();
        image.generate_fibers(&mut rng).unwrap();
        let mean = complex_mean(&image);
        let mean_angle = -mean.y.atan2(mean.x) * 90.0 / std::f64::consts::PI;
        assert!((mean_angle - 70.0).abs() < 1e-6);
    }

    #[test]
    fn raster_keeps_configured_dimensions() {
        let mut rng = StdRng::seed_from_u64(63);
        let mut image = FiberImage::try_new(test_config()).unwrap();
        image.generate_fibers(&mut rng).unwrap();
        image.draw_fibers();
        assert_eq!(image.raster().size(), (256, 256));
        assert!(image.raster().foreground_count() > 0);
    }

    #[test]
    fn down_sample_shrinks_the_raster() {
        let mut rng = StdRng::seed_from_u64(64);
        let config = test_config().with_down_sample(0.625);
        let mut image = FiberImage::try_new(config).unwrap();
        image.generate_fibers(&mut rng).unwrap();
        image.draw_fibers();
        image.apply_effects(&mut rng);
        assert_eq!(image.raster().size(), (160, 160));
    }

    #[test]
    fn full_pipeline_with_all_effects_runs() {
        let mut rng = StdRng::seed_from_u64(65);
        let config = test_config()
            .with_scale(2.0)
            .with_down_sample(0.5)
            .with_blur(2.0)
            .with_noise(5.0)
            .with_distance(10.0)
            .with_bubble(3)
            .with_swap(2)
            .with_spline(2);
        let image = synthesize(config, &mut rng).unwrap();
        assert_eq!(image.raster().size(), (128, 128));
        assert!(image.raster().foreground_count() > 0);
    }

    #[test]
    fn fixed_seed_reproduces_geometry_and_raster() {
        let config = test_config().with_noise(5.0).with_blur(1.5);

        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);
        let a = synthesize(config.clone(), &mut rng_a).unwrap();
        let b = synthesize(config, &mut rng_b).unwrap();

        assert_eq!(a.fibers(), b.fibers());
        assert_eq!(a.raster(), b.raster());
    }

    #[test]
    fn different_seeds_differ() {
        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(2);
        let a = synthesize(test_config(), &mut rng_a).unwrap();
        let b = synthesize(test_config(), &mut rng_b).unwrap();
        assert_ne!(a.raster(), b.raster());
    }

    #[test]
    fn oversized_fibers_still_place() {
        let mut rng = StdRng::seed_from_u64(66);
        let config = ImageConfig::new(64, 64)
            .with_n_fibers(3)
            .with_segment_length(10.0)
            .with_length_distribution(Distribution::uniform(300.0, 400.0, 0.0, f64::INFINITY))
            .with_straightness_distribution(Distribution::uniform(0.95, 1.0, 0.0, 1.0));
        let mut image = FiberImage::try_new(config).unwrap();
        image.generate_fibers(&mut rng).unwrap();
        assert_eq!(image.fibers().len(), 3);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(ImageConfig::new(0, 256).validate().is_err());
        assert!(ImageConfig::new(256, 256)
            .with_n_fibers(0)
            .validate()
            .is_err());
        assert!(ImageConfig::new(256, 256)
            .with_alignment(1.5)
            .validate()
            .is_err());
        assert!(ImageConfig::new(256, 256)
            .with_down_sample(0.0)
            .validate()
            .is_err());
    }
}
