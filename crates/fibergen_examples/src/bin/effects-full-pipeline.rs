use fibergen::prelude::*;
use fibergen_examples::{init_tracing, save_gray_png};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Every post-processing effect enabled, applied in the fixed order
    // distance -> noise -> blur -> scale bar -> downsample.
    let config = ImageConfig::new(640, 640)
        .with_n_fibers(25)
        .with_segment_length(10.0)
        .with_alignment(0.6)
        .with_mean_angle(45.0)
        .with_edge_buffer(32)
        .with_length_distribution(Distribution::gaussian(180.0, 60.0, 40.0, 400.0))
        .with_width_distribution(Distribution::gaussian(4.0, 1.0, 1.0, 9.0))
        .with_straightness_distribution(Distribution::uniform(0.85, 1.0, 0.0, 1.0))
        .with_distance(12.0)
        .with_noise(8.0)
        .with_blur(2.5)
        .with_scale(1.5)
        .with_down_sample(0.75);

    let mut rng = StdRng::seed_from_u64(42);
    let image = synthesize(config, &mut rng)?;

    save_gray_png(image.raster(), "effects-full-pipeline.png")?;
    Ok(())
}
