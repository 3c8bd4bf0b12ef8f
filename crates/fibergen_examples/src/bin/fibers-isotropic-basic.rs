use fibergen::prelude::*;
use fibergen_examples::{init_tracing, save_gray_png};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Alignment 0 gives an isotropic population: directions uniform modulo pi.
    // An odd fiber count keeps the zero-resultant direction chain away from
    // the identical-circles degenerate bridge.
    let config = ImageConfig::new(512, 512)
        .with_n_fibers(39)
        .with_segment_length(8.0)
        .with_alignment(0.0)
        .with_edge_buffer(24)
        .with_length_distribution(Distribution::uniform(60.0, 220.0, 0.0, f64::INFINITY))
        .with_width_distribution(Distribution::gaussian(3.0, 0.8, 0.5, 8.0))
        .with_straightness_distribution(Distribution::uniform(0.85, 1.0, 0.0, 1.0));

    let mut rng = StdRng::seed_from_u64(2025);
    let image = synthesize(config, &mut rng)?;

    save_gray_png(image.raster(), "fibers-isotropic-basic.png")?;
    Ok(())
}
