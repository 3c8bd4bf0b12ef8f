use fibergen::prelude::*;
use fibergen_examples::{init_tracing, save_gray_png};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A strongly aligned population at a fixed mean angle; compare with the
    // isotropic example to see the doubled-angle resultant at work.
    let base = ImageConfig::new(512, 512)
        .with_n_fibers(40)
        .with_segment_length(8.0)
        .with_mean_angle(30.0)
        .with_edge_buffer(24)
        .with_length_distribution(Distribution::uniform(80.0, 260.0, 0.0, f64::INFINITY))
        .with_width_distribution(Distribution::uniform(2.0, 5.0, 0.0, f64::INFINITY))
        .with_straightness_distribution(Distribution::uniform(0.9, 1.0, 0.0, 1.0));

    for (alignment, name) in [
        (0.95, "fibers-aligned-mean-angle-095.png"),
        (0.5, "fibers-aligned-mean-angle-050.png"),
    ] {
        let mut rng = StdRng::seed_from_u64(7);
        let image = synthesize(base.clone().with_alignment(alignment), &mut rng)?;
        save_gray_png(image.raster(), name)?;
    }
    Ok(())
}
