use fibergen::prelude::*;
use fibergen_examples::{init_tracing, save_gray_png};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // The same seed rendered raw and with each smoothing pass, to compare
    // their effect on fiber texture.
    let base = ImageConfig::new(512, 512)
        .with_n_fibers(12)
        .with_segment_length(6.0)
        .with_alignment(0.3)
        .with_edge_buffer(24)
        .with_length_distribution(Distribution::uniform(120.0, 300.0, 0.0, f64::INFINITY))
        .with_width_distribution(Distribution::uniform(2.0, 4.0, 0.0, f64::INFINITY))
        .with_straightness_distribution(Distribution::uniform(0.7, 0.9, 0.0, 1.0));

    let variants: [(&str, ImageConfig); 4] = [
        ("smoothing-none.png", base.clone()),
        ("smoothing-bubble.png", base.clone().with_bubble(6)),
        ("smoothing-swap.png", base.clone().with_swap(4)),
        ("smoothing-spline.png", base.clone().with_spline(4)),
    ];

    for (name, config) in variants {
        let mut rng = StdRng::seed_from_u64(99);
        let image = synthesize(config, &mut rng)?;
        save_gray_png(image.raster(), name)?;
    }
    Ok(())
}
