#![forbid(unsafe_code)]

use std::path::Path;

use anyhow::{Context, Result};
use fibergen::prelude::GrayRaster;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber honoring `RUST_LOG`, defaulting to info.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Write a greyscale raster as an 8-bit PNG.
pub fn save_gray_png(raster: &GrayRaster, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (width, height) = raster.size();
    let buffer = image::GrayImage::from_raw(
        width as u32,
        height as u32,
        raster.data().to_vec(),
    )
    .context("raster buffer does not match its dimensions")?;
    buffer
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), width, height, "wrote image");
    Ok(())
}
