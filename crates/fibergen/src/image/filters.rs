//! Raster post-processing filters.
//!
//! All filters read out-of-bounds pixels as background through
//! [`GrayRaster::get`], which stands in for an explicit zero-padded copy.
use rand::rngs::StdRng;
use rand::rand_core::RngCore;
use rand::SeedableRng;

use crate::image::raster::GrayRaster;
use crate::rng::poisson;

/// Ring growth per iteration of the background search.
const DIST_SEARCH_STEP: usize = 4;

/// Replace each foreground pixel with `min(255, falloff * distance)` where
/// distance is the 2-norm to the closest background pixel. Background pixels
/// stay 0.
pub fn distance_transform(input: &GrayRaster, falloff: f64) -> GrayRaster {
    let mut output = GrayRaster::new(input.width(), input.height());
    for y in 0..input.height() as isize {
        for x in 0..input.width() as isize {
            if input.get(x, y) == 0 {
                continue;
            }
            let min_dist = background_distance(input, x as usize, y as usize);
            // An all-foreground raster has no background pixel; the infinite
            // distance saturates at white.
            let value = (min_dist * falloff).min(255.0) as u8;
            output.set(x, y, value);
        }
    }
    output
}

/// Distance from `(x, y)` to the nearest background pixel, searched over
/// boxes of expanding radius so the scan stays local for typical images.
fn background_distance(raster: &GrayRaster, x: usize, y: usize) -> f64 {
    let (w, h) = raster.size();
    let r_max = ((w * w + h * h) as f64).sqrt() as usize + 1;

    let mut min_dist = f64::INFINITY;
    let mut found = false;
    let mut r = DIST_SEARCH_STEP;
    while r < r_max && !found {
        let x_lo = x.saturating_sub(r);
        let x_hi = (x + r).min(w);
        let y_lo = y.saturating_sub(r);
        let y_hi = (y + r).min(h);
        for y_in in y_lo..y_hi {
            for x_in in x_lo..x_hi {
                if raster.get(x_in as isize, y_in as isize) > 0 {
                    continue;
                }
                let dx = x_in as f64 - x as f64;
                let dy = y_in as f64 - y as f64;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist <= r as f64 && dist < min_dist {
                    found = true;
                    min_dist = dist;
                }
            }
        }
        r += DIST_SEARCH_STEP;
    }
    min_dist
}

/// Add Poisson-distributed noise with the given mean to every pixel, clipped
/// at white. The noise stream runs on a child generator whose seed is drawn
/// from `rng`, so the whole sequence of per-image noise depends only on the
/// shared seed.
pub fn add_noise(raster: &mut GrayRaster, mean: f64, rng: &mut dyn RngCore) {
    let mut noise_rng = StdRng::seed_from_u64(rng.next_u64());
    for y in 0..raster.height() as isize {
        for x in 0..raster.width() as isize {
            let sample = poisson(mean, &mut noise_rng);
            let value = (raster.get(x, y) as u32 + sample).min(255) as u8;
            raster.set(x, y, value);
        }
    }
}

/// Gaussian blur by convolution with a single normalized 2D kernel over an
/// implicitly zero-padded input.
pub fn gaussian_blur(input: &GrayRaster, radius: f64) -> GrayRaster {
    let (size, kernel) = gaussian_kernel(radius);
    let center = (size / 2) as isize;

    let mut output = GrayRaster::new(input.width(), input.height());
    for y in 0..input.height() as isize {
        for x in 0..input.width() as isize {
            let mut acc = 0.0;
            for j in 0..size as isize {
                for i in 0..size as isize {
                    let weight = kernel[(j * size as isize + i) as usize];
                    acc += weight * input.get(x + i - center, y + j - center) as f64;
                }
            }
            output.set(x, y, (acc + 0.5).min(255.0) as u8);
        }
    }
    output
}

/// Normalized square kernel; side is the smallest odd integer >= radius,
/// sigma is radius / 3.
fn gaussian_kernel(radius: f64) -> (usize, Vec<f64>) {
    let sigma = radius / 3.0;
    let mut size = radius.ceil().max(1.0) as usize;
    size += 1 - size % 2;

    let center = (size / 2) as f64;
    let mut kernel = Vec::with_capacity(size * size);
    let mut norm = 0.0;
    for j in 0..size {
        for i in 0..size {
            let di = i as f64 - center;
            let dj = j as f64 - center;
            let gauss = (-(di * di + dj * dj) / (2.0 * sigma * sigma)).exp();
            kernel.push(gauss);
            norm += gauss;
        }
    }
    for weight in &mut kernel {
        *weight /= norm;
    }
    (size, kernel)
}

/// Affine downscale by `ratio` with bilinear interpolation. Output dimensions
/// are the floor of the scaled input dimensions.
pub fn scale(input: &GrayRaster, ratio: f64) -> GrayRaster {
    let out_w = (input.width() as f64 * ratio) as usize;
    let out_h = (input.height() as f64 * ratio) as usize;
    let mut output = GrayRaster::new(out_w, out_h);

    for y in 0..out_h {
        for x in 0..out_w {
            let src_x = x as f64 / ratio;
            let src_y = y as f64 / ratio;
            let x0 = src_x.floor();
            let y0 = src_y.floor();
            let fx = src_x - x0;
            let fy = src_y - y0;

            let x0 = x0 as isize;
            let y0 = y0 as isize;
            let v00 = input.get(x0, y0) as f64;
            let v10 = input.get(x0 + 1, y0) as f64;
            let v01 = input.get(x0, y0 + 1) as f64;
            let v11 = input.get(x0 + 1, y0 + 1) as f64;

            let top = v00 + (v10 - v00) * fx;
            let bottom = v01 + (v11 - v01) * fx;
            let value = top + (bottom - top) * fy;
            output.set(x as isize, y as isize, (value + 0.5).min(255.0) as u8);
        }
    }
    output
}
