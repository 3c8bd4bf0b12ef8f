//! Stroke rasterization onto a [`GrayRaster`].
//!
//! Segments stamp as thick lines with antialiasing disabled: a pixel is
//! foreground iff its sample point lies within half the stroke width of the
//! segment. Stamping per segment gives round caps, and shared endpoints
//! between consecutive segments give round joins.
use glam::DVec2;

use crate::fiber::Fiber;
use crate::image::raster::GrayRaster;

pub(crate) const FOREGROUND: u8 = 255;

/// Stamp every segment of `fiber` onto the raster.
pub fn draw_fiber(raster: &mut GrayRaster, fiber: &Fiber) {
    for segment in fiber.segments() {
        draw_segment(raster, segment.start, segment.end, segment.width);
    }
}

/// Stamp one round-capped stroke of the given width from `a` to `b`.
pub fn draw_segment(raster: &mut GrayRaster, a: DVec2, b: DVec2, width: f64) {
    let half = width / 2.0;
    if half < 0.0 {
        return;
    }

    let x_min = ((a.x.min(b.x) - half).floor() as isize).max(0);
    let x_max = ((a.x.max(b.x) + half).ceil() as isize).min(raster.width() as isize - 1);
    let y_min = ((a.y.min(b.y) - half).floor() as isize).max(0);
    let y_max = ((a.y.max(b.y) + half).ceil() as isize).min(raster.height() as isize - 1);

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let p = DVec2::new(x as f64, y as f64);
            if point_segment_distance(p, a, b) <= half {
                raster.set(x, y, FOREGROUND);
            }
        }
    }
}

fn point_segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
