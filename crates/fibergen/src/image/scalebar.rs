//! Scale bar overlay: a capped horizontal bar plus a physical-length label.
//!
//! The label renders with an embedded 5x7 glyph face covering exactly the
//! characters the formatter can emit, so the core stays free of font
//! dependencies.
use crate::image::draw::FOREGROUND;
use crate::image::raster::GrayRaster;

/// Fraction of the image width the bar should approximate.
const TARGET_SCALE_SIZE: f64 = 0.2;
/// End-cap half-height as a fraction of image height.
const CAP_RATIO: f64 = 0.01;
/// Margin from the image edges as a fraction of each dimension.
const BUFF_RATIO: f64 = 0.015;

const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;
/// Horizontal advance between characters.
const GLYPH_ADVANCE: usize = 6;

/// Draw a scale bar sized to a "nice" physical length given the image scale
/// in pixels per micron.
pub(crate) fn draw_scale_bar(raster: &mut GrayRaster, pixels_per_micron: f64) {
    let width = raster.width() as f64;
    let height = raster.height() as f64;

    let target_size = TARGET_SCALE_SIZE * width / pixels_per_micron;
    let best_size = nice_bar_size(target_size);
    let label = format_label(best_size);

    let cap_size = (CAP_RATIO * height) as isize;
    let x_buff = (BUFF_RATIO * width) as isize;
    let y_buff = (BUFF_RATIO * height) as isize;
    let bar_y = raster.height() as isize - y_buff - cap_size;
    let bar_right = x_buff + (best_size * pixels_per_micron) as isize;

    for x in x_buff..=bar_right {
        raster.set(x, bar_y, FOREGROUND);
    }
    for y in (bar_y - cap_size)..=(bar_y + cap_size) {
        raster.set(x_buff, y, FOREGROUND);
        raster.set(bar_right, y, FOREGROUND);
    }

    let baseline = bar_y - cap_size - y_buff;
    draw_text(raster, &label, x_buff, baseline);
}

/// The candidate length `{1, 2, 5, 10} x 10^k` microns closest to `target`.
fn nice_bar_size(target: f64) -> f64 {
    let floor_pow = target.log10().floor();
    let base = 10f64.powf(floor_pow);
    let options = [base, 2.0 * base, 5.0 * base, 10.0 * base];

    let mut best = options[0];
    for &size in &options {
        if (target - size).abs() < (target - best).abs() {
            best = size;
        }
    }
    best
}

/// Plain decimals for sizes within a few orders of magnitude of one micron,
/// scientific notation beyond.
fn format_label(size: f64) -> String {
    let magnitude = size.log10().floor().abs();
    let number = if magnitude <= 2.0 {
        let formatted = format!("{size:.2}");
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_owned()
    } else {
        format!("{size:.1e}")
    };
    format!("{number} \u{00B5}")
}

fn draw_text(raster: &mut GrayRaster, text: &str, x: isize, baseline: isize) {
    let top = baseline - GLYPH_HEIGHT as isize;
    for (index, ch) in text.chars().enumerate() {
        let rows = glyph(ch);
        let origin_x = x + (index * GLYPH_ADVANCE) as isize;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    raster.set(origin_x + col as isize, top + row as isize, FOREGROUND);
                }
            }
        }
    }
}

fn glyph(ch: char) -> [u8; GLYPH_HEIGHT] {
    match ch {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        'e' => [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        '\u{00B5}' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x1E, 0x10],
        _ => [0x00; GLYPH_HEIGHT],
    }
}
