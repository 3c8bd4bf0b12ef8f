//! Fiber skeletons: constrained point chains with per-segment widths.
//!
//! A fiber owns `n_segments + 1` points and one width per leading point.
//! Segments are derived views, not stored. Smoothing passes operate on the
//! sequence of step vectors so the endpoints and total displacement are
//! preserved exactly.
use glam::DVec2;
use rand::rand_core::RngCore;

use crate::error::Result;
use crate::geom::{angle_between, random_chain};
use crate::rng::{random_index, random_range};

mod spline;

use spline::CubicSpline;

/// Parameters fixed per fiber before generation.
#[derive(Debug, Clone, Copy)]
pub struct FiberSpec {
    pub n_segments: usize,
    pub segment_length: f64,
    /// Ratio of end-to-end displacement to total path length, in `(0, 1]`.
    pub straightness: f64,
    pub start_width: f64,
    /// Maximum segment-to-segment width change.
    pub width_change: f64,
    pub start: DVec2,
    pub end: DVec2,
}

/// One stroke of a fiber: two consecutive skeleton points and a width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fiber {
    points: Vec<DVec2>,
    widths: Vec<f64>,
}

impl Fiber {
    /// Generate a skeleton chain between the spec's endpoints, then walk it
    /// assigning widths.
    ///
    /// Each width perturbation is a uniform draw in `[-v, v]` with
    /// `v = min(|width|, width_change)`, so a single step cannot overshoot
    /// zero. Repeated steps may still drive a width arbitrarily close to
    /// zero; that is accepted, not floored.
    pub fn generate(spec: &FiberSpec, rng: &mut dyn RngCore) -> Result<Self> {
        let points = random_chain(spec.start, spec.end, spec.n_segments, spec.segment_length, rng)?;

        let mut widths = Vec::with_capacity(spec.n_segments);
        let mut width = spec.start_width;
        for _ in 0..spec.n_segments {
            widths.push(width);
            let variability = width.abs().min(spec.width_change);
            width += random_range(rng, -variability, variability);
        }

        Ok(Self { points, widths })
    }

    /// Build a fiber from an existing skeleton. `widths` must hold one entry
    /// per segment.
    pub fn from_parts(points: Vec<DVec2>, widths: Vec<f64>) -> Self {
        debug_assert!(points.len() >= 2, "a fiber has at least one segment");
        debug_assert_eq!(points.len(), widths.len() + 1, "one width per segment");
        Self { points, widths }
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn n_segments(&self) -> usize {
        self.widths.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points
            .windows(2)
            .zip(self.widths.iter())
            .map(|(pair, &width)| Segment {
                start: pair[0],
                end: pair[1],
                width,
            })
    }

    /// End-to-end unit direction; zero for a degenerate closed fiber.
    pub fn direction(&self) -> DVec2 {
        (self.points[self.points.len() - 1] - self.points[0]).normalize_or_zero()
    }

    /// Skeleton points in interop form, for collaborators that persist fiber
    /// geometry.
    pub fn skeleton_points(&self) -> Vec<mint::Point2<f64>> {
        self.points.iter().map(|&p| p.into()).collect()
    }

    /// Repeated adjacent-pair passes over the step vectors, keeping a swap
    /// only when it strictly reduces the local turning-angle cost. Stops
    /// early once a full pass accepts no swap.
    pub fn bubble_smooth(&mut self, passes: usize) {
        let mut deltas = to_deltas(&self.points);
        for _ in 0..passes {
            let mut swapped = false;
            for j in 0..deltas.len().saturating_sub(1) {
                swapped |= try_swap(&mut deltas, j, j + 1);
            }
            if !swapped {
                break;
            }
        }
        self.points = from_deltas(&deltas, self.points[0]);
    }

    /// Same accept rule as [`Fiber::bubble_smooth`], applied to
    /// `ratio * n_segments` random index pairs, enabling longer-range
    /// rearrangement than adjacent bubbling.
    pub fn swap_smooth(&mut self, ratio: usize, rng: &mut dyn RngCore) {
        let mut deltas = to_deltas(&self.points);
        for _ in 0..ratio * deltas.len() {
            let u = random_index(rng, deltas.len());
            let v = random_index(rng, deltas.len());
            try_swap(&mut deltas, u, v);
        }
        self.points = from_deltas(&deltas, self.points[0]);
    }

    /// Fit natural cubic splines through the `(index, x)` and `(index, y)`
    /// series and resample at `ratio` times the original point density.
    /// Widths carry over by nearest-lower-index lookup. No-op for fibers with
    /// one segment or less.
    pub fn spline_smooth(&mut self, ratio: usize) {
        if self.points.len() <= 2 || ratio == 0 {
            return;
        }

        let xs: Vec<f64> = self.points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = self.points.iter().map(|p| p.y).collect();
        let x_spline = CubicSpline::fit(&xs);
        let y_spline = CubicSpline::fit(&ys);

        let t_end = (self.points.len() - 1) as f64;
        let step = 1.0 / ratio as f64;
        let mut new_points = Vec::with_capacity(self.points.len() * ratio);
        let mut new_widths = Vec::with_capacity(self.widths.len() * ratio);
        let mut t = 0.0;
        while t <= t_end {
            new_points.push(DVec2::new(x_spline.value(t), y_spline.value(t)));
            if t + step <= t_end {
                new_widths.push(self.widths[t as usize]);
            }
            t += step;
        }

        self.points = new_points;
        self.widths = new_widths;
    }
}

fn to_deltas(points: &[DVec2]) -> Vec<DVec2> {
    points.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

fn from_deltas(deltas: &[DVec2], start: DVec2) -> Vec<DVec2> {
    let mut points = Vec::with_capacity(deltas.len() + 1);
    let mut acc = start;
    points.push(acc);
    for delta in deltas {
        acc += *delta;
        points.push(acc);
    }
    points
}

/// Tentatively swap `deltas[u]` and `deltas[v]`, keeping the swap only when
/// it strictly reduces the local turning-angle cost. Returns whether the swap
/// was kept.
fn try_swap(deltas: &mut [DVec2], u: usize, v: usize) -> bool {
    let old_diff = local_diff_sum(deltas, u, v);
    deltas.swap(u, v);
    let new_diff = local_diff_sum(deltas, u, v);
    if new_diff >= old_diff {
        deltas.swap(u, v);
        return false;
    }
    true
}

/// Sum of turning angles at the joints touching positions `u` and `v`. When
/// the two positions are adjacent, the joint between them is counted once.
fn local_diff_sum(deltas: &[DVec2], u: usize, v: usize) -> f64 {
    let i1 = u.min(v);
    let i2 = u.max(v);
    debug_assert!(i2 < deltas.len(), "swap indices must be within the deltas");

    let mut sum = 0.0;
    if i1 > 0 {
        sum += angle_between(deltas[i1 - 1], deltas[i1]);
    }
    if i1 < i2 {
        sum += angle_between(deltas[i1], deltas[i1 + 1]);
    }
    if i1 + 1 < i2 {
        sum += angle_between(deltas[i2 - 1], deltas[i2]);
    }
    if i2 + 1 < deltas.len() {
        sum += angle_between(deltas[i2], deltas[i2 + 1]);
    }
    sum
}
