//! Circle and disk intersection queries.
//!
//! A [`Circle`] value is read as a boundary or a filled disk depending on the
//! query. The random-point queries route through the shared generator so the
//! whole pipeline stays reproducible under a fixed seed.
use glam::DVec2;
use rand::rand_core::RngCore;

use crate::error::{Error, Result};
use crate::geom::angle_between;
use crate::rng::{random_point, random_range};

/// Two circles that should be touching can end up some very small distance
/// apart because of floating-point limitations; widening both by this amount
/// absorbs the gap.
pub(crate) const BUFF: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: DVec2, radius: f64) -> Self {
        debug_assert!(radius >= 0.0, "radius must be non-negative");
        Self { center, radius }
    }

    /// Whether `point` lies in the closed disk, with the epsilon buffer.
    pub fn contains(&self, point: DVec2) -> bool {
        self.center.distance(point) <= self.radius + BUFF
    }

    /// Random point on the boundary with angle drawn uniformly from
    /// `[min_theta, max_theta)`.
    fn choose_point(&self, min_theta: f64, max_theta: f64, rng: &mut dyn RngCore) -> DVec2 {
        let theta = random_range(rng, min_theta, max_theta);
        self.center + DVec2::new(theta.cos(), theta.sin()) * self.radius
    }
}

fn sq(value: f64) -> f64 {
    value * value
}

/// Both intersection points of two circle boundaries. In the tangent case the
/// two points coincide.
///
/// Fails with [`Error::Infeasible`] when the circles are identical, nested, or
/// separated by more than the epsilon buffer.
pub fn circle_circle_intersect(circle1: Circle, circle2: Circle) -> Result<[DVec2; 2]> {
    let mut circle1 = circle1;
    let mut circle2 = circle2;

    // Enlarge the circles slightly if they're too far away to intersect.
    let d = circle1.center.distance(circle2.center);
    let mut space = d - circle1.radius - circle2.radius;
    if space > 0.0 {
        circle1.radius += BUFF;
        circle2.radius += BUFF;
        space -= 2.0 * BUFF;
    }

    let nested = d < (circle1.radius - circle2.radius).abs();
    if circle1 == circle2 || nested || space > 0.0 {
        return Err(Error::Infeasible("circles do not intersect".into()));
    }

    // a: distance to the center of the lens, h: distance from the axis to an
    // intersection point.
    let a = (sq(circle1.radius) - sq(circle2.radius) + sq(d)) / (2.0 * d);
    let h = (sq(circle1.radius) - sq(a)).max(0.0).sqrt();

    let axis = (circle2.center - circle1.center).normalize();
    Ok([
        circle1.center + axis.rotate(DVec2::new(a, h)),
        circle1.center + axis.rotate(DVec2::new(a, -h)),
    ])
}

/// One point on `circle`'s boundary that lies within the filled `disk`,
/// drawn uniformly over the valid angular span.
pub fn disk_circle_intersect(disk: Circle, circle: Circle, rng: &mut dyn RngCore) -> Result<DVec2> {
    // The circle may sit entirely within the disk; any angle qualifies.
    let d = disk.center.distance(circle.center);
    if d < disk.radius - circle.radius {
        return Ok(circle.choose_point(-std::f64::consts::PI, std::f64::consts::PI, rng));
    }

    let axis = (disk.center - circle.center).normalize();
    let points = circle_circle_intersect(disk, circle)?;
    let delta = angle_between(axis, points[0] - circle.center);

    let theta = axis.y.atan2(axis.x);
    Ok(circle.choose_point(theta - delta, theta + delta, rng))
}

/// One point inside both filled disks, drawn by rejection sampling in a box
/// bounding the lens of overlap.
pub fn disk_disk_intersect(disk1: Circle, disk2: Circle, rng: &mut dyn RngCore) -> Result<DVec2> {
    // Nested disks: sample the bounding box of the inner disk directly.
    let d = disk1.center.distance(disk2.center);
    if d < (disk1.radius - disk2.radius).abs() {
        let inner = if disk1.radius < disk2.radius {
            disk1
        } else {
            disk2
        };
        loop {
            let result = random_point(
                rng,
                inner.center.x - inner.radius,
                inner.center.x + inner.radius,
                inner.center.y - inner.radius,
                inner.center.y + inner.radius,
            );
            if inner.contains(result) {
                return Ok(result);
            }
        }
    }

    // Bounding box of the lens, aligned to the inter-center axis.
    let points = circle_circle_intersect(disk1, disk2)?;
    let box_height = (points[0] - points[1]).length();
    let box_left = (d - disk2.radius).min(disk1.radius);
    let box_right = (d - disk2.radius).max(disk1.radius);

    let axis = (disk2.center - disk1.center).normalize();
    loop {
        let delta = random_point(rng, box_left, box_right, -box_height, box_height);
        let result = disk1.center + axis.rotate(delta);
        if disk1.contains(result) && disk2.contains(result) {
            return Ok(result);
        }
    }
}
