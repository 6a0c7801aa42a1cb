//! Signed distance functions for shape coverage
//!
//! All distances are in pixels, negative inside the shape.

use glam::Vec2;

/// Fraction of a pixel covered, given the distance from its center to the edge
#[inline]
pub fn coverage(distance: f32) -> f32 {
    (0.5 - distance).clamp(0.0, 1.0)
}

/// Axis-aligned box from `min` to `max`
pub fn rect(p: Vec2, min: Vec2, max: Vec2) -> f32 {
    let center = (min + max) * 0.5;
    let half = (max - min) * 0.5;
    oriented_box(p - center, half)
}

pub fn circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    p.distance(center) - radius
}

/// Ring of `width` centered on the circle outline
pub fn ring(p: Vec2, center: Vec2, radius: f32, width: f32) -> f32 {
    circle(p, center, radius).abs() - width * 0.5
}

/// Segment with butt caps
pub fn segment(p: Vec2, from: Vec2, to: Vec2, width: f32) -> f32 {
    let axis = to - from;
    let length = axis.length();
    if length <= f32::EPSILON {
        return f32::INFINITY;
    }
    let dir = axis / length;
    let local = p - (from + to) * 0.5;
    let along = local.dot(dir);
    let across = local.perp_dot(dir);
    oriented_box(Vec2::new(along, across), Vec2::new(length * 0.5, width * 0.5))
}

/// Solid triangle (either winding)
pub fn triangle(p: Vec2, points: &[Vec2; 3]) -> f32 {
    let winding = (points[1] - points[0]).perp_dot(points[2] - points[0]);
    if winding.abs() <= f32::EPSILON {
        return f32::INFINITY;
    }
    let sign = winding.signum();

    let mut distance = f32::NEG_INFINITY;
    for i in 0..3 {
        let a = points[i];
        let b = points[(i + 1) % 3];
        let edge = b - a;
        // Outward distance from the edge's supporting line
        let outside = -sign * edge.perp_dot(p - a) / edge.length();
        distance = distance.max(outside);
    }
    distance
}

/// Triangle outline of `width` centered on the edges
pub fn triangle_outline(p: Vec2, points: &[Vec2; 3], width: f32) -> f32 {
    (0..3)
        .map(|i| distance_to_segment(p, points[i], points[(i + 1) % 3]))
        .fold(f32::INFINITY, f32::min)
        - width * 0.5
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    };
    p.distance(a + ab * t)
}

/// Box centered on the origin with half extents `half`
fn oriented_box(p: Vec2, half: Vec2) -> f32 {
    let d = p.abs() - half;
    d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
}
