//! Shape tessellation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Unit direction of rim step `i` out of `segments`
fn rim(i: u32, segments: u32) -> Vec2 {
    Vec2::from_angle(i as f32 / segments as f32 * TAU)
}

fn vertex_at(p: Vec2, color: [f32; 4]) -> Vertex {
    Vertex::new(p.x, p.y, color)
}

/// Filled circle as a triangle fan, one triangle per segment
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    (0..segments)
        .flat_map(|i| {
            [
                vertex_at(center, color),
                vertex_at(center + rim(i, segments) * radius, color),
                vertex_at(center + rim(i + 1, segments) * radius, color),
            ]
        })
        .collect()
}

/// Hollow circle between the two radii; a negative inner radius is treated as zero
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let inner_radius = inner_radius.max(0.0);
    (0..segments)
        .flat_map(|i| {
            let (d1, d2) = (rim(i, segments), rim(i + 1, segments));
            let inner1 = vertex_at(center + d1 * inner_radius, color);
            let outer1 = vertex_at(center + d1 * outer_radius, color);
            let inner2 = vertex_at(center + d2 * inner_radius, color);
            let outer2 = vertex_at(center + d2 * outer_radius, color);
            [inner1, outer1, inner2, inner2, outer1, outer2]
        })
        .collect()
}

/// Append a quad of `width` covering the segment `a`-`b`; zero-length segments add nothing
pub fn thick_segment(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    out.push(Vertex::new(a1.x, a1.y, color));
    out.push(Vertex::new(a2.x, a2.y, color));
    out.push(Vertex::new(b1.x, b1.y, color));

    out.push(Vertex::new(b1.x, b1.y, color));
    out.push(Vertex::new(a2.x, a2.y, color));
    out.push(Vertex::new(b2.x, b2.y, color));
}

/// Generate vertices for an open polyline of constant width
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((points.len() - 1) * 6);
    for pair in points.windows(2) {
        thick_segment(&mut vertices, pair[0], pair[1], width, color);
    }
    vertices
}
