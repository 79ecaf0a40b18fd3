//! Shape generation for 2D primitives
//!
//! Every function emits a plain triangle list in local coordinates; the
//! batch applies the current transform afterwards.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;
use crate::Color;

/// Segment count for a circle of the given on-screen radius
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 1.5) as u32).clamp(8, 48)
}

fn quad(vertices: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [Color; 4]) {
    let [a, b, c, d] = corners;
    let [ca, cb, cc, cd] = colors;
    vertices.push(Vertex::new(a.x, a.y, ca));
    vertices.push(Vertex::new(b.x, b.y, cb));
    vertices.push(Vertex::new(c.x, c.y, cc));

    vertices.push(Vertex::new(a.x, a.y, ca));
    vertices.push(Vertex::new(c.x, c.y, cc));
    vertices.push(Vertex::new(d.x, d.y, cd));
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(pos: Vec2, size: Vec2, color: Color) -> Vec<Vertex> {
    gradient_rect(pos, size, color, color)
}

/// Rectangle with a vertical colour ramp
pub fn gradient_rect(pos: Vec2, size: Vec2, top: Color, bottom: Color) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        [
            pos,
            pos + Vec2::new(size.x, 0.0),
            pos + size,
            pos + Vec2::new(0.0, size.y),
        ],
        [top, top, bottom, bottom],
    );
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Thick arc band between `start` and `end` radians. A full turn gives a ring.
pub fn arc_band(
    center: Vec2,
    radius: f32,
    width: f32,
    start: f32,
    end: f32,
    color: Color,
) -> Vec<Vertex> {
    let span = end - start;
    let inner_r = (radius - width / 2.0).max(0.0);
    let outer_r = radius + width / 2.0;
    let num_segments = ((segments_for(radius) as f32 * span.abs() / TAU).ceil() as u32).max(2);

    let mut vertices = Vec::with_capacity((num_segments * 6) as usize);
    let point = |r: f32, theta: f32| center + Vec2::new(r * theta.cos(), r * theta.sin());

    for i in 0..num_segments {
        let theta1 = start + span * (i as f32 / num_segments as f32);
        let theta2 = start + span * ((i + 1) as f32 / num_segments as f32);
        quad(
            &mut vertices,
            [
                point(inner_r, theta1),
                point(outer_r, theta1),
                point(outer_r, theta2),
                point(inner_r, theta2),
            ],
            [color; 4],
        );
    }

    vertices
}

/// Twice the signed area; positive for counter-clockwise winding in y-up terms
fn signed_area2(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum()
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Triangulate a simple polygon by ear clipping
pub fn polygon(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let orientation = signed_area2(points).signum();
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    let emit = |vertices: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2| {
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
        vertices.push(Vertex::new(c.x, c.y, color));
    };

    while remaining.len() > 3 {
        let n = remaining.len();
        let ear = (0..n).find(|&i| {
            let a = points[remaining[(i + n - 1) % n]];
            let b = points[remaining[i]];
            let c = points[remaining[(i + 1) % n]];
            let convex = (b - a).perp_dot(c - b) * orientation > 0.0;
            convex
                && remaining
                    .iter()
                    .map(|&j| points[j])
                    .filter(|&p| p != a && p != b && p != c)
                    .all(|p| !point_in_triangle(p, a, b, c))
        });

        // Degenerate input (collinear or self-intersecting): fall back to a fan
        let Some(i) = ear else {
            let a = points[remaining[0]];
            for w in remaining[1..].windows(2) {
                emit(&mut vertices, a, points[w[0]], points[w[1]]);
            }
            return vertices;
        };

        emit(
            &mut vertices,
            points[remaining[(i + n - 1) % n]],
            points[remaining[i]],
            points[remaining[(i + 1) % n]],
        );
        remaining.remove(i);
    }

    emit(
        &mut vertices,
        points[remaining[0]],
        points[remaining[1]],
        points[remaining[2]],
    );
    vertices
}

/// One quad per segment; joints are left unmitred
pub fn polyline(points: &[Vec2], closed: bool, width: f32, color: Color) -> Vec<Vertex> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let segments = if closed { n } else { n - 1 };
    let half = width / 2.0;

    let mut vertices = Vec::with_capacity(segments * 6);
    for i in 0..segments {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let dir = (p2 - p1).normalize_or_zero();
        let perp = Vec2::new(-dir.y, dir.x) * half;
        quad(
            &mut vertices,
            [p1 + perp, p2 + perp, p2 - perp, p1 - perp],
            [color; 4],
        );
    }
    vertices
}

/// Outline of a star with `spikes` points, first spike straight up
pub fn star_points(spikes: usize, outer_radius: f32, inner_radius: f32) -> Vec<Vec2> {
    (0..spikes * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            let angle = (i as f32 / (spikes * 2) as f32) * TAU - PI / 2.0;
            Vec2::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = [1.0; 4];

    fn triangle_area(vertices: &[Vertex]) -> f32 {
        vertices
            .chunks(3)
            .map(|t| {
                let a = Vec2::from(t[0].position);
                let b = Vec2::from(t[1].position);
                let c = Vec2::from(t[2].position);
                (b - a).perp_dot(c - a).abs() / 2.0
            })
            .sum()
    }

    #[test]
    fn test_rect_area() {
        let v = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), WHITE);
        assert_eq!(v.len(), 6);
        assert!((triangle_area(&v) - 1200.0).abs() < 1e-3);
    }

    #[test]
    fn test_gradient_rect_colors() {
        let top = [1.0, 0.0, 0.0, 1.0];
        let bottom = [0.0, 0.0, 1.0, 1.0];
        let v = gradient_rect(Vec2::ZERO, Vec2::new(10.0, 10.0), top, bottom);
        for vertex in &v {
            let expected = if vertex.position[1] == 0.0 { top } else { bottom };
            assert_eq!(vertex.color, expected);
        }
    }

    #[test]
    fn test_concave_polygon_area() {
        // U-shaped magnet body
        let u = [
            Vec2::new(-10.0, -12.0),
            Vec2::new(-10.0, 12.0),
            Vec2::new(-2.0, 12.0),
            Vec2::new(-2.0, -4.0),
            Vec2::new(2.0, -4.0),
            Vec2::new(2.0, 12.0),
            Vec2::new(10.0, 12.0),
            Vec2::new(10.0, -12.0),
        ];
        let v = polygon(&u, WHITE);
        assert_eq!(v.len(), (u.len() - 2) * 3);
        let expected = signed_area2(&u).abs() / 2.0;
        assert!((triangle_area(&v) - expected).abs() < 1e-3);
        assert!((expected - (20.0 * 24.0 - 4.0 * 16.0)).abs() < 1e-3);
    }

    #[test]
    fn test_star_triangulates_without_overlap() {
        let star = star_points(5, 12.5, 6.25);
        assert_eq!(star.len(), 10);
        assert!((star[0] - Vec2::new(0.0, -12.5)).length() < 1e-4);
        let v = polygon(&star, WHITE);
        let expected = signed_area2(&star).abs() / 2.0;
        assert!((triangle_area(&v) - expected).abs() < 1e-2);
    }

    #[test]
    fn test_degenerate_polygons() {
        assert!(polygon(&[Vec2::ZERO, Vec2::X], WHITE).is_empty());
        assert!(polyline(&[Vec2::ZERO], false, 2.0, WHITE).is_empty());
    }

    #[test]
    fn test_polyline_segments() {
        let pts = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        assert_eq!(polyline(&pts, false, 2.0, WHITE).len(), 12);
        assert_eq!(polyline(&pts, true, 2.0, WHITE).len(), 18);
        let v = polyline(&pts[..2], false, 2.0, WHITE);
        assert!((triangle_area(&v) - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_full_arc_band_is_ring() {
        let v = arc_band(Vec2::ZERO, 30.0, 3.0, 0.0, TAU, WHITE);
        let area = triangle_area(&v);
        let exact = PI * (31.5f32.powi(2) - 28.5f32.powi(2));
        // Inscribed polygon slightly under the true annulus
        assert!(area < exact && area > exact * 0.98);
    }
}
