//! CPU-side vertex batch
//!
//! `ShapeBatch` is the `Surface` the game draws into each frame. It
//! tessellates every call into triangles, applies the current transform and
//! alpha, and hands the vertex list to the GPU pipeline in one upload.

use glam::{Affine2, Vec2};

use super::shapes;
use super::surface::Surface;
use super::vertex::Vertex;
use crate::{Color, with_alpha};

#[derive(Debug, Clone)]
pub struct ShapeBatch {
    viewport: Vec2,
    vertices: Vec<Vertex>,
    transform: Affine2,
    alpha: f32,
    stack: Vec<(Affine2, f32)>,
}

impl ShapeBatch {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            vertices: Vec::with_capacity(4096),
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            stack: Vec::new(),
        }
    }

    /// Start a new frame, keeping the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.transform = Affine2::IDENTITY;
        self.alpha = 1.0;
        self.stack.clear();
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn transform(&self) -> Affine2 {
        self.transform
    }

    /// Uniform scale of the current transform, used to pick circle detail
    fn scale_factor(&self) -> f32 {
        self.transform.matrix2.determinant().abs().sqrt()
    }

    fn push(&mut self, local: Vec<Vertex>) {
        if self.alpha <= 0.0 {
            return;
        }
        let transform = self.transform;
        let alpha = self.alpha;
        self.vertices.extend(local.into_iter().map(|v| {
            let p = transform.transform_point2(Vec2::from(v.position));
            Vertex::new(p.x, p.y, with_alpha(v.color, alpha))
        }));
    }
}

impl Surface for ShapeBatch {
    fn viewport(&self) -> Vec2 {
        self.viewport
    }

    fn save(&mut self) {
        self.stack.push((self.transform, self.alpha));
    }

    fn restore(&mut self) {
        if let Some((transform, alpha)) = self.stack.pop() {
            self.transform = transform;
            self.alpha = alpha;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.transform = self.transform * Affine2::from_translation(offset);
    }

    fn rotate(&mut self, angle: f32) {
        self.transform = self.transform * Affine2::from_angle(angle);
    }

    fn scale(&mut self, factor: Vec2) {
        self.transform = self.transform * Affine2::from_scale(factor);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.push(shapes::rect(pos, size, color));
    }

    fn fill_gradient_rect(&mut self, pos: Vec2, size: Vec2, top: Color, bottom: Color) {
        self.push(shapes::gradient_rect(pos, size, top, bottom));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let segments = shapes::segments_for(radius * self.scale_factor());
        self.push(shapes::circle(center, radius, color, segments));
    }

    fn fill_path(&mut self, points: &[Vec2], color: Color) {
        self.push(shapes::polygon(points, color));
    }

    fn stroke_path(&mut self, points: &[Vec2], closed: bool, width: f32, color: Color) {
        self.push(shapes::polyline(points, closed, width, color));
    }

    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        color: Color,
    ) {
        self.push(shapes::arc_band(center, radius, width, start, end, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const RED: Color = [1.0, 0.0, 0.0, 1.0];

    fn batch() -> ShapeBatch {
        ShapeBatch::new(Vec2::new(800.0, 600.0))
    }

    fn near(a: [f32; 2], b: Vec2) -> bool {
        (Vec2::from(a) - b).length() < 1e-4
    }

    #[test]
    fn test_translate_then_rotate() {
        let mut b = batch();
        b.translate(Vec2::new(100.0, 50.0));
        b.rotate(FRAC_PI_2);
        b.fill_rect(Vec2::ZERO, Vec2::new(10.0, 0.0), RED);
        let v = b.vertices();
        // (10, 0) rotated a quarter turn lands on (0, 10) before the translation
        assert!(near(v[0].position, Vec2::new(100.0, 50.0)));
        assert!(near(v[1].position, Vec2::new(100.0, 60.0)));
    }

    #[test]
    fn test_save_restore_alpha_and_transform() {
        let mut b = batch();
        b.save();
        b.translate(Vec2::splat(5.0));
        b.set_alpha(0.5);
        b.fill_rect(Vec2::ZERO, Vec2::ONE, RED);
        b.restore();
        b.fill_rect(Vec2::ZERO, Vec2::ONE, RED);

        let v = b.vertices();
        assert_eq!(v.len(), 12);
        assert!(near(v[0].position, Vec2::splat(5.0)));
        assert_eq!(v[0].color[3], 0.5);
        assert!(near(v[6].position, Vec2::ZERO));
        assert_eq!(v[6].color[3], 1.0);

        // Extra restore is harmless
        b.restore();
        assert_eq!(b.transform(), Affine2::IDENTITY);
    }

    #[test]
    fn test_invisible_draws_are_skipped() {
        let mut b = batch();
        b.set_alpha(0.0);
        b.fill_circle(Vec2::ZERO, 10.0, RED);
        b.set_alpha(1.0);
        b.fill_circle(Vec2::ZERO, 0.0, RED);
        assert!(b.vertices().is_empty());
    }

    #[test]
    fn test_scale_raises_circle_detail() {
        let mut small = batch();
        small.fill_circle(Vec2::ZERO, 5.0, RED);
        let mut big = batch();
        big.scale(Vec2::splat(4.0));
        big.fill_circle(Vec2::ZERO, 5.0, RED);
        assert!(big.vertices().len() > small.vertices().len());
    }

    #[test]
    fn test_clear_resets_state() {
        let mut b = batch();
        b.save();
        b.scale(Vec2::splat(2.0));
        b.set_alpha(0.3);
        b.fill_rect(Vec2::ZERO, Vec2::ONE, RED);
        b.clear();
        assert!(b.vertices().is_empty());
        assert_eq!(b.alpha(), 1.0);
        assert_eq!(b.transform(), Affine2::IDENTITY);
    }
}
