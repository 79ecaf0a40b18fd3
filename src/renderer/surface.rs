//! 2D drawing surface
//!
//! The only contract entity drawing needs: filled rects, filled/stroked
//! paths and arcs, an affine transform stack and a global alpha. Coordinates
//! are viewport units with the origin at the top-left, y pointing down.

use glam::Vec2;

use crate::Color;

pub trait Surface {
    /// Logical viewport size
    fn viewport(&self) -> Vec2;

    /// Push transform and alpha
    fn save(&mut self);
    /// Pop transform and alpha; unbalanced calls are ignored
    fn restore(&mut self);

    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);
    fn scale(&mut self, factor: Vec2);

    /// Global opacity multiplied into every subsequent colour
    fn set_alpha(&mut self, alpha: f32);
    fn alpha(&self) -> f32;

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    /// Rect blended from `top` to `bottom`
    fn fill_gradient_rect(&mut self, pos: Vec2, size: Vec2, top: Color, bottom: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Closed simple polygon (convex or not)
    fn fill_path(&mut self, points: &[Vec2], color: Color);
    fn stroke_path(&mut self, points: &[Vec2], closed: bool, width: f32, color: Color);
    /// Arc band from `start` to `end` radians, centred on `radius`
    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        color: Color,
    );

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.stroke_arc(center, radius, 0.0, std::f32::consts::TAU, width, color);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.stroke_path(&[from, to], false, width, color);
    }
}
