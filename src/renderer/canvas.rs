//! Canvas that tessellates draw calls into colored triangles

use glam::Vec2;

use super::StateStack;
use super::shapes;
use super::vertex::Vertex;
use crate::color::Color;
use crate::mods::{Canvas, LineCap};

/// Default circle tessellation
pub const CIRCLE_SEGMENTS: u32 = 16;

/// Collects a frame's triangles; upload with [`Vertex::as_bytes`]
#[derive(Debug, Clone)]
pub struct VertexCanvas {
    state: StateStack,
    vertices: Vec<Vertex>,
    circle_segments: u32,
}

impl Default for VertexCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexCanvas {
    pub fn new() -> Self {
        Self::with_segments(CIRCLE_SEGMENTS)
    }

    pub fn with_segments(circle_segments: u32) -> Self {
        Self {
            state: StateStack::default(),
            vertices: Vec::new(),
            circle_segments: circle_segments.max(3),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Start a new frame; keeps the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
        if self.state.depth() != 0 {
            log::warn!("Frame ended with {} unmatched canvas saves", self.state.depth());
            self.state = StateStack::default();
        }
    }

    pub fn depth(&self) -> usize {
        self.state.depth()
    }
}

impl Canvas for VertexCanvas {
    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.current.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.current.stroke = color;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.current.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_line_width(&mut self, width: f32) {
        self.state.current.line_width = width.max(0.0);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.current.line_cap = cap;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        if radius <= 0.0 {
            return;
        }
        let color = self.state.current.effective_fill().0;
        self.vertices
            .extend(shapes::circle(center, radius, color, self.circle_segments));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32) {
        let half = self.state.current.line_width / 2.0;
        if half <= 0.0 {
            return;
        }
        let color = self.state.current.effective_stroke().0;
        self.vertices.extend(shapes::ring(
            center,
            radius - half,
            radius + half,
            color,
            self.circle_segments,
        ));
    }

    fn stroke_polyline(&mut self, points: &[Vec2]) {
        let state = self.state.current;
        if state.line_width <= 0.0 || points.len() < 2 {
            return;
        }
        let color = state.effective_stroke().0;
        self.vertices
            .extend(shapes::polyline(points, state.line_width, color));

        if state.line_cap == LineCap::Round {
            let half = state.line_width / 2.0;
            for end in [points[0], points[points.len() - 1]] {
                self.vertices
                    .extend(shapes::circle(end, half, color, self.circle_segments));
            }
        }
    }
}
