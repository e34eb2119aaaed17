//! Canvas that records draw calls instead of rasterizing them

use glam::Vec2;

use super::StateStack;
use crate::color::Color;
use crate::mods::{Canvas, LineCap};

/// One recorded draw call with the context state in effect at the time
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: f32,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: f32,
        width: f32,
    },
    StrokePolyline {
        points: Vec<Vec2>,
        color: Color,
        alpha: f32,
        width: f32,
        cap: LineCap,
    },
}

#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    state: StateStack,
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Unmatched `save` calls outstanding
    pub fn depth(&self) -> usize {
        self.state.depth()
    }

    pub fn max_depth(&self) -> usize {
        self.state.max_depth()
    }

    pub fn current_alpha(&self) -> f32 {
        self.state.current.alpha
    }
}

impl Canvas for CommandRecorder {
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
        self.state.current.line_width = width;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.current.line_cap = cap;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        let s = self.state.current;
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color: s.fill,
            alpha: s.alpha,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32) {
        let s = self.state.current;
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color: s.stroke,
            alpha: s.alpha,
            width: s.line_width,
        });
    }

    fn stroke_polyline(&mut self, points: &[Vec2]) {
        let s = self.state.current;
        self.commands.push(DrawCommand::StrokePolyline {
            points: points.to_vec(),
            color: s.stroke,
            alpha: s.alpha,
            width: s.line_width,
            cap: s.line_cap,
        });
    }
}
