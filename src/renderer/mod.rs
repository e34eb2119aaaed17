//! Canvas backends
//!
//! Mods draw through the `Canvas` trait. `VertexCanvas` tessellates into GPU
//! triangles; `CommandRecorder` keeps a log of draw calls for inspection.

pub mod canvas;
pub mod recorder;
pub mod shapes;
pub mod vertex;

pub use canvas::VertexCanvas;
pub use recorder::{CommandRecorder, DrawCommand};
pub use vertex::Vertex;

use crate::color::Color;
use crate::mods::LineCap;

/// Context state that `save`/`restore` brackets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    pub fill: Color,
    pub stroke: Color,
    pub alpha: f32,
    pub line_width: f32,
    pub line_cap: LineCap,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            stroke: Color::BLACK,
            alpha: 1.0,
            line_width: 1.0,
            line_cap: LineCap::Butt,
        }
    }
}

impl DrawState {
    /// Fill color with global alpha applied
    pub fn effective_fill(&self) -> Color {
        self.fill.scale_alpha(self.alpha)
    }

    /// Stroke color with global alpha applied
    pub fn effective_stroke(&self) -> Color {
        self.stroke.scale_alpha(self.alpha)
    }
}

/// Current state plus the saved stack
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    pub current: DrawState,
    saved: Vec<DrawState>,
    max_depth: usize,
}

impl StateStack {
    pub fn save(&mut self) {
        self.saved.push(self.current);
        self.max_depth = self.max_depth.max(self.saved.len());
    }

    /// Unbalanced restores are ignored, matching 2D canvas semantics
    pub fn restore(&mut self) {
        match self.saved.pop() {
            Some(state) => self.current = state,
            None => log::warn!("Canvas restore without matching save"),
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Deepest nesting reached since creation
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
