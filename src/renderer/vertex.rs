//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride of one vertex in an uploaded buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// Raw bytes of a vertex slice, ready for a GPU buffer upload
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(Vertex::STRIDE, 24);
        let vertices = [Vertex::new(1.0, 2.0, [0.0, 0.0, 0.0, 1.0]); 3];
        let bytes = Vertex::as_bytes(&vertices);
        assert_eq!(bytes.len(), 72);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
    }
}
