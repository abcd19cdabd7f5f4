//! GPU vertex format and board palette
//!
//! Vertices stay in field coordinates; the shader maps them to the viewport.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Field-space position with a flat RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    #[inline]
    pub fn at(pos: Vec2, color: [f32; 4]) -> Self {
        Self {
            position: pos.to_array(),
            color,
        }
    }

    /// Buffer layout matching `VertexInput` in the shader
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for board elements
pub mod colors {
    pub const PEG: [f32; 4] = [0.75, 0.75, 0.8, 1.0];
    pub const BIN_WALL: [f32; 4] = [0.35, 0.35, 0.45, 1.0];
    pub const GROUND: [f32; 4] = [0.5, 0.5, 0.6, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];

    /// Opaque color from a ball's RGB
    #[inline]
    pub const fn opaque([r, g, b]: [f32; 3]) -> [f32; 4] {
        [r, g, b, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_struct() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes[1].offset, 8);
    }

    #[test]
    fn test_vertex_bytes() {
        let v = Vertex::at(Vec2::new(0.25, 0.75), colors::opaque([0.1, 0.2, 0.3]));
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 24);
        assert_eq!(v.color[3], 1.0);
    }
}
