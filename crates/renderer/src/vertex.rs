//! Vertex types and layouts for rendering.

use bytemuck::{Pod, Zeroable};

/// Terrain vertex: position, normal, UV. Matches the mesher's interleaved
/// output (8 f32 per vertex, stride 32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl TerrainVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TerrainVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // UV
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The GPU stride must equal the mesher's per-vertex float count.
    #[test]
    fn stride_matches_mesher_output() {
        assert_eq!(
            std::mem::size_of::<TerrainVertex>(),
            procgen::VERTEX_STRIDE * std::mem::size_of::<f32>()
        );
        assert_eq!(std::mem::size_of::<TerrainVertex>(), 32);
    }
}
