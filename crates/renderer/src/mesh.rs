//! GPU-resident mesh buffers.

use procgen::TerrainMeshData;
use wgpu::util::DeviceExt;

/// A GPU mesh: vertex and index buffers plus the indexed draw count.
/// Buffers are created once and owned for the process lifetime; the
/// CPU-side source data can be dropped after upload.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl Mesh {
    /// Upload raw interleaved vertex floats and u32 indices.
    pub fn new(device: &wgpu::Device, vertex_data: &[f32], index_data: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(vertex_data),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(index_data),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: index_data.len() as u32,
        }
    }

    /// Upload a completed terrain mesh.
    pub fn from_terrain(device: &wgpu::Device, data: &TerrainMeshData) -> Self {
        Self::new(device, &data.vertex_data, &data.index_data)
    }
}
