//! Main renderer managing wgpu state and the terrain + skybox passes.

use crate::{
    camera::CameraController,
    mesh::Mesh,
    pipeline::{
        create_skybox_bind_group_layout,
        create_skybox_pipeline,
        create_terrain_bind_group_layout,
        create_terrain_pipeline,
    },
    texture::Texture,
};
use bytemuck::{Pod, Zeroable};
use image::RgbaImage;
use procgen::TerrainMeshData;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// World-space point light position.
pub const LIGHT_POSITION: [f32; 3] = [128.0, 96.0, 128.0];
/// Slightly warm white.
pub const LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 0.9];

/// Terrain shader uniform (must match terrain.wgsl Uniforms).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TerrainUniform {
    pub mvp: [[f32; 4]; 4],
    pub light_position: [f32; 3],
    pub _pad0: f32,
    pub light_color: [f32; 3],
    pub _pad1: f32,
}

/// Skybox shader uniform (must match skybox.wgsl Uniforms).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SkyboxUniform {
    pub view_projection_inverse: [[f32; 4]; 4],
}

/// Decoded images the renderer uploads at startup: one terrain color map and
/// six cubemap faces in +X, -X, +Y, -Y, +Z, -Z order.
pub struct SceneTextures {
    pub terrain: RgbaImage,
    pub skybox_faces: [RgbaImage; 6],
}

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("failed to acquire GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("cubemap faces must share one size; face {face} is {got_w}x{got_h}, expected {want_w}x{want_h}")]
    CubemapFaceMismatch {
        face: usize,
        got_w: u32,
        got_h: u32,
        want_w: u32,
        want_h: u32,
    },
}

/// Per-pipeline GPU resources: the pipeline itself, its uniform buffer, and
/// the bind group tying uniform + sampler + texture together.
struct PipelineResources {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Main renderer state.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    terrain: PipelineResources,
    skybox: PipelineResources,
    meshes: Vec<Mesh>,
    depth_texture: Texture,
}

impl Renderer {
    /// Create a renderer for the given window, uploading the scene textures
    /// and building both pipelines.
    pub async fn new(window: Arc<Window>, scene: &SceneTextures) -> Result<Self, RendererError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        // Prefer Mailbox (low-latency vsync) if available; otherwise AutoVsync.
        let present_mode = surface_caps
            .present_modes
            .iter()
            .find(|m| matches!(m, wgpu::PresentMode::Mailbox))
            .copied()
            .unwrap_or(wgpu::PresentMode::AutoVsync);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        let (want_w, want_h) = scene.skybox_faces[0].dimensions();
        for (face, img) in scene.skybox_faces.iter().enumerate() {
            let (got_w, got_h) = img.dimensions();
            if (got_w, got_h) != (want_w, want_h) {
                return Err(RendererError::CubemapFaceMismatch {
                    face,
                    got_w,
                    got_h,
                    want_w,
                    want_h,
                });
            }
        }

        let terrain_texture = Texture::from_image(&device, &queue, &scene.terrain, "Terrain Color");
        let skybox_texture = Texture::cubemap(&device, &queue, &scene.skybox_faces, "Skybox Cubemap");

        // Terrain pipeline
        let terrain_layout = create_terrain_bind_group_layout(&device);
        let terrain_uniform = TerrainUniform {
            mvp: glam::Mat4::IDENTITY.to_cols_array_2d(),
            light_position: LIGHT_POSITION,
            _pad0: 0.0,
            light_color: LIGHT_COLOR,
            _pad1: 0.0,
        };
        let terrain_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Uniform Buffer"),
            contents: bytemuck::cast_slice(&[terrain_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let terrain_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Terrain Bind Group"),
            layout: &terrain_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: terrain_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&terrain_texture.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&terrain_texture.view),
                },
            ],
        });
        let terrain_pipeline = create_terrain_pipeline(&device, &config, &terrain_layout);

        // Skybox pipeline
        let skybox_layout = create_skybox_bind_group_layout(&device);
        let skybox_uniform = SkyboxUniform {
            view_projection_inverse: glam::Mat4::IDENTITY.to_cols_array_2d(),
        };
        let skybox_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skybox Uniform Buffer"),
            contents: bytemuck::cast_slice(&[skybox_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let skybox_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Bind Group"),
            layout: &skybox_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: skybox_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&skybox_texture.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&skybox_texture.view),
                },
            ],
        });
        let skybox_pipeline = create_skybox_pipeline(&device, &config, &skybox_layout);

        let depth_texture =
            Texture::create_depth_texture(&device, config.width, config.height, "Depth Texture");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            terrain: PipelineResources {
                pipeline: terrain_pipeline,
                uniform_buffer: terrain_buffer,
                bind_group: terrain_bind_group,
            },
            skybox: PipelineResources {
                pipeline: skybox_pipeline,
                uniform_buffer: skybox_buffer,
                bind_group: skybox_bind_group,
            },
            meshes: Vec::new(),
            depth_texture,
        })
    }

    /// Upload a terrain mesh and add it to the draw list.
    pub fn push_mesh(&mut self, data: &TerrainMeshData) {
        log::debug!(
            "uploading terrain mesh: {} vertices, {} indices",
            data.vertex_count,
            data.index_count
        );
        self.meshes.push(Mesh::from_terrain(&self.device, data));
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Handle window resize. The depth texture is recreated to match.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Texture::create_depth_texture(
                &self.device,
                self.config.width,
                self.config.height,
                "Depth Texture",
            );
        }
    }

    /// Render one frame: update both uniforms from the camera, then draw the
    /// terrain meshes followed by the skybox in a single pass sharing the
    /// depth buffer.
    pub fn render(&mut self, camera: &CameraController) -> Result<(), RendererError> {
        let terrain_uniform = TerrainUniform {
            mvp: camera.model_view_projection().to_cols_array_2d(),
            light_position: LIGHT_POSITION,
            _pad0: 0.0,
            light_color: LIGHT_COLOR,
            _pad1: 0.0,
        };
        self.queue.write_buffer(
            &self.terrain.uniform_buffer,
            0,
            bytemuck::cast_slice(&[terrain_uniform]),
        );

        let skybox_uniform = SkyboxUniform {
            view_projection_inverse: camera.skybox_view_projection_inverse().to_cols_array_2d(),
        };
        self.queue.write_buffer(
            &self.skybox.uniform_buffer,
            0,
            bytemuck::cast_slice(&[skybox_uniform]),
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.12,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.terrain.pipeline);
            pass.set_bind_group(0, &self.terrain.bind_group, &[]);
            for mesh in &self.meshes {
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
            }

            // Skybox last: its far-plane depth only survives where nothing
            // closer was drawn.
            pass.set_pipeline(&self.skybox.pipeline);
            pass.set_bind_group(0, &self.skybox.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Uniform structs must match WGSL std140 sizes exactly.
    #[test]
    fn uniform_sizes() {
        assert_eq!(std::mem::size_of::<TerrainUniform>(), 96);
        assert_eq!(std::mem::size_of::<SkyboxUniform>(), 64);
    }
}
