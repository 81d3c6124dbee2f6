use std::{iter, sync::Arc};

use wgpu::{util::DeviceExt, DepthStencilState, RenderPipeline, TextureFormat};
use winit::window::Window;

use crate::{
    error::RenderError,
    gfx::{
        camera::camera_utils::convert_matrix4_to_array,
        geometry::GeometryData,
        resources::TextureResource,
        scene::{
            check_mesh_handles, DrawList, GeometryUploader, MeshHandle, NodeId, SceneGraph,
            Vertex3D,
        },
    },
    wgpu_utils::DynamicUniformBuffer,
};

/// Per-draw uniform block. MUST match `NodeUniform` in `shader.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    model_view_projection: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    // x: highlighted, y: lit
    flags: [u32; 4],
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    lit: bool,
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    clear_color: wgpu::Color,

    pipeline: RenderPipeline,
    node_layout: wgpu::BindGroupLayout,
    node_uniforms: DynamicUniformBuffer<NodeUniform>,
    uniform_scratch: Vec<NodeUniform>,

    meshes: Vec<GpuMesh>,
}

impl RenderEngine {
    pub async fn new(
        window: Arc<Window>,
        width: u32,
        height: u32,
        clear_color: [f64; 4],
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let node_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Node Bind Group Layout"),
            entries: &[DynamicUniformBuffer::<NodeUniform>::layout_entry(
                wgpu::ShaderStages::VERTEX_FRAGMENT,
            )],
        });
        let node_uniforms = DynamicUniformBuffer::new(&device, &node_layout, 64);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&node_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // extruded shapes mix windings
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: TextureResource::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        let [r, g, b, a] = clear_color;
        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            clear_color: wgpu::Color { r, g, b, a },
            pipeline,
            node_layout,
            node_uniforms,
            uniform_scratch: Vec::new(),
            meshes: Vec::new(),
        })
    }

    /// Rejects a scene that refers to meshes this renderer never uploaded. Run once after
    /// the scene is built; [`Self::render_frame`] skips unknown handles.
    pub fn check_scene(&self, scene: &SceneGraph) -> Result<(), RenderError> {
        check_mesh_handles(scene, self.meshes.len())
    }

    /// Draws one frame. `highlighted` is drawn brightened.
    pub fn render_frame(
        &mut self,
        draws: &DrawList,
        highlighted: Option<NodeId>,
    ) -> Result<(), wgpu::SurfaceError> {
        self.uniform_scratch.clear();
        for call in draws.calls() {
            let lit = self
                .meshes
                .get(call.mesh.index())
                .is_some_and(|mesh| mesh.lit);
            self.uniform_scratch.push(NodeUniform {
                model_view_projection: convert_matrix4_to_array(call.model_view_projection),
                model: convert_matrix4_to_array(call.model),
                flags: [u32::from(highlighted == Some(call.node)), u32::from(lit), 0, 0],
            });
        }
        self.node_uniforms.write_all(
            &self.device,
            &self.node_layout,
            &self.queue,
            &self.uniform_scratch,
        );

        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.format),
                ..Default::default()
            });
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
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
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);

            for (slot, call) in draws.calls().iter().enumerate() {
                let Some(mesh) = self.meshes.get(call.mesh.index()) else {
                    continue;
                };
                render_pass.set_bind_group(
                    0,
                    self.node_uniforms.bind_group(),
                    &[self.node_uniforms.offset(slot)],
                );
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

impl GeometryUploader for RenderEngine {
    fn upload(&mut self, geometry: &GeometryData) -> Result<MeshHandle, RenderError> {
        if geometry.indices.is_empty() || geometry.vertices.is_empty() {
            return Err(RenderError::EmptyGeometry(geometry.label.clone()));
        }

        let vertices = geometry.to_vertices();
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", geometry.label)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Index Buffer", geometry.label)),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        self.meshes.push(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            lit: geometry.lit,
        });
        log::debug!(
            "uploaded `{}`: {} vertices, {} triangles",
            geometry.label,
            geometry.vertex_count(),
            geometry.triangle_count()
        );
        Ok(MeshHandle::new(self.meshes.len() as u32 - 1))
    }
}
