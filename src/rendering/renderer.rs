use std::collections::HashMap;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec4};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::assets::{Assets, MeshId, TextureId};
use crate::camera::{self, OrbitCamera};
use crate::rendering::context::GpuContext;
use crate::rendering::mesh::{GpuMesh, Topology};
use crate::rendering::pipelines::Pipelines;
use crate::rendering::texture::{DepthTexture, GpuTexture};
use crate::scene_graph::{ObjectId2, ObjectId3, ObjectTree2, ObjectTree3, ShadingMode};

// Shader-side defaults for drawables that carry no full material, matching
// the ambient/specular/shininess the lit shader is configured with at
// startup (0x111111 ambient, white specular, shininess 80).
const GLOBAL_AMBIENT: Vec4 = Vec4::new(0.0667, 0.0667, 0.0667, 1.0);
const DEFAULT_SHININESS: f32 = 80.0;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    projection: Mat4,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PhongUniform {
    modelview: Mat4,
    normal_matrix: Mat4,
    ambient: Vec4,
    diffuse: Vec4,
    specular: Vec4,
    shininess: Vec4,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct VertexColorUniform {
    transform_projection: Mat4,
}

/// Per-drawable GPU state: one uniform buffer plus its bind group. The
/// buffer is sized for the largest uniform struct and reused by every
/// pipeline.
struct DrawableBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

fn create_binding(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> DrawableBinding {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Drawable uniform buffer"),
        size: std::mem::size_of::<PhongUniform>() as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Drawable bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    DrawableBinding { buffer, bind_group }
}

/// Forward renderer: uploads CPU assets lazily, keeps per-drawable uniform
/// bindings keyed by object id, and draws the shading-mode groups in a fixed
/// sequence each frame (lit, vertex-color 3D, textured, vertex-color 2D),
/// each group in registry-insertion order.
pub struct Renderer {
    pub window: Arc<Window>,
    context: GpuContext,
    pipelines: Pipelines,
    depth: DepthTexture,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    meshes: HashMap<MeshId, GpuMesh>,
    textures: HashMap<TextureId, GpuTexture>,
    bindings_3d: HashMap<ObjectId3, DrawableBinding>,
    bindings_2d: HashMap<ObjectId2, DrawableBinding>,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let context = pollster::block_on(GpuContext::new(window.clone()))?;
        let pipelines = Pipelines::new(&context.device, context.config.format);
        let depth = DepthTexture::new(&context.device, &context.config);

        let camera_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera uniform buffer"),
                contents: bytemuck::bytes_of(&CameraUniform {
                    projection: Mat4::IDENTITY,
                }),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera bind group"),
                layout: &pipelines.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        Ok(Self {
            window,
            context,
            pipelines,
            depth,
            camera_buffer,
            camera_bind_group,
            meshes: HashMap::new(),
            textures: HashMap::new(),
            bindings_3d: HashMap::new(),
            bindings_2d: HashMap::new(),
        })
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.context.resize(size);
        self.depth = DepthTexture::new(&self.context.device, &self.context.config);
    }

    pub fn render(
        &mut self,
        tree_3d: &ObjectTree3,
        tree_2d: &ObjectTree2,
        assets: &Assets,
        camera: &OrbitCamera,
        background: Vec4,
    ) -> Result<(), wgpu::SurfaceError> {
        self.prepare(tree_3d, tree_2d, assets, camera);

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background.x as f64,
                            g: background.y as f64,
                            b: background.z as f64,
                            a: background.w as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.depth.view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // Lit group (full material and flat color share the pipeline)
            for (id, drawable) in tree_3d.registry().iter() {
                let mode = drawable.shading_mode();
                if mode != ShadingMode::LitMaterial && mode != ShadingMode::LitColor {
                    continue;
                }
                let (Some(binding), Some(mesh)) = (
                    self.bindings_3d.get(&id),
                    drawable.mesh().and_then(|mesh_id| self.meshes.get(&mesh_id)),
                ) else {
                    continue;
                };
                if mesh.topology != Topology::TriangleList {
                    continue;
                }
                pass.set_pipeline(&self.pipelines.phong);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_bind_group(1, &binding.bind_group, &[]);
                draw_mesh(&mut pass, mesh);
            }

            // Vertex-color 3D group, split by topology
            for (id, drawable) in tree_3d.registry().iter() {
                if drawable.shading_mode() != ShadingMode::VertexColor {
                    continue;
                }
                let (Some(binding), Some(mesh)) = (
                    self.bindings_3d.get(&id),
                    drawable.mesh().and_then(|mesh_id| self.meshes.get(&mesh_id)),
                ) else {
                    continue;
                };
                let pipeline = match mesh.topology {
                    Topology::TriangleList => &self.pipelines.vertex_color,
                    Topology::LineList => &self.pipelines.vertex_color_lines,
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &binding.bind_group, &[]);
                draw_mesh(&mut pass, mesh);
            }

            // Textured group
            for (id, drawable) in tree_3d.registry().iter() {
                if drawable.shading_mode() != ShadingMode::Textured {
                    continue;
                }
                let (Some(binding), Some(mesh), Some(texture)) = (
                    self.bindings_3d.get(&id),
                    drawable.mesh().and_then(|mesh_id| self.meshes.get(&mesh_id)),
                    drawable.texture().and_then(|texture_id| self.textures.get(&texture_id)),
                ) else {
                    continue;
                };
                if mesh.topology != Topology::TriangleList {
                    continue;
                }
                pass.set_pipeline(&self.pipelines.textured);
                pass.set_bind_group(0, &self.camera_bind_group, &[]);
                pass.set_bind_group(1, &binding.bind_group, &[]);
                pass.set_bind_group(2, &texture.bind_group, &[]);
                draw_mesh(&mut pass, mesh);
            }

            // 2D overlay, always vertex-colored, drawn on top
            for (id, drawable) in tree_2d.registry().iter() {
                let (Some(binding), Some(mesh)) = (
                    self.bindings_2d.get(&id),
                    drawable.mesh().and_then(|mesh_id| self.meshes.get(&mesh_id)),
                ) else {
                    continue;
                };
                pass.set_pipeline(&self.pipelines.vertex_color_2d);
                pass.set_bind_group(0, &binding.bind_group, &[]);
                draw_mesh(&mut pass, mesh);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Uploads any meshes/textures referenced for the first time and
    /// refreshes per-drawable uniforms. Bindings whose registry entry
    /// disappeared are dropped.
    fn prepare(
        &mut self,
        tree_3d: &ObjectTree3,
        tree_2d: &ObjectTree2,
        assets: &Assets,
        camera: &OrbitCamera,
    ) {
        let device = &self.context.device;
        let queue = &self.context.queue;

        let projection = camera.projection_matrix(self.context.aspect_ratio());
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform { projection }),
        );

        self.bindings_3d
            .retain(|id, _| tree_3d.registry().contains(*id));
        self.bindings_2d
            .retain(|id, _| tree_2d.registry().contains(*id));

        let view = camera.view_matrix();
        for (id, drawable) in tree_3d.registry().iter() {
            if let Some(mesh_id) = drawable.mesh() {
                if !self.meshes.contains_key(&mesh_id) {
                    if let Some(data) = assets.mesh(mesh_id) {
                        self.meshes.insert(mesh_id, GpuMesh::upload(device, data));
                    }
                }
            }
            if let Some(texture_id) = drawable.texture() {
                if !self.textures.contains_key(&texture_id) {
                    if let Some(image) = assets.texture(texture_id) {
                        self.textures.insert(
                            texture_id,
                            GpuTexture::upload(device, queue, &self.pipelines.texture_layout, image),
                        );
                    }
                }
            }

            let effective =
                drawable.effective_transformation(view * tree_3d.world_transformation(id));
            let binding = self
                .bindings_3d
                .entry(id)
                .or_insert_with(|| create_binding(device, &self.pipelines.uniform_layout));

            match drawable.shading_mode() {
                ShadingMode::VertexColor => {
                    queue.write_buffer(
                        &binding.buffer,
                        0,
                        bytemuck::bytes_of(&VertexColorUniform {
                            transform_projection: projection * effective,
                        }),
                    );
                }
                mode => {
                    let (ambient, diffuse, specular, shininess) = match mode {
                        ShadingMode::LitMaterial => {
                            let material = drawable.material().copied().unwrap_or_default();
                            (
                                material.ambient,
                                material.diffuse,
                                material.specular,
                                material.shininess,
                            )
                        }
                        ShadingMode::LitColor => (
                            GLOBAL_AMBIENT,
                            drawable.color().unwrap_or(Vec4::ONE),
                            Vec4::ONE,
                            DEFAULT_SHININESS,
                        ),
                        _ => (GLOBAL_AMBIENT, Vec4::ONE, GLOBAL_AMBIENT, DEFAULT_SHININESS),
                    };
                    queue.write_buffer(
                        &binding.buffer,
                        0,
                        bytemuck::bytes_of(&PhongUniform {
                            modelview: effective,
                            normal_matrix: effective.inverse().transpose(),
                            ambient,
                            diffuse,
                            specular,
                            shininess: Vec4::new(shininess, 0.0, 0.0, 0.0),
                        }),
                    );
                }
            }
        }

        let projection_2d = camera::projection_2d();
        for (id, drawable) in tree_2d.registry().iter() {
            if let Some(mesh_id) = drawable.mesh() {
                if !self.meshes.contains_key(&mesh_id) {
                    if let Some(data) = assets.mesh(mesh_id) {
                        self.meshes.insert(mesh_id, GpuMesh::upload(device, data));
                    }
                }
            }

            let effective = drawable
                .effective_transformation(projection_2d * tree_2d.world_transformation(id));
            let binding = self
                .bindings_2d
                .entry(id)
                .or_insert_with(|| create_binding(device, &self.pipelines.uniform_layout));
            queue.write_buffer(
                &binding.buffer,
                0,
                bytemuck::bytes_of(&VertexColorUniform {
                    transform_projection: mat3_to_mat4(effective),
                }),
            );
        }
    }
}

fn draw_mesh(pass: &mut wgpu::RenderPass<'_>, mesh: &GpuMesh) {
    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
    match &mesh.index_buffer {
        Some(indices) => {
            pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.draw_count, 0, 0..1);
        }
        None => pass.draw(0..mesh.draw_count, 0..1),
    }
}

/// Embeds a 2D affine matrix into a 4x4 transform: linear part in the XY
/// block, translation in the last column.
fn mat3_to_mat4(m: Mat3) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(m.x_axis.x, m.x_axis.y, 0.0, 0.0),
        Vec4::new(m.y_axis.x, m.y_axis.y, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(m.z_axis.x, m.z_axis.y, 0.0, 1.0),
    )
}
