use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

/// Primitive topology of a mesh. Trajectories and axis frames are line
/// lists, everything else is triangles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Topology {
    #[default]
    TriangleList,
    LineList,
}

/// CPU-side mesh: raw geometry as produced by the primitive generators, the
/// plot builders, or the importer. Uploaded to the GPU lazily on first use;
/// absent attributes are filled with defaults during interleaving.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl MeshData {
    pub fn triangles() -> Self {
        Self {
            topology: Topology::TriangleList,
            ..Self::default()
        }
    }

    pub fn lines() -> Self {
        Self {
            topology: Topology::LineList,
            ..Self::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of elements a draw call covers: indices if indexed, vertices
    /// otherwise.
    pub fn draw_count(&self) -> u32 {
        if self.indices.is_empty() {
            self.positions.len() as u32
        } else {
            self.indices.len() as u32
        }
    }

    /// Area-weighted smooth vertex normals, for triangle meshes that arrive
    /// without them.
    pub fn compute_normals(&mut self) {
        if self.topology != Topology::TriangleList {
            return;
        }
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        let triangle_of = |index: usize| -> Option<[usize; 3]> {
            if self.indices.is_empty() {
                let base = index * 3;
                (base + 2 < self.positions.len()).then(|| [base, base + 1, base + 2])
            } else {
                let base = index * 3;
                (base + 2 < self.indices.len()).then(|| {
                    [
                        self.indices[base] as usize,
                        self.indices[base + 1] as usize,
                        self.indices[base + 2] as usize,
                    ]
                })
            }
        };

        let mut triangle = 0;
        while let Some([i0, i1, i2]) = triangle_of(triangle) {
            let edge1 = self.positions[i1] - self.positions[i0];
            let edge2 = self.positions[i2] - self.positions[i0];
            let face_normal = edge1.cross(edge2);
            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
            triangle += 1;
        }

        self.normals = normals
            .into_iter()
            .map(|normal| normal.normalize_or_zero())
            .collect();
    }

    fn interleave(&self) -> Vec<Vertex> {
        (0..self.positions.len())
            .map(|i| Vertex {
                position: self.positions[i],
                normal: self.normals.get(i).copied().unwrap_or(Vec3::Z),
                color: self.colors.get(i).copied().unwrap_or(Vec3::ONE),
                uv: self.uvs.get(i).copied().unwrap_or(Vec2::ZERO),
            })
            .collect()
    }
}

/// Interleaved vertex layout shared by every pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Vec3,
    pub uv: Vec2,
}

pub const VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, normal) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, color) as wgpu::BufferAddress,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, uv) as wgpu::BufferAddress,
            shader_location: 3,
            format: wgpu::VertexFormat::Float32x2,
        },
    ],
};

/// GPU-resident mesh buffers, built from a [`MeshData`] on first draw.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub draw_count: u32,
    pub topology: Topology,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let vertices = mesh.interleave();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh vertex buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = if mesh.indices.is_empty() {
            None
        } else {
            Some(
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh index buffer"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
            )
        };

        Self {
            vertex_buffer,
            index_buffer,
            draw_count: mesh.draw_count(),
            topology: mesh.topology,
        }
    }
}
