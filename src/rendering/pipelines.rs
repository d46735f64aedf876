use wgpu::PipelineCompilationOptions;

use crate::rendering::mesh::VERTEX_LAYOUT;
use crate::rendering::texture::DepthTexture;

/// The render pipelines for the four shading-mode groups (the vertex-color
/// group additionally splits by primitive topology).
pub struct Pipelines {
    pub uniform_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
    pub phong: wgpu::RenderPipeline,
    pub textured: wgpu::RenderPipeline,
    pub vertex_color: wgpu::RenderPipeline,
    pub vertex_color_lines: wgpu::RenderPipeline,
    pub vertex_color_2d: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let phong_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Phong shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/phong.wgsl").into()),
        });
        let vertex_color_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Vertex color shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/vertex_color.wgsl").into()),
        });

        let phong_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Phong pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &uniform_layout],
            push_constant_ranges: &[],
        });
        let textured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Textured pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let vertex_color_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Vertex color pipeline layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let phong = build_pipeline(
            device,
            "Phong pipeline",
            &phong_layout,
            &phong_shader,
            "fs_phong",
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
            true,
        );
        let textured = build_pipeline(
            device,
            "Textured pipeline",
            &textured_layout,
            &phong_shader,
            "fs_textured",
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
            true,
        );
        let vertex_color = build_pipeline(
            device,
            "Vertex color pipeline",
            &vertex_color_layout,
            &vertex_color_shader,
            "fs_main",
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
            true,
        );
        let vertex_color_lines = build_pipeline(
            device,
            "Vertex color line pipeline",
            &vertex_color_layout,
            &vertex_color_shader,
            "fs_main",
            surface_format,
            wgpu::PrimitiveTopology::LineList,
            true,
        );
        // The 2D overlay draws last, on top of everything.
        let vertex_color_2d = build_pipeline(
            device,
            "Vertex color 2D pipeline",
            &vertex_color_layout,
            &vertex_color_shader,
            "fs_main",
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
            false,
        );

        Self {
            uniform_layout,
            texture_layout,
            phong,
            textured,
            vertex_color,
            vertex_color_lines,
            vertex_color_2d,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn build_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &str,
    surface_format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    depth_test: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[VERTEX_LAYOUT],
            compilation_options: PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthTexture::DEPTH_FORMAT,
            depth_write_enabled: depth_test,
            depth_compare: if depth_test {
                wgpu::CompareFunction::Less
            } else {
                wgpu::CompareFunction::Always
            },
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
