//! The sphere render pass: pipeline, matrix uniforms, and depth buffer.
//!
//! [`SpherePass`] is built from a loaded [`ShaderProgram`] and the names in
//! [`ShaderConfig`]. Vertex inputs and uniforms are resolved by name through the
//! program's reflection:
//!
//! - the position attribute is required (checked when the program is loaded)
//! - the normal attribute and each matrix uniform are optional; a missing one is
//!   logged once and left out of the pipeline, so nothing is uploaded for it
//!
//! # Pipeline Configuration
//!
//! - Triangle list, counter-clockwise front faces, back-face culling
//! - `Depth32Float` depth buffer with `Less` comparison, resized with the surface
//! - Opaque color output to the surface format

use std::collections::BTreeMap;

use glam::Mat4;

use crate::config::ShaderConfig;
use crate::error::ShaderError;
use crate::gpu::GpuContext;
use crate::mesh::{NORMAL_SLOT, POSITION_SLOT, SphereMesh};
use crate::shader::{MAT4_SIZE, ShaderProgram, UniformLocation};
use crate::transform::FrameTransforms;

/// Which per-frame matrix a uniform slot receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixRole {
    World,
    Combined,
    Normal,
}

impl MatrixRole {
    fn select(self, transforms: &FrameTransforms) -> Mat4 {
        match self {
            MatrixRole::World => transforms.world,
            MatrixRole::Combined => transforms.combined,
            MatrixRole::Normal => transforms.normal,
        }
    }
}

struct MatrixUniform {
    role: MatrixRole,
    buffer: wgpu::Buffer,
}

/// Renders the uploaded sphere with the per-frame matrices.
pub struct SpherePass {
    pipeline: wgpu::RenderPipeline,
    /// One per bind group index used by the shader, including empty gaps.
    bind_groups: Vec<wgpu::BindGroup>,
    uniforms: Vec<MatrixUniform>,
    uses_normals: bool,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl SpherePass {
    pub fn new(
        gpu: &GpuContext,
        program: &ShaderProgram,
        names: &ShaderConfig,
    ) -> Result<Self, ShaderError> {
        let device = &gpu.device;

        // Resolve uniforms by name; skip the ones the shader does not declare
        let mut resolved: Vec<(MatrixRole, UniformLocation)> = Vec::new();
        for (role, name) in [
            (MatrixRole::World, &names.world_uniform),
            (MatrixRole::Combined, &names.combined_uniform),
            (MatrixRole::Normal, &names.normal_uniform),
        ] {
            match program.uniform_location(name) {
                Some(location) if location.size != MAT4_SIZE => {
                    return Err(ShaderError::UniformType {
                        name: name.clone(),
                        size: location.size,
                    });
                }
                Some(location) => resolved.push((role, location)),
                None => log::warn!("Uniform '{}' not found in shader, skipping upload", name),
            }
        }

        let mut uniforms = Vec::with_capacity(resolved.len());
        let mut groups: BTreeMap<u32, Vec<(u32, usize)>> = BTreeMap::new();
        for (role, location) in &resolved {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Sphere Matrix Uniform"),
                size: MAT4_SIZE as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            groups
                .entry(location.group)
                .or_default()
                .push((location.binding, uniforms.len()));
            uniforms.push(MatrixUniform {
                role: *role,
                buffer,
            });
        }

        let group_count = groups.keys().next_back().map_or(0, |g| g + 1);
        let mut bind_group_layouts = Vec::with_capacity(group_count as usize);
        let mut bind_groups = Vec::with_capacity(group_count as usize);

        for group in 0..group_count {
            let members = groups.get(&group).map(Vec::as_slice).unwrap_or_default();

            let layout_entries: Vec<_> = members
                .iter()
                .map(|&(binding, _)| wgpu::BindGroupLayoutEntry {
                    binding,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                })
                .collect();

            let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Sphere Bind Group Layout"),
                entries: &layout_entries,
            });

            let entries: Vec<_> = members
                .iter()
                .map(|&(binding, index)| wgpu::BindGroupEntry {
                    binding,
                    resource: uniforms[index].buffer.as_entire_binding(),
                })
                .collect();

            bind_groups.push(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Sphere Bind Group"),
                layout: &layout,
                entries: &entries,
            }));
            bind_group_layouts.push(layout);
        }

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sphere Pipeline Layout"),
            bind_group_layouts: &bind_group_layouts.iter().collect::<Vec<_>>(),
            push_constant_ranges: &[],
        });

        // Vertex streams: positions always, normals only if the shader reads them
        let position_attribute = SphereMesh::float3_attribute(program.interface.position_location());
        let normal_location = program.attribute_location(&names.normal_attribute);
        if normal_location.is_none() {
            log::warn!(
                "Attribute '{}' not found in shader, normals will not be bound",
                names.normal_attribute
            );
        }
        let normal_attribute = normal_location.map(SphereMesh::float3_attribute);

        let mut vertex_buffers = vec![SphereMesh::attribute_layout(&position_attribute)];
        if let Some(attribute) = &normal_attribute {
            vertex_buffers.push(SphereMesh::attribute_layout(attribute));
        }

        let color_target = program.interface.color_target() as usize;
        let mut targets = vec![None; color_target];
        targets.push(Some(wgpu::ColorTargetState {
            format: gpu.config.format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        }));

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sphere Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &program.vertex,
                entry_point: Some(program.interface.vertex_entry.as_str()),
                buffers: &vertex_buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &program.fragment,
                entry_point: Some(program.interface.fragment_entry.as_str()),
                targets: &targets,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            bind_groups,
            uniforms,
            uses_normals: normal_attribute.is_some(),
            depth_view: Self::create_depth_view(gpu),
            depth_size: (gpu.width(), gpu.height()),
        })
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreates the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Roles of the uniforms that are actually uploaded each frame.
    pub fn uploaded_roles(&self) -> Vec<MatrixRole> {
        self.uniforms.iter().map(|u| u.role).collect()
    }

    /// Clears color and depth, uploads the frame's matrices, and draws every face.
    pub fn render(
        &self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear_color: wgpu::Color,
        mesh: &SphereMesh,
        transforms: &FrameTransforms,
    ) {
        for uniform in &self.uniforms {
            let matrix = uniform.role.select(transforms);
            gpu.queue.write_buffer(
                &uniform.buffer,
                0,
                bytemuck::cast_slice(&[matrix.to_cols_array_2d()]),
            );
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Sphere Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        for (index, bind_group) in self.bind_groups.iter().enumerate() {
            render_pass.set_bind_group(index as u32, bind_group, &[]);
        }

        render_pass.set_vertex_buffer(POSITION_SLOT, mesh.position_buffer.slice(..));
        if self.uses_normals {
            render_pass.set_vertex_buffer(NORMAL_SLOT, mesh.normal_buffer.slice(..));
        }
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.index_count(), 0, 0..1);
    }
}
