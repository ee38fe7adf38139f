//! GPU-resident sphere geometry.
//!
//! [`SphereMesh`] uploads a [`SphereGeometry`] into three static buffers, one per array,
//! mirroring the CPU layout:
//!
//! | Buffer   | Contents        | Format      | Vertex slot |
//! |----------|-----------------|-------------|-------------|
//! | position | `[f32; 3]` each | `Float32x3` | 0           |
//! | normal   | `[f32; 3]` each | `Float32x3` | 1           |
//! | index    | `[u32; 3]` each | `Uint32`    |             |
//!
//! The shader locations are not fixed here; the renderer resolves them by name and
//! builds the layouts with [`SphereMesh::attribute_layout`].

use wgpu::util::DeviceExt;

use crate::error::ConfigError;
use crate::gpu::GpuContext;
use crate::sphere::SphereGeometry;

/// Vertex buffer slot for positions.
pub const POSITION_SLOT: u32 = 0;
/// Vertex buffer slot for normals.
pub const NORMAL_SLOT: u32 = 1;

/// Uploaded sphere buffers. Written once at creation, read-only afterwards.
#[derive(Debug)]
pub struct SphereMesh {
    pub(crate) position_buffer: wgpu::Buffer,
    pub(crate) normal_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    /// The number of indices in the mesh (determines draw call size).
    pub(crate) index_count: u32,
}

impl SphereMesh {
    /// Uploads positions, normals, and indices to static GPU buffers.
    ///
    /// Fails without touching the device if the indices do not fit one draw call.
    pub fn new(gpu: &GpuContext, geometry: &SphereGeometry) -> Result<Self, ConfigError> {
        let index_count = geometry
            .index_count()
            .ok_or(ConfigError::TooManyIndices(geometry.indices.len() * 3))?;

        let position_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Position Buffer"),
                contents: bytemuck::cast_slice(&geometry.positions),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let normal_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Normal Buffer"),
                contents: bytemuck::cast_slice(&geometry.normals),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Index Buffer"),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        log::info!(
            "Uploaded sphere: {} vertices, {} triangles",
            geometry.positions.len(),
            geometry.indices.len()
        );

        Ok(Self {
            position_buffer,
            normal_buffer,
            index_buffer,
            index_count,
        })
    }

    /// Layout for one tightly packed `Float32x3` stream read at `attribute`.
    pub fn attribute_layout(attribute: &[wgpu::VertexAttribute; 1]) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: attribute,
        }
    }

    /// A `Float32x3` attribute at offset 0 for the given shader location.
    pub fn float3_attribute(shader_location: u32) -> [wgpu::VertexAttribute; 1] {
        [wgpu::VertexAttribute {
            offset: 0,
            shader_location,
            format: wgpu::VertexFormat::Float32x3,
        }]
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}
