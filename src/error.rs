//! Error types for startup and shader loading.
//!
//! Almost everything that can fail happens before the first frame: configuration
//! checks, GPU initialisation, and shader loading. Per-frame surface errors are
//! recovered in place by the app, except the fatal ones, which end the run as
//! [`AppError::Surface`].

use std::path::PathBuf;

/// Rejected [`AppConfig`](crate::AppConfig) values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Slices or stacks was zero.
    ZeroSubdivisions { slices: u32, stacks: u32 },
    /// The mesh would need more vertices than a `u32` index can address.
    TooManyVertices(usize),
    /// The index buffer would hold more indices than one draw call can take.
    TooManyIndices(usize),
    /// Two matrix roles were given the same uniform name.
    DuplicateUniform(String),
    /// Radius must be finite and positive.
    InvalidRadius(f32),
    /// Animation cycle must be finite and positive.
    InvalidCycle(f64),
    /// Near plane must be positive and smaller than the far plane.
    InvalidClipPlanes { near: f32, far: f32 },
    /// Vertical field of view must lie strictly between 0 and π.
    InvalidFov(f32),
    /// Eye and center coincide, or up is parallel to the view direction.
    DegenerateCamera,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroSubdivisions { slices, stacks } => write!(
                f,
                "sphere needs at least one slice and one stack (got {} slices, {} stacks)",
                slices, stacks
            ),
            ConfigError::TooManyVertices(count) => {
                write!(f, "sphere has {} vertices, more than u32 indices can address", count)
            }
            ConfigError::TooManyIndices(count) => {
                write!(f, "sphere has {} indices, more than one u32 draw range can hold", count)
            }
            ConfigError::DuplicateUniform(name) => {
                write!(f, "uniform '{}' is assigned to more than one matrix", name)
            }
            ConfigError::InvalidRadius(r) => write!(f, "invalid sphere radius: {}", r),
            ConfigError::InvalidCycle(c) => write!(f, "invalid animation cycle: {}s", c),
            ConfigError::InvalidClipPlanes { near, far } => {
                write!(f, "invalid clip planes: near {} far {}", near, far)
            }
            ConfigError::InvalidFov(fov) => write!(f, "invalid vertical field of view: {}", fov),
            ConfigError::DegenerateCamera => write!(f, "camera eye/center/up do not define a view"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors from loading or reflecting the shader program.
#[derive(Debug)]
pub enum ShaderError {
    /// A shader source file could not be read.
    Io { path: PathBuf, source: std::io::Error },
    /// WGSL failed to parse. The message is already formatted against the source.
    Parse { path: PathBuf, message: String },
    /// No entry point for the required stage in the given file.
    MissingEntryPoint { path: PathBuf, stage: &'static str },
    /// The required vertex position attribute was not declared.
    MissingAttribute(String),
    /// The required fragment output was not declared.
    MissingOutput(String),
    /// A uniform was found by name but is not a 4×4 float matrix.
    UniformType { name: String, size: u32 },
}

impl std::fmt::Display for ShaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderError::Io { path, source } => {
                write!(f, "failed to read shader '{}': {}", path.display(), source)
            }
            ShaderError::Parse { path, message } => {
                write!(f, "failed to parse shader '{}':\n{}", path.display(), message)
            }
            ShaderError::MissingEntryPoint { path, stage } => {
                write!(f, "shader '{}' has no {} entry point", path.display(), stage)
            }
            ShaderError::MissingAttribute(name) => {
                write!(f, "vertex attribute '{}' not found", name)
            }
            ShaderError::MissingOutput(name) => write!(f, "fragment output '{}' not found", name),
            ShaderError::UniformType { name, size } => write!(
                f,
                "uniform '{}' is {} bytes, expected a mat4x4<f32> (64 bytes)",
                name, size
            ),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors from creating the wgpu device and surface.
#[derive(Debug)]
pub enum GpuError {
    Surface(wgpu::CreateSurfaceError),
    Adapter(wgpu::RequestAdapterError),
    Device(wgpu::RequestDeviceError),
    /// The surface reports no supported texture formats for this adapter.
    IncompatibleSurface,
}

impl std::fmt::Display for GpuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpuError::Surface(e) => write!(f, "failed to create surface: {}", e),
            GpuError::Adapter(e) => write!(f, "no suitable GPU adapter: {}", e),
            GpuError::Device(e) => write!(f, "failed to create device: {}", e),
            GpuError::IncompatibleSurface => write!(f, "surface is not supported by the adapter"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::Surface(e) => Some(e),
            GpuError::Adapter(e) => Some(e),
            GpuError::Device(e) => Some(e),
            GpuError::IncompatibleSurface => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::Surface(e)
    }
}

impl From<wgpu::RequestAdapterError> for GpuError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        GpuError::Adapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::Device(e)
    }
}

/// Top-level error returned by [`run`](crate::run).
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Shader(ShaderError),
    Gpu(GpuError),
    EventLoop(winit::error::EventLoopError),
    Window(winit::error::OsError),
    /// The surface failed in a way the frame loop cannot recover from.
    Surface(wgpu::SurfaceError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "invalid configuration: {}", e),
            AppError::Shader(e) => write!(f, "shader error: {}", e),
            AppError::Gpu(e) => write!(f, "GPU error: {}", e),
            AppError::EventLoop(e) => write!(f, "event loop error: {}", e),
            AppError::Window(e) => write!(f, "failed to create window: {}", e),
            AppError::Surface(e) => write!(f, "surface error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Shader(e) => Some(e),
            AppError::Gpu(e) => Some(e),
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Surface(e) => Some(e),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<ShaderError> for AppError {
    fn from(e: ShaderError) -> Self {
        AppError::Shader(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<wgpu::SurfaceError> for AppError {
    fn from(e: wgpu::SurfaceError) -> Self {
        AppError::Surface(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn out_of_memory_becomes_app_error() {
        let error = AppError::from(wgpu::SurfaceError::OutOfMemory);

        assert!(matches!(error, AppError::Surface(wgpu::SurfaceError::OutOfMemory)));
        assert!(error.to_string().starts_with("surface error: "));
        assert!(error.source().is_some());
    }

    #[test]
    fn config_errors_name_the_offending_value() {
        let duplicate = ConfigError::DuplicateUniform("mw".to_string());
        assert_eq!(duplicate.to_string(), "uniform 'mw' is assigned to more than one matrix");

        let indices = ConfigError::TooManyIndices(25_768_624_140);
        assert!(indices.to_string().contains("25768624140"));

        let wrapped = AppError::from(duplicate.clone());
        assert!(matches!(&wrapped, AppError::Config(e) if *e == duplicate));
    }
}
