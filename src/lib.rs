//! # shaded_sphere
//!
//! **A rotating, Phong-shaded UV sphere rendered with wgpu.**
//!
//! The sample does two things. Once, at startup, it tessellates a sphere on the CPU and
//! uploads it. Then, every frame, it rebuilds the world, normal, and projection matrices
//! from the animation phase and draws the sphere with a single indexed draw call.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> Result<(), shaded_sphere::AppError> {
//!     shaded_sphere::run(shaded_sphere::AppConfig::default())
//! }
//! ```
//!
//! ## Pieces
//!
//! - [`SphereGeometry`] builds positions, normals, and triangle indices.
//! - [`AnimationClock`] turns wall-clock time into a phase in `[0, 1)`.
//! - [`FrameTransforms`] derives the per-frame matrices from a fixed [`Camera`].
//! - [`ShaderProgram`] loads a WGSL vertex/fragment pair and resolves names to locations.

mod animation;
mod app;
mod camera;
mod config;
mod error;
mod gpu;
mod mesh;
mod renderer;
mod shader;
mod sphere;
mod transform;
mod window;

pub use animation::{AnimationClock, phase_at, rotation_angle};
pub use app::run;
pub use camera::Camera;
pub use config::{AppConfig, ShaderConfig};
pub use error::{AppError, ConfigError, GpuError, ShaderError};
pub use gpu::GpuContext;
pub use mesh::SphereMesh;
pub use renderer::{MatrixRole, SpherePass};
pub use shader::{ProgramInterface, ShaderProgram, UniformLocation};
pub use sphere::SphereGeometry;
pub use transform::FrameTransforms;
pub use window::AppWindow;

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec3};
