//! Application configuration.
//!
//! [`AppConfig`] gathers every constant the sample needs: window, sphere tessellation,
//! animation cycle, camera, projection, and the shader files and names to bind. The
//! defaults reproduce the classic sample: a 64×32 unit sphere on white, turning once
//! every five seconds.
//!
//! ```
//! use shaded_sphere::AppConfig;
//!
//! let config = AppConfig::new()
//!     .title("Sphere")
//!     .size(1280, 720)
//!     .subdivisions(32, 16)
//!     .cycle(2.5);
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use crate::camera::Camera;
use crate::error::ConfigError;
use crate::sphere::SphereGeometry;

/// Names the shader program must expose, resolved by reflection at load time.
#[derive(Clone, Debug)]
pub struct ShaderConfig {
    pub vertex_path: PathBuf,
    pub fragment_path: PathBuf,
    /// Vertex position input. Required.
    pub position_attribute: String,
    /// Fragment color output. Required.
    pub fragment_output: String,
    /// Vertex normal input. Skipped if absent.
    pub normal_attribute: String,
    /// World (model-view) matrix uniform. Skipped if absent.
    pub world_uniform: String,
    /// Combined model-view-projection matrix uniform. Skipped if absent.
    pub combined_uniform: String,
    /// Normal matrix uniform. Skipped if absent.
    pub normal_uniform: String,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            vertex_path: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/sphere_vert.wgsl")),
            fragment_path: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/sphere_frag.wgsl")),
            position_attribute: "pv".to_string(),
            fragment_output: "fc".to_string(),
            normal_attribute: "nv".to_string(),
            world_uniform: "mw".to_string(),
            combined_uniform: "mc".to_string(),
            normal_uniform: "mg".to_string(),
        }
    }
}

/// Configuration for the sample window, mesh, animation, and camera.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Background color, linear RGBA.
    pub clear_color: [f64; 4],
    pub radius: f32,
    pub slices: u32,
    pub stacks: u32,
    /// Seconds per full turn.
    pub cycle: f64,
    pub camera: Camera,
    pub shaders: ShaderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "ggsample07".to_string(),
            width: 640,
            height: 480,
            clear_color: [1.0, 1.0, 1.0, 0.0],
            radius: 1.0,
            slices: 64,
            stacks: 32,
            cycle: 5.0,
            camera: Camera::default(),
            shaders: ShaderConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn clear_color(mut self, r: f64, g: f64, b: f64, a: f64) -> Self {
        self.clear_color = [r, g, b, a];
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn subdivisions(mut self, slices: u32, stacks: u32) -> Self {
        self.slices = slices;
        self.stacks = stacks;
        self
    }

    pub fn cycle(mut self, seconds: f64) -> Self {
        self.cycle = seconds;
        self
    }

    pub fn camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Use a different pair of WGSL files. Attribute and uniform names are kept.
    pub fn shader_files(mut self, vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        self.shaders.vertex_path = vertex.into();
        self.shaders.fragment_path = fragment.into();
        self
    }

    pub fn shaders(mut self, shaders: ShaderConfig) -> Self {
        self.shaders = shaders;
        self
    }

    /// Checks every value the render loop relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slices == 0 || self.stacks == 0 {
            return Err(ConfigError::ZeroSubdivisions {
                slices: self.slices,
                stacks: self.stacks,
            });
        }

        let vertices = SphereGeometry::vertex_count(self.slices, self.stacks);
        if vertices > u32::MAX as usize {
            return Err(ConfigError::TooManyVertices(vertices));
        }

        let indices = SphereGeometry::face_count(self.slices, self.stacks) * 3;
        if indices > u32::MAX as usize {
            return Err(ConfigError::TooManyIndices(indices));
        }

        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.radius));
        }

        if !(self.cycle.is_finite() && self.cycle > 0.0) {
            return Err(ConfigError::InvalidCycle(self.cycle));
        }

        self.shaders.validate()?;
        self.camera.validate()
    }
}

impl ShaderConfig {
    /// Each matrix needs its own uniform; a shared name would bind two buffers to one slot.
    fn validate(&self) -> Result<(), ConfigError> {
        let uniforms = [&self.world_uniform, &self.combined_uniform, &self.normal_uniform];
        for (i, name) in uniforms.iter().enumerate() {
            if uniforms[i + 1..].contains(name) {
                return Err(ConfigError::DuplicateUniform(name.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!((config.slices, config.stacks), (64, 32));
        assert_eq!(config.cycle, 5.0);
        assert_eq!(config.shaders.position_attribute, "pv");
        assert_eq!(config.shaders.fragment_output, "fc");
    }

    #[test]
    fn rejects_zero_subdivisions() {
        let config = AppConfig::new().subdivisions(0, 8);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroSubdivisions { slices: 0, stacks: 8 })
        );
    }

    #[test]
    fn rejects_oversized_mesh() {
        let config = AppConfig::new().subdivisions(u32::MAX, 1);
        assert!(matches!(config.validate(), Err(ConfigError::TooManyVertices(_))));
    }

    #[test]
    fn rejects_index_count_past_u32() {
        // vertices still fit in u32 here, the index count does not
        let config = AppConfig::new().subdivisions(65534, 65535);
        assert!(SphereGeometry::vertex_count(65534, 65535) <= u32::MAX as usize);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyIndices(65534 * 65535 * 2 * 3))
        );
    }

    #[test]
    fn rejects_shared_uniform_names() {
        let shaders = ShaderConfig {
            normal_uniform: "mw".to_string(),
            ..ShaderConfig::default()
        };
        assert_eq!(
            AppConfig::new().shaders(shaders).validate(),
            Err(ConfigError::DuplicateUniform("mw".to_string()))
        );

        let shaders = ShaderConfig {
            combined_uniform: "mg".to_string(),
            ..ShaderConfig::default()
        };
        assert_eq!(
            AppConfig::new().shaders(shaders).validate(),
            Err(ConfigError::DuplicateUniform("mg".to_string()))
        );
    }

    #[test]
    fn rejects_bad_cycle_and_radius() {
        assert_eq!(
            AppConfig::new().cycle(0.0).validate(),
            Err(ConfigError::InvalidCycle(0.0))
        );
        assert!(matches!(
            AppConfig::new().cycle(f64::NAN).validate(),
            Err(ConfigError::InvalidCycle(_))
        ));
        assert_eq!(
            AppConfig::new().radius(-1.0).validate(),
            Err(ConfigError::InvalidRadius(-1.0))
        );
    }

    #[test]
    fn rejects_bad_camera() {
        let planes = AppConfig::new().camera(Camera::new().clip(2.0, 1.0));
        assert_eq!(
            planes.validate(),
            Err(ConfigError::InvalidClipPlanes { near: 2.0, far: 1.0 })
        );

        let parallel_up = AppConfig::new().camera(Camera::new().up(Vec3::Z));
        assert_eq!(parallel_up.validate(), Err(ConfigError::DegenerateCamera));

        let fov = AppConfig::new().camera(Camera::new().fovy(0.0));
        assert_eq!(fov.validate(), Err(ConfigError::InvalidFov(0.0)));
    }
}
