use glam::{Mat4, Vec3};

use crate::error::ConfigError;

/// A fixed look-at camera with a perspective lens.
///
/// The view matrix is derived once from `eye`, `center`, and `up`; only the aspect
/// ratio changes from frame to frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    pub fovy: f32, // radians
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            center: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 0.5,
            near: 1.0,
            far: 15.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.eye = Vec3::new(x, y, z);
        self
    }

    pub fn looking_at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.center = Vec3::new(x, y, z);
        self
    }

    pub fn up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    pub fn fovy(mut self, radians: f32) -> Self {
        self.fovy = radians;
        self
    }

    pub fn clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// World to camera space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center, self.up)
    }

    /// Camera to clip space, with wgpu's `[0, 1]` depth range.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy, aspect, self.near, self.far)
    }

    /// Rejects clip planes, field of view, or orientation the matrices cannot be built from.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let (near, far) = (self.near, self.far);
        if !(near > 0.0 && far > near && far.is_finite()) {
            return Err(ConfigError::InvalidClipPlanes { near, far });
        }

        if !(self.fovy > 0.0 && self.fovy < std::f32::consts::PI) {
            return Err(ConfigError::InvalidFov(self.fovy));
        }

        // up must not be parallel to the view direction
        let side = (self.center - self.eye).cross(self.up);
        if !side.is_finite() || side.length_squared() == 0.0 {
            return Err(ConfigError::DegenerateCamera);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_moves_world_away_from_eye() {
        let view = Camera::default().view_matrix();
        let origin = view.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-6);
    }

    #[test]
    fn projection_maps_clip_planes_to_depth_range() {
        let camera = Camera::default();
        let proj = camera.projection_matrix(4.0 / 3.0);

        let near = proj.project_point3(Vec3::new(0.0, 0.0, -camera.near));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -camera.far));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn validate_checks_lens_and_orientation() {
        assert_eq!(Camera::default().validate(), Ok(()));
        assert_eq!(
            Camera::new().clip(0.0, 10.0).validate(),
            Err(ConfigError::InvalidClipPlanes { near: 0.0, far: 10.0 })
        );
        assert_eq!(
            Camera::new().fovy(std::f32::consts::PI).validate(),
            Err(ConfigError::InvalidFov(std::f32::consts::PI))
        );
        assert_eq!(
            Camera::new().at(0.0, 0.0, 0.0).validate(),
            Err(ConfigError::DegenerateCamera)
        );
    }
}
