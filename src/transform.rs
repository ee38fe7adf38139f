//! Per-frame transform pipeline.
//!
//! Every frame the sphere's matrices are rebuilt from the animation phase:
//!
//! | Matrix     | Value                                  | Uniform |
//! |------------|----------------------------------------|---------|
//! | world      | `view × Rx(2π·phase)`                  | `mw`    |
//! | normal     | `(world⁻¹)ᵀ`                           | `mg`    |
//! | projection | `perspective(fovy, aspect, near, far)` |         |
//! | combined   | `projection × world`                   | `mc`    |
//!
//! Only the view matrix is held across frames.

use glam::Mat4;

use crate::animation::rotation_angle;
use crate::camera::Camera;

/// The matrices for one frame, all column-major.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTransforms {
    pub world: Mat4,
    pub normal: Mat4,
    pub projection: Mat4,
    pub combined: Mat4,
}

impl FrameTransforms {
    /// Builds the frame's matrices from a constant view matrix.
    ///
    /// The rotation about X is applied in view space (`view × rotation`).
    pub fn compute(view: Mat4, camera: &Camera, phase: f32, aspect: f32) -> Self {
        let world = view * Mat4::from_rotation_x(rotation_angle(phase));
        // Normal matrix is inverse transpose of world matrix (for non-uniform scaling)
        let normal = world.inverse().transpose();
        let projection = camera.projection_matrix(aspect);
        let combined = projection * world;

        Self {
            world,
            normal,
            projection,
            combined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat3, Vec3};

    fn approx_eq(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn combined_is_projection_times_world() {
        let camera = Camera::default();
        let view = camera.view_matrix();

        for n in 0..16 {
            let phase = n as f32 / 16.0;
            let aspect = 0.5 + n as f32 * 0.25;
            let frame = FrameTransforms::compute(view, &camera, phase, aspect);

            assert_eq!(frame.combined, frame.projection * frame.world);
            assert_eq!(frame.projection, camera.projection_matrix(aspect));
        }
    }

    #[test]
    fn zero_phase_world_is_view() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        let frame = FrameTransforms::compute(view, &camera, 0.0, 1.0);

        assert!(approx_eq(frame.world, view));
    }

    #[test]
    fn rotation_is_applied_after_view() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        let frame = FrameTransforms::compute(view, &camera, 0.25, 1.0);

        // a quarter turn about X carries +Y onto +Z before viewing
        let p = frame.world.transform_point3(Vec3::Y);
        let expected = view.transform_point3(Vec3::Z);
        assert!((p - expected).length() < 1e-5);
    }

    #[test]
    fn normal_matrix_matches_rotation_for_rigid_world() {
        let camera = Camera::default();
        let view = camera.view_matrix();

        for n in 0..8 {
            let frame = FrameTransforms::compute(view, &camera, n as f32 / 8.0, 1.0);
            let normal = Mat3::from_mat4(frame.normal);
            let world = Mat3::from_mat4(frame.world);
            assert!(normal.abs_diff_eq(world, 1e-5));
        }
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular_under_scale() {
        let camera = Camera::default();
        let view = camera.view_matrix() * Mat4::from_scale(Vec3::new(2.0, 0.5, 1.0));
        let frame = FrameTransforms::compute(view, &camera, 0.1, 1.0);

        // tangent and normal of the unit sphere at (1, 1, 0) / √2
        let tangent = Vec3::new(-1.0, 1.0, 0.0);
        let normal = Vec3::new(1.0, 1.0, 0.0);
        let t = frame.world.transform_vector3(tangent);
        let n = frame.normal.transform_vector3(normal);
        assert!(t.dot(n).abs() < 1e-5);
    }
}
