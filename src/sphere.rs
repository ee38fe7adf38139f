//! Procedural UV-sphere geometry.
//!
//! [`SphereGeometry::generate`] builds a latitude/longitude sphere on the CPU as three
//! parallel arrays: positions, normals, and triangle indices. The arrays are later
//! uploaded unchanged by [`SphereMesh`](crate::SphereMesh).
//!
//! # Layout
//!
//! Vertices are emitted row by row, starting at the north pole (`+Y`) and walking
//! towards the south pole. Each row holds `slices + 1` vertices; the first and last
//! vertex of a row sit on the same seam and are intentionally not welded.
//!
//! | Quantity  | Count                         |
//! |-----------|-------------------------------|
//! | vertices  | `(slices + 1) × (stacks + 1)` |
//! | triangles | `slices × stacks × 2`         |
//!
//! # Winding Order
//!
//! Triangles are counter-clockwise when seen from outside the sphere, which matches
//! the renderer's `FrontFace::Ccw` plus back-face culling.

use std::f32::consts::PI;

/// CPU-side sphere mesh: parallel position and normal arrays plus triangle indices.
///
/// # Example
///
/// ```
/// use shaded_sphere::SphereGeometry;
///
/// let sphere = SphereGeometry::generate(1.0, 4, 2);
/// assert_eq!(sphere.positions.len(), 15);
/// assert_eq!(sphere.indices.len(), 16);
/// assert_eq!(sphere.indices[0], [0, 6, 1]);
/// assert_eq!(sphere.indices[1], [0, 5, 6]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SphereGeometry {
    /// Vertex positions, scaled by the radius.
    pub positions: Vec<[f32; 3]>,
    /// Unit normals, one per position.
    pub normals: Vec<[f32; 3]>,
    /// Triangles as triples of vertex indices.
    pub indices: Vec<[u32; 3]>,
}

impl SphereGeometry {
    /// Number of vertices produced for the given subdivision counts.
    pub const fn vertex_count(slices: u32, stacks: u32) -> usize {
        (slices as usize + 1) * (stacks as usize + 1)
    }

    /// Number of triangles produced for the given subdivision counts.
    pub const fn face_count(slices: u32, stacks: u32) -> usize {
        slices as usize * stacks as usize * 2
    }

    /// Generates a sphere centered at the origin.
    ///
    /// `slices` is the number of longitudinal wedges and `stacks` the number of
    /// pole-to-pole bands. Both must be at least 1. Normals are the unscaled unit
    /// sphere positions, so for `radius == 1.0` every normal equals its position.
    pub fn generate(radius: f32, slices: u32, stacks: u32) -> Self {
        debug_assert!(slices >= 1 && stacks >= 1, "sphere needs at least one slice and stack");

        let vertex_count = Self::vertex_count(slices, stacks);
        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);

        for j in 0..=stacks {
            let t = j as f32 / stacks as f32;
            let phi = PI * t;
            let y = phi.cos();
            let ring_radius = phi.sin();

            for i in 0..=slices {
                let s = i as f32 / slices as f32;
                let theta = -2.0 * PI * s;
                let x = ring_radius * theta.cos();
                let z = ring_radius * theta.sin();

                positions.push([x * radius, y * radius, z * radius]);
                normals.push([x, y, z]);
            }
        }

        let mut indices = Vec::with_capacity(Self::face_count(slices, stacks));
        let row = slices + 1;

        for j in 0..stacks {
            for i in 0..slices {
                let count = row * j + i;

                // upper triangle
                indices.push([count, count + slices + 2, count + 1]);
                // lower triangle
                indices.push([count, count + slices + 1, count + slices + 2]);
            }
        }

        Self {
            positions,
            normals,
            indices,
        }
    }

    /// Total number of indices (three per triangle), as passed to the draw call.
    ///
    /// Returns `None` if the count does not fit the `u32` draw range.
    pub fn index_count(&self) -> Option<u32> {
        u32::try_from(self.indices.len() * 3).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn counts_match_subdivisions() {
        for slices in 1..=9 {
            for stacks in 1..=7 {
                let sphere = SphereGeometry::generate(1.0, slices, stacks);
                let vertices = ((slices + 1) * (stacks + 1)) as usize;
                let faces = (slices * stacks * 2) as usize;

                assert_eq!(sphere.positions.len(), vertices);
                assert_eq!(sphere.normals.len(), vertices);
                assert_eq!(sphere.indices.len(), faces);
                assert_eq!(SphereGeometry::vertex_count(slices, stacks), vertices);
                assert_eq!(SphereGeometry::face_count(slices, stacks), faces);
            }
        }
    }

    #[test]
    fn unit_sphere_positions_are_normals() {
        let sphere = SphereGeometry::generate(1.0, 64, 32);

        for (position, normal) in sphere.positions.iter().zip(&sphere.normals) {
            assert_eq!(position, normal);
            let length = Vec3::from_array(*position).length();
            assert!((length - 1.0).abs() < 1e-5, "length was {length}");
        }
    }

    #[test]
    fn radius_scales_positions_only() {
        let sphere = SphereGeometry::generate(2.5, 16, 8);

        for (position, normal) in sphere.positions.iter().zip(&sphere.normals) {
            let p = Vec3::from_array(*position);
            let n = Vec3::from_array(*normal);
            assert!((p.length() - 2.5).abs() < 1e-4);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((p / 2.5 - n).length() < 1e-5);
        }
    }

    #[test]
    fn indices_stay_in_range() {
        let sphere = SphereGeometry::generate(1.0, 13, 5);
        let vertices = sphere.positions.len() as u32;

        assert!(sphere.indices.iter().flatten().all(|&index| index < vertices));
    }

    #[test]
    fn four_by_two_sphere() {
        let sphere = SphereGeometry::generate(1.0, 4, 2);

        assert_eq!(sphere.positions.len(), 15);
        assert_eq!(sphere.indices.len(), 16);
        assert_eq!(sphere.indices[0], [0, 6, 1]);
        assert_eq!(sphere.indices[1], [0, 5, 6]);
        // last quad closes against the south pole row
        assert_eq!(sphere.indices[15], [8, 13, 14]);
        assert_eq!(sphere.index_count(), Some(48));
    }

    #[test]
    fn poles_and_seam() {
        let slices = 8;
        let sphere = SphereGeometry::generate(1.0, slices, 4);
        let row = (slices + 1) as usize;

        // first row collapses onto the north pole, last row onto the south pole
        for n in &sphere.normals[..row] {
            assert!((Vec3::from_array(*n) - Vec3::Y).length() < 1e-6);
        }
        for n in &sphere.normals[sphere.normals.len() - row..] {
            assert!((Vec3::from_array(*n) + Vec3::Y).length() < 1e-6);
        }

        // seam vertices are duplicated, not welded
        for ring in sphere.positions.chunks(row) {
            let first = Vec3::from_array(ring[0]);
            let last = Vec3::from_array(ring[row - 1]);
            assert!((first - last).length() < 1e-5);
        }
    }

    #[test]
    fn triangles_face_outward() {
        let sphere = SphereGeometry::generate(1.0, 12, 6);

        for [a, b, c] in &sphere.indices {
            let a = Vec3::from_array(sphere.positions[*a as usize]);
            let b = Vec3::from_array(sphere.positions[*b as usize]);
            let c = Vec3::from_array(sphere.positions[*c as usize]);
            let normal = (b - a).cross(c - a);

            // pole triangles are degenerate
            if normal.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let first = SphereGeometry::generate(1.0, 64, 32);
        let second = SphereGeometry::generate(1.0, 64, 32);

        fn bits(v: &[[f32; 3]]) -> Vec<u32> {
            v.iter().flatten().map(|f| f.to_bits()).collect()
        }
        assert_eq!(bits(&first.positions), bits(&second.positions));
        assert_eq!(bits(&first.normals), bits(&second.normals));
        assert_eq!(first.indices, second.indices);
    }
}
