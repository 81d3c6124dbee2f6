//! # Procedural Geometry Generation
//!
//! Hand-built vertex data for the exercises. Nothing is loaded from model files.
//!
//! ## Supported Primitives
//!
//! - **Sphere**: UV sphere around the Z axis with a flat colour
//! - **Checkerboard**: extruded grid of alternating red and blue cells
//! - **Quad**: flat unit square, used for the move marker
//! - **Extrusion**: any 2D triangle soup pushed out along +Z
//!
//! ## Usage
//!
//! ```rust
//! use tessera::gfx::geometry::{generate_checkerboard, generate_sphere};
//!
//! let sun = generate_sphere(10, 10, [1.0, 1.0, 0.0, 1.0]);
//! let board = generate_checkerboard(8, 5, true);
//! assert_eq!(board.triangle_count(), 8 * 5 * 2 * 8);
//! # let _ = sun;
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::Vertex3D;

/// Generated geometry ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Debug label carried to the GPU buffers
    pub label: String,
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Vertex colours (r, g, b, a)
    pub colors: Vec<[f32; 4]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
    /// Shaded by a light at the model-space origin instead of drawn flat
    pub lit: bool,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            vertices: Vec::new(),
            colors: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            lit: false,
        }
    }

    pub fn with_lighting(mut self, lit: bool) -> Self {
        self.lit = lit;
        self
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions, colours and normals into the GPU vertex format.
    ///
    /// Missing colours default to white, missing normals to +Z.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex3D {
                position,
                color: self.colors.get(i).copied().unwrap_or([1.0; 4]),
                normal: self.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
            })
            .collect()
    }
}

/// Averaged, normalized per-vertex normals of an indexed triangle list.
pub fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![[0.0f32; 3]; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [v0, v1, v2] = [
            positions[triangle[0] as usize],
            positions[triangle[1] as usize],
            positions[triangle[2] as usize],
        ];

        let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
        let face_normal = [
            edge1[1] * edge2[2] - edge1[2] * edge2[1],
            edge1[2] * edge2[0] - edge1[0] * edge2[2],
            edge1[0] * edge2[1] - edge1[1] * edge2[0],
        ];

        for &index in triangle {
            let normal = &mut normals[index as usize];
            normal[0] += face_normal[0];
            normal[1] += face_normal[1];
            normal[2] += face_normal[2];
        }
    }

    for normal in normals.iter_mut() {
        let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
        if length > 0.0 {
            normal.iter_mut().for_each(|c| *c /= length);
        }
    }

    normals
}

/// Extrudes a flat triangle soup by `depth` along +Z.
///
/// Every input vertex `i` becomes a base vertex `2i` and a lifted vertex `2i + 1`. Each
/// input triangle yields eight output triangles: the base, the lid (reversed winding)
/// and two per side wall.
pub fn extrude(
    label: impl Into<String>,
    triangles: &[[f32; 3]],
    colors: &[[f32; 4]],
    depth: f32,
) -> GeometryData {
    let mut data = GeometryData::new(label);

    for (i, &[x, y, z]) in triangles.iter().enumerate() {
        let color = colors.get(i).copied().unwrap_or([1.0; 4]);
        data.vertices.push([x, y, z]);
        data.vertices.push([x, y, z + depth]);
        data.colors.push(color);
        data.colors.push(color);
    }

    for triangle in 0..(triangles.len() / 3) as u32 {
        let [a, b, c] = [triangle * 3, triangle * 3 + 1, triangle * 3 + 2];
        let (ab, bb, cb) = (a * 2, b * 2, c * 2);
        let (at, bt, ct) = (ab + 1, bb + 1, cb + 1);
        data.indices.extend_from_slice(&[
            ab, bb, cb, // base
            at, ct, bt, // lid
            ab, at, bb, at, bt, bb, // side a-b
            bb, bt, cb, bt, ct, cb, // side b-c
            cb, at, ab, ct, at, cb, // side c-a
        ]);
    }

    data.normals = compute_vertex_normals(&data.vertices, &data.indices);
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrusion_doubles_vertices_and_octuples_triangles() {
        let triangle = [[-0.5, 0.5, 0.0], [0.5, 0.5, 0.0], [0.0, -0.5, 0.0]];
        let data = extrude("triangle", &triangle, &[[1.0, 0.0, 1.0, 1.0]; 3], 0.25);
        assert_eq!(data.vertex_count(), 6);
        assert_eq!(data.triangle_count(), 8);
        assert!(data.indices.iter().all(|&i| (i as usize) < data.vertex_count()));
        assert_eq!(data.vertices[1], [-0.5, 0.5, 0.25]);
        assert_eq!(data.colors.len(), 6);
    }

    #[test]
    fn normals_of_a_flat_triangle_point_along_z() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals = compute_vertex_normals(&positions, &[0, 1, 2]);
        for normal in normals {
            assert_eq!(normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn to_vertices_fills_missing_attributes() {
        let mut data = GeometryData::new("point");
        data.vertices.push([1.0, 2.0, 3.0]);
        let vertices = data.to_vertices();
        assert_eq!(vertices[0].color, [1.0; 4]);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
    }
}
