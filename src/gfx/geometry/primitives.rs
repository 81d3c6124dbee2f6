//! # Primitive Shape Generation
//!
//! Spheres for the solar system, the checkerboard and move marker for the puzzle.

use super::{extrude, GeometryData};
use std::f32::consts::PI;

const BOARD_RED: [f32; 4] = [0.75, 0.125, 0.125, 1.0];
const BOARD_BLUE: [f32; 4] = [0.125, 0.125, 0.75, 1.0];
const MARKER_YELLOW: [f32; 4] = [0.75, 0.75, 0.25, 1.0];

/// Generate a UV sphere of radius 1.0 with its poles on the Z axis
///
/// # Arguments
/// * `slices` - Number of segments around the Z axis
/// * `layers` - Number of rings from pole to pole
/// * `color` - Flat RGBA colour of every vertex
pub fn generate_sphere(slices: u32, layers: u32, color: [f32; 4]) -> GeometryData {
    let mut data = GeometryData::new("sphere");

    let slices = slices.max(3);
    let layers = layers.max(2);

    for layer in 0..=layers {
        let theta = layer as f32 * PI / layers as f32; // 0 to PI, from -Z to +Z
        let radius = theta.sin();
        let z = -theta.cos();

        for slice in 0..=slices {
            let phi = slice as f32 * 2.0 * PI / slices as f32;
            let position = [radius * phi.cos(), radius * phi.sin(), z];

            data.vertices.push(position);
            data.normals.push(position); // Normal is same as position for unit sphere
            data.colors.push(color);
        }
    }

    let ring = slices + 1;
    for layer in 0..layers {
        for slice in 0..slices {
            let current = layer * ring + slice;
            let next = current + ring;

            data.indices
                .extend_from_slice(&[current, current + 1, next + 1, current, next + 1, next]);
        }
    }

    data
}

/// Generate a `width` x `height` checkerboard of unit cells extruded to a depth of 1.0
///
/// Cells alternate between red and blue; `start_with_blue` flips which colour the
/// cell at (0, 0) gets.
pub fn generate_checkerboard(width: usize, height: usize, start_with_blue: bool) -> GeometryData {
    let mut triangles = Vec::with_capacity(width * height * 6);
    let mut colors = Vec::with_capacity(width * height * 6);

    for y in 0..height {
        for x in 0..width {
            let color = if (x + y + usize::from(start_with_blue)) % 2 == 1 {
                BOARD_BLUE
            } else {
                BOARD_RED
            };

            let (x0, y0) = (x as f32, y as f32);
            let (x1, y1) = (x0 + 1.0, y0 + 1.0);
            triangles.extend_from_slice(&[
                [x0, y0, 0.0],
                [x0, y1, 0.0],
                [x1, y0, 0.0],
                [x1, y0, 0.0],
                [x0, y1, 0.0],
                [x1, y1, 0.0],
            ]);
            colors.extend_from_slice(&[color; 6]);
        }
    }

    extrude("checkerboard", &triangles, &colors, 1.0)
}

/// Generate a flat yellow unit quad spanning (0, 0) to (1, 1)
pub fn generate_marker_quad() -> GeometryData {
    let mut data = GeometryData::new("move marker");
    data.vertices = vec![
        [0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 1.0, 0.0],
    ];
    data.colors = vec![MARKER_YELLOW; 6];
    data.normals = vec![[0.0, 0.0, -1.0]; 6];
    data.indices = (0..6).collect();
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(10, 10, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(sphere.vertex_count(), 11 * 11);
        assert_eq!(sphere.triangle_count(), 10 * 10 * 2);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.colors.len());
        for v in &sphere.vertices {
            let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((length - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_checkerboard_colors_alternate() {
        let red_first = generate_checkerboard(2, 1, false);
        let blue_first = generate_checkerboard(2, 1, true);

        // 12 base vertices per cell after extrusion
        assert_eq!(red_first.colors[0], BOARD_RED);
        assert_eq!(red_first.colors[12], BOARD_BLUE);
        assert_eq!(blue_first.colors[0], BOARD_BLUE);
        assert_eq!(blue_first.colors[12], BOARD_RED);
    }

    #[test]
    fn test_marker_quad() {
        let quad = generate_marker_quad();
        assert_eq!(quad.triangle_count(), 2);
        assert!(quad.colors.iter().all(|&c| c == MARKER_YELLOW));
    }
}
