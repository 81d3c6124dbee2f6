//! # Local Transforms
//!
//! A [`Transform`] holds the authoritative per-node parameters (offset, Euler angles and a
//! uniform scale). [`build_local_matrix`] turns them into the node's local-to-parent matrix.
//!
//! The two exercises compose scale and translation in different orders, and both are
//! kept. Swapping them changes the result for any node with a non-zero offset and a
//! non-unit scale: with [`TransformOrder::RotateScaleTranslate`] the offset is scaled too,
//! with [`TransformOrder::RotateTranslateScale`] it is not.

use cgmath::{Matrix4, Rad, Vector3};

/// Composition order of a local matrix, applied as successive right-multiplications
/// starting from the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOrder {
    /// `M = Rx * Ry * Rz * S * T` (solar system)
    RotateScaleTranslate,
    /// `M = Rx * Ry * Rz * T * S` (shape puzzle)
    RotateTranslateScale,
}

/// Local transform parameters of a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    /// Rotation about X, Y and Z in radians.
    pub rotation: Vector3<f32>,
    pub scale: f32,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
        }
    }

    pub fn with_translation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Builds the local matrix for `transform` in the given composition `order`.
pub fn build_local_matrix(transform: &Transform, order: TransformOrder) -> Matrix4<f32> {
    let rotation = Matrix4::from_angle_x(Rad(transform.rotation.x))
        * Matrix4::from_angle_y(Rad(transform.rotation.y))
        * Matrix4::from_angle_z(Rad(transform.rotation.z));
    let t = Matrix4::from_translation(transform.translation);
    let s = Matrix4::from_scale(transform.scale);

    match order {
        TransformOrder::RotateScaleTranslate => rotation * s * t,
        TransformOrder::RotateTranslateScale => rotation * t * s,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use cgmath::{Point3, Transform as _};
    use std::f32::consts::PI;

    pub(crate) fn assert_matrix_eq(a: Matrix4<f32>, b: Matrix4<f32>, tolerance: f32) {
        for col in 0..4 {
            for row in 0..4 {
                let (x, y) = (a[col][row], b[col][row]);
                assert!(
                    (x - y).abs() <= tolerance,
                    "matrices differ at [{col}][{row}]: {x} vs {y}\n{a:?}\n{b:?}"
                );
            }
        }
    }

    #[test]
    fn identity_parameters_give_identity_matrix() {
        let identity = Matrix4::from_scale(1.0);
        for order in [
            TransformOrder::RotateScaleTranslate,
            TransformOrder::RotateTranslateScale,
        ] {
            assert_matrix_eq(build_local_matrix(&Transform::identity(), order), identity, 0.0);
        }
    }

    #[test]
    fn scale_then_translate_scales_the_offset() {
        let transform = Transform::identity()
            .with_translation(10.0, 0.0, 0.0)
            .with_scale(0.5);
        let m = build_local_matrix(&transform, TransformOrder::RotateScaleTranslate);
        let origin = m.transform_point(Point3::new(0.0, 0.0, 0.0));
        assert!((origin.x - 5.0).abs() < 1e-6);
    }

    #[test]
    fn translate_then_scale_keeps_the_offset() {
        let transform = Transform::identity()
            .with_translation(10.0, 0.0, 0.0)
            .with_scale(0.5);
        let m = build_local_matrix(&transform, TransformOrder::RotateTranslateScale);
        let origin = m.transform_point(Point3::new(0.0, 0.0, 0.0));
        assert!((origin.x - 10.0).abs() < 1e-6);

        // the geometry itself is still scaled
        let unit = m.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert!((unit.x - 10.5).abs() < 1e-6);
    }

    #[test]
    fn rotation_is_applied_after_translation() {
        // a quarter turn about X moves a +Y offset onto +Z
        let transform = Transform::identity()
            .with_translation(0.0, 2.0, 0.0)
            .with_rotation(PI * 0.5, 0.0, 0.0);
        for order in [
            TransformOrder::RotateScaleTranslate,
            TransformOrder::RotateTranslateScale,
        ] {
            let p = build_local_matrix(&transform, order).transform_point(Point3::new(0.0, 0.0, 0.0));
            assert!(p.y.abs() < 1e-6, "{order:?}: {p:?}");
            assert!((p.z - 2.0).abs() < 1e-6, "{order:?}: {p:?}");
        }
    }

    #[test]
    fn rotations_compose_x_then_y_then_z() {
        let transform = Transform::identity().with_rotation(0.3, -1.1, 2.0);
        let expected = Matrix4::from_angle_x(Rad(0.3))
            * Matrix4::from_angle_y(Rad(-1.1))
            * Matrix4::from_angle_z(Rad(2.0));
        assert_matrix_eq(
            build_local_matrix(&transform, TransformOrder::RotateTranslateScale),
            expected,
            1e-6,
        );
    }
}
