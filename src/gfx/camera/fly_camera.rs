use cgmath::{perspective, Deg, InnerSpace, Matrix4, Rad, Vector3};

use super::camera_utils::{Camera, OPENGL_TO_WGPU_MATRIX};
use crate::config::CameraConfig;

/// First-person camera steered by yaw and pitch.
///
/// `forward` points from the scene towards the eye, so the camera looks along
/// `-forward`.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Vector3<f32>,
    /// Degrees
    pub yaw: f32,
    /// Degrees
    pub pitch: f32,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

/// Orthonormal camera frame derived from yaw and pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Camera for FlyCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let proj = OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * self.view_matrix()
    }
}

impl FlyCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: config.position,
            yaw: config.yaw,
            pitch: config.pitch,
            aspect,
            fovy: Rad(config.fovy),
            znear: config.znear,
            zfar: config.zfar,
        }
    }

    pub fn basis(&self) -> CameraBasis {
        let (pitch, yaw) = (Rad::from(Deg(self.pitch)).0, Rad::from(Deg(self.yaw)).0);
        let forward = Vector3::new(pitch.cos() * yaw.cos(), pitch.sin(), pitch.cos() * yaw.sin());
        let right = Vector3::unit_y().cross(forward).normalize();
        let up = forward.cross(right);
        CameraBasis { forward, right, up }
    }

    /// Eye-space rotation followed by re-centring on the camera position.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let CameraBasis { forward, right, up } = self.basis();

        #[rustfmt::skip]
        let eye_space = Matrix4::new(
            right.x, up.x, forward.x, 0.0,
            right.y, up.y, forward.y, 0.0,
            right.z, up.z, forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        eye_space * Matrix4::from_translation(-self.position)
    }

    /// Moves relative to the current facing; each axis is in -1..=1.
    pub fn translate_local(&mut self, right: f32, up: f32, backward: f32, speed: f32) {
        let basis = self.basis();
        self.position += basis.right * (right * speed);
        self.position += basis.up * (up * speed);
        self.position += basis.forward * (backward * speed);
    }

    pub fn add_yaw(&mut self, degrees: f32) {
        self.yaw += degrees;
    }

    pub fn add_pitch(&mut self, degrees: f32) {
        self.pitch += degrees;
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}
