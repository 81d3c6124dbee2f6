//! Application and camera configuration.
//!
//! Every exercise provides its own defaults; the `with_*` setters adjust them before the
//! application starts.

use cgmath::Vector3;

/// Initial placement and tuning of the first-person camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub position: Vector3<f32>,
    /// Degrees
    pub yaw: f32,
    /// Degrees
    pub pitch: f32,
    /// World units per frame while a movement key is held
    pub move_speed: f32,
    /// Degrees per pixel of pointer movement
    pub rotation_speed: f32,
    /// Vertical field of view in radians
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 5.0),
            yaw: 90.0,
            pitch: 0.0,
            move_speed: 0.05,
            rotation_speed: 0.1,
            fovy: 1.0,
            znear: 1.0,
            zfar: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_orientation(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }
}

/// Window and frame settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: [f64; 4],
    /// Grab and hide the pointer for mouse-look
    pub grab_cursor: bool,
    pub camera: CameraConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: String::from("tessera"),
            width: 1024,
            height: 768,
            clear_color: [0.3, 0.3, 0.4, 1.0],
            grab_cursor: true,
            camera: CameraConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }
}
