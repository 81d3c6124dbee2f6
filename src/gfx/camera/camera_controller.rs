use winit::{
    event::{DeviceEvent, ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::fly_camera::FlyCamera;

/// Held movement keys.
#[derive(Debug, Default, Clone, Copy)]
struct MovementState {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    forward: bool,
    backward: bool,
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}

/// Keyboard fly movement (WASD, Space, Left Shift) and mouse-look.
pub struct CameraController {
    pub move_speed: f32,
    pub rotate_speed: f32,
    movement: MovementState,
}

impl CameraController {
    pub fn new(move_speed: f32, rotate_speed: f32) -> Self {
        Self {
            move_speed,
            rotate_speed,
            movement: MovementState::default(),
        }
    }

    /// Tracks movement keys. Returns true when the key was consumed.
    pub fn process_keyed_events(&mut self, event: &KeyEvent) -> bool {
        let PhysicalKey::Code(code) = event.physical_key else {
            return false;
        };
        let held = event.state == ElementState::Pressed;
        let slot = match code {
            KeyCode::KeyA => &mut self.movement.left,
            KeyCode::KeyD => &mut self.movement.right,
            KeyCode::Space => &mut self.movement.up,
            KeyCode::ShiftLeft => &mut self.movement.down,
            KeyCode::KeyW => &mut self.movement.forward,
            KeyCode::KeyS => &mut self.movement.backward,
            _ => return false,
        };
        *slot = held;
        true
    }

    /// Applies raw pointer motion as yaw and pitch.
    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut FlyCamera) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.apply_mouse_delta(delta.0 as f32, delta.1 as f32, camera);
        }
    }

    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32, camera: &mut FlyCamera) {
        camera.add_yaw(dx * self.rotate_speed);
        camera.add_pitch(dy * self.rotate_speed);
    }

    /// Moves the camera by one frame's worth of held keys.
    pub fn update_camera(&self, camera: &mut FlyCamera) {
        let m = self.movement;
        camera.translate_local(
            axis(m.right, m.left),
            axis(m.up, m.down),
            axis(m.backward, m.forward),
            self.move_speed,
        );
    }

    pub fn is_moving(&self) -> bool {
        let m = self.movement;
        m.left || m.right || m.up || m.down || m.forward || m.backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    #[test]
    fn axis_cancels_opposite_keys() {
        assert_eq!(axis(true, true), 0.0);
        assert_eq!(axis(true, false), 1.0);
        assert_eq!(axis(false, true), -1.0);
    }

    #[test]
    fn mouse_delta_turns_camera() {
        let mut camera = FlyCamera::new(&CameraConfig::default(), 1.0);
        let mut controller = CameraController::new(0.05, 0.1);
        let (yaw, pitch) = (camera.yaw, camera.pitch);
        controller.apply_mouse_delta(10.0, -20.0, &mut camera);
        assert!((camera.yaw - (yaw + 1.0)).abs() < 1e-5);
        assert!((camera.pitch - (pitch - 2.0)).abs() < 1e-5);
    }

    #[test]
    fn idle_controller_does_not_move_camera() {
        let mut camera = FlyCamera::new(&CameraConfig::default(), 1.0);
        let controller = CameraController::new(0.05, 0.1);
        let before = camera.position;
        controller.update_camera(&mut camera);
        assert!(!controller.is_moving());
        assert_eq!(camera.position, before);
    }
}
