use winit::keyboard::KeyCode;

use crate::{
    config::AppConfig,
    gfx::scene::{GeometryUploader, NodeId, SceneGraph},
};

/// One runnable program: a scene plus the per-frame logic that mutates it.
///
/// [`ExerciseApp`](crate::app::ExerciseApp) owns the window, camera and renderer and calls
/// into the exercise in this order every frame: key input, [`update`](Exercise::update),
/// then traversal of [`scene`](Exercise::scene).
pub trait Exercise {
    fn config(&self) -> AppConfig;

    /// Uploads geometry and builds the scene graph. Called once the renderer exists.
    fn build(&mut self, uploader: &mut dyn GeometryUploader) -> anyhow::Result<()>;

    /// Advances the simulation by `dt` seconds.
    fn update(&mut self, dt: f32) -> anyhow::Result<()>;

    /// Key presses not consumed by the camera.
    fn handle_key(&mut self, _key: KeyCode) -> anyhow::Result<()> {
        Ok(())
    }

    /// `None` until [`build`](Exercise::build) succeeded.
    fn scene(&self) -> Option<&SceneGraph>;

    fn highlighted_node(&self) -> Option<NodeId> {
        None
    }
}
