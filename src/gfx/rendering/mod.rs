//! wgpu renderer: uploads geometry once and draws the traversal's [`DrawList`] every frame.
//!
//! [`DrawList`]: crate::gfx::scene::DrawList

pub mod render_engine;

pub use render_engine::{NodeUniform, RenderEngine};
