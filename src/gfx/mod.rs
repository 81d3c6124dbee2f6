//! # Graphics Module
//!
//! ## Architecture Overview
//!
//! - **Scene Graph** ([`scene`]) - node hierarchy, transform composition and traversal
//! - **Geometry** ([`geometry`]) - procedural vertex data
//! - **Camera System** ([`camera`]) - first-person fly camera with mouse-look
//! - **Rendering** ([`rendering`]) - wgpu pipeline that executes draw calls
//! - **Resources** ([`resources`]) - depth buffer
//!
//! Data flows one way per frame: input mutates camera and exercise state, the exercise
//! mutates a few node parameters, and [`scene::draw_scene`] turns the graph into draw
//! calls for the [`RenderEngine`].

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::FlyCamera;
pub use rendering::RenderEngine;
