// src/lib.rs
//! Tessera
//!
//! Scene-graph exercises rendered with wgpu and winit: a spinning solar system and a
//! shape-sliding board puzzle. Both share one hierarchical scene graph whose nodes carry
//! local transforms that are composed on a matrix stack during a depth-first traversal.

pub mod app;
pub mod config;
pub mod error;
pub mod exercise;
pub mod gfx;
pub mod puzzle;
pub mod solar;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ExerciseApp;
pub use config::{AppConfig, CameraConfig};
pub use exercise::Exercise;
