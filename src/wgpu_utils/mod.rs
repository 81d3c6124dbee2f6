// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers

pub mod uniform_buffer;

// Re-export main types
pub use uniform_buffer::DynamicUniformBuffer;
