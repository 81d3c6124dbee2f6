//! Renderable handles.
//!
//! Scene nodes never own vertex data. Geometry is handed to a [`GeometryUploader`] once at
//! startup and the node keeps the returned [`MeshHandle`].

use crate::{error::RenderError, gfx::geometry::GeometryData};

use super::scene_graph::SceneGraph;

/// Opaque key of GPU-resident geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(u32);

impl MeshHandle {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Turns CPU geometry into a renderable handle.
pub trait GeometryUploader {
    fn upload(&mut self, geometry: &GeometryData) -> Result<MeshHandle, RenderError>;
}

/// Fails on the first node whose handle is not one of the `mesh_count` uploaded meshes.
pub fn check_mesh_handles(scene: &SceneGraph, mesh_count: usize) -> Result<(), RenderError> {
    for id in scene.pre_order() {
        let Some(mesh) = scene.node(id).and_then(|node| node.mesh) else {
            continue;
        };
        if mesh.index() >= mesh_count {
            return Err(RenderError::UnknownMesh(mesh));
        }
    }
    Ok(())
}

/// Records uploads without touching a GPU.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingUploader {
    pub uploads: Vec<GeometryData>,
}

#[cfg(test)]
impl GeometryUploader for RecordingUploader {
    fn upload(&mut self, geometry: &GeometryData) -> Result<MeshHandle, RenderError> {
        if geometry.indices.is_empty() {
            return Err(RenderError::EmptyGeometry(geometry.label.clone()));
        }
        self.uploads.push(geometry.clone());
        Ok(MeshHandle::new(self.uploads.len() as u32 - 1))
    }
}
