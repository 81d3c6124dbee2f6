//! # Scene Module
//!
//! The scene-graph core shared by the exercises:
//!
//! - [`Transform`] / [`build_local_matrix`] - local matrices from per-node parameters
//! - [`SceneGraph`] - arena of [`SceneNode`]s addressed by [`NodeId`]
//! - [`MatrixStack`] - accumulated parent transforms during traversal
//! - [`draw_scene`] - pre-order render traversal producing [`DrawCall`]s
//! - [`Vertex3D`] - vertex format of every mesh
//!
//! ## Usage
//!
//! ```
//! use cgmath::{Matrix4, SquareMatrix};
//! use tessera::gfx::scene::{
//!     draw_scene, DrawList, MatrixStack, MeshHandle, SceneGraph, TransformOrder,
//! };
//!
//! let mut graph = SceneGraph::new(TransformOrder::RotateScaleTranslate);
//! let root = graph.root();
//! let child = graph.create_node();
//! graph.add_child(root, child).unwrap();
//! graph.node_mut(root).unwrap().mesh = Some(MeshHandle::new(0));
//! graph.node_mut(child).unwrap().mesh = Some(MeshHandle::new(1));
//! graph.initialize_matrices().unwrap();
//!
//! let mut list = DrawList::new();
//! draw_scene(&graph, &mut MatrixStack::new(), Matrix4::identity(), &mut list).unwrap();
//! assert_eq!(list.len(), 2);
//! ```

pub mod matrix_stack;
pub mod mesh;
pub mod scene_graph;
pub mod transform;
pub mod traversal;
pub mod vertex;

// Re-export main types
pub use matrix_stack::MatrixStack;
pub use mesh::{check_mesh_handles, GeometryUploader, MeshHandle};
pub use scene_graph::{NodeId, SceneGraph, SceneNode, Spin};
pub use transform::{build_local_matrix, Transform, TransformOrder};
pub use traversal::{draw_scene, DrawCall, DrawList, DrawTarget};
pub use vertex::Vertex3D;
