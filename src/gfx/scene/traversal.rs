//! # Render Traversal
//!
//! Depth-first pre-order walk over a [`SceneGraph`] that issues one [`DrawCall`] per node.
//! The walk is iterative: an explicit work list replaces recursion and the
//! [`MatrixStack`] carries the accumulated parent transforms.
//!
//! For every node visited:
//! 1. `composed = top(stack) * node.matrix` (or `view_projection * node.matrix` at the root)
//! 2. `model = parent_model * node.matrix`, which excludes camera and projection
//! 3. one draw call with both matrices
//! 4. `composed` is pushed, the children are visited, then the stack is popped

use cgmath::{Matrix4, SquareMatrix};

use crate::error::SceneError;

use super::{
    matrix_stack::MatrixStack,
    mesh::MeshHandle,
    scene_graph::{NodeId, SceneGraph},
};

/// Everything the renderer needs to draw a single node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub node: NodeId,
    pub mesh: MeshHandle,
    pub model_view_projection: Matrix4<f32>,
    /// Cumulative model transform, used for lighting.
    pub model: Matrix4<f32>,
    /// Stack depth at the time of the draw.
    pub depth: usize,
}

/// Receiver of draw calls.
pub trait DrawTarget {
    fn draw(&mut self, call: DrawCall);
}

/// Draw calls collected in traversal order.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl DrawTarget for DrawList {
    fn draw(&mut self, call: DrawCall) {
        self.calls.push(call);
    }
}

enum Visit {
    Enter { node: NodeId, parent_model: Matrix4<f32> },
    Exit,
}

/// Draws the whole graph below `view_projection`.
///
/// `stack` must be empty on entry and is empty again on return, on both the success and
/// the error path. The graph has to be initialized first so that every cached matrix is
/// current. Meshes are checked before the first draw, so a failed call issues nothing.
pub fn draw_scene<T: DrawTarget + ?Sized>(
    graph: &SceneGraph,
    stack: &mut MatrixStack,
    view_projection: Matrix4<f32>,
    target: &mut T,
) -> Result<(), SceneError> {
    if !graph.is_sealed() {
        return Err(SceneError::NotInitialized);
    }
    debug_assert!(stack.is_empty(), "matrix stack must start empty");
    // `mesh` stays writable after sealing
    graph.validate()?;

    let walked = walk(graph, stack, view_projection, target);
    if walked.is_err() {
        stack.clear();
    }
    walked
}

fn walk<T: DrawTarget + ?Sized>(
    graph: &SceneGraph,
    stack: &mut MatrixStack,
    view_projection: Matrix4<f32>,
    target: &mut T,
) -> Result<(), SceneError> {
    let mut pending = vec![Visit::Enter {
        node: graph.root(),
        parent_model: Matrix4::identity(),
    }];

    while let Some(visit) = pending.pop() {
        let (id, parent_model) = match visit {
            Visit::Enter { node, parent_model } => (node, parent_model),
            Visit::Exit => {
                stack.pop();
                continue;
            }
        };

        let node = graph.node(id).ok_or(SceneError::UnknownNode(id))?;
        let mesh = node.mesh.ok_or(SceneError::MissingMesh(id))?;
        let local = node.matrix();

        let composed = stack.top_or(view_projection) * local;
        let model = parent_model * local;

        target.draw(DrawCall {
            node: id,
            mesh,
            model_view_projection: composed,
            model,
            depth: stack.depth(),
        });

        stack.push(composed);
        pending.push(Visit::Exit);
        for &child in node.children().iter().rev() {
            pending.push(Visit::Enter {
                node: child,
                parent_model: model,
            });
        }
    }

    log::trace!("drew {} nodes", graph.len());
    Ok(())
}
