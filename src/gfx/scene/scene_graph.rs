//! # Scene Graph
//!
//! An arena of [`SceneNode`]s addressed by [`NodeId`]. The root is created together with the
//! graph; every other node starts detached and is attached exactly once with
//! [`SceneGraph::add_child`]. Children keep insertion order.
//!
//! The graph is built once, then sealed by the first traversal
//! ([`SceneGraph::initialize_matrices`]). After that the shape of the tree is frozen and only
//! per-node parameters change from frame to frame.

use cgmath::{InnerSpace, Matrix4, Rad, SquareMatrix, Vector3};

use crate::error::SceneError;

use super::{
    mesh::MeshHandle,
    transform::{build_local_matrix, Transform, TransformOrder},
};

/// Stable index of a node inside its [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Constant angular velocity, re-applied to the cached matrix every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub axis: Vector3<f32>,
    /// Radians per second.
    pub speed: f32,
}

impl Spin {
    pub fn new(axis: Vector3<f32>, speed: f32) -> Self {
        Self { axis, speed }
    }

    /// Rotation covering `dt` seconds, or `None` when it would be a no-op.
    fn rotation(&self, dt: f32) -> Option<Matrix4<f32>> {
        let angle = self.speed * dt;
        if angle == 0.0 || self.axis.magnitude2() == 0.0 {
            return None;
        }
        Some(Matrix4::from_axis_angle(self.axis.normalize(), Rad(angle)))
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub transform: Transform,
    pub mesh: Option<MeshHandle>,
    pub spin: Option<Spin>,
    matrix: Matrix4<f32>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    fn new() -> Self {
        Self {
            transform: Transform::identity(),
            mesh: None,
            spin: None,
            matrix: Matrix4::identity(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Cached local matrix (not composed with any parent).
    pub fn matrix(&self) -> Matrix4<f32> {
        self.matrix
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    order: TransformOrder,
    sealed: bool,
}

impl SceneGraph {
    /// Creates a graph holding only its root node.
    pub fn new(order: TransformOrder) -> Self {
        Self {
            nodes: vec![SceneNode::new()],
            order,
            sealed: false,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True once a traversal has started; the tree can no longer change shape.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Allocates a detached node with identity parameters and no mesh.
    pub fn create_node(&mut self) -> NodeId {
        self.nodes.push(SceneNode::new());
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    fn get(&self, id: NodeId) -> Result<&SceneNode, SceneError> {
        self.nodes.get(id.0).ok_or(SceneError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, SceneError> {
        self.nodes.get_mut(id.0).ok_or(SceneError::UnknownNode(id))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Appends `child` to the children of `parent`.
    ///
    /// Rejected once the graph is sealed, when `child` is the root or already attached,
    /// and when `child` is an ancestor of (or equal to) `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.get(parent)?;
        let child_node = self.get(child)?;

        if self.sealed {
            return Err(SceneError::Sealed { parent, child });
        }
        if child == self.root() {
            return Err(SceneError::RootAsChild);
        }
        if let Some(existing) = child_node.parent {
            return Err(SceneError::AlreadyParented {
                child,
                parent: existing,
            });
        }

        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(SceneError::Cycle { parent, child });
            }
            ancestor = self.parent(id);
        }

        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Node ids in depth-first pre-order, children in insertion order.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut pending = vec![self.root()];
        while let Some(id) = pending.pop() {
            order.push(id);
            pending.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Checks that every node is reachable from the root and carries a mesh.
    pub fn validate(&self) -> Result<(), SceneError> {
        let visited = self.pre_order();
        let mut seen = vec![false; self.nodes.len()];
        for &id in &visited {
            seen[id.0] = true;
        }
        if let Some(detached) = seen.iter().position(|&reached| !reached) {
            return Err(SceneError::Detached(NodeId(detached)));
        }
        for id in visited {
            if self.get(id)?.mesh.is_none() {
                return Err(SceneError::MissingMesh(id));
            }
        }
        Ok(())
    }

    /// Validates the tree, seals it and rebuilds every cached matrix from the node's own
    /// parameters. No parent composition happens here.
    pub fn initialize_matrices(&mut self) -> Result<(), SceneError> {
        self.validate()?;
        self.sealed = true;
        self.refresh_subtree(self.root())
    }

    /// Re-derives the cached matrix of `id` and all of its descendants.
    pub fn refresh_subtree(&mut self, id: NodeId) -> Result<(), SceneError> {
        let order = self.order;
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let node = self.get_mut(current)?;
            node.matrix = build_local_matrix(&node.transform, order);
            pending.extend(node.children.iter().rev().copied());
        }
        Ok(())
    }

    /// Spins every node by its own angular velocity over `dt` seconds.
    ///
    /// The rotation is left-multiplied onto the existing cached matrix, so it accumulates
    /// across frames instead of being rebuilt from the rest pose.
    pub fn update_scene(&mut self, dt: f32) -> Result<(), SceneError> {
        if !self.sealed {
            return Err(SceneError::NotInitialized);
        }
        for id in self.pre_order() {
            let node = self.get_mut(id)?;
            if let Some(rotation) = node.spin.and_then(|spin| spin.rotation(dt)) {
                node.matrix = rotation * node.matrix;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("nodes", &self.nodes.len())
            .field("order", &self.order)
            .field("sealed", &self.sealed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::transform::tests::assert_matrix_eq;
    use rand::Rng;
    use std::f32::consts::PI;

    /// root -> a -> (b, c), every node with a mesh
    fn small_graph(order: TransformOrder) -> (SceneGraph, [NodeId; 3]) {
        let mut graph = SceneGraph::new(order);
        let root = graph.root();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();
        graph.add_child(a, b).unwrap();
        graph.add_child(a, c).unwrap();
        graph.add_child(root, a).unwrap();
        for (i, id) in [root, a, b, c].into_iter().enumerate() {
            graph.node_mut(id).unwrap().mesh = Some(MeshHandle::new(i as u32));
        }
        (graph, [a, b, c])
    }

    #[test]
    fn create_node_starts_detached_with_identity() {
        let mut graph = SceneGraph::new(TransformOrder::RotateScaleTranslate);
        let id = graph.create_node();
        let node = graph.node(id).unwrap();
        assert_eq!(node.transform, Transform::identity());
        assert!(node.mesh.is_none());
        assert!(node.children().is_empty());
        assert!(node.parent().is_none());
    }

    #[test]
    fn children_keep_insertion_order() {
        let (graph, [a, b, c]) = small_graph(TransformOrder::RotateScaleTranslate);
        assert_eq!(graph.children(a), &[b, c]);
        assert_eq!(graph.parent(b), Some(a));
        assert_eq!(graph.depth(c), 2);
        assert_eq!(graph.pre_order(), vec![graph.root(), a, b, c]);
    }

    #[test]
    fn every_node_is_reachable_exactly_once() {
        let (graph, _) = small_graph(TransformOrder::RotateTranslateScale);
        let mut visited = graph.pre_order();
        visited.sort();
        visited.dedup();
        assert_eq!(visited.len(), graph.len());
    }

    #[test]
    fn add_child_rejects_cycles_and_reparenting() {
        let (mut graph, [a, b, _]) = small_graph(TransformOrder::RotateScaleTranslate);
        let root = graph.root();

        assert_eq!(
            graph.add_child(b, a),
            Err(SceneError::AlreadyParented { child: a, parent: root })
        );
        assert_eq!(graph.add_child(a, root), Err(SceneError::RootAsChild));

        let x = graph.create_node();
        assert_eq!(graph.add_child(x, x), Err(SceneError::Cycle { parent: x, child: x }));

        let y = graph.create_node();
        graph.add_child(x, y).unwrap();
        assert_eq!(graph.add_child(y, x), Err(SceneError::Cycle { parent: y, child: x }));
    }

    #[test]
    fn add_child_rejects_unknown_nodes() {
        let mut graph = SceneGraph::new(TransformOrder::RotateScaleTranslate);
        let root = graph.root();
        assert_eq!(
            graph.add_child(root, NodeId(42)),
            Err(SceneError::UnknownNode(NodeId(42)))
        );
    }

    #[test]
    fn add_child_is_rejected_after_traversal_begins() {
        let (mut graph, [a, _, _]) = small_graph(TransformOrder::RotateScaleTranslate);
        graph.initialize_matrices().unwrap();
        assert!(graph.is_sealed());

        let late = graph.create_node();
        assert_eq!(
            graph.add_child(a, late),
            Err(SceneError::Sealed { parent: a, child: late })
        );
    }

    #[test]
    fn initialize_rejects_missing_mesh_and_detached_nodes() {
        let (mut graph, [_, b, _]) = small_graph(TransformOrder::RotateScaleTranslate);
        graph.node_mut(b).unwrap().mesh = None;
        assert_eq!(graph.initialize_matrices(), Err(SceneError::MissingMesh(b)));
        assert!(!graph.is_sealed());

        let (mut graph, _) = small_graph(TransformOrder::RotateScaleTranslate);
        let orphan = graph.create_node();
        graph.node_mut(orphan).unwrap().mesh = Some(MeshHandle::new(9));
        assert_eq!(graph.initialize_matrices(), Err(SceneError::Detached(orphan)));
    }

    #[test]
    fn validate_reports_lowest_detached_node_of_a_long_chain() {
        let mut graph = SceneGraph::new(TransformOrder::RotateScaleTranslate);
        let mut parent = graph.root();
        for _ in 0..2_000 {
            let child = graph.create_node();
            graph.add_child(parent, child).unwrap();
            parent = child;
        }
        let first = graph.create_node();
        let second = graph.create_node();
        graph.add_child(first, second).unwrap();
        // reachability is checked before meshes
        assert_eq!(graph.validate(), Err(SceneError::Detached(first)));
    }

    #[test]
    fn initialized_matrix_matches_local_parameters_only() {
        for order in [
            TransformOrder::RotateScaleTranslate,
            TransformOrder::RotateTranslateScale,
        ] {
            let (mut graph, [a, b, c]) = small_graph(order);
            graph.node_mut(graph.root()).unwrap().transform =
                Transform::identity().with_rotation(PI * 0.5, 0.0, 0.0);
            graph.node_mut(a).unwrap().transform =
                Transform::identity().with_translation(10.0, 0.0, 0.0).with_scale(0.35);
            graph.node_mut(b).unwrap().transform =
                Transform::identity().with_translation(5.0, 1.0, 0.0).with_scale(0.5);
            graph.node_mut(c).unwrap().transform =
                Transform::identity().with_rotation(0.1, 0.2, 0.3);

            graph.initialize_matrices().unwrap();

            for id in graph.pre_order() {
                let node = graph.node(id).unwrap();
                assert_matrix_eq(node.matrix(), build_local_matrix(&node.transform, order), 0.0);
            }
        }
    }

    #[test]
    fn refresh_subtree_leaves_other_nodes_alone() {
        let (mut graph, [a, b, c]) = small_graph(TransformOrder::RotateTranslateScale);
        graph.initialize_matrices().unwrap();

        graph.node_mut(a).unwrap().transform.translation.x = 3.0;
        graph.node_mut(b).unwrap().transform.translation.x = 4.0;
        graph.refresh_subtree(b).unwrap();

        assert_eq!(graph.node(a).unwrap().matrix(), Matrix4::identity());
        assert_eq!(graph.node(b).unwrap().matrix(), Matrix4::from_translation(Vector3::new(4.0, 0.0, 0.0)));
        assert_eq!(graph.node(c).unwrap().matrix(), Matrix4::identity());
    }

    #[test]
    fn update_requires_initialization() {
        let (mut graph, _) = small_graph(TransformOrder::RotateScaleTranslate);
        assert_eq!(graph.update_scene(0.016), Err(SceneError::NotInitialized));
    }

    #[test]
    fn spin_accumulates_onto_the_cached_matrix() {
        let (mut graph, [a, _, _]) = small_graph(TransformOrder::RotateScaleTranslate);
        {
            let node = graph.node_mut(a).unwrap();
            node.transform = Transform::identity().with_translation(10.0, 0.0, 0.0);
            node.spin = Some(Spin::new(Vector3::new(0.0, 0.0, 2.0), PI));
        }
        graph.initialize_matrices().unwrap();
        let rest = graph.node(a).unwrap().matrix();

        graph.update_scene(0.25).unwrap();
        graph.update_scene(0.25).unwrap();

        // half a turn about +Z, applied on top of the rest pose
        let expected = Matrix4::from_angle_z(Rad(PI * 0.5)) * rest;
        assert_matrix_eq(graph.node(a).unwrap().matrix(), expected, 1e-5);
    }

    #[test]
    fn zero_speed_and_zero_axis_do_not_move() {
        let (mut graph, [a, b, _]) = small_graph(TransformOrder::RotateScaleTranslate);
        graph.node_mut(a).unwrap().spin = Some(Spin::new(Vector3::new(0.0, 1.0, 0.0), 0.0));
        graph.node_mut(b).unwrap().spin = Some(Spin::new(Vector3::new(0.0, 0.0, 0.0), 3.0));
        graph.initialize_matrices().unwrap();
        graph.update_scene(1.0).unwrap();
        assert_eq!(graph.node(a).unwrap().matrix(), Matrix4::identity());
        assert_eq!(graph.node(b).unwrap().matrix(), Matrix4::identity());
    }

    #[test]
    fn accumulated_spin_drift_stays_bounded() {
        let mut rng = rand::rng();
        let (mut graph, [a, _, _]) = small_graph(TransformOrder::RotateScaleTranslate);
        let axis = Vector3::new(0.0, 0.2, 1.0);
        let speed = 2.0 * PI * 0.2;
        {
            let node = graph.node_mut(a).unwrap();
            node.transform = Transform::identity()
                .with_translation(20.0, 0.0, 0.0)
                .with_scale(0.25);
            node.spin = Some(Spin::new(axis, speed));
        }
        graph.initialize_matrices().unwrap();
        let rest = graph.node(a).unwrap().matrix();

        let mut elapsed = 0.0f64;
        for _ in 0..10_000 {
            let dt: f32 = rng.random_range(0.001..0.05);
            elapsed += dt as f64;
            graph.update_scene(dt).unwrap();
        }

        let total = (speed as f64 * elapsed) % (2.0 * std::f64::consts::PI);
        let expected = Matrix4::from_axis_angle(axis.normalize(), Rad(total as f32)) * rest;
        assert_matrix_eq(graph.node(a).unwrap().matrix(), expected, 1e-2);
    }
}
