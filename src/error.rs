//! Error types shared by the scene graph and the render engine.

use thiserror::Error;

use crate::gfx::scene::NodeId;

/// Structural errors raised while building or traversing a [`SceneGraph`].
///
/// [`SceneGraph`]: crate::gfx::scene::SceneGraph
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} does not belong to this scene graph")]
    UnknownNode(NodeId),
    #[error("cannot attach {child:?} to {parent:?}: traversal has already begun")]
    Sealed { parent: NodeId, child: NodeId },
    #[error("node {child:?} already has parent {parent:?}")]
    AlreadyParented { child: NodeId, parent: NodeId },
    #[error("attaching {child:?} to {parent:?} would form a cycle")]
    Cycle { parent: NodeId, child: NodeId },
    #[error("the root node cannot be attached as a child")]
    RootAsChild,
    #[error("node {0:?} has no renderable mesh")]
    MissingMesh(NodeId),
    #[error("node {0:?} is not reachable from the root")]
    Detached(NodeId),
    #[error("scene graph must be initialized before it is drawn")]
    NotInitialized,
}

/// Failures of the GPU collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter found: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface does not support any texture format")]
    NoSurfaceFormat,
    #[error("geometry `{0}` has no triangles")]
    EmptyGeometry(String),
    #[error("mesh handle {0:?} was not created by this renderer")]
    UnknownMesh(crate::gfx::scene::MeshHandle),
}

/// Problems with a board-layout file or a board coordinate.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("failed to read board layout {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("board layout is empty: expected a colour header line")]
    MissingHeader,
    #[error("board layout has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("board layout row {row} has {found} columns, expected {expected}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell ({x}, {y}) lies outside the {width}x{height} board")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// Failures while the puzzle mutates its board and scene.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Board(#[from] BoardError),
}
