use anyhow::Context;
use std::{collections::HashMap, f32::consts::PI};
use winit::keyboard::KeyCode;

use crate::{
    config::{AppConfig, CameraConfig},
    exercise::Exercise,
    gfx::{
        geometry::{generate_checkerboard, generate_marker_quad},
        scene::{GeometryUploader, MeshHandle, NodeId, SceneGraph, Transform, TransformOrder},
    },
};

use super::{
    board::{Board, BoardColor, BoardLayout},
    interaction::{Interaction, Phase, CELL_CENTER},
    shape::Shape,
};

const BOARD_OFFSET_Z: f32 = 0.5;
const MARKER_HEIGHT: f32 = 0.001;
const SHAPE_HEIGHT: f32 = -0.250001;
const SHAPE_SCALE: f32 = 0.75;

/// Direction of a cursor step for an arrow key.
fn arrow_direction(key: KeyCode) -> Option<(i32, i32)> {
    match key {
        KeyCode::ArrowUp => Some((0, -1)),
        KeyCode::ArrowDown => Some((0, 1)),
        KeyCode::ArrowLeft => Some((-1, 0)),
        KeyCode::ArrowRight => Some((1, 0)),
        _ => None,
    }
}

/// Shapes on a checkerboard, moved one at a time with the arrow keys and Enter.
pub struct ShapePuzzle {
    layout: BoardLayout,
    scene: Option<SceneGraph>,
    interaction: Option<Interaction>,
}

impl ShapePuzzle {
    pub fn new(layout: BoardLayout) -> Self {
        Self {
            layout,
            scene: None,
            interaction: None,
        }
    }

    pub fn interaction(&self) -> Option<&Interaction> {
        self.interaction.as_ref()
    }

    fn parts(&mut self) -> Option<(&mut SceneGraph, &mut Interaction)> {
        Some((self.scene.as_mut()?, self.interaction.as_mut()?))
    }
}

impl Exercise for ShapePuzzle {
    fn config(&self) -> AppConfig {
        AppConfig::default()
            .with_title("Shape Puzzle")
            .with_camera(
                CameraConfig::default()
                    .with_position(0.0, 4.0, 7.0)
                    .with_orientation(90.0, 20.0),
            )
    }

    fn build(&mut self, uploader: &mut dyn GeometryUploader) -> anyhow::Result<()> {
        let (width, height) = (self.layout.width(), self.layout.height());
        let mut scene = SceneGraph::new(TransformOrder::RotateTranslateScale);

        let root = scene.root();
        let board_mesh = uploader
            .upload(&generate_checkerboard(
                width,
                height,
                self.layout.color == BoardColor::Blue,
            ))
            .context("uploading board")?;
        let board_node = scene.node_mut(root).context("board node")?;
        board_node.mesh = Some(board_mesh);
        board_node.transform = Transform::identity()
            .with_translation(-(width as f32) / 2.0, -(height as f32) / 2.0, -BOARD_OFFSET_Z)
            .with_rotation(PI / 2.0, 0.0, 0.0);

        let marker = scene.create_node();
        scene.add_child(root, marker)?;
        let marker_mesh = uploader
            .upload(&generate_marker_quad())
            .context("uploading move marker")?;
        let marker_node = scene.node_mut(marker).context("marker node")?;
        marker_node.mesh = Some(marker_mesh);
        marker_node.transform = Transform::identity().with_translation(0.0, 0.0, MARKER_HEIGHT);

        let mut meshes: HashMap<Shape, MeshHandle> = HashMap::new();
        let mut board = Board::new(width, height);
        for (cell, shape) in self.layout.occupied() {
            let mesh = match meshes.get(&shape) {
                Some(&mesh) => mesh,
                None => {
                    let geometry = shape
                        .geometry()
                        .with_context(|| format!("no geometry for {shape}"))?;
                    let mesh = uploader
                        .upload(&geometry)
                        .with_context(|| format!("uploading {shape}"))?;
                    meshes.insert(shape, mesh);
                    mesh
                }
            };

            let node = add_shape_node(&mut scene, root, mesh, cell.x, cell.y)?;
            board.place(cell, shape, node)?;
        }

        scene.initialize_matrices()?;

        let mut interaction = Interaction::new(board, marker);
        interaction.move_selection(&mut scene, 1, 0)?;
        log::info!(
            "puzzle ready: {} shapes on a {}x{} board",
            interaction.board().occupied_count(),
            width,
            height
        );

        self.scene = Some(scene);
        self.interaction = Some(interaction);
        Ok(())
    }

    fn update(&mut self, dt: f32) -> anyhow::Result<()> {
        if let Some((scene, interaction)) = self.parts() {
            interaction.tick(scene, dt)?;
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) -> anyhow::Result<()> {
        let Some((scene, interaction)) = self.parts() else {
            return Ok(());
        };
        if interaction.phase() == Phase::Animating {
            return Ok(());
        }

        if let Some((dx, dy)) = arrow_direction(key) {
            interaction.move_selection(scene, dx, dy)?;
        } else if matches!(key, KeyCode::Enter | KeyCode::NumpadEnter) {
            interaction.select_shape(scene)?;
        }
        Ok(())
    }

    fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    fn highlighted_node(&self) -> Option<NodeId> {
        self.interaction.as_ref()?.hovered_node()
    }
}

fn add_shape_node(
    scene: &mut SceneGraph,
    parent: NodeId,
    mesh: MeshHandle,
    x: usize,
    y: usize,
) -> anyhow::Result<NodeId> {
    let node = scene.create_node();
    scene.add_child(parent, node)?;
    let shape_node = scene.node_mut(node).context("shape node")?;
    shape_node.mesh = Some(mesh);
    shape_node.transform = Transform::identity()
        .with_translation(x as f32 + CELL_CENTER, y as f32 + CELL_CENTER, SHAPE_HEIGHT)
        .with_scale(SHAPE_SCALE);
    Ok(node)
}
