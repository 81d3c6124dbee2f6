//! # Selection State Machine
//!
//! | phase           | move                      | select                                   |
//! |-----------------|---------------------------|------------------------------------------|
//! | `NoSelection`   | scan to the next shape    | shape under cursor: `ShapeSelected`      |
//! | `ShapeSelected` | step the destination      | origin: cancel; empty cell: `Animating`  |
//! | `Animating`     | ignored                   | ignored                                  |
//!
//! A running move ends in `NoSelection` once [`Interaction::tick`] has covered one second.
//! Selecting an occupied destination is rejected.

use crate::{
    error::{PuzzleError, SceneError},
    gfx::scene::{NodeId, SceneGraph},
};

use super::{
    animation::MoveAnimation,
    board::{Board, Cell},
};

/// Lift of the marker above the board while it is shown.
const MARKER_LIFT: f32 = 0.002;
/// Offset of a shape node from the corner of its cell.
pub const CELL_CENTER: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoSelection,
    ShapeSelected,
    Animating,
}

/// Cursor, destination marker and the in-flight move over a [`Board`].
#[derive(Debug, Clone)]
pub struct Interaction {
    board: Board,
    phase: Phase,
    cursor: Cell,
    destination: Cell,
    marker: NodeId,
    animation: Option<MoveAnimation>,
}

impl Interaction {
    /// Starts in [`Phase::NoSelection`] with the cursor on (0, 0). `marker` is the hidden
    /// destination marker node, a child of the board node.
    pub fn new(board: Board, marker: NodeId) -> Self {
        Self {
            board,
            phase: Phase::NoSelection,
            cursor: Cell::default(),
            destination: Cell::default(),
            marker,
            animation: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Hovered cell, or the cell of the selected shape.
    pub fn cursor(&self) -> Cell {
        self.cursor
    }

    /// Position of the destination marker while a shape is selected.
    pub fn destination(&self) -> Option<Cell> {
        (self.phase == Phase::ShapeSelected).then_some(self.destination)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn animation(&self) -> Option<&MoveAnimation> {
        self.animation.as_ref()
    }

    /// Node under the cursor, drawn highlighted.
    pub fn hovered_node(&self) -> Option<NodeId> {
        self.board.tile(self.cursor).and_then(|tile| tile.node())
    }

    /// Moves the cursor to the next shape in direction (`dx`, `dy`), or the destination
    /// marker by one cell when a shape is selected.
    pub fn move_selection(
        &mut self,
        scene: &mut SceneGraph,
        dx: i32,
        dy: i32,
    ) -> Result<(), PuzzleError> {
        match self.phase {
            Phase::Animating => {
                log::debug!("move ignored while animating");
            }
            Phase::NoSelection => {
                self.cursor = self.next_shape(dx, dy);
                log::debug!("cursor at ({}, {})", self.cursor.x, self.cursor.y);
            }
            Phase::ShapeSelected => {
                let from = self.destination;
                let to = Cell::new(
                    wrap(from.x, dx, self.board.width()),
                    wrap(from.y, dy, self.board.height()),
                );
                self.translate_marker(
                    scene,
                    to.x as f32 - from.x as f32,
                    to.y as f32 - from.y as f32,
                    0.0,
                )?;
                self.destination = to;
                log::debug!("destination at ({}, {})", to.x, to.y);
            }
        }
        Ok(())
    }

    /// Selects the hovered shape, cancels the selection, or starts a move.
    pub fn select_shape(&mut self, scene: &mut SceneGraph) -> Result<(), PuzzleError> {
        match self.phase {
            Phase::Animating => {
                log::debug!("select ignored while animating");
            }
            Phase::NoSelection => {
                if self.board.is_empty(self.cursor) {
                    return Ok(());
                }
                let Cell { x, y } = self.cursor;
                self.translate_marker(scene, x as f32, y as f32, -MARKER_LIFT)?;
                self.destination = self.cursor;
                self.phase = Phase::ShapeSelected;
                log::debug!("selected shape at ({x}, {y})");
            }
            Phase::ShapeSelected => {
                let (origin, destination) = (self.cursor, self.destination);
                if destination == origin {
                    self.hide_marker(scene)?;
                    self.phase = Phase::NoSelection;
                    log::debug!("selection cancelled");
                } else if self.board.is_empty(destination) {
                    let Some(node) = self.hovered_node() else {
                        return Ok(());
                    };
                    self.hide_marker(scene)?;
                    self.board.swap(origin, destination)?;
                    self.animation = Some(MoveAnimation::new(node, origin, destination));
                    self.cursor = destination;
                    self.phase = Phase::Animating;
                    log::debug!(
                        "moving ({}, {}) -> ({}, {})",
                        origin.x,
                        origin.y,
                        destination.x,
                        destination.y
                    );
                } else {
                    log::debug!(
                        "destination ({}, {}) is occupied",
                        destination.x,
                        destination.y
                    );
                }
            }
        }
        Ok(())
    }

    /// Advances the running move by `dt` seconds.
    pub fn tick(&mut self, scene: &mut SceneGraph, dt: f32) -> Result<(), PuzzleError> {
        let Some(animation) = self.animation.as_mut() else {
            return Ok(());
        };

        let position = animation.advance(dt);
        let node_id = animation.node();
        let finished = animation.is_finished();

        let node = scene
            .node_mut(node_id)
            .ok_or(SceneError::UnknownNode(node_id))?;
        node.transform.translation.x = position.x + CELL_CENTER;
        node.transform.translation.y = position.y + CELL_CENTER;
        scene.refresh_subtree(node_id)?;

        if finished {
            self.animation = None;
            self.phase = Phase::NoSelection;
            log::debug!("move finished");
        }
        Ok(())
    }

    /// Scans from the cursor in direction (`dx`, `dy`) for the next non-empty cell.
    ///
    /// Leaving the board sideways moves one row, leaving it vertically moves one column.
    /// At most one lap over every cell is made; without any other shape the cursor
    /// stays put.
    fn next_shape(&self, dx: i32, dy: i32) -> Cell {
        let (width, height) = (self.board.width() as i64, self.board.height() as i64);
        let (dx, dy) = (i64::from(dx), i64::from(dy));
        let (mut x, mut y) = (self.cursor.x as i64, self.cursor.y as i64);

        for _ in 0..self.board.cell_count() {
            if x + dx >= width {
                x = 0;
                y = (y + 1).rem_euclid(height);
            } else if x + dx < 0 {
                x = width - 1;
                y = (y - 1).rem_euclid(height);
            } else {
                x += dx;
            }

            if y + dy >= height {
                y = 0;
                x = (x + 1).rem_euclid(width);
            } else if y + dy < 0 {
                y = height - 1;
                x = (x - 1).rem_euclid(width);
            } else {
                y += dy;
            }

            let cell = Cell::new(x as usize, y as usize);
            if cell == self.cursor || !self.board.is_empty(cell) {
                return cell;
            }
        }
        self.cursor
    }

    fn hide_marker(&self, scene: &mut SceneGraph) -> Result<(), PuzzleError> {
        let Cell { x, y } = self.destination;
        self.translate_marker(scene, -(x as f32), -(y as f32), MARKER_LIFT)
    }

    fn translate_marker(
        &self,
        scene: &mut SceneGraph,
        dx: f32,
        dy: f32,
        dz: f32,
    ) -> Result<(), PuzzleError> {
        let marker = scene
            .node_mut(self.marker)
            .ok_or(SceneError::UnknownNode(self.marker))?;
        marker.transform.translation.x += dx;
        marker.transform.translation.y += dy;
        marker.transform.translation.z += dz;
        scene.refresh_subtree(self.marker)?;
        Ok(())
    }
}

fn wrap(value: usize, delta: i32, len: usize) -> usize {
    (value as i64 + i64::from(delta)).rem_euclid(len as i64) as usize
}
