use cgmath::Vector2;

use crate::gfx::scene::NodeId;

use super::board::Cell;

/// Seconds a piece takes to travel to its destination.
pub const MOVE_DURATION: f32 = 1.0;

/// Linear slide of one node from one cell to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveAnimation {
    node: NodeId,
    from: Vector2<f32>,
    to: Vector2<f32>,
    elapsed: f32,
}

impl MoveAnimation {
    pub fn new(node: NodeId, from: Cell, to: Cell) -> Self {
        Self {
            node,
            from: Vector2::new(from.x as f32, from.y as f32),
            to: Vector2::new(to.x as f32, to.y as f32),
            elapsed: 0.0,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Cell-space position after `elapsed` seconds. Exactly `from` at 0 and exactly `to`
    /// from [`MOVE_DURATION`] on.
    pub fn position_at(&self, elapsed: f32) -> Vector2<f32> {
        let t = (elapsed / MOVE_DURATION).clamp(0.0, 1.0);
        if t >= 1.0 {
            return self.to;
        }
        self.from * (1.0 - t) + self.to * t
    }

    pub fn position(&self) -> Vector2<f32> {
        self.position_at(self.elapsed)
    }

    /// Advances the clock by `dt` and returns the new position.
    pub fn advance(&mut self, dt: f32) -> Vector2<f32> {
        self.elapsed += dt.max(0.0);
        self.position()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= MOVE_DURATION
    }
}
