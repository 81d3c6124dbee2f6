//! # Shape Puzzle
//!
//! A checkerboard loaded from a layout file with extruded shapes standing on it. The arrow
//! keys move a cursor between shapes; Enter picks one up, the arrows then steer a marker,
//! and a second Enter slides the shape onto the marked empty cell.

pub mod animation;
pub mod board;
pub mod game;
pub mod interaction;
pub mod shape;

pub use animation::{MoveAnimation, MOVE_DURATION};
pub use board::{Board, BoardColor, BoardLayout, Cell, Tile, BOARD_HEIGHT, BOARD_WIDTH};
pub use game::ShapePuzzle;
pub use interaction::{Interaction, Phase};
pub use shape::Shape;
