//! Board grid and its plaintext layout format.
//!
//! A layout file starts with a colour header (`BLUE` or anything else for red), followed
//! by one line per board row of whitespace-separated shape tokens:
//!
//! ```text
//! BLUE
//! TRIANGLE NONE NONE NONE NONE NONE NONE STAR
//! ...
//! ```
//!
//! The grid size is configured, not read from the file; a mismatch is an error.

use std::path::Path;

use crate::{error::BoardError, gfx::scene::NodeId};

use super::shape::Shape;

pub const BOARD_WIDTH: usize = 8;
pub const BOARD_HEIGHT: usize = 5;

/// Column `x`, row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Colour of the board cell at (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardColor {
    Red,
    Blue,
}

impl BoardColor {
    fn from_header(header: &str) -> Self {
        if header.trim() == "BLUE" {
            BoardColor::Blue
        } else {
            BoardColor::Red
        }
    }
}

/// Parsed contents of a layout file.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    pub color: BoardColor,
    width: usize,
    height: usize,
    shapes: Vec<Shape>,
    warnings: Vec<String>,
}

impl BoardLayout {
    pub fn parse(text: &str, width: usize, height: usize) -> Result<Self, BoardError> {
        let mut lines = text.lines();
        let header = lines.next().ok_or(BoardError::MissingHeader)?;
        if header.trim().is_empty() {
            return Err(BoardError::MissingHeader);
        }

        let mut rows: Vec<&str> = lines.collect();
        while rows.last().is_some_and(|row| row.trim().is_empty()) {
            rows.pop();
        }
        if rows.len() != height {
            return Err(BoardError::RowCount {
                expected: height,
                found: rows.len(),
            });
        }

        let mut shapes = Vec::with_capacity(width * height);
        let mut warnings = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            let tokens: Vec<&str> = row.split_whitespace().collect();
            if tokens.len() != width {
                return Err(BoardError::ColumnCount {
                    row: y,
                    expected: width,
                    found: tokens.len(),
                });
            }
            for (x, token) in tokens.into_iter().enumerate() {
                let shape = Shape::from_token(token).unwrap_or_else(|| {
                    let warning = format!("unknown shape `{token}` at ({x}, {y}), using NONE");
                    log::warn!("{warning}");
                    warnings.push(warning);
                    Shape::None
                });
                shapes.push(shape);
            }
        }

        Ok(Self {
            color: BoardColor::from_header(header),
            width,
            height,
            shapes,
            warnings,
        })
    }

    pub fn load(path: impl AsRef<Path>, width: usize, height: usize) -> Result<Self, BoardError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BoardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layout = Self::parse(&text, width, height)?;
        log::info!(
            "loaded board {} ({}x{}, {} shapes)",
            path.display(),
            width,
            height,
            layout.shapes.iter().filter(|shape| !shape.is_none()).count()
        );
        Ok(layout)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape_at(&self, cell: Cell) -> Shape {
        if cell.x >= self.width || cell.y >= self.height {
            return Shape::None;
        }
        self.shapes[cell.y * self.width + cell.x]
    }

    /// Unknown tokens that were replaced by [`Shape::None`].
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Non-empty cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Cell, Shape)> + '_ {
        self.shapes
            .iter()
            .enumerate()
            .filter(|(_, shape)| !shape.is_none())
            .map(|(i, &shape)| (Cell::new(i % self.width, i / self.width), shape))
    }
}

/// One board cell: a shape and the node drawing it.
///
/// `shape` is [`Shape::None`] exactly when `node` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    shape: Shape,
    node: Option<NodeId>,
}

impl Tile {
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }
}

/// Row-major grid of [`Tile`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Board {
    /// An empty `width` x `height` board.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    fn index(&self, cell: Cell) -> Result<usize, BoardError> {
        if cell.x >= self.width || cell.y >= self.height {
            return Err(BoardError::OutOfBounds {
                x: cell.x,
                y: cell.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(cell.y * self.width + cell.x)
    }

    pub fn tile(&self, cell: Cell) -> Option<&Tile> {
        self.index(cell).ok().map(|i| &self.tiles[i])
    }

    /// True for empty or out-of-range cells.
    pub fn is_empty(&self, cell: Cell) -> bool {
        self.tile(cell).map_or(true, Tile::is_empty)
    }

    /// Puts `shape`, drawn by `node`, on `cell`. Placing [`Shape::None`] clears the cell.
    pub fn place(&mut self, cell: Cell, shape: Shape, node: NodeId) -> Result<(), BoardError> {
        let i = self.index(cell)?;
        self.tiles[i] = if shape.is_none() {
            Tile::default()
        } else {
            Tile {
                shape,
                node: Some(node),
            }
        };
        Ok(())
    }

    /// Exchanges shape and node of two cells.
    pub fn swap(&mut self, a: Cell, b: Cell) -> Result<(), BoardError> {
        let (i, j) = (self.index(a)?, self.index(b)?);
        self.tiles.swap(i, j);
        Ok(())
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|tile| !tile.is_empty()).count()
    }

    /// Checks `shape == None <=> node == None` for every tile.
    pub fn is_consistent(&self) -> bool {
        self.tiles
            .iter()
            .all(|tile| tile.shape.is_none() == tile.node.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{SceneGraph, TransformOrder};

    const EASY: &str = "BLUE
TRIANGLE NONE NONE NONE NONE NONE NONE STAR
NONE NONE PARALLELOGRAM NONE NONE NONE NONE NONE
NONE NONE NONE NONE ARROW NONE NONE NONE
NONE HEXAGON_WHITE NONE NONE NONE NONE HEXAGON_BLACK NONE
CAKE NONE NONE NONE NONE NONE NONE NONE
";

    #[test]
    fn parses_header_and_shapes() {
        let layout = BoardLayout::parse(EASY, BOARD_WIDTH, BOARD_HEIGHT).unwrap();
        assert_eq!(layout.color, BoardColor::Blue);
        assert_eq!(layout.shape_at(Cell::new(0, 0)), Shape::Triangle);
        assert_eq!(layout.shape_at(Cell::new(7, 0)), Shape::Star);
        assert_eq!(layout.shape_at(Cell::new(6, 3)), Shape::HexagonBlack);
        assert_eq!(layout.shape_at(Cell::new(0, 4)), Shape::Cake);
        assert_eq!(layout.occupied().count(), 7);
        assert!(layout.warnings().is_empty());
    }

    #[test]
    fn any_other_header_means_red() {
        let text = "RED\nNONE NONE\n";
        let layout = BoardLayout::parse(text, 2, 1).unwrap();
        assert_eq!(layout.color, BoardColor::Red);
    }

    #[test]
    fn unknown_tokens_become_none_with_a_warning() {
        let text = "BLUE\nTRIANGLE PIE\n";
        let layout = BoardLayout::parse(text, 2, 1).unwrap();
        assert_eq!(layout.shape_at(Cell::new(1, 0)), Shape::None);
        assert_eq!(layout.warnings().len(), 1);
        assert!(layout.warnings()[0].contains("PIE"));
    }

    #[test]
    fn rejects_malformed_layouts() {
        assert!(matches!(
            BoardLayout::parse("", 2, 1),
            Err(BoardError::MissingHeader)
        ));
        assert!(matches!(
            BoardLayout::parse("BLUE\nNONE NONE\nNONE NONE\n", 2, 1),
            Err(BoardError::RowCount { expected: 1, found: 2 })
        ));
        assert!(matches!(
            BoardLayout::parse("BLUE\nNONE NONE NONE\n", 2, 1),
            Err(BoardError::ColumnCount { row: 0, expected: 2, found: 3 })
        ));
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        let layout = BoardLayout::parse("BLUE\nSTAR NONE\n\n\n", 2, 1).unwrap();
        assert_eq!(layout.shape_at(Cell::new(0, 0)), Shape::Star);
    }

    #[test]
    fn load_reports_missing_files() {
        let err = BoardLayout::load("does/not/exist", 2, 1).unwrap_err();
        assert!(matches!(err, BoardError::Io { .. }));
    }

    #[test]
    fn bundled_layouts_parse() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("boards");
        for name in ["EASY_01", "EASY_02", "MEDIUM_01"] {
            let layout = BoardLayout::load(dir.join(name), BOARD_WIDTH, BOARD_HEIGHT).unwrap();
            assert!(layout.warnings().is_empty(), "{name}");
            assert!(layout.occupied().count() > 0, "{name}");
        }
    }

    #[test]
    fn place_and_swap_keep_tiles_consistent() {
        let mut board = Board::new(3, 3);
        let node = SceneGraph::new(TransformOrder::RotateTranslateScale).create_node();
        board.place(Cell::new(0, 0), Shape::Star, node).unwrap();
        board.place(Cell::new(2, 2), Shape::None, node).unwrap();
        assert!(board.is_consistent());
        assert_eq!(board.occupied_count(), 1);

        board.swap(Cell::new(0, 0), Cell::new(1, 0)).unwrap();
        assert!(board.is_empty(Cell::new(0, 0)));
        assert_eq!(board.tile(Cell::new(1, 0)).unwrap().shape(), Shape::Star);
        assert_eq!(board.tile(Cell::new(1, 0)).unwrap().node(), Some(node));
        assert!(board.is_consistent());
    }

    #[test]
    fn out_of_range_cells_are_rejected() {
        let mut board = Board::new(2, 2);
        assert!(board.tile(Cell::new(2, 0)).is_none());
        assert!(board.is_empty(Cell::new(5, 5)));
        assert!(matches!(
            board.swap(Cell::new(0, 0), Cell::new(0, 2)),
            Err(BoardError::OutOfBounds { x: 0, y: 2, .. })
        ));
    }
}
