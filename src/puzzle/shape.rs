use std::fmt;

use crate::gfx::geometry::{extrude, GeometryData};

/// Extrusion depth of every shape.
pub const SHAPE_DEPTH: f32 = 0.25;

/// Kind of piece occupying a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    #[default]
    None,
    Triangle,
    Parallelogram,
    Arrow,
    HexagonWhite,
    HexagonBlack,
    Star,
    Cake,
}

impl Shape {
    pub const ALL: [Shape; 8] = [
        Shape::None,
        Shape::Triangle,
        Shape::Parallelogram,
        Shape::Arrow,
        Shape::HexagonWhite,
        Shape::HexagonBlack,
        Shape::Star,
        Shape::Cake,
    ];

    /// Layout-file token of this shape.
    pub fn token(self) -> &'static str {
        match self {
            Shape::None => "NONE",
            Shape::Triangle => "TRIANGLE",
            Shape::Parallelogram => "PARALLELOGRAM",
            Shape::Arrow => "ARROW",
            Shape::HexagonWhite => "HEXAGON_WHITE",
            Shape::HexagonBlack => "HEXAGON_BLACK",
            Shape::Star => "STAR",
            Shape::Cake => "CAKE",
        }
    }

    /// Exact, case-sensitive lookup of a layout-file token.
    pub fn from_token(token: &str) -> Option<Shape> {
        Self::ALL.into_iter().find(|shape| shape.token() == token)
    }

    pub fn is_none(self) -> bool {
        self == Shape::None
    }

    pub fn color(self) -> Option<[f32; 4]> {
        let rgb = match self {
            Shape::None => return None,
            Shape::Triangle => [1.0, 0.0, 1.0],
            Shape::Parallelogram => [0.0, 1.0, 0.0],
            Shape::Arrow => [1.0, 1.0, 0.0],
            Shape::HexagonWhite => [1.0, 1.0, 1.0],
            Shape::HexagonBlack => [0.0, 0.0, 0.0],
            Shape::Star => [0.0, 0.0, 1.0],
            Shape::Cake => [1.0, 0.0, 0.0],
        };
        Some([rgb[0], rgb[1], rgb[2], 1.0])
    }

    /// Flat triangle soup in the unit square centred on the origin, z = 0.
    pub fn outline(self) -> Vec<[f32; 3]> {
        match self {
            Shape::None => Vec::new(),
            Shape::Triangle => vec![[-0.5, 0.5, 0.0], [0.5, 0.5, 0.0], [0.0, -0.5, 0.0]],
            Shape::Parallelogram => vec![
                [0.5, -0.5, 0.0],
                [0.25, 0.5, 0.0],
                [-0.25, -0.5, 0.0],
                [0.25, 0.5, 0.0],
                [-0.25, -0.5, 0.0],
                [-0.5, 0.5, 0.0],
            ],
            Shape::Arrow => [1.0f32, -1.0]
                .into_iter()
                .flat_map(|f| {
                    [
                        [-0.5 * f, 0.5, 0.0],
                        [-0.3 * f, 0.5, 0.0],
                        [0.0, -0.5, 0.0],
                        [0.0, -0.5, 0.0],
                        [-0.3 * f, 0.5, 0.0],
                        [0.0, -0.2, 0.0],
                    ]
                })
                .collect(),
            Shape::HexagonWhite | Shape::HexagonBlack => (1..=6)
                .flat_map(|i| {
                    let angle = i as f32 * 60.0;
                    [polar(angle, 0.5), polar(angle - 60.0, 0.5), [0.0, 0.0, 0.0]]
                })
                .collect(),
            Shape::Star => star_outline(),
            Shape::Cake => {
                let step = 270.0 / 12.0;
                (0..12)
                    .flat_map(|i| {
                        let angle = 180.0 + i as f32 * step;
                        [polar(angle + step, 0.5), polar(angle, 0.5), [0.0, 0.0, 0.0]]
                    })
                    .collect()
            }
        }
    }

    /// Extruded, coloured geometry, or `None` for [`Shape::None`].
    pub fn geometry(self) -> Option<GeometryData> {
        let color = self.color()?;
        let outline = self.outline();
        let colors = vec![color; outline.len()];
        Some(extrude(self.token(), &outline, &colors, SHAPE_DEPTH).with_lighting(true))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

fn polar(degrees: f32, radius: f32) -> [f32; 3] {
    let radians = degrees.to_radians();
    [radians.cos() * radius, radians.sin() * radius, 0.0]
}

/// Five tips around an inner pentagon, and three triangles filling the pentagon.
fn star_outline() -> Vec<[f32; 3]> {
    const INNER: f32 = 0.25;
    const OUTER: f32 = 0.5;

    let mut triangles = Vec::with_capacity(8 * 3);
    let mut angle = 18.0;
    for _ in 0..5 {
        triangles.extend_from_slice(&[
            polar(angle, INNER),
            polar(angle - 72.0, INNER),
            polar(angle - 36.0, OUTER),
        ]);
        angle += 72.0;
    }

    for corners in [[0.0, 72.0, 144.0], [144.0, 216.0, 288.0], [288.0, 360.0, 144.0]] {
        triangles.extend(corners.map(|offset| polar(angle + offset, INNER)));
    }
    triangles
}
