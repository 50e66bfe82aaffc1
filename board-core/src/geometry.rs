//! Pure geometry: polygon vertices per shape kind and rotation about a pivot.
//!
//! Everything here is deterministic; identical inputs always produce
//! bit-identical vertices, which the snap pass relies on.

use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

use crate::constants::{PARALLELOGRAM_SKEW, TRAPEZIUM_TOP_RATIO};
use crate::registry::ShapeKind;

/// Board-local pixel coordinate. `y` grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

impl From<Point> for Coord<f64> {
    fn from(p: Point) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

/// Visible board rectangle, anchored at the board-local origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }

    /// Clamp a top-left anchor so a `w`×`h` box stays inside the board.
    /// Boxes larger than the board are pinned to the origin.
    pub fn clamp_origin(&self, origin: Point, w: f64, h: f64) -> Point {
        Point {
            x: origin.x.min(self.width - w).max(0.0),
            y: origin.y.min(self.height - h).max(0.0),
        }
    }
}

/// Axis-aligned bounding box of a `w`×`h` box anchored at `origin`.
pub fn bounding_rect(origin: Point, w: f64, h: f64) -> Rect<f64> {
    Rect::new(Coord::from(origin), Coord::from(origin.offset(w, h)))
}

/// Rotate `p` about `pivot` by `degrees`. Positive angles turn clockwise on
/// screen because the y axis points down.
pub fn rotate_point(p: Point, pivot: Point, degrees: f64) -> Point {
    let (s, c) = degrees.to_radians().sin_cos();
    let dx = p.x - pivot.x;
    let dy = p.y - pivot.y;
    Point {
        x: pivot.x + dx * c - dy * s,
        y: pivot.y + dx * s + dy * c,
    }
}

/// Number of vertices `vertices_for` yields for `kind`.
pub fn vertex_count(kind: ShapeKind) -> usize {
    match kind {
        ShapeKind::Hexagon => 6,
        ShapeKind::Triangle => 3,
        ShapeKind::Square
        | ShapeKind::Rhombus
        | ShapeKind::Parallelogram
        | ShapeKind::Trapezium => 4,
    }
}

/// Polygon of `kind` fitted to a `width`×`height` box centred on `center`,
/// rotated by `rotation` degrees about that center. The first vertex is not
/// repeated at the end.
pub fn vertices_for(
    kind: ShapeKind,
    center: Point,
    width: f64,
    height: f64,
    rotation: f64,
) -> Vec<Point> {
    let Point { x: cx, y: cy } = center;
    let (hw, hh) = (width / 2.0, height / 2.0);
    let (left, right, top, bottom) = (cx - hw, cx + hw, cy - hh, cy + hh);

    let pts = match kind {
        ShapeKind::Hexagon => (0..6)
            .map(|i| {
                let a = (60.0 * i as f64 - 30.0).to_radians();
                Point::new(cx + hw * a.cos(), cy + hw * a.sin())
            })
            .collect(),
        ShapeKind::Square => vec![
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
        ],
        ShapeKind::Triangle => vec![
            Point::new(cx, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
        ],
        ShapeKind::Rhombus => vec![
            Point::new(cx, top),
            Point::new(right, cy),
            Point::new(cx, bottom),
            Point::new(left, cy),
        ],
        ShapeKind::Parallelogram => {
            let skew = width * PARALLELOGRAM_SKEW;
            vec![
                Point::new(left + skew, top),
                Point::new(right, top),
                Point::new(right - skew, bottom),
                Point::new(left, bottom),
            ]
        }
        ShapeKind::Trapezium => {
            let half_top = hw * TRAPEZIUM_TOP_RATIO;
            vec![
                Point::new(cx - half_top, top),
                Point::new(cx + half_top, top),
                Point::new(right, bottom),
                Point::new(left, bottom),
            ]
        }
    };

    pts.into_iter()
        .map(|p: Point| rotate_point(p, center, rotation))
        .collect()
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if d >= 360.0 { 0.0 } else { d }
}

/// Signed shortest difference `to - from` in degrees, in `[-180, 180)`.
pub fn angle_delta(from: f64, to: f64) -> f64 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}
