use std::fmt;

use geo::Rect;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, bounding_rect, normalize_degrees, vertices_for};
use crate::registry::ShapeKind;

/// Stable identifier of a placed piece, `"<kind>_<creation millis>"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(String);

impl PieceId {
    pub fn new(id: impl Into<String>) -> Self {
        PieceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PieceId {
    fn from(s: &str) -> Self {
        PieceId(s.to_string())
    }
}

/// A polygon placed on the board.
///
/// `vertices` is a cache derived from `position` and `rotation`. The fields
/// are private and the only mutators ([`PlacedPiece::commit`] and
/// [`PlacedPiece::translate`]) refresh the cache in the same call, so
/// collision and snap code never observe a stale polygon.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedPiece {
    id: PieceId,
    kind: ShapeKind,
    position: Point,
    width: f64,
    height: f64,
    rotation: f64,
    vertices: Vec<Point>,
    borders: Vec<bool>,
}

impl PlacedPiece {
    pub fn new(id: PieceId, kind: ShapeKind, position: Point, width: f64, height: f64) -> Self {
        let mut piece = PlacedPiece {
            id,
            kind,
            position,
            width,
            height,
            rotation: 0.0,
            vertices: Vec::new(),
            borders: Vec::new(),
        };
        piece.refresh_vertices();
        piece.borders = vec![true; piece.vertices.len()];
        piece
    }

    pub fn id(&self) -> &PieceId {
        &self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Degrees in `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Per-edge visibility; `borders[i]` covers the edge from vertex `i` to `i + 1`.
    pub fn borders(&self) -> &[bool] {
        &self.borders
    }

    pub fn center(&self) -> Point {
        self.position.offset(self.width / 2.0, self.height / 2.0)
    }

    /// Axis-aligned bounding box, ignoring rotation.
    pub fn bounds(&self) -> Rect<f64> {
        bounding_rect(self.position, self.width, self.height)
    }

    /// Set position and rotation together and rebuild the vertex cache.
    pub fn commit(&mut self, position: Point, rotation: f64) {
        self.position = position;
        self.rotation = normalize_degrees(rotation);
        self.refresh_vertices();
    }

    /// Rigidly shift the piece, moving the cached vertices with it.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.position = self.position.offset(dx, dy);
        for v in &mut self.vertices {
            *v = v.offset(dx, dy);
        }
    }

    /// Replace the edge flags. Missing entries default to visible, extras are dropped.
    pub fn set_borders(&mut self, mut borders: Vec<bool>) {
        borders.resize(self.vertices.len(), true);
        self.borders = borders;
    }

    fn refresh_vertices(&mut self) {
        self.vertices = vertices_for(
            self.kind,
            self.center(),
            self.width,
            self.height,
            self.rotation,
        );
    }
}
