use geo::{Contains, LineString, Polygon};

use crate::geometry::Point;
use crate::piece::{PieceId, PlacedPiece};

/// Authoritative, ordered list of the pieces on the board.
/// Later pieces are drawn on top of earlier ones.
#[derive(Clone, Debug, Default)]
pub struct PlacementStore {
    pieces: Vec<PlacedPiece>,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pieces(&self) -> &[PlacedPiece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn contains(&self, id: &PieceId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &PieceId) -> Option<&PlacedPiece> {
        self.pieces.iter().find(|p| p.id() == id)
    }

    pub fn get_mut(&mut self, id: &PieceId) -> Option<&mut PlacedPiece> {
        self.pieces.iter_mut().find(|p| p.id() == id)
    }

    pub fn push(&mut self, piece: PlacedPiece) {
        self.pieces.push(piece);
    }

    pub fn remove(&mut self, id: &PieceId) -> Option<PlacedPiece> {
        let idx = self.pieces.iter().position(|p| p.id() == id)?;
        Some(self.pieces.remove(idx))
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    /// Topmost piece whose polygon contains `at`.
    pub fn piece_at(&self, at: Point) -> Option<&PlacedPiece> {
        let pt = geo::Point::new(at.x, at.y);
        self.pieces.iter().rev().find(|p| {
            let ring: LineString<f64> = p.vertices().iter().map(|v| (v.x, v.y)).collect();
            Polygon::new(ring, Vec::new()).contains(&pt)
        })
    }
}
