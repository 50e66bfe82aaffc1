use serde::Serialize;

use crate::geometry::Point;
use crate::piece::PlacedPiece;

/// What a released piece was aligned to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnapTarget {
    /// Own vertex `from` lands exactly on a neighbour's vertex `to`.
    Vertex { from: Point, to: Point },
    /// Bounding-box center lands on this grid intersection.
    Grid { center: Point },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Snap {
    pub dx: f64,
    pub dy: f64,
    pub target: SnapTarget,
}

/// Offset that aligns `piece` with its closest neighbouring vertex, or with
/// the background grid when no vertex is within `max_distance` on both axes.
/// Vertex alignment always wins over the grid.
pub fn resolve_snap(
    piece: &PlacedPiece,
    pieces: &[PlacedPiece],
    max_distance: f64,
    grid_spacing: f64,
) -> Snap {
    let mut best: Option<(f64, Snap)> = None;
    for &own in piece.vertices() {
        for other in pieces.iter().filter(|o| o.id() != piece.id()) {
            for &theirs in other.vertices() {
                let dx = theirs.x - own.x;
                let dy = theirs.y - own.y;
                if dx.abs() > max_distance || dy.abs() > max_distance {
                    continue;
                }
                let dist = dx.hypot(dy);
                if best.as_ref().is_none_or(|(d, _)| dist < *d) {
                    let target = SnapTarget::Vertex {
                        from: own,
                        to: theirs,
                    };
                    best = Some((dist, Snap { dx, dy, target }));
                }
            }
        }
    }
    if let Some((_, snap)) = best {
        return snap;
    }

    let c = piece.center();
    let snapped = Point::new(
        (c.x / grid_spacing).round() * grid_spacing,
        (c.y / grid_spacing).round() * grid_spacing,
    );
    Snap {
        dx: snapped.x - c.x,
        dy: snapped.y - c.y,
        target: SnapTarget::Grid { center: snapped },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceId;
    use crate::registry::ShapeKind;

    fn square(id: &str, x: f64, y: f64) -> PlacedPiece {
        PlacedPiece::new(PieceId::from(id), ShapeKind::Square, Point::new(x, y), 80.0, 80.0)
    }

    #[test]
    fn near_vertex_wins_over_grid() {
        let a = square("a", 0.0, 0.0);
        let b = square("b", 87.0, 4.0);
        let pieces = [a, b.clone()];
        let snap = resolve_snap(&b, &pieces, 50.0, 40.0);
        assert_eq!((snap.dx, snap.dy), (-7.0, -4.0));
        assert_eq!(
            snap.target,
            SnapTarget::Vertex {
                from: Point::new(87.0, 4.0),
                to: Point::new(80.0, 0.0),
            }
        );
    }

    #[test]
    fn closest_candidate_is_chosen() {
        let a = square("a", 0.0, 0.0);
        let c = square("c", 0.0, 200.0);
        // nearest corner offsets: (-30, -30) to a, (-30, 10) to c
        let b = square("b", 110.0, 110.0);
        let pieces = [a, c, b.clone()];
        let snap = resolve_snap(&b, &pieces, 50.0, 40.0);
        assert_eq!((snap.dx, snap.dy), (-30.0, 10.0));
    }

    #[test]
    fn isolated_piece_centers_on_grid() {
        let p = square("p", 103.0, 57.0);
        let snap = resolve_snap(&p, std::slice::from_ref(&p), 50.0, 40.0);
        // center (143, 97) -> (160, 80)
        assert_eq!((snap.dx, snap.dy), (17.0, -17.0));
        assert_eq!(
            snap.target,
            SnapTarget::Grid {
                center: Point::new(160.0, 80.0)
            }
        );
    }

    #[test]
    fn distance_limit_is_per_axis() {
        let a = square("a", 0.0, 0.0);
        // corner offset (51, 0): outside on x even though close on y
        let b = square("b", 131.0, 0.0);
        let pieces = [a, b.clone()];
        let snap = resolve_snap(&b, &pieces, 50.0, 40.0);
        assert!(matches!(snap.target, SnapTarget::Grid { .. }));
    }
}
