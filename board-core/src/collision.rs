//! Coarse overlap veto on axis-aligned bounding boxes.
//!
//! Rotation is ignored on purpose: a rotated piece still collides as its
//! unrotated box.

use geo::{Area, Rect};

use crate::piece::{PieceId, PlacedPiece};

/// Area of the intersection of two rectangles; zero when they only touch.
pub fn intersection_area(a: &Rect<f64>, b: &Rect<f64>) -> f64 {
    let w = a.max().x.min(b.max().x) - a.min().x.max(b.min().x);
    let h = a.max().y.min(b.max().y) - a.min().y.max(b.min().y);
    w.max(0.0) * h.max(0.0)
}

/// Share of `candidate` covered by `other`, in `[0, 1]`.
pub fn overlap_ratio(candidate: &Rect<f64>, other: &Rect<f64>) -> f64 {
    let area = candidate.unsigned_area();
    if area <= 0.0 {
        return 0.0;
    }
    intersection_area(candidate, other) / area
}

/// True when any piece other than `exclude` covers more than `threshold` of
/// the candidate. One sufficiently overlapping neighbour is enough; overlaps
/// are not summed.
pub fn is_rejected(
    candidate: &Rect<f64>,
    pieces: &[PlacedPiece],
    exclude: Option<&PieceId>,
    threshold: f64,
) -> bool {
    pieces
        .iter()
        .filter(|p| Some(p.id()) != exclude)
        .any(|p| {
            let ratio = overlap_ratio(candidate, &p.bounds());
            if ratio > threshold {
                tracing::debug!(against = %p.id(), ratio, "placement vetoed");
                true
            } else {
                false
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, bounding_rect};
    use crate::registry::ShapeKind;

    fn square(id: &str, x: f64, y: f64) -> PlacedPiece {
        PlacedPiece::new(PieceId::from(id), ShapeKind::Square, Point::new(x, y), 80.0, 80.0)
    }

    fn rect(x: f64, y: f64) -> Rect<f64> {
        bounding_rect(Point::new(x, y), 80.0, 80.0)
    }

    #[test]
    fn disjoint_and_touching_boxes_pass() {
        let pieces = [square("a", 0.0, 0.0)];
        assert!(!is_rejected(&rect(200.0, 0.0), &pieces, None, 0.5));
        // shares the x = 80 edge only
        assert!(!is_rejected(&rect(80.0, 0.0), &pieces, None, 0.5));
        assert_eq!(intersection_area(&rect(80.0, 0.0), &rect(0.0, 0.0)), 0.0);
    }

    #[test]
    fn identical_boxes_are_rejected() {
        let pieces = [square("a", 10.0, 10.0)];
        assert!(is_rejected(&rect(10.0, 10.0), &pieces, None, 0.5));
    }

    #[test]
    fn exactly_half_overlap_is_accepted() {
        let pieces = [square("a", 0.0, 0.0)];
        assert_eq!(overlap_ratio(&rect(40.0, 0.0), &pieces[0].bounds()), 0.5);
        assert!(!is_rejected(&rect(40.0, 0.0), &pieces, None, 0.5));
        assert!(is_rejected(&rect(39.0, 0.0), &pieces, None, 0.5));
    }

    #[test]
    fn excluded_piece_is_ignored() {
        let pieces = [square("a", 0.0, 0.0), square("b", 300.0, 0.0)];
        let id = PieceId::from("a");
        assert!(!is_rejected(&rect(0.0, 0.0), &pieces, Some(&id), 0.5));
    }

    #[test]
    fn overlaps_are_not_cumulative() {
        // two neighbours each covering 40% of the candidate
        let pieces = [square("a", -48.0, 0.0), square("b", 48.0, 0.0)];
        assert!(!is_rejected(&rect(0.0, 0.0), &pieces, None, 0.5));
    }

    #[test]
    fn ratio_uses_candidate_area() {
        let small = bounding_rect(Point::new(0.0, 0.0), 20.0, 20.0);
        let big = bounding_rect(Point::new(0.0, 0.0), 200.0, 200.0);
        assert_eq!(overlap_ratio(&small, &big), 1.0);
        assert_eq!(overlap_ratio(&big, &small), 0.01);
    }
}
