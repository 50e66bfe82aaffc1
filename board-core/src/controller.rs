//! Pointer gesture state machine.
//!
//! The host reports what was pressed and where the pointer goes; the board
//! mutates itself and answers with an [`Action`] telling the host whether to
//! redraw. A gesture is taken out of the board before its release is
//! processed, so a release can never observe its own half-finished state.

use std::mem;

use crate::board::{Board, Placement};
use crate::collision;
use crate::geometry::{Point, angle_delta, normalize_degrees};
use crate::piece::PieceId;
use crate::registry::ShapeKind;

/// Current pointer gesture.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    /// A palette entry is being carried towards the board.
    PendingDrop { kind: ShapeKind },
    /// `grab` is the pointer position relative to the piece's top-left anchor.
    Dragging { id: PieceId, grab: Point },
    Rotating { id: PieceId },
}

impl Gesture {
    pub fn piece_id(&self) -> Option<&PieceId> {
        match self {
            Gesture::Dragging { id, .. } | Gesture::Rotating { id } => Some(id),
            Gesture::Idle | Gesture::PendingDrop { .. } => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// What the primary button went down on, as resolved by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerTarget {
    Palette(ShapeKind),
    PieceBody(PieceId),
    RotateHandle(PieceId),
    /// Empty board or anything else.
    Board,
}

/// Follow-up for the host after a pointer event or delete.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    None,
    RenderNeeded,
    Placed(PieceId),
    Rejected,
    Removed(PieceId),
}

impl Action {
    pub fn needs_render(&self) -> bool {
        matches!(
            self,
            Action::RenderNeeded | Action::Placed(_) | Action::Removed(_)
        )
    }
}

impl Board {
    /// Resolve a press position to a piece body or the bare board.
    pub fn target_at(&self, at: Point) -> PointerTarget {
        match self.piece_at(at) {
            Some(p) => PointerTarget::PieceBody(p.id().clone()),
            None => PointerTarget::Board,
        }
    }

    /// Start a gesture. Presses while another gesture is running are ignored.
    pub fn pointer_down(&mut self, target: PointerTarget, at: Point) -> Action {
        if !self.gesture.is_idle() {
            tracing::trace!(gesture = ?self.gesture, "press ignored during gesture");
            return Action::None;
        }
        self.gesture = match target {
            PointerTarget::Palette(kind) => Gesture::PendingDrop { kind },
            PointerTarget::PieceBody(id) => {
                let Some(piece) = self.store.get(&id) else {
                    return Action::None;
                };
                let pos = piece.position();
                Gesture::Dragging {
                    id,
                    grab: Point::new(at.x - pos.x, at.y - pos.y),
                }
            }
            PointerTarget::RotateHandle(id) => {
                if !self.store.contains(&id) {
                    return Action::None;
                }
                Gesture::Rotating { id }
            }
            PointerTarget::Board => return Action::None,
        };
        tracing::trace!(gesture = ?self.gesture, "gesture started");
        Action::None
    }

    pub fn pointer_move(&mut self, at: Point) -> Action {
        match &self.gesture {
            Gesture::Idle | Gesture::PendingDrop { .. } => Action::None,
            Gesture::Dragging { id, grab } => {
                let (id, grab) = (id.clone(), *grab);
                self.drag_to(&id, grab, at)
            }
            Gesture::Rotating { id } => {
                let id = id.clone();
                self.rotate_towards(&id, at)
            }
        }
    }

    /// Finish the running gesture; the board is `Idle` afterwards whatever happens.
    pub fn pointer_up(&mut self, at: Point) -> Action {
        match mem::take(&mut self.gesture) {
            Gesture::Idle => Action::None,
            Gesture::PendingDrop { kind } => {
                if !self.config.board.contains(at) {
                    tracing::debug!(%kind, "drop released outside the board");
                    return Action::None;
                }
                match self.place_piece(kind, at) {
                    Placement::Placed(id) => Action::Placed(id),
                    Placement::Rejected => Action::Rejected,
                }
            }
            Gesture::Dragging { id, .. } => self.release_drag(&id),
            // rotation is never re-checked for overlap
            Gesture::Rotating { .. } => Action::None,
        }
    }

    /// Abandon the running gesture without applying its release.
    pub fn cancel_gesture(&mut self) {
        if !self.gesture.is_idle() {
            tracing::debug!(gesture = ?self.gesture, "gesture cancelled");
        }
        self.gesture = Gesture::Idle;
    }

    fn drag_to(&mut self, id: &PieceId, grab: Point, at: Point) -> Action {
        let viewport = self.config.board;
        let Some(piece) = self.store.get_mut(id) else {
            self.gesture = Gesture::Idle;
            return Action::None;
        };
        let origin = viewport.clamp_origin(
            at.offset(-grab.x, -grab.y),
            piece.width(),
            piece.height(),
        );
        if origin == piece.position() {
            return Action::None;
        }
        let rotation = piece.rotation();
        piece.commit(origin, rotation);
        Action::RenderNeeded
    }

    fn rotate_towards(&mut self, id: &PieceId, at: Point) -> Action {
        let step = self.config.rotation_step;
        let offset = self.config.rotation_offset;
        let Some(piece) = self.store.get_mut(id) else {
            self.gesture = Gesture::Idle;
            return Action::None;
        };
        let c = piece.center();
        let angle = (at.y - c.y).atan2(at.x - c.x).to_degrees() + offset;
        if angle_delta(piece.rotation(), angle).abs() < step {
            return Action::None;
        }
        let quantized = normalize_degrees((angle / step).round() * step);
        if quantized == piece.rotation() {
            return Action::None;
        }
        let position = piece.position();
        piece.commit(position, quantized);
        tracing::trace!(%id, rotation = quantized, "rotated");
        Action::RenderNeeded
    }

    fn release_drag(&mut self, id: &PieceId) -> Action {
        let Some(piece) = self.store.get(id) else {
            return Action::None;
        };
        let bounds = piece.bounds();
        if collision::is_rejected(
            &bounds,
            self.store.pieces(),
            Some(id),
            self.config.overlap_threshold,
        ) {
            self.store.remove(id);
            tracing::debug!(%id, "dragged piece dropped onto another; removed");
            return Action::Removed(id.clone());
        }
        self.snap_piece(id);
        Action::RenderNeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_square(at: Point) -> (Board, PieceId) {
        let mut b = Board::default().with_clock(|| 7);
        let Placement::Placed(id) = b.place_piece(ShapeKind::Square, at) else {
            panic!("expected a placement");
        };
        (b, id)
    }

    #[test]
    fn palette_drop_places_a_piece() {
        let mut b = Board::default().with_clock(|| 7);
        b.pointer_down(PointerTarget::Palette(ShapeKind::Hexagon), Point::new(-50.0, 10.0));
        assert_eq!(
            b.gesture(),
            &Gesture::PendingDrop {
                kind: ShapeKind::Hexagon
            }
        );
        assert_eq!(b.pointer_move(Point::new(100.0, 100.0)), Action::None);
        let action = b.pointer_up(Point::new(300.0, 300.0));
        assert_eq!(action, Action::Placed(PieceId::from("hexagon_7")));
        assert!(b.gesture().is_idle());
    }

    #[test]
    fn drop_outside_the_board_is_discarded() {
        let mut b = Board::default();
        b.pointer_down(PointerTarget::Palette(ShapeKind::Square), Point::new(0.0, 0.0));
        assert_eq!(b.pointer_up(Point::new(-20.0, 300.0)), Action::None);
        assert!(b.pieces().is_empty());
        assert!(b.gesture().is_idle());
    }

    #[test]
    fn drag_keeps_grab_offset_and_clamps() {
        let (mut b, id) = board_with_square(Point::new(200.0, 200.0));
        b.pointer_down(PointerTarget::PieceBody(id.clone()), Point::new(170.0, 180.0));
        assert_eq!(b.pointer_move(Point::new(270.0, 180.0)), Action::RenderNeeded);
        assert_eq!(b.piece(&id).unwrap().position(), Point::new(260.0, 160.0));
        assert_eq!(b.piece(&id).unwrap().vertices()[0], Point::new(260.0, 160.0));

        b.pointer_move(Point::new(-500.0, 10_000.0));
        let vp = b.viewport();
        assert_eq!(b.piece(&id).unwrap().position(), Point::new(0.0, vp.height - 80.0));
    }

    #[test]
    fn drag_release_snaps_to_grid() {
        let (mut b, id) = board_with_square(Point::new(200.0, 200.0));
        b.pointer_down(PointerTarget::PieceBody(id.clone()), Point::new(200.0, 200.0));
        b.pointer_move(Point::new(213.0, 228.0));
        assert_eq!(b.pointer_up(Point::new(213.0, 228.0)), Action::RenderNeeded);
        // center (213, 228) rounds to (200, 240)
        assert_eq!(b.piece(&id).unwrap().center(), Point::new(200.0, 240.0));
    }

    #[test]
    fn rotate_ignores_small_moves() {
        let (mut b, id) = board_with_square(Point::new(200.0, 200.0));
        b.pointer_down(PointerTarget::RotateHandle(id.clone()), Point::new(200.0, 100.0));
        let c = Point::new(200.0, 200.0);
        let toward = |deg: f64| {
            let r = deg.to_radians();
            Point::new(c.x + 100.0 * r.sin(), c.y - 100.0 * r.cos())
        };
        assert_eq!(b.pointer_move(toward(6.0)), Action::None);
        assert_eq!(b.piece(&id).unwrap().rotation(), 0.0);
        assert_eq!(b.pointer_move(toward(14.0)), Action::RenderNeeded);
        assert_eq!(b.piece(&id).unwrap().rotation(), 10.0);
        assert_eq!(b.pointer_up(toward(14.0)), Action::None);
        assert!(b.gesture().is_idle());
    }

    #[test]
    fn delete_mid_gesture_ends_it() {
        let (mut b, id) = board_with_square(Point::new(200.0, 200.0));
        b.pointer_down(PointerTarget::PieceBody(id.clone()), Point::new(200.0, 200.0));
        assert_eq!(b.delete_piece(&id), Action::Removed(id.clone()));
        assert!(b.gesture().is_idle());
        assert_eq!(b.pointer_move(Point::new(300.0, 300.0)), Action::None);
        assert_eq!(b.pointer_up(Point::new(300.0, 300.0)), Action::None);
    }

    #[test]
    fn second_press_during_gesture_is_ignored() {
        let (mut b, id) = board_with_square(Point::new(200.0, 200.0));
        b.pointer_down(PointerTarget::RotateHandle(id.clone()), Point::new(200.0, 100.0));
        b.pointer_down(PointerTarget::Palette(ShapeKind::Square), Point::new(0.0, 0.0));
        assert_eq!(b.gesture(), &Gesture::Rotating { id });
    }

    #[test]
    fn cancelled_drag_leaves_piece_where_it_was_moved() {
        let (mut b, id) = board_with_square(Point::new(200.0, 200.0));
        b.pointer_down(PointerTarget::PieceBody(id.clone()), Point::new(200.0, 200.0));
        b.pointer_move(Point::new(223.0, 200.0));
        b.cancel_gesture();
        assert!(b.gesture().is_idle());
        // no release snap
        assert_eq!(b.piece(&id).unwrap().center(), Point::new(223.0, 200.0));
    }

    #[test]
    fn press_on_empty_board_stays_idle() {
        let mut b = Board::default();
        let target = b.target_at(Point::new(50.0, 50.0));
        assert_eq!(target, PointerTarget::Board);
        b.pointer_down(target, Point::new(50.0, 50.0));
        assert!(b.gesture().is_idle());
    }
}
