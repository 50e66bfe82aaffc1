use crate::collision;
use crate::config::EngineConfig;
use crate::controller::{Action, Gesture};
use crate::geometry::{Point, Viewport, bounding_rect};
use crate::piece::{PieceId, PlacedPiece};
use crate::registry::{ShapeKind, ShapeRegistry};
use crate::render::{GridStyle, Renderer, Surface};
use crate::snap::{Snap, SnapTarget, resolve_snap};
use crate::store::PlacementStore;

/// Outcome of [`Board::place_piece`].
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    Placed(PieceId),
    Rejected,
}

/// Milliseconds used to stamp new piece ids.
pub type Clock = Box<dyn Fn() -> u64>;

fn system_millis() -> u64 {
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
    #[cfg(target_arch = "wasm32")]
    {
        static WARNED: std::sync::Once = std::sync::Once::new();
        WARNED.call_once(|| {
            tracing::warn!("no clock injected on wasm32; piece ids fall back to `<kind>_0`");
        });
        0
    }
}

/// The placement engine: shape palette, placed pieces and the active
/// pointer gesture, plus the collision and snap rules applied to them.
pub struct Board {
    pub(crate) config: EngineConfig,
    pub(crate) registry: ShapeRegistry,
    pub(crate) store: PlacementStore,
    pub(crate) gesture: Gesture,
    clock: Clock,
}

/// Default config and bundled palette. Ids are stamped from the system clock,
/// which wasm32 does not have: browser hosts must inject one with
/// [`Board::with_clock`].
impl Default for Board {
    fn default() -> Self {
        Board::new(EngineConfig::default(), ShapeRegistry::builtin())
    }
}

impl Board {
    pub fn new(config: EngineConfig, registry: ShapeRegistry) -> Self {
        Board {
            config,
            registry,
            store: PlacementStore::new(),
            gesture: Gesture::Idle,
            clock: Box::new(system_millis),
        }
    }

    /// Replace the id timestamp source (the browser host passes `Date.now`).
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the engine tunables, board size included. Placed pieces are
    /// not moved.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn set_registry(&mut self, registry: ShapeRegistry) {
        self.registry = registry;
    }

    pub fn viewport(&self) -> Viewport {
        self.config.board
    }

    /// Resize the board to the host layout. Existing pieces are left where they are.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.config.board = Viewport { width, height };
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn pieces(&self) -> &[PlacedPiece] {
        self.store.pieces()
    }

    pub fn piece(&self, id: &PieceId) -> Option<&PlacedPiece> {
        self.store.get(id)
    }

    /// Topmost piece whose polygon contains `at`.
    pub fn piece_at(&self, at: Point) -> Option<&PlacedPiece> {
        self.store.piece_at(at)
    }

    /// Drop a new piece of `kind` centred under `at`. The piece is created only
    /// when no existing piece covers more than the overlap threshold of it;
    /// an accepted piece is snapped straight away.
    pub fn place_piece(&mut self, kind: ShapeKind, at: Point) -> Placement {
        let spec = self.registry.spec(kind);
        let (w, h) = (spec.default_width, spec.default_height);
        let origin = self
            .config
            .board
            .clamp_origin(at.offset(-w / 2.0, -h / 2.0), w, h);
        let candidate = bounding_rect(origin, w, h);
        if collision::is_rejected(
            &candidate,
            self.store.pieces(),
            None,
            self.config.overlap_threshold,
        ) {
            tracing::debug!(%kind, x = at.x, y = at.y, "drop rejected");
            return Placement::Rejected;
        }

        let id = self.next_id(kind);
        self.store
            .push(PlacedPiece::new(id.clone(), kind, origin, w, h));
        self.snap_piece(&id);
        tracing::debug!(%id, "piece placed");
        Placement::Placed(id)
    }

    /// Set position and/or rotation of a piece in one commit. Unknown ids are ignored.
    pub fn update_piece_transform(
        &mut self,
        id: &PieceId,
        position: Option<Point>,
        rotation: Option<f64>,
    ) -> bool {
        let Some(piece) = self.store.get_mut(id) else {
            return false;
        };
        let position = position.unwrap_or(piece.position());
        let rotation = rotation.unwrap_or(piece.rotation());
        piece.commit(position, rotation);
        true
    }

    pub fn set_piece_borders(&mut self, id: &PieceId, borders: Vec<bool>) -> bool {
        match self.store.get_mut(id) {
            Some(piece) => {
                piece.set_borders(borders);
                true
            }
            None => false,
        }
    }

    /// Remove a piece. A gesture that was acting on it ends immediately.
    pub fn delete_piece(&mut self, id: &PieceId) -> Action {
        if self.gesture.piece_id() == Some(id) {
            self.gesture = Gesture::Idle;
        }
        match self.store.remove(id) {
            Some(_) => {
                tracing::debug!(%id, "piece deleted");
                Action::Removed(id.clone())
            }
            None => Action::None,
        }
    }

    /// Remove every piece and end any gesture.
    pub fn clear(&mut self) {
        self.gesture = Gesture::Idle;
        self.store.clear();
    }

    /// Redraw the board through `renderer`. Returns false when the renderer
    /// has no surface yet.
    pub fn render<S: Surface>(&self, renderer: &mut Renderer<S>) -> bool {
        renderer.render(
            self.store.pieces(),
            &self.registry,
            &GridStyle::from(&self.config),
        )
    }

    /// Align a piece with a neighbouring vertex or the grid. A grid snap that
    /// would push the bounding box past the board edge is pulled back inside;
    /// vertex snaps are applied as found so the vertices stay coincident.
    pub(crate) fn snap_piece(&mut self, id: &PieceId) -> Option<Snap> {
        let piece = self.store.get(id)?;
        let mut snap = resolve_snap(
            piece,
            self.store.pieces(),
            self.config.snap_distance,
            self.config.grid_spacing,
        );
        if let SnapTarget::Grid { .. } = snap.target {
            let pos = piece.position();
            let inside = self.config.board.clamp_origin(
                pos.offset(snap.dx, snap.dy),
                piece.width(),
                piece.height(),
            );
            snap.dx = inside.x - pos.x;
            snap.dy = inside.y - pos.y;
        }
        self.store.get_mut(id)?.translate(snap.dx, snap.dy);
        tracing::debug!(%id, dx = snap.dx, dy = snap.dy, target = ?snap.target, "snapped");
        Some(snap)
    }

    fn next_id(&self, kind: ShapeKind) -> PieceId {
        let base = format!("{kind}_{}", (self.clock)());
        let mut id = PieceId::new(base.clone());
        let mut n = 1;
        while self.store.contains(&id) {
            id = PieceId::new(format!("{base}_{n}"));
            n += 1;
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::default().with_clock(|| 1234)
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut b = board();
        let a = b.place_piece(ShapeKind::Square, Point::new(100.0, 100.0));
        let c = b.place_piece(ShapeKind::Square, Point::new(400.0, 100.0));
        assert_eq!(a, Placement::Placed(PieceId::from("square_1234")));
        assert_eq!(c, Placement::Placed(PieceId::from("square_1234_1")));
    }

    #[test]
    fn drop_near_the_edge_is_clamped_inside() {
        let mut b = board();
        let Placement::Placed(id) = b.place_piece(ShapeKind::Square, Point::new(5.0, 5.0)) else {
            panic!("expected a placement");
        };
        let p = b.piece(&id).unwrap();
        assert!(p.position().x >= 0.0 && p.position().y >= 0.0);
    }

    #[test]
    fn grid_snap_does_not_push_a_piece_off_the_board() {
        let mut b = board();
        // clamped to x = 630; the grid would move the centre from 670 to 680
        let Placement::Placed(id) = b.place_piece(ShapeKind::Square, Point::new(700.0, 300.0))
        else {
            panic!("expected a placement");
        };
        let vp = b.viewport();
        let p = b.piece(&id).unwrap();
        assert!(p.position().x + p.width() <= vp.width);
        assert_eq!(p.position(), Point::new(630.0, 260.0));
        assert!(p.vertices().iter().all(|v| vp.contains(*v)));
    }

    #[test]
    fn config_swap_changes_grid_spacing() {
        let mut b = board();
        let cfg = EngineConfig::from_json(r#"{"grid_spacing": 25}"#).unwrap();
        b.set_config(cfg);
        assert_eq!(b.config().grid_spacing, 25.0);
        let Placement::Placed(id) = b.place_piece(ShapeKind::Square, Point::new(212.0, 212.0))
        else {
            panic!("expected a placement");
        };
        // centre 212 rounds to 200 on a 25px grid
        assert_eq!(b.piece(&id).unwrap().center(), Point::new(200.0, 200.0));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn default_clock_stamps_ids_with_wall_time() {
        let mut b = Board::default();
        let Placement::Placed(id) = b.place_piece(ShapeKind::Hexagon, Point::new(300.0, 300.0))
        else {
            panic!("expected a placement");
        };
        let millis: u64 = id.as_str().trim_start_matches("hexagon_").parse().unwrap();
        assert!(millis > 0);
    }

    #[test]
    fn transform_update_recomputes_vertices() {
        let mut b = board();
        let Placement::Placed(id) = b.place_piece(ShapeKind::Square, Point::new(200.0, 200.0))
        else {
            panic!("expected a placement");
        };
        assert!(b.update_piece_transform(&id, Some(Point::new(0.0, 0.0)), Some(450.0)));
        let p = b.piece(&id).unwrap();
        assert_eq!(p.rotation(), 90.0);
        let first = p.vertices()[0];
        // top-left corner turned a quarter clockwise about (40, 40) lands top-right
        assert!((first.x - 80.0).abs() < 1e-9 && first.y.abs() < 1e-9);
    }

    #[test]
    fn operations_on_missing_ids_are_noops() {
        let mut b = board();
        let ghost = PieceId::from("hexagon_0");
        assert!(!b.update_piece_transform(&ghost, Some(Point::new(1.0, 1.0)), None));
        assert!(!b.set_piece_borders(&ghost, vec![false]));
        assert_eq!(b.delete_piece(&ghost), Action::None);
        assert!(b.pieces().is_empty());
    }
}
