//! Placement and collision engine for a pattern-block board.
//!
//! Pieces are dropped from a palette, dragged, rotated and deleted through
//! [`Board`]; drops and drag releases are vetoed by a bounding-box overlap
//! test and accepted pieces snap to a neighbour's vertex or to the grid.

pub mod board;
pub mod collision;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod piece;
pub mod registry;
pub mod render;
pub mod snap;
pub mod store;
pub mod svg;

pub use board::{Board, Clock, Placement};
pub use config::EngineConfig;
pub use controller::{Action, Gesture, PointerTarget};
pub use error::ConfigError;
pub use geometry::{Point, Viewport, rotate_point, vertices_for};
pub use piece::{PieceId, PlacedPiece};
pub use registry::{ShapeKind, ShapeRegistry, ShapeSpec, ShapeStyle};
pub use render::{GridStyle, Renderer, Surface};
pub use snap::{Snap, SnapTarget, resolve_snap};
pub use store::PlacementStore;
pub use svg::SvgSurface;
