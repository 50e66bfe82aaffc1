/// Engine-wide numeric defaults.
/// Values are expressed in board pixels unless noted otherwise.
pub const OVERLAP_THRESHOLD: f64 = 0.5;
/// Maximum per-axis distance (px) between two vertices for them to snap together.
pub const SNAP_DISTANCE_PX: f64 = 50.0;
/// Spacing of the background alignment grid (px).
pub const GRID_SPACING_PX: f64 = 40.0;
/// Rotation granularity for the rotate gesture (degrees).
pub const ROTATION_STEP_DEG: f64 = 10.0;
/// Added to the pointer angle so that "pointer straight above the piece" reads as 0 degrees.
pub const ROTATION_OFFSET_DEG: f64 = 90.0;
pub const GRID_DOT_RADIUS_PX: f64 = 1.5;
pub const GRID_DOT_COLOR: &str = "black";
/// Default board size, matching the canvas column of the page layout.
pub const BOARD_WIDTH_PX: f64 = 710.0;
pub const BOARD_HEIGHT_PX: f64 = 600.0;
/// Horizontal skew of the parallelogram's top edge, as a fraction of its width.
pub const PARALLELOGRAM_SKEW: f64 = 0.3;
/// Top edge of the trapezium as a fraction of its bottom edge.
pub const TRAPEZIUM_TOP_RATIO: f64 = 0.6;
