/// Host-side UI constants.
/// Values are expressed in CSS pixels unless noted otherwise.
pub const CANVAS_ID: &str = "cv";
/// Gap between a piece's top edge and its rotate handle, before rotation.
pub const ROTATE_HANDLE_GAP_PX: f64 = 18.0;
pub const ROTATE_HANDLE_RADIUS_PX: f64 = 7.0;
/// Press distance from the handle centre that still grabs it.
pub const ROTATE_HANDLE_HIT_PX: f64 = 11.0;
pub const ROTATE_HANDLE_COLOR: &str = "#333333";
/// Resolution multiplier for PNG snapshots.
pub const EXPORT_SCALE: f32 = 2.0;
pub const EXPORT_FILE_NAME: &str = "pattern_board.png";
