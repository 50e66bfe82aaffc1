use thiserror::Error;

use crate::registry::ShapeKind;

/// Failures while loading engine configuration or the shape palette.
///
/// Placement rejections and operations on vanished pieces are not errors;
/// they are reported as values by the board itself.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("palette has no entry for shape `{0}`")]
    MissingShape(ShapeKind),
}
