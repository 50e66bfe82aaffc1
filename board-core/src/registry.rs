use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The closed set of piece shapes offered by the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Hexagon,
    Square,
    Triangle,
    Rhombus,
    Parallelogram,
    Trapezium,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Hexagon,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Rhombus,
        ShapeKind::Parallelogram,
        ShapeKind::Trapezium,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Rhombus => "rhombus",
            ShapeKind::Parallelogram => "parallelogram",
            ShapeKind::Trapezium => "trapezium",
        }
    }

    fn index(self) -> usize {
        match self {
            ShapeKind::Hexagon => 0,
            ShapeKind::Square => 1,
            ShapeKind::Triangle => 2,
            ShapeKind::Rhombus => 3,
            ShapeKind::Parallelogram => 4,
            ShapeKind::Trapezium => 5,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ShapeKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::Invalid {
                field: "kind",
                reason: format!("unknown shape `{s}`"),
            })
    }
}

/// Rendering attributes of a shape kind. Never mutated at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub filled: bool,
    pub fill_color: String,
    pub border_color: String,
    pub border_width: f64,
}

/// Palette entry: default size and style for one kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub default_width: f64,
    pub default_height: f64,
    pub style: ShapeStyle,
}

#[derive(Deserialize)]
struct PaletteEntry {
    kind: ShapeKind,
    #[serde(flatten)]
    spec: ShapeSpec,
}

#[derive(Deserialize)]
struct PaletteFile {
    shapes: Vec<PaletteEntry>,
}

const BUILTIN_BORDER_COLOR: &str = "#aa5522";
const BUILTIN_BORDER_WIDTH: f64 = 2.0;

/// Width, height and fill per kind, in `ShapeKind::ALL` order.
const BUILTIN_PALETTE: [(f64, f64, &str); 6] = [
    (160.0, 160.0, "#f5c518"),
    (80.0, 80.0, "#f28c28"),
    (160.0, 138.56, "#3cb44b"),
    (48.0, 80.0, "#e6d8ad"),
    (120.0, 60.0, "#4363d8"),
    (120.0, 60.0, "#e6194b"),
];

/// Lookup table from kind to palette entry. Every kind is always present.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeRegistry {
    specs: [ShapeSpec; 6],
}

impl ShapeRegistry {
    /// Default palette. `palette.json` next to the crate holds the same
    /// table in override form.
    pub fn builtin() -> Self {
        ShapeRegistry {
            specs: BUILTIN_PALETTE.map(|(w, h, fill)| ShapeSpec {
                default_width: w,
                default_height: h,
                style: ShapeStyle {
                    filled: true,
                    fill_color: fill.to_string(),
                    border_color: BUILTIN_BORDER_COLOR.to_string(),
                    border_width: BUILTIN_BORDER_WIDTH,
                },
            }),
        }
    }

    /// Parse a palette document: `{"shapes": [{"kind": .., "default_width": ..,
    /// "default_height": .., "style": {..}}, ..]}`.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let file: PaletteFile = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            what: "palette",
            source,
        })?;

        let mut slots: [Option<ShapeSpec>; 6] = Default::default();
        for entry in file.shapes {
            let spec = entry.spec;
            if !(spec.default_width.is_finite() && spec.default_width > 0.0) {
                return Err(ConfigError::Invalid {
                    field: "default_width",
                    reason: format!("{} has width {}", entry.kind, spec.default_width),
                });
            }
            if !(spec.default_height.is_finite() && spec.default_height > 0.0) {
                return Err(ConfigError::Invalid {
                    field: "default_height",
                    reason: format!("{} has height {}", entry.kind, spec.default_height),
                });
            }
            if slots[entry.kind.index()].replace(spec).is_some() {
                tracing::warn!(kind = %entry.kind, "duplicate palette entry; keeping the last one");
            }
        }

        let mut specs = Vec::with_capacity(6);
        for kind in ShapeKind::ALL {
            let spec = slots[kind.index()]
                .take()
                .ok_or(ConfigError::MissingShape(kind))?;
            specs.push(spec);
        }
        let specs: [ShapeSpec; 6] = specs
            .try_into()
            .map_err(|_| ConfigError::Invalid {
                field: "shapes",
                reason: "palette size mismatch".to_string(),
            })?;
        Ok(ShapeRegistry { specs })
    }

    pub fn spec(&self, kind: ShapeKind) -> &ShapeSpec {
        &self.specs[kind.index()]
    }

    pub fn style(&self, kind: ShapeKind) -> &ShapeStyle {
        &self.spec(kind).style
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_palette_covers_every_kind() {
        let reg = ShapeRegistry::builtin();
        for kind in ShapeKind::ALL {
            assert!(reg.spec(kind).default_width > 0.0);
        }
        let sq = reg.spec(ShapeKind::Square);
        assert_eq!((sq.default_width, sq.default_height), (80.0, 80.0));
    }

    #[test]
    fn palette_file_matches_builtin_table() {
        let from_file = ShapeRegistry::from_json(include_str!("../palette.json")).unwrap();
        assert_eq!(from_file, ShapeRegistry::builtin());
        assert_eq!(ShapeKind::ALL.map(ShapeKind::index), [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn missing_kind_is_reported() {
        let text = r##"{"shapes": [{"kind": "square", "default_width": 80, "default_height": 80,
            "style": {"filled": true, "fill_color": "#fff", "border_color": "#000", "border_width": 1}}]}"##;
        let err = ShapeRegistry::from_json(text).unwrap_err();
        assert!(matches!(err, ConfigError::MissingShape(ShapeKind::Hexagon)));
    }

    #[test]
    fn non_positive_size_is_rejected() {
        let text = include_str!("../palette.json").replacen("80.0", "0.0", 1);
        let err = ShapeRegistry::from_json(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "default_width", .. }));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            ShapeRegistry::from_json("not json"),
            Err(ConfigError::Parse { what: "palette", .. })
        ));
    }

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("Trapezium".parse::<ShapeKind>().unwrap(), ShapeKind::Trapezium);
        assert!("circle".parse::<ShapeKind>().is_err());
        assert_eq!(ShapeKind::Rhombus.to_string(), "rhombus");
    }
}
