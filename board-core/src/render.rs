//! Board redraw: background dot grid, then every piece in store order.
//!
//! Drawing goes through the [`Surface`] trait so the same pass feeds the
//! browser canvas, SVG export and tests.

use crate::config::EngineConfig;
use crate::geometry::Point;
use crate::piece::PlacedPiece;
use crate::registry::{ShapeRegistry, ShapeStyle};

/// Minimal drawing backend used by [`Renderer`].
pub trait Surface {
    /// Drawable width and height in board pixels.
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    fn fill_dot(&mut self, at: Point, radius: f64, color: &str);
    /// Fill the closed polygon when `style.filled`, then stroke edge `i`
    /// (vertex `i` to `i + 1`) only where `borders[i]` is true.
    fn draw_polygon(&mut self, points: &[Point], borders: &[bool], style: &ShapeStyle);
}

/// Appearance of the alignment grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridStyle {
    pub spacing: f64,
    pub dot_radius: f64,
    pub dot_color: String,
}

impl From<&EngineConfig> for GridStyle {
    fn from(cfg: &EngineConfig) -> Self {
        GridStyle {
            spacing: cfg.grid_spacing,
            dot_radius: cfg.grid_dot_radius,
            dot_color: cfg.grid_dot_color.clone(),
        }
    }
}

/// Owns the (optional) drawing surface. Until a surface is attached every
/// render is a no-op; the next render after attaching draws normally.
pub struct Renderer<S> {
    surface: Option<S>,
}

impl<S> Default for Renderer<S> {
    fn default() -> Self {
        Renderer { surface: None }
    }
}

impl<S: Surface> Renderer<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface(surface: S) -> Self {
        Renderer {
            surface: Some(surface),
        }
    }

    pub fn attach(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    pub fn detach(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Clear and redraw everything. Returns false when no surface is attached.
    pub fn render(
        &mut self,
        pieces: &[PlacedPiece],
        registry: &ShapeRegistry,
        grid: &GridStyle,
    ) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            tracing::trace!("render skipped: no surface attached");
            return false;
        };
        surface.clear();
        draw_dot_grid(surface, grid);
        for piece in pieces {
            surface.draw_polygon(piece.vertices(), piece.borders(), registry.style(piece.kind()));
        }
        true
    }
}

fn draw_dot_grid<S: Surface>(surface: &mut S, grid: &GridStyle) {
    if grid.spacing.is_nan() || grid.spacing <= 0.0 {
        return;
    }
    let (w, h) = surface.size();
    let cols = (w / grid.spacing).floor() as usize;
    let rows = (h / grid.spacing).floor() as usize;
    for i in 0..=cols {
        for j in 0..=rows {
            let at = Point::new(i as f64 * grid.spacing, j as f64 * grid.spacing);
            surface.fill_dot(at, grid.dot_radius, &grid.dot_color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceId;
    use crate::registry::ShapeKind;

    #[derive(Default)]
    struct Recorder {
        ops: Vec<String>,
    }

    impl Surface for Recorder {
        fn size(&self) -> (f64, f64) {
            (80.0, 40.0)
        }
        fn clear(&mut self) {
            self.ops.clear();
            self.ops.push("clear".into());
        }
        fn fill_dot(&mut self, at: Point, _radius: f64, _color: &str) {
            self.ops.push(format!("dot {} {}", at.x, at.y));
        }
        fn draw_polygon(&mut self, points: &[Point], borders: &[bool], style: &ShapeStyle) {
            self.ops
                .push(format!("poly {} {:?} {}", points.len(), borders, style.fill_color));
        }
    }

    fn grid() -> GridStyle {
        GridStyle::from(&EngineConfig::default())
    }

    #[test]
    fn detached_renderer_is_a_noop() {
        let mut r: Renderer<Recorder> = Renderer::new();
        assert!(!r.render(&[], &ShapeRegistry::builtin(), &grid()));
        r.attach(Recorder::default());
        assert!(r.render(&[], &ShapeRegistry::builtin(), &grid()));
    }

    #[test]
    fn grid_covers_surface_inclusively() {
        let mut r = Renderer::with_surface(Recorder::default());
        r.render(&[], &ShapeRegistry::builtin(), &grid());
        let ops = &r.surface().unwrap().ops;
        // 3 columns (0, 40, 80) x 2 rows (0, 40)
        assert_eq!(ops.iter().filter(|o| o.starts_with("dot")).count(), 6);
        assert!(ops.contains(&"dot 80 40".to_string()));
    }

    #[test]
    fn pieces_are_drawn_after_the_grid_with_their_style() {
        let reg = ShapeRegistry::builtin();
        let mut piece = PlacedPiece::new(
            PieceId::from("t"),
            ShapeKind::Triangle,
            Point::new(0.0, 0.0),
            40.0,
            40.0,
        );
        piece.set_borders(vec![true, false, true]);
        let mut r = Renderer::with_surface(Recorder::default());
        r.render(std::slice::from_ref(&piece), &reg, &grid());
        let ops = &r.surface().unwrap().ops;
        let expected = format!(
            "poly 3 [true, false, true] {}",
            reg.style(ShapeKind::Triangle).fill_color
        );
        assert_eq!(ops.first().map(String::as_str), Some("clear"));
        assert_eq!(ops.last(), Some(&expected));
    }
}
