use std::f64::consts::TAU;

use board_core::{Point, ShapeStyle, Surface};
use web_sys::CanvasRenderingContext2d;

/// 2D canvas backend. Drawing happens in CSS pixels; the device pixel ratio
/// is folded into the context transform on every clear.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    dpr: f64,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64, dpr: f64) -> Self {
        CanvasSurface {
            ctx,
            width,
            height,
            dpr,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
    }

    fn trace_path(&self, points: &[Point]) {
        self.ctx.begin_path();
        self.ctx.move_to(points[0].x, points[0].y);
        for p in &points[1..] {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        if let Err(err) = self
            .ctx
            .set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)
        {
            tracing::warn!(?err, dpr = self.dpr, "could not reset canvas transform");
        }
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_dot(&mut self, at: Point, radius: f64, color: &str) {
        self.ctx.begin_path();
        if self.ctx.arc(at.x, at.y, radius, 0.0, TAU).is_err() {
            return;
        }
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn draw_polygon(&mut self, points: &[Point], borders: &[bool], style: &ShapeStyle) {
        if points.is_empty() {
            return;
        }
        if style.filled {
            self.trace_path(points);
            self.ctx.set_fill_style_str(&style.fill_color);
            self.ctx.fill();
        }
        if style.border_width <= 0.0 {
            return;
        }
        self.ctx.set_line_width(style.border_width);
        self.ctx.set_line_join("round");
        self.ctx.set_line_cap("round");
        self.ctx.set_stroke_style_str(&style.border_color);
        let n = points.len();
        for (i, on) in borders.iter().enumerate().take(n) {
            if !*on {
                continue;
            }
            let (a, b) = (points[i], points[(i + 1) % n]);
            self.ctx.begin_path();
            self.ctx.move_to(a.x, a.y);
            self.ctx.line_to(b.x, b.y);
            self.ctx.stroke();
        }
    }
}
