use crate::geometry::Point;
use crate::registry::ShapeStyle;
use crate::render::Surface;

/// Surface that records the board as a standalone SVG document.
#[derive(Clone, Debug)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        SvgSurface {
            width,
            height,
            body: String::new(),
        }
    }

    /// Complete SVG document for what has been drawn since the last clear.
    pub fn to_svg(&self) -> String {
        let mut s = String::new();
        s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        s.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" viewBox=\"0 0 {:.2} {:.2}\" stroke-linejoin=\"round\">\n",
            self.width.ceil(),
            self.height.ceil(),
            self.width,
            self.height
        ));
        s.push_str("<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
        s.push_str(&self.body);
        s.push_str("</svg>\n");
        s
    }
}

fn attr(v: &str) -> String {
    v.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

impl Surface for SvgSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.body.clear();
    }

    fn fill_dot(&mut self, at: Point, radius: f64, color: &str) {
        self.body.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"/>\n",
            at.x,
            at.y,
            radius,
            attr(color)
        ));
    }

    fn draw_polygon(&mut self, points: &[Point], borders: &[bool], style: &ShapeStyle) {
        if points.is_empty() {
            return;
        }
        if style.filled {
            let pts = points
                .iter()
                .map(|p| format!("{:.2},{:.2}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            self.body.push_str(&format!(
                "<polygon points=\"{}\" fill=\"{}\" stroke=\"none\"/>\n",
                pts,
                attr(&style.fill_color)
            ));
        }
        let n = points.len();
        let mut d = String::new();
        for i in 0..n {
            if !borders.get(i).copied().unwrap_or(true) {
                continue;
            }
            let a = points[i];
            let b = points[(i + 1) % n];
            d.push_str(&format!("M {:.2} {:.2} L {:.2} {:.2} ", a.x, a.y, b.x, b.y));
        }
        if !d.is_empty() {
            self.body.push_str(&format!(
                "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-linecap=\"round\"/>\n",
                d.trim_end(),
                attr(&style.border_color),
                style.border_width
            ));
        }
    }
}
