use board_core::{Point, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, MouseEvent, Response, Window};

use crate::state::State;

/// Match the canvas backing store to its CSS box and the device pixel ratio,
/// then resize the board and the drawing surface to the CSS box.
pub fn sync_canvas_size(state: &mut State) {
    let dpr = state.window.device_pixel_ratio();
    let rect = state.canvas.get_bounding_client_rect();
    let (css_w, css_h) = (rect.width().max(1.0), rect.height().max(1.0));
    let target_w = (css_w * dpr).round().clamp(1.0, 10000.0) as u32;
    let target_h = (css_h * dpr).round().clamp(1.0, 10000.0) as u32;
    if state.canvas.width() != target_w {
        state.canvas.set_width(target_w);
    }
    if state.canvas.height() != target_h {
        state.canvas.set_height(target_h);
    }
    state.board.set_viewport(css_w, css_h);
    if let Some(surface) = state.renderer.surface_mut() {
        surface.resize(css_w, css_h, dpr);
    }
    tracing::debug!(width = css_w, height = css_h, dpr, "canvas resized");
}

/// Convert client coordinates into board coordinates so hit testing works
/// even if CSS scales the canvas element. Points outside the canvas are kept
/// as they are; the board decides what to do with them.
pub fn event_canvas_coords(e: &MouseEvent, cv: &HtmlCanvasElement, board: Viewport) -> Point {
    let rect = cv.get_bounding_client_rect();
    Point::new(
        (e.client_x() as f64 - rect.left()) * board.width / rect.width().max(1.0),
        (e.client_y() as f64 - rect.top()) * board.height / rect.height().max(1.0),
    )
}

/// Resolve `path` against the page's `window.__BASE_URL` (default `/`).
/// Absolute and `data:` URLs pass through.
pub fn asset_url(path: &str) -> String {
    join_base(base_url().as_deref(), path)
}

fn base_url() -> Option<String> {
    let window = web_sys::window()?;
    js_sys::Reflect::get(&window, &JsValue::from_str("__BASE_URL"))
        .ok()?
        .as_string()
}

fn join_base(base: Option<&str>, path: &str) -> String {
    let path = path.trim();
    if ["http://", "https://", "data:"]
        .iter()
        .any(|scheme| path.starts_with(scheme))
    {
        return path.to_string();
    }
    let base = base.unwrap_or("/").trim_end_matches('/');
    format!("{base}/{}", path.trim_start_matches('/'))
}

async fn fetch_text(window: &Window, url: &str) -> Result<String, JsValue> {
    let resp: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", resp.status())));
    }
    JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

/// First successful body among `urls`, tried in order.
pub async fn fetch_text_with_fallbacks(window: &Window, urls: &[&str]) -> Option<String> {
    for url in urls {
        match fetch_text(window, url).await {
            Ok(text) => return Some(text),
            Err(err) => tracing::debug!(url, ?err, "fetch failed"),
        }
    }
    tracing::warn!(?urls, "no candidate url could be fetched");
    None
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| {
            let mut it = pair.splitn(2, '=');
            Some((it.next()?, it.next().unwrap_or("")))
        })
        .find(|(k, _)| *k == key)
        .map(|(_, v)| url_decode(v))
}

fn url_decode(s: &str) -> String {
    percent_encoding::percent_decode_str(s)
        .decode_utf8()
        .unwrap_or_else(|_| s.into())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_is_decoded() {
        let search = "?lang=en&palette=%2Fassets%2Fmy%20palette.json";
        assert_eq!(
            get_query_param(search, "palette").as_deref(),
            Some("/assets/my palette.json")
        );
        assert_eq!(get_query_param(search, "missing"), None);
        assert_eq!(get_query_param("?flag", "flag").as_deref(), Some(""));
    }

    #[test]
    fn asset_paths_join_the_base_once() {
        assert_eq!(join_base(None, "palette.json"), "/palette.json");
        assert_eq!(join_base(Some("/app/"), "/cfg/board.json"), "/app/cfg/board.json");
        assert_eq!(join_base(Some("/app"), "cfg.json"), "/app/cfg.json");
        assert_eq!(
            join_base(Some("/app/"), " https://cdn.test/p.json "),
            "https://cdn.test/p.json"
        );
    }
}
