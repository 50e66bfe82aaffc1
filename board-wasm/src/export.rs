use board_core::{Renderer, SvgSurface};
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, Document, HtmlElement, Url};

use crate::constants::{EXPORT_FILE_NAME, EXPORT_SCALE};
use crate::state::State;

/// Render the board through an SVG surface, rasterise it and download the
/// result as a PNG. The rotate handle is not part of the snapshot.
pub fn export_png(state: &State) -> Result<(), JsValue> {
    let vp = state.board.viewport();
    let mut renderer = Renderer::with_surface(SvgSurface::new(vp.width, vp.height));
    state.board.render(&mut renderer);
    let svg = renderer
        .surface()
        .map(SvgSurface::to_svg)
        .ok_or_else(|| JsValue::from_str("svg surface missing"))?;

    let pixmap = rasterize(&svg, EXPORT_SCALE)?;
    let bytes = encode_png(pixmap.width(), pixmap.height(), pixmap.data())
        .map_err(|e| JsValue::from_str(&format!("png encode: {e}")))?;
    tracing::info!(
        pieces = state.board.pieces().len(),
        bytes = bytes.len(),
        "exported board snapshot"
    );
    download(&state.document, EXPORT_FILE_NAME, &bytes)
}

fn rasterize(svg: &str, scale: f32) -> Result<tiny_skia::Pixmap, JsValue> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| JsValue::from_str(&format!("SVG parse error: {e:?}")))?;
    let size = tree.size();
    let w_px = (size.width() * scale).ceil().max(1.0) as u32;
    let h_px = (size.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap =
        tiny_skia::Pixmap::new(w_px, h_px).ok_or(JsValue::from_str("pixmap alloc failed"))?;
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pm);
    Ok(pixmap)
}

/// Unfiltered RGBA8 at default compression, so identical boards give
/// byte-identical files.
fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, png::EncodingError> {
    let mut out = Vec::with_capacity(rgba.len() / 4);
    let mut encoder = Encoder::new(&mut out, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_filter(FilterType::NoFilter);
    encoder.set_compression(Compression::Default);
    encoder.write_header()?.write_image_data(rgba)?;
    Ok(out)
}

fn download(document: &Document, filename: &str, bytes: &[u8]) -> Result<(), JsValue> {
    let array = js_sys::Array::new();
    array.push(&js_sys::Uint8Array::from(bytes));
    let blob = Blob::new_with_u8_array_sequence(&array)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let a = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    a.set_attribute("download", filename)?;
    a.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}
