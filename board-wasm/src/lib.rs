use std::cell::RefCell;
use std::rc::Rc;

use board_core::{
    Action, Board, ConfigError, EngineConfig, PieceId, PlacedPiece, Placement, Point,
    PointerTarget, Renderer, ShapeKind, ShapeRegistry, Surface, rotate_point,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, KeyboardEvent,
    MouseEvent, Window,
};

mod canvas;
mod constants;
mod export;
mod listeners;
mod state;
mod utils;

use canvas::CanvasSurface;
use constants::*;
use listeners::GestureListeners;
use state::{STATE, State};
use utils::{
    asset_url, event_canvas_coords, fetch_text_with_fallbacks, get_query_param, sync_canvas_size,
};

/// Handle position: above the top edge, turned with the piece.
fn rotate_handle(piece: &PlacedPiece) -> Point {
    let c = piece.center();
    let above = Point::new(c.x, piece.position().y - ROTATE_HANDLE_GAP_PX);
    rotate_point(above, c, piece.rotation())
}

fn draw(state: &mut State) {
    let handle = state
        .selected
        .as_ref()
        .and_then(|id| state.board.piece(id))
        .map(rotate_handle);
    if !state.board.render(&mut state.renderer) {
        return;
    }
    if let (Some(at), Some(surface)) = (handle, state.renderer.surface_mut()) {
        surface.fill_dot(at, ROTATE_HANDLE_RADIUS_PX, ROTATE_HANDLE_COLOR);
    }
}

fn with_state<R>(f: impl FnOnce(&mut State) -> R) -> Option<R> {
    let st = STATE.with(|st| st.borrow().clone())?;
    let mut s = st.borrow_mut();
    Some(f(&mut s))
}

/// Resolve a canvas press: the selected piece's rotate handle wins over
/// piece bodies.
fn pointer_target(state: &State, at: Point) -> PointerTarget {
    if let Some(id) = &state.selected
        && let Some(piece) = state.board.piece(id)
        && rotate_handle(piece).distance(at) <= ROTATE_HANDLE_HIT_PX
    {
        return PointerTarget::RotateHandle(id.clone());
    }
    state.board.target_at(at)
}

fn apply_action(state: &mut State, action: Action) {
    match &action {
        Action::Placed(id) => state.selected = Some(id.clone()),
        Action::Removed(id) if state.selected.as_ref() == Some(id) => state.selected = None,
        Action::Rejected => tracing::info!("drop rejected: too much overlap with a placed piece"),
        _ => {}
    }
    if action.needs_render() {
        draw(state);
    }
}

/// Attach window move/up listeners for the gesture the board just entered.
fn begin_gesture(st: &Rc<RefCell<State>>, s: &mut State) {
    if s.board.gesture().is_idle() || s.listeners.is_some() {
        return;
    }
    let on_move = {
        let st = st.clone();
        move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let at = event_canvas_coords(&e, &s.canvas, s.board.viewport());
            if s.board.pointer_move(at).needs_render() {
                draw(&mut s);
            }
        }
    };
    let on_up = {
        let st = st.clone();
        move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let at = event_canvas_coords(&e, &s.canvas, s.board.viewport());
            let action = s.board.pointer_up(at);
            s.end_gesture_if_idle();
            apply_action(&mut s, action);
        }
    };
    match GestureListeners::attach(&s.window, on_move, on_up) {
        Ok(listeners) => s.listeners = Some(listeners),
        Err(err) => {
            tracing::error!(?err, "could not attach gesture listeners");
            s.board.cancel_gesture();
        }
    }
}

fn attach_palette(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let entries = doc.query_selector_all("[data-shape]")?;
    for i in 0..entries.length() {
        let Some(el) = entries.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let name = el.get_attribute("data-shape").unwrap_or_default();
        let kind = match name.parse::<ShapeKind>() {
            Ok(k) => k,
            Err(e) => {
                tracing::warn!(error = %e, "palette entry ignored");
                continue;
            }
        };
        let st = state.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            if e.button() != 0 {
                return;
            }
            e.prevent_default();
            let mut s = st.borrow_mut();
            let at = event_canvas_coords(&e, &s.canvas, s.board.viewport());
            s.board.pointer_down(PointerTarget::Palette(kind), at);
            begin_gesture(&st, &mut s);
        }));
        el.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }
    tracing::debug!(entries = entries.length(), "palette wired");
    Ok(())
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    attach_palette(&state)?;

    // Clear board
    if let Some(btn) = doc.get_element_by_id("clearBoard")
        && let Ok(btn) = btn.dyn_into::<HtmlElement>()
    {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.board.clear();
            s.selected = None;
            s.end_gesture_if_idle();
            draw(&mut s);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Export PNG (deterministic)
    if let Some(btn) = doc.get_element_by_id("exportPng")
        && let Ok(btn) = btn.dyn_into::<HtmlElement>()
    {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            if let Err(err) = export::export_png(&st.borrow()) {
                tracing::error!(?err, "export failed");
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Canvas press: rotate handle, piece body or empty board
    {
        let st = state.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            if e.button() != 0 {
                return;
            }
            let mut s = st.borrow_mut();
            if !s.board.gesture().is_idle() {
                return;
            }
            let at = event_canvas_coords(&e, &s.canvas, s.board.viewport());
            let target = pointer_target(&s, at);
            match &target {
                PointerTarget::PieceBody(id) | PointerTarget::RotateHandle(id) => {
                    s.selected = Some(id.clone())
                }
                PointerTarget::Board => s.selected = None,
                PointerTarget::Palette(_) => {}
            }
            s.board.pointer_down(target, at);
            begin_gesture(&st, &mut s);
            draw(&mut s);
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }

    // Delete the selected piece
    {
        let st = state.clone();
        let keydown = Closure::<dyn FnMut(KeyboardEvent)>::wrap(Box::new(
            move |e: KeyboardEvent| {
                if !matches!(e.key().as_str(), "Delete" | "Backspace") {
                    return;
                }
                let mut s = st.borrow_mut();
                let Some(id) = s.selected.clone() else {
                    return;
                };
                e.prevent_default();
                let action = s.board.delete_piece(&id);
                s.end_gesture_if_idle();
                apply_action(&mut s, action);
            },
        ));
        state
            .borrow()
            .window
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }

    // Keep the board in step with the canvas box
    {
        let st = state.clone();
        let onresize = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            sync_canvas_size(&mut s);
            draw(&mut s);
        }));
        state
            .borrow()
            .window
            .add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    Ok(())
}

/// The board canvas and its 2D context.
fn board_canvas(
    document: &Document,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| JsValue::from_str(&format!("no #{CANVAS_ID} element")))?
        .dyn_into()?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str(&format!("#{CANVAS_ID} has no 2d context")))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    tracing::debug!(width = canvas.width(), height = canvas.height(), "canvas found");
    Ok((canvas, ctx))
}

/// Fetch an override document named by a query parameter, trying the
/// base-relative path first.
async fn fetch_override(window: &Window, url: &str) -> Option<String> {
    fetch_text_with_fallbacks(window, &[&asset_url(url), url]).await
}

async fn load_palette(window: Window, url: String) {
    let Some(text) = fetch_override(&window, &url).await else {
        tracing::warn!(%url, "palette override not found; keeping bundled palette");
        return;
    };
    match ShapeRegistry::from_json(&text) {
        Ok(registry) => {
            with_state(|s| {
                s.board.set_registry(registry);
                draw(s);
            });
            tracing::info!(%url, "palette override loaded");
        }
        Err(e) => {
            tracing::warn!(%url, error = %e, "palette override rejected; keeping bundled palette")
        }
    }
}

/// Swap in engine tunables. The canvas box still decides the board size.
async fn load_config(window: Window, url: String) {
    let Some(text) = fetch_override(&window, &url).await else {
        tracing::warn!(%url, "config override not found; keeping defaults");
        return;
    };
    match EngineConfig::from_json(&text) {
        Ok(config) => {
            with_state(|s| {
                s.board.set_config(config);
                sync_canvas_size(s);
                draw(s);
            });
            tracing::info!(%url, "config override loaded");
        }
        Err(e) => tracing::warn!(%url, error = %e, "config override rejected; keeping defaults"),
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = board_canvas(&document)?;

    let board = Board::default().with_clock(|| js_sys::Date::now() as u64);
    let vp = board.viewport();
    let surface = CanvasSurface::new(ctx, vp.width, vp.height, window.device_pixel_ratio());
    let state = Rc::new(RefCell::new(State {
        window: window.clone(),
        document,
        canvas,
        board,
        renderer: Renderer::with_surface(surface),
        listeners: None,
        selected: None,
    }));
    STATE.with(|st| st.replace(Some(state.clone())));
    sync_canvas_size(&mut state.borrow_mut());
    attach_ui(state.clone())?;

    // ?palette=<url> and ?config=<url> apply once fetched
    let search = window.location().search().unwrap_or_default();
    if let Some(url) = get_query_param(&search, "palette") {
        wasm_bindgen_futures::spawn_local(load_palette(window.clone(), url));
    }
    if let Some(url) = get_query_param(&search, "config") {
        wasm_bindgen_futures::spawn_local(load_config(window, url));
    }

    draw(&mut state.borrow_mut());
    tracing::info!("board ready");
    Ok(())
}

/// Drop a piece of `kind` centred at `(x, y)`. Returns false when the drop
/// overlaps a placed piece too much.
#[wasm_bindgen]
pub fn place_piece(kind: &str, x: f64, y: f64) -> Result<bool, JsValue> {
    let kind: ShapeKind = kind
        .parse()
        .map_err(|e: ConfigError| JsValue::from_str(&e.to_string()))?;
    Ok(with_state(|s| {
        let action = match s.board.place_piece(kind, Point::new(x, y)) {
            Placement::Placed(id) => Action::Placed(id),
            Placement::Rejected => Action::Rejected,
        };
        let placed = matches!(action, Action::Placed(_));
        apply_action(s, action);
        placed
    })
    .unwrap_or(false))
}

/// Move and/or rotate a piece. Omitted coordinates keep their current value.
#[wasm_bindgen]
pub fn update_piece_transform(
    id: &str,
    x: Option<f64>,
    y: Option<f64>,
    rotation: Option<f64>,
) -> bool {
    with_state(|s| {
        let id = PieceId::from(id);
        let position = s.board.piece(&id).and_then(|p| {
            let cur = p.position();
            (x.is_some() || y.is_some())
                .then(|| Point::new(x.unwrap_or(cur.x), y.unwrap_or(cur.y)))
        });
        let updated = s.board.update_piece_transform(&id, position, rotation);
        if updated {
            draw(s);
        }
        updated
    })
    .unwrap_or(false)
}

/// Show or hide individual edges; nonzero bytes are visible.
#[wasm_bindgen]
pub fn set_piece_borders(id: &str, borders: Vec<u8>) -> bool {
    with_state(|s| {
        let flags = borders.iter().map(|b| *b != 0).collect();
        let updated = s.board.set_piece_borders(&PieceId::from(id), flags);
        if updated {
            draw(s);
        }
        updated
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn delete_piece(id: &str) -> bool {
    with_state(|s| {
        let action = s.board.delete_piece(&PieceId::from(id));
        s.end_gesture_if_idle();
        let removed = matches!(action, Action::Removed(_));
        apply_action(s, action);
        removed
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn render() {
    with_state(draw);
}

#[wasm_bindgen]
pub fn export_png() -> Result<(), JsValue> {
    with_state(|s| export::export_png(s))
        .unwrap_or_else(|| Err(JsValue::from_str("board not started")))
}
