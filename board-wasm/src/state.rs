use std::cell::RefCell;
use std::rc::Rc;

use board_core::{Board, PieceId, Renderer};
use web_sys::{Document, HtmlCanvasElement, Window};

use crate::canvas::CanvasSurface;
use crate::listeners::GestureListeners;

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub board: Board,
    pub renderer: Renderer<CanvasSurface>,
    /// Present only while a pointer gesture is running.
    pub listeners: Option<GestureListeners>,
    /// Last piece placed or pressed; owns the rotate handle and the Delete key.
    pub selected: Option<PieceId>,
}

impl State {
    /// Drop the gesture listeners once the board has gone back to idle.
    pub fn end_gesture_if_idle(&mut self) {
        if self.board.gesture().is_idle()
            && let Some(listeners) = self.listeners.take()
        {
            listeners.release();
        }
    }
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
