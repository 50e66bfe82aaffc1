use std::cell::Cell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MouseEvent, Window};

type MouseClosure = Closure<dyn FnMut(MouseEvent)>;

/// Window-level `mousemove`/`mouseup` listeners for one gesture.
///
/// They are attached on press and detached when this value is dropped or
/// released, so a finished gesture never leaves handlers behind.
pub struct GestureListeners {
    window: Window,
    on_move: MouseClosure,
    on_up: MouseClosure,
    attached: Cell<bool>,
}

impl GestureListeners {
    pub fn attach(
        window: &Window,
        on_move: impl FnMut(MouseEvent) + 'static,
        on_up: impl FnMut(MouseEvent) + 'static,
    ) -> Result<Self, JsValue> {
        let on_move = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(on_move));
        let on_up = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(on_up));
        window.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        if let Err(e) =
            window.add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref())
        {
            let _ = window
                .remove_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref());
            return Err(e);
        }
        Ok(GestureListeners {
            window: window.clone(),
            on_move,
            on_up,
            attached: Cell::new(true),
        })
    }

    fn detach(&self) {
        if !self.attached.replace(false) {
            return;
        }
        let _ = self.window.remove_event_listener_with_callback(
            "mousemove",
            self.on_move.as_ref().unchecked_ref(),
        );
        let _ = self
            .window
            .remove_event_listener_with_callback("mouseup", self.on_up.as_ref().unchecked_ref());
    }

    /// Detach now and free the closures once the current event has returned.
    /// Use this from inside one of the handlers, which must not drop itself.
    pub fn release(self) {
        self.detach();
        wasm_bindgen_futures::spawn_local(async move {
            drop(self);
        });
    }
}

impl Drop for GestureListeners {
    fn drop(&mut self) {
        self.detach();
    }
}
