//! requestAnimationFrame loop with observable cancellation
//!
//! Each visualization instance owns one loop. The closure re-arms itself
//! every display refresh until `stop()` flips the running flag; stopping
//! also cancels the pending frame so no callback leaks past destroy.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Re-arming animation loop handle
pub struct RafLoop {
    running: Rc<Cell<bool>>,
    frame_id: Rc<Cell<i32>>,
    // Kept alive for the lifetime of the loop
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl RafLoop {
    pub fn new() -> Self {
        Self {
            running: Rc::new(Cell::new(false)),
            frame_id: Rc::new(Cell::new(0)),
            callback: Rc::new(RefCell::new(None)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Start the loop. `on_frame` runs once per display refresh with the
    /// refresh timestamp in ms. Starting an already-running loop is a no-op.
    pub fn start<F>(&self, mut on_frame: F) -> Result<(), JsValue>
    where
        F: FnMut(f64) + 'static,
    {
        if self.running.get() {
            return Ok(());
        }
        self.running.set(true);

        let running = Rc::clone(&self.running);
        let frame_id = Rc::clone(&self.frame_id);
        let callback = Rc::clone(&self.callback);

        let closure = Closure::wrap(Box::new(move |now: f64| {
            if !running.get() {
                return;
            }

            on_frame(now);

            // Re-arm for the next refresh
            if running.get() {
                if let Some(cb) = callback.borrow().as_ref() {
                    match request_frame(cb) {
                        Ok(id) => frame_id.set(id),
                        Err(_) => running.set(false),
                    }
                }
            }
        }) as Box<dyn FnMut(f64)>);

        let id = request_frame(&closure)?;
        self.frame_id.set(id);
        *self.callback.borrow_mut() = Some(closure);
        Ok(())
    }

    /// Halt the loop and cancel the pending frame
    pub fn stop(&self) {
        if !self.running.get() {
            return;
        }
        self.running.set(false);

        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(self.frame_id.get());
        }
        *self.callback.borrow_mut() = None;
    }
}

impl Default for RafLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(closure: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .request_animation_frame(closure.as_ref().unchecked_ref())
}
