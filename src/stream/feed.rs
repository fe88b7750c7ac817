//! Reconnecting feed client for the push-style game-event stream
//!
//! The connection lifecycle is a small synchronous state machine that
//! returns effects instead of performing them, so reconnect scheduling is
//! deterministic under test. The WASM wrapper wires the machine to a
//! `web_sys::WebSocket` and a `setTimeout`-based reconnect delay.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::WebSocket;

use super::series::SeriesPoint;

/// Fixed delay before each reconnect attempt (ms)
pub const RECONNECT_DELAY_MS: u32 = 5000;

// ============================================================================
// STATE MACHINE
// ============================================================================

/// Connection lifecycle states
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedState {
    Disconnected,
    Connecting,
    Connected,
}

/// Inputs to the state machine
#[derive(Debug)]
pub enum FeedEvent<'a> {
    /// Caller (or the reconnect timer) asked for a connection
    ConnectRequested,
    /// Transport reported the socket open
    Opened,
    /// Transport error or unexpected close
    TransportError,
    /// A text payload arrived
    Message(&'a str),
}

/// Effects the caller must perform
#[derive(Debug, PartialEq)]
pub enum FeedEffect {
    None,
    /// Open the underlying transport
    OpenSocket,
    /// Retry after the fixed delay (ms)
    ScheduleReconnect(u32),
    /// Hand a parsed point to the series buffer
    Deliver(SeriesPoint),
}

/// Reconnecting feed state machine.
///
/// Transport failures transition to `Disconnected` and schedule exactly
/// one reconnect; the loop never gives up. Error events arriving while
/// already disconnected (a socket raises both error and close) schedule
/// nothing, which keeps attempts one-per-failure.
pub struct FeedMachine {
    state: FeedState,
}

impl FeedMachine {
    pub fn new() -> Self {
        Self {
            state: FeedState::Disconnected,
        }
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn handle(&mut self, event: FeedEvent<'_>) -> FeedEffect {
        match (self.state, event) {
            (FeedState::Disconnected, FeedEvent::ConnectRequested) => {
                self.state = FeedState::Connecting;
                FeedEffect::OpenSocket
            }
            (FeedState::Connecting, FeedEvent::Opened) => {
                self.state = FeedState::Connected;
                log::info!("feed connected");
                FeedEffect::None
            }
            (FeedState::Connecting | FeedState::Connected, FeedEvent::TransportError) => {
                self.state = FeedState::Disconnected;
                log::warn!("feed transport failure, retrying in {}ms", RECONNECT_DELAY_MS);
                FeedEffect::ScheduleReconnect(RECONNECT_DELAY_MS)
            }
            (FeedState::Connected, FeedEvent::Message(payload)) => {
                match serde_json::from_str::<SeriesPoint>(payload) {
                    Ok(point) => FeedEffect::Deliver(point),
                    Err(err) => {
                        log::warn!("dropping malformed feed message: {}", err);
                        FeedEffect::None
                    }
                }
            }
            // Duplicate error/close while already down, stray opens, or
            // messages outside Connected: ignore
            _ => FeedEffect::None,
        }
    }
}

impl Default for FeedMachine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// WEBSOCKET WRAPPER
// ============================================================================

struct FeedShared {
    url: String,
    machine: RefCell<FeedMachine>,
    socket: RefCell<Option<WebSocket>>,
    on_point: Box<dyn Fn(SeriesPoint)>,
    destroyed: Cell<bool>,
}

impl FeedShared {
    fn run(self: &Rc<Self>, event: FeedEvent<'_>) {
        let effect = self.machine.borrow_mut().handle(event);
        self.perform(effect);
    }

    fn perform(self: &Rc<Self>, effect: FeedEffect) {
        match effect {
            FeedEffect::None => {}
            FeedEffect::OpenSocket => {
                if let Err(err) = open_socket(self) {
                    log::warn!("failed to open feed socket: {:?}", err);
                    self.run(FeedEvent::TransportError);
                }
            }
            FeedEffect::ScheduleReconnect(delay_ms) => {
                schedule_reconnect(self, delay_ms);
            }
            FeedEffect::Deliver(point) => (self.on_point)(point),
        }
    }
}

/// Push-feed client with automatic reconnect-after-delay.
///
/// Owned by one chart instance; `close()` stops the retry loop and closes
/// any open socket.
pub struct FeedClient {
    shared: Rc<FeedShared>,
}

impl FeedClient {
    /// `on_point` receives every well-formed message in arrival order
    pub fn new<F>(url: &str, on_point: F) -> Self
    where
        F: Fn(SeriesPoint) + 'static,
    {
        Self {
            shared: Rc::new(FeedShared {
                url: url.to_string(),
                machine: RefCell::new(FeedMachine::new()),
                socket: RefCell::new(None),
                on_point: Box::new(on_point),
                destroyed: Cell::new(false),
            }),
        }
    }

    pub fn connect(&self) {
        self.shared.run(FeedEvent::ConnectRequested);
    }

    pub fn state(&self) -> FeedState {
        self.shared.machine.borrow().state()
    }

    /// Stop reconnecting and close the socket
    pub fn close(&self) {
        self.shared.destroyed.set(true);
        if let Some(socket) = self.shared.socket.borrow_mut().take() {
            socket.set_onopen(None);
            socket.set_onmessage(None);
            socket.set_onerror(None);
            socket.set_onclose(None);
            let _ = socket.close();
        }
    }
}

impl Drop for FeedClient {
    fn drop(&mut self) {
        self.close();
    }
}

fn open_socket(shared: &Rc<FeedShared>) -> Result<(), JsValue> {
    let socket = WebSocket::new(&shared.url)?;

    let on_open = {
        let shared = Rc::clone(shared);
        Closure::wrap(Box::new(move |_: JsValue| {
            shared.run(FeedEvent::Opened);
        }) as Box<dyn FnMut(JsValue)>)
    };
    socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    on_open.forget();

    let on_message = {
        let shared = Rc::clone(shared);
        Closure::wrap(Box::new(move |event: web_sys::MessageEvent| {
            if let Some(text) = event.data().as_string() {
                shared.run(FeedEvent::Message(&text));
            } else {
                log::warn!("dropping non-text feed frame");
            }
        }) as Box<dyn FnMut(web_sys::MessageEvent)>)
    };
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    on_message.forget();

    let on_error = {
        let shared = Rc::clone(shared);
        Closure::wrap(Box::new(move |_: web_sys::ErrorEvent| {
            shared.run(FeedEvent::TransportError);
        }) as Box<dyn FnMut(web_sys::ErrorEvent)>)
    };
    socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();

    let on_close = {
        let shared = Rc::clone(shared);
        Closure::wrap(Box::new(move |_: web_sys::CloseEvent| {
            shared.run(FeedEvent::TransportError);
        }) as Box<dyn FnMut(web_sys::CloseEvent)>)
    };
    socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));
    on_close.forget();

    *shared.socket.borrow_mut() = Some(socket);
    Ok(())
}

fn schedule_reconnect(shared: &Rc<FeedShared>, delay_ms: u32) {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return,
    };

    let retry = {
        let shared = Rc::clone(shared);
        Closure::once(move || {
            if !shared.destroyed.get() {
                shared.run(FeedEvent::ConnectRequested);
            }
        })
    };

    let result = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        retry.as_ref().unchecked_ref(),
        delay_ms as i32,
    );
    if result.is_err() {
        log::warn!("failed to schedule feed reconnect");
    }
    retry.forget();
}
