//! Stream chart instance - owns the buffer, feed client, and render loop

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

use crate::animation::{FramePacer, RafLoop, STREAM_FRAME_INTERVAL_MS};

use super::feed::FeedClient;
use super::renderer;
use super::series::RollingSeriesBuffer;

struct ChartShared {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    buffer: RefCell<RollingSeriesBuffer>,
    pacer: RefCell<FramePacer>,
}

/// Scrolling win-probability / pressure chart.
///
/// One instance per canvas. The render loop self-throttles to 60fps;
/// the feed client reconnects on its own until `destroy()`.
#[wasm_bindgen]
pub struct StreamChart {
    shared: Rc<ChartShared>,
    raf: RafLoop,
    feed: RefCell<Option<FeedClient>>,
}

#[wasm_bindgen]
impl StreamChart {
    /// The context is injected; this instance never creates or resizes
    /// the canvas.
    #[wasm_bindgen(constructor)]
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> StreamChart {
        StreamChart {
            shared: Rc::new(ChartShared {
                ctx,
                width,
                height,
                buffer: RefCell::new(RollingSeriesBuffer::new()),
                pacer: RefCell::new(FramePacer::new_capped(STREAM_FRAME_INTERVAL_MS)),
            }),
            raf: RafLoop::new(),
            feed: RefCell::new(None),
        }
    }

    /// Connect to the push feed and start rendering
    pub fn connect(&self, url: &str) -> Result<(), JsValue> {
        let client = {
            let shared = Rc::clone(&self.shared);
            FeedClient::new(url, move |point| {
                let now = point.t;
                shared.buffer.borrow_mut().append(point, now);
            })
        };
        client.connect();
        *self.feed.borrow_mut() = Some(client);

        self.start_loop()
    }

    /// Push a point directly, bypassing the feed (e.g. replayed history)
    pub fn push(&self, t: f64, wp: f32, pressure: f32) {
        self.shared.buffer.borrow_mut().append(
            super::series::SeriesPoint {
                t,
                wp,
                pressure,
                event: None,
            },
            t,
        );
    }

    /// Number of points currently retained
    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.shared.buffer.borrow().len()
    }

    /// Halt the render loop and close the feed connection.
    ///
    /// Skipping this leaks a periodic callback and a socket.
    pub fn destroy(&self) {
        self.raf.stop();
        if let Some(feed) = self.feed.borrow_mut().take() {
            feed.close();
        }
    }
}

impl StreamChart {
    fn start_loop(&self) -> Result<(), JsValue> {
        let shared = Rc::clone(&self.shared);
        self.raf.start(move |refresh_ms| {
            // Pacing runs on the refresh clock; data ages on the feed clock
            if shared.pacer.borrow_mut().tick(refresh_ms) {
                renderer::draw(
                    &shared.ctx,
                    &shared.buffer.borrow(),
                    js_sys::Date::now(),
                    shared.width,
                    shared.height,
                );
            }
        })
    }
}
