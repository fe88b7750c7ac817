//! Frame pacing - target-interval throttle for render loops
//!
//! The display refresh drives every loop; a capped pacer decides whether a
//! given tick should actually render or only re-arm.

/// Target frame interval for the streaming chart (ms)
pub const STREAM_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Decides, per display refresh, whether to render this tick.
///
/// Capped mode skips ticks that arrive before the target interval has
/// elapsed; uncapped mode renders on every refresh.
pub struct FramePacer {
    target_interval_ms: Option<f64>,
    last_render: Option<f64>,
}

impl FramePacer {
    /// Render at most once per `interval_ms`
    pub fn new_capped(interval_ms: f64) -> Self {
        Self {
            target_interval_ms: Some(interval_ms),
            last_render: None,
        }
    }

    /// Render on every display refresh
    pub fn new_uncapped() -> Self {
        Self {
            target_interval_ms: None,
            last_render: None,
        }
    }

    /// Returns true when this tick should render.
    ///
    /// The caller re-arms regardless of the result.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let render = match (self.target_interval_ms, self.last_render) {
            (Some(interval), Some(last)) => now_ms - last >= interval,
            _ => true,
        };

        if render {
            self.last_render = Some(now_ms);
        }
        render
    }
}
