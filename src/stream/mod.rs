//! Stream module - win-probability chart, rolling buffer, and feed client
//!
//! Re-exports only. All logic in submodules.

mod feed;
mod instance;
mod renderer;
mod series;

pub use feed::{FeedClient, FeedEffect, FeedEvent, FeedMachine, FeedState, RECONNECT_DELAY_MS};
pub use instance::StreamChart;
pub use renderer::{marker_opacity, PressureTier, MARKER_PULSE_MS};
pub use series::{GameEvent, RollingSeriesBuffer, SeriesPoint, WINDOW_MS};
