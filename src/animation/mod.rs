//! Animation module - frame pacing and the display-refresh loop
//!
//! Re-exports only. All logic in submodules.

mod pacer;
mod raf;

pub use pacer::{FramePacer, STREAM_FRAME_INTERVAL_MS};
pub use raf::RafLoop;
