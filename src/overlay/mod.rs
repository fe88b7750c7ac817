//! Overlay module - pose rendering and the overlay instance
//!
//! Re-exports only. All logic in submodules.

mod instance;
mod renderer;

pub use instance::{OverlayCore, PoseOverlay};
pub use renderer::{
    draw_awaiting_consent, gauge_color, joint_under_strain, FATIGUE_WARNING_THRESHOLD,
    MIN_RENDER_CONFIDENCE,
};
