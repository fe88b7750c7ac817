//! Sideline Web - live sports telemetry overlays
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - Startup hooks (panic messages, logging)
//!
//! The two visualization surfaces are exported as classes:
//! - `PoseOverlay`: skeletal pose overlay with derived biomechanics
//! - `StreamChart`: scrolling win-probability / pressure chart

mod animation;
mod biomech;
mod bridge;
mod overlay;
mod stream;

use wasm_bindgen::prelude::*;

pub use biomech::{JointAngles, KeypointSmoother, MetricsEngine, MetricsSnapshot};
pub use bridge::{ConsentStore, Keypoint, BONES, JOINT_COUNT};
pub use overlay::PoseOverlay;
pub use stream::{RollingSeriesBuffer, SeriesPoint, StreamChart};

// ============================================================================
// STARTUP
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize console logging with the given level.
///
/// Call once at startup: "trace", "debug", "info", "warn", "error"
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "info" => log::Level::Info,
        "warn" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    };

    wasm_logger::init(wasm_logger::Config::new(log_level));
    log::info!("sideline-web initialized with log level: {}", level);
}

/// Get the library version
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
