//! Pose overlay instance - consent gate, frame ingestion, render loop
//!
//! `OverlayCore` carries all analysis state and has no browser
//! dependencies; `PoseOverlay` wraps it with the canvas context and the
//! animation loop for JS consumers.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

use crate::animation::RafLoop;
use crate::biomech::{KeypointSmoother, MetricsEngine, SnapshotExport};
use crate::bridge::{decode_frame, ConsentStore, Keypoint, LocalStorageConsent};

use super::renderer;

// ============================================================================
// CORE STATE
// ============================================================================

/// Analysis state behind the consent gate.
///
/// The consent flag is read once at construction. Granting is a one-way
/// transition: the overlay stays active for the rest of the session.
pub struct OverlayCore {
    consent: Box<dyn ConsentStore>,
    consent_granted: bool,
    smoother: KeypointSmoother,
    engine: MetricsEngine,
    frame: Option<Vec<Keypoint>>,
}

impl OverlayCore {
    pub fn new(consent: Box<dyn ConsentStore>, width: f32, height: f32) -> Self {
        let consent_granted = consent.granted();
        Self {
            consent,
            consent_granted,
            smoother: KeypointSmoother::new(),
            engine: MetricsEngine::new(width, height),
            frame: None,
        }
    }

    pub fn consent_granted(&self) -> bool {
        self.consent_granted
    }

    /// Persist the grant and activate analysis
    pub fn grant_consent(&mut self) {
        if self.consent_granted {
            return;
        }
        self.consent.grant();
        self.consent_granted = true;
        log::info!("biometric consent granted, pose analysis active");
    }

    /// Smooth a raw frame and update the metrics.
    ///
    /// Performs no computation at all while consent is withheld.
    pub fn ingest(&mut self, raw: &[Keypoint]) {
        if !self.consent_granted {
            return;
        }

        let smoothed = self.smoother.apply(raw);
        self.engine.update(&smoothed);
        self.frame = Some(smoothed);
    }

    pub fn frame(&self) -> Option<&[Keypoint]> {
        self.frame.as_deref()
    }

    pub fn engine(&self) -> &MetricsEngine {
        &self.engine
    }

    /// Immutable export record, no side effects
    pub fn export(&self, timestamp: f64) -> SnapshotExport {
        SnapshotExport {
            timestamp,
            metrics: *self.engine.snapshot(),
            consent_granted: self.consent_granted,
        }
    }
}

// ============================================================================
// WASM CLASS
// ============================================================================

struct OverlayShared {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    core: RefCell<OverlayCore>,
}

/// Skeletal pose overlay with derived biomechanics.
///
/// One instance per canvas. Rendering is uncapped: the overlay draws on
/// every display refresh.
#[wasm_bindgen]
pub struct PoseOverlay {
    shared: Rc<OverlayShared>,
    raf: RafLoop,
}

#[wasm_bindgen]
impl PoseOverlay {
    /// The context is injected; consent is read from localStorage once,
    /// here.
    #[wasm_bindgen(constructor)]
    pub fn new(
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
    ) -> Result<PoseOverlay, JsValue> {
        let consent = Box::new(LocalStorageConsent::from_window()?);
        Ok(PoseOverlay {
            shared: Rc::new(OverlayShared {
                ctx,
                width,
                height,
                core: RefCell::new(OverlayCore::new(consent, width as f32, height as f32)),
            }),
            raf: RafLoop::new(),
        })
    }

    /// Start the render loop
    pub fn start(&self) -> Result<(), JsValue> {
        let shared = Rc::clone(&self.shared);
        self.raf.start(move |_refresh_ms| {
            let core = shared.core.borrow();
            if !core.consent_granted() {
                renderer::draw_awaiting_consent(&shared.ctx, shared.width, shared.height);
                return;
            }

            if let Some(frame) = core.frame() {
                renderer::draw(
                    &shared.ctx,
                    frame,
                    core.engine().snapshot(),
                    core.engine().tracked_joints(),
                    shared.width,
                    shared.height,
                );
            }
        })
    }

    /// Ingest one raw skeleton frame as a flat Float32Array of 48 values
    /// (16 joints x x, y, confidence)
    pub fn update(&self, data: &[f32]) {
        if let Some(raw) = decode_frame(data) {
            self.shared.core.borrow_mut().ingest(&raw);
        }
    }

    /// One-way user opt-in; persists across sessions
    #[wasm_bindgen(js_name = grantConsent)]
    pub fn grant_consent(&self) {
        self.shared.core.borrow_mut().grant_consent();
    }

    #[wasm_bindgen(js_name = consentGranted)]
    pub fn consent_granted(&self) -> bool {
        self.shared.core.borrow().consent_granted()
    }

    /// Export `{timestamp, metrics, consentGranted}` for logging or
    /// persistence outside this module
    #[wasm_bindgen(js_name = exportSnapshot)]
    pub fn export_snapshot(&self, timestamp: f64) -> Result<JsValue, JsValue> {
        let export = self.shared.core.borrow().export(timestamp);
        serde_wasm_bindgen::to_value(&export).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Halt the render loop. Skipping this leaks a periodic callback.
    pub fn destroy(&self) {
        self.raf.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{MemoryConsent, JOINT_COUNT};

    fn complete_frame() -> Vec<Keypoint> {
        vec![
            Keypoint {
                x: 100.0,
                y: 100.0,
                confidence: 0.9
            };
            JOINT_COUNT
        ]
    }

    #[test]
    fn test_no_computation_before_consent() {
        let mut core = OverlayCore::new(Box::new(MemoryConsent::default()), 640.0, 480.0);

        core.ingest(&complete_frame());
        assert!(core.frame().is_none());
        assert_eq!(core.engine().snapshot().fatigue, 0.0);
    }

    #[test]
    fn test_grant_activates_analysis() {
        let mut core = OverlayCore::new(Box::new(MemoryConsent::default()), 640.0, 480.0);
        core.grant_consent();
        assert!(core.consent_granted());

        core.ingest(&complete_frame());
        assert!(core.frame().is_some());
    }

    #[test]
    fn test_preexisting_consent_read_at_construction() {
        let core = OverlayCore::new(Box::new(MemoryConsent::new(true)), 640.0, 480.0);
        assert!(core.consent_granted());
    }

    #[test]
    fn test_grant_is_idempotent() {
        let mut core = OverlayCore::new(Box::new(MemoryConsent::default()), 640.0, 480.0);
        core.grant_consent();
        core.grant_consent();
        assert!(core.consent_granted());
    }

    #[test]
    fn test_export_reflects_state_without_side_effects() {
        let mut core = OverlayCore::new(Box::new(MemoryConsent::new(true)), 640.0, 480.0);
        core.ingest(&complete_frame());

        let before = *core.engine().snapshot();
        let export = core.export(1234.5);

        assert_eq!(export.timestamp, 1234.5);
        assert!(export.consent_granted);
        assert_eq!(export.metrics.fatigue, before.fatigue);

        // Exporting twice changes nothing
        let again = core.export(1234.5);
        assert_eq!(again.metrics.speed, export.metrics.speed);
    }
}
