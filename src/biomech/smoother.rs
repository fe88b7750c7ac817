//! Keypoint smoothing filter
//!
//! Blends each incoming keypoint with its predecessor to suppress
//! estimator jitter without materially lagging real motion. The time
//! constant works out to roughly 2-3 frames at capture rate.

use crate::bridge::Keypoint;

use super::geometry::blend_point;

/// Weight of the new sample in the blend (previous frame keeps the rest)
pub const SMOOTHING_ALPHA: f32 = 0.3;

/// Per-overlay keypoint filter.
///
/// The first frame after a (re)start passes through unsmoothed; every
/// later frame is blended componentwise against the previous smoothed
/// frame. Confidence is passed through unmodified, never smoothed.
#[derive(Default)]
pub struct KeypointSmoother {
    prev: Option<Vec<Keypoint>>,
}

impl KeypointSmoother {
    pub fn new() -> Self {
        Self { prev: None }
    }

    /// Smooth a raw frame against the stored predecessor.
    ///
    /// A length change relative to the stored frame is treated as a
    /// restart: the raw frame passes through and re-seeds the filter.
    pub fn apply(&mut self, raw: &[Keypoint]) -> Vec<Keypoint> {
        let smoothed = match &self.prev {
            Some(prev) if prev.len() == raw.len() => prev
                .iter()
                .zip(raw.iter())
                .map(|(p, n)| {
                    let (x, y) = blend_point(p.position(), n.position(), SMOOTHING_ALPHA);
                    Keypoint {
                        x,
                        y,
                        confidence: n.confidence,
                    }
                })
                .collect(),
            _ => raw.to_vec(),
        };

        self.prev = Some(smoothed.clone());
        smoothed
    }

    /// Forget the stored frame (next frame passes through unsmoothed)
    pub fn reset(&mut self) {
        self.prev = None;
    }
}
