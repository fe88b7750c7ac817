//! Biomechanics module - smoothing and derived metrics
//!
//! Re-exports only. All logic in submodules.

mod geometry;
mod metrics;
mod smoother;
mod strain;

pub use geometry::{blend_point, distance, joint_angle};
pub use metrics::{JointAngles, MetricsEngine, MetricsSnapshot, SnapshotExport, CAPTURE_RATE};
pub use smoother::{KeypointSmoother, SMOOTHING_ALPHA};
pub use strain::{
    elbow_under_strain, knee_under_strain, segment_strain, ELBOW_STRAIN_THRESHOLD,
    KNEE_STRAIN_THRESHOLD, SEGMENT_ALERT_THRESHOLD,
};
