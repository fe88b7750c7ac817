//! Derived biomechanical metrics
//!
//! Consumes a smoothed skeleton frame and maintains a snapshot of linear
//! speed, acceleration, stride length, the four tracked joint angles, and
//! the composite fatigue / flow-state scores. Everything except the
//! previous hip position and previous speed is recomputed from scratch on
//! every update.

use serde::Serialize;

use crate::bridge::{
    Keypoint, JOINT_COUNT, LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER,
    LEFT_WRIST, PELVIS, RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER,
    RIGHT_WRIST,
};

use super::geometry::{distance, joint_angle};

/// Assumed capture rate (samples per unit time) used to scale
/// per-frame displacement into velocity
pub const CAPTURE_RATE: f32 = 30.0;

/// Confidence floor for a joint to count toward movement variability
const VARIABILITY_MIN_CONFIDENCE: f32 = 0.5;

/// Efficiency penalty per out-of-band joint angle
const EFFICIENCY_PENALTY: f32 = 0.1;

/// Optimal knee angle band (degrees)
const KNEE_BAND: (f32, f32) = (140.0, 160.0);

/// Optimal elbow angle band (degrees)
const ELBOW_BAND: (f32, f32) = (90.0, 110.0);

// ============================================================================
// SNAPSHOT TYPES
// ============================================================================

/// Angles at the four tracked joints, degrees in (-180, 180]
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JointAngles {
    pub left_knee: f32,
    pub right_knee: f32,
    pub left_elbow: f32,
    pub right_elbow: f32,
}

/// Current derived metrics, mutated in place on every complete frame
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Linear speed of the pelvis, pixels per unit time
    pub speed: f32,
    /// First difference of speed, same scaling
    pub acceleration: f32,
    /// Horizontal distance between the ankles, pixels
    pub stride_length: f32,
    pub joint_angles: JointAngles,
    /// Composite fatigue score, 0-1
    pub fatigue: f32,
    /// Composite flow-state score, 0-1
    pub flow_state: f32,
}

/// Immutable export record for external consumption
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotExport {
    pub timestamp: f64,
    pub metrics: MetricsSnapshot,
    pub consent_granted: bool,
}

// ============================================================================
// ENGINE
// ============================================================================

/// Per-overlay metrics engine.
///
/// Operates only on frames of at least 16 joints; shorter frames leave
/// the snapshot untouched.
pub struct MetricsEngine {
    surface_width: f32,
    surface_height: f32,

    prev_pelvis: Option<(f32, f32)>,
    prev_speed: Option<f32>,

    snapshot: MetricsSnapshot,
    /// Joints that qualified for the last variability pass (debug readout)
    tracked_joints: usize,
}

impl MetricsEngine {
    /// Surface dimensions normalize the variability term
    pub fn new(surface_width: f32, surface_height: f32) -> Self {
        Self {
            surface_width,
            surface_height,
            prev_pelvis: None,
            prev_speed: None,
            snapshot: MetricsSnapshot::default(),
            tracked_joints: 0,
        }
    }

    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    /// Joint count behind the last variability estimate
    pub fn tracked_joints(&self) -> usize {
        self.tracked_joints
    }

    /// Update the snapshot from a smoothed frame.
    ///
    /// Incomplete frames (fewer than 16 joints) are a no-op: the previous
    /// snapshot is retained.
    pub fn update(&mut self, frame: &[Keypoint]) {
        if frame.len() < JOINT_COUNT {
            return;
        }

        self.update_kinematics(frame);

        self.snapshot.stride_length = (frame[LEFT_ANKLE].x - frame[RIGHT_ANKLE].x).abs();

        self.snapshot.joint_angles = JointAngles {
            left_knee: angle_at(frame, LEFT_HIP, LEFT_KNEE, LEFT_ANKLE),
            right_knee: angle_at(frame, RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE),
            left_elbow: angle_at(frame, LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST),
            right_elbow: angle_at(frame, RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST),
        };

        let (variability, tracked) = self.variability(frame);
        self.tracked_joints = tracked;
        let efficiency = efficiency_score(&self.snapshot.joint_angles);

        self.snapshot.fatigue =
            (0.5 * variability + 0.5 * (1.0 - efficiency)).clamp(0.0, 1.0);
        self.snapshot.flow_state = (((1.0 - variability)
            + efficiency
            + (1.0 - self.snapshot.fatigue))
            / 3.0)
            .clamp(0.0, 1.0);
    }

    /// Speed from pelvis displacement between consecutive frames, scaled by
    /// the assumed capture rate. Acceleration is the first difference of
    /// consecutive speed values. No velocity on the very first frame.
    fn update_kinematics(&mut self, frame: &[Keypoint]) {
        let pelvis = frame[PELVIS].position();

        if let Some(prev) = self.prev_pelvis {
            let speed = distance(prev, pelvis) * CAPTURE_RATE;
            if let Some(prev_speed) = self.prev_speed {
                self.snapshot.acceleration = (speed - prev_speed) * CAPTURE_RATE;
            }
            self.snapshot.speed = speed;
            self.prev_speed = Some(speed);
        }

        self.prev_pelvis = Some(pelvis);
    }

    /// Mean normalized deviation from surface center over confident joints.
    ///
    /// Per joint: |dx|/width + |dy|/height. Joints at or below the
    /// confidence floor are excluded; no confident joints yields 0.
    fn variability(&self, frame: &[Keypoint]) -> (f32, usize) {
        let cx = self.surface_width / 2.0;
        let cy = self.surface_height / 2.0;

        let mut sum = 0.0;
        let mut count = 0usize;
        for kp in frame.iter().take(JOINT_COUNT) {
            if kp.confidence > VARIABILITY_MIN_CONFIDENCE {
                sum += (kp.x - cx).abs() / self.surface_width
                    + (kp.y - cy).abs() / self.surface_height;
                count += 1;
            }
        }

        if count == 0 {
            (0.0, 0)
        } else {
            (sum / count as f32, count)
        }
    }
}

/// Angle at the middle joint of a (proximal, joint, distal) triple.
/// A missing operand yields 0.
fn angle_at(frame: &[Keypoint], proximal: usize, joint: usize, distal: usize) -> f32 {
    match (frame.get(proximal), frame.get(joint), frame.get(distal)) {
        (Some(p), Some(j), Some(d)) => joint_angle(p.position(), j.position(), d.position()),
        _ => 0.0,
    }
}

/// Penalty contributed by one joint angle against its optimal band
fn band_penalty(angle: f32, band: (f32, f32)) -> f32 {
    if angle < band.0 || angle > band.1 {
        EFFICIENCY_PENALTY
    } else {
        0.0
    }
}

/// Movement efficiency: starts at 1.0, loses 0.1 per tracked joint angle
/// outside its optimal band, floored at 0
fn efficiency_score(angles: &JointAngles) -> f32 {
    let penalty = band_penalty(angles.left_knee, KNEE_BAND)
        + band_penalty(angles.right_knee, KNEE_BAND)
        + band_penalty(angles.left_elbow, ELBOW_BAND)
        + band_penalty(angles.right_elbow, ELBOW_BAND);
    (1.0 - penalty).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Complete frame with every joint at (x, y) and full confidence
    fn uniform_frame(x: f32, y: f32) -> Vec<Keypoint> {
        vec![
            Keypoint {
                x,
                y,
                confidence: 1.0
            };
            JOINT_COUNT
        ]
    }

    #[test]
    fn test_short_frame_leaves_snapshot_unchanged() {
        let mut engine = MetricsEngine::new(640.0, 480.0);

        let mut frame = uniform_frame(100.0, 100.0);
        engine.update(&frame);
        frame[PELVIS].x = 200.0;
        engine.update(&frame);
        let before = *engine.snapshot();

        engine.update(&frame[..15]);
        let after = *engine.snapshot();

        assert_eq!(before.speed, after.speed);
        assert_eq!(before.fatigue, after.fatigue);
        assert_eq!(before.flow_state, after.flow_state);
    }

    #[test]
    fn test_no_speed_on_first_frame() {
        let mut engine = MetricsEngine::new(640.0, 480.0);
        engine.update(&uniform_frame(100.0, 100.0));
        assert_eq!(engine.snapshot().speed, 0.0);
        assert_eq!(engine.snapshot().acceleration, 0.0);
    }

    #[test]
    fn test_pelvis_speed_scaling() {
        // Pelvis (0,0) then (3,4) one tick apart: displacement 5, rate 30
        let mut engine = MetricsEngine::new(640.0, 480.0);

        let mut frame = uniform_frame(0.0, 0.0);
        engine.update(&frame);

        frame[PELVIS] = Keypoint {
            x: 3.0,
            y: 4.0,
            confidence: 1.0,
        };
        engine.update(&frame);

        assert!((engine.snapshot().speed - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_acceleration_is_speed_difference() {
        let mut engine = MetricsEngine::new(640.0, 480.0);

        let mut frame = uniform_frame(0.0, 0.0);
        engine.update(&frame);
        frame[PELVIS].x = 1.0; // speed 30
        engine.update(&frame);
        frame[PELVIS].x = 3.0; // speed 60
        engine.update(&frame);

        // (60 - 30) * 30
        assert!((engine.snapshot().acceleration - 900.0).abs() < 1e-3);
    }

    #[test]
    fn test_stride_length() {
        let mut frame = uniform_frame(100.0, 100.0);
        frame[LEFT_ANKLE].x = 80.0;
        frame[RIGHT_ANKLE].x = 150.0;

        let mut engine = MetricsEngine::new(640.0, 480.0);
        engine.update(&frame);
        assert!((engine.snapshot().stride_length - 70.0).abs() < 1e-5);
    }

    #[test]
    fn test_knee_band_penalties() {
        // 150 in band, 130 and 170 outside
        assert_eq!(band_penalty(150.0, KNEE_BAND), 0.0);
        assert_eq!(band_penalty(130.0, KNEE_BAND), 0.1);
        assert_eq!(band_penalty(170.0, KNEE_BAND), 0.1);
    }

    #[test]
    fn test_efficiency_floor() {
        // All four angles at 0 are outside both bands
        let angles = JointAngles::default();
        assert!((efficiency_score(&angles) - 0.6).abs() < 1e-6);

        let worst = JointAngles {
            left_knee: 0.0,
            right_knee: 0.0,
            left_elbow: 0.0,
            right_elbow: 0.0,
        };
        assert!(efficiency_score(&worst) >= 0.0);
    }

    #[test]
    fn test_scores_clamped_for_degenerate_skeleton() {
        let mut engine = MetricsEngine::new(640.0, 480.0);
        engine.update(&uniform_frame(0.0, 0.0));

        let snap = engine.snapshot();
        assert!((0.0..=1.0).contains(&snap.fatigue));
        assert!((0.0..=1.0).contains(&snap.flow_state));
    }

    #[test]
    fn test_scores_clamped_for_far_out_of_frame_joints() {
        let mut engine = MetricsEngine::new(640.0, 480.0);
        engine.update(&uniform_frame(50_000.0, -50_000.0));

        let snap = engine.snapshot();
        assert!((0.0..=1.0).contains(&snap.fatigue));
        assert!((0.0..=1.0).contains(&snap.flow_state));
    }

    #[test]
    fn test_low_confidence_joints_excluded_from_variability() {
        let mut frame = uniform_frame(0.0, 0.0);
        for kp in frame.iter_mut() {
            kp.confidence = 0.2;
        }

        let mut engine = MetricsEngine::new(640.0, 480.0);
        engine.update(&frame);
        assert_eq!(engine.tracked_joints(), 0);
    }

    #[test]
    fn test_export_serializes_camel_case() {
        let export = SnapshotExport {
            timestamp: 12.5,
            metrics: MetricsSnapshot::default(),
            consent_granted: true,
        };

        let json = serde_json::to_string(&export).unwrap();
        assert!(json.contains("\"consentGranted\":true"));
        assert!(json.contains("\"strideLength\""));
        assert!(json.contains("\"leftKnee\""));
        assert!(json.contains("\"flowState\""));
    }
}
