//! Pose overlay drawing - skeleton, joints, metrics panel, fatigue gauge
//!
//! Stateless over the current frame and metrics snapshot. Everything
//! draws onto an injected 2D canvas context; color and strain decisions
//! are pure helpers.

use web_sys::CanvasRenderingContext2d;

use crate::biomech::{
    elbow_under_strain, knee_under_strain, segment_strain, JointAngles, MetricsSnapshot,
    SEGMENT_ALERT_THRESHOLD,
};
use crate::bridge::{Keypoint, BONES, LEFT_ELBOW, LEFT_KNEE, RIGHT_ELBOW, RIGHT_KNEE};

/// Joints and segments at or below this confidence are not drawn at all
pub const MIN_RENDER_CONFIDENCE: f32 = 0.3;

/// Fatigue level that triggers the textual warning
pub const FATIGUE_WARNING_THRESHOLD: f32 = 0.7;

const BONE_BASE: &str = "#00d4ff";
const BONE_ALERT: &str = "#ff4757";
const JOINT_FILL: &str = "#e6edf3";
const JOINT_GLOW: &str = "rgba(255, 71, 87, 0.35)";
const PANEL_BG: &str = "rgba(13, 17, 23, 0.75)";
const PANEL_TEXT: &str = "#e6edf3";
const GAUGE_TRACK: &str = "rgba(255, 255, 255, 0.12)";

// ============================================================================
// PURE HELPERS
// ============================================================================

/// Whether the joint at `index` is currently flagged under strain
pub fn joint_under_strain(index: usize, angles: &JointAngles) -> bool {
    match index {
        LEFT_KNEE => knee_under_strain(angles.left_knee),
        RIGHT_KNEE => knee_under_strain(angles.right_knee),
        LEFT_ELBOW => elbow_under_strain(angles.left_elbow),
        RIGHT_ELBOW => elbow_under_strain(angles.right_elbow),
        _ => false,
    }
}

/// Gauge fill color by fatigue level
pub fn gauge_color(fatigue: f32) -> &'static str {
    match fatigue {
        f if f < 0.4 => "#51cf66",
        f if f < FATIGUE_WARNING_THRESHOLD => "#ffd43b",
        _ => "#ff4757",
    }
}

// ============================================================================
// LAYERS
// ============================================================================

/// Blocking visual state shown until biometric consent is granted
pub fn draw_awaiting_consent(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.clear_rect(0.0, 0.0, width, height);

    ctx.set_fill_style_str(PANEL_BG);
    ctx.fill_rect(0.0, 0.0, width, height);

    ctx.set_fill_style_str(PANEL_TEXT);
    ctx.set_font("bold 16px sans-serif");
    let _ = ctx.fill_text(
        "Awaiting biometric consent",
        width / 2.0 - 110.0,
        height / 2.0,
    );
    ctx.set_font("12px sans-serif");
    let _ = ctx.fill_text(
        "Pose analysis is paused until you opt in",
        width / 2.0 - 110.0,
        height / 2.0 + 22.0,
    );
}

/// Render the full overlay for one frame
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    frame: &[Keypoint],
    metrics: &MetricsSnapshot,
    tracked_joints: usize,
    width: f64,
    height: f64,
) {
    ctx.clear_rect(0.0, 0.0, width, height);

    draw_bones(ctx, frame);
    draw_joints(ctx, frame, &metrics.joint_angles);
    draw_metrics_panel(ctx, metrics, tracked_joints);
    draw_fatigue_gauge(ctx, metrics.fatigue, width, height);
}

fn draw_bones(ctx: &CanvasRenderingContext2d, frame: &[Keypoint]) {
    ctx.set_line_width(3.0);

    for (a, b) in BONES.iter() {
        let (start, end) = match (frame.get(*a), frame.get(*b)) {
            (Some(s), Some(e)) => (s, e),
            _ => continue,
        };
        if start.confidence <= MIN_RENDER_CONFIDENCE || end.confidence <= MIN_RENDER_CONFIDENCE {
            continue;
        }

        let strain = segment_strain(start.position(), end.position());
        let color = if strain > SEGMENT_ALERT_THRESHOLD {
            BONE_ALERT
        } else {
            BONE_BASE
        };

        ctx.set_stroke_style_str(color);
        ctx.begin_path();
        ctx.move_to(start.x as f64, start.y as f64);
        ctx.line_to(end.x as f64, end.y as f64);
        ctx.stroke();
    }
}

fn draw_joints(ctx: &CanvasRenderingContext2d, frame: &[Keypoint], angles: &JointAngles) {
    for (index, kp) in frame.iter().enumerate() {
        if kp.confidence <= MIN_RENDER_CONFIDENCE {
            continue;
        }

        let x = kp.x as f64;
        let y = kp.y as f64;
        let radius = 3.0 + kp.confidence as f64 * 3.0;

        if joint_under_strain(index, angles) {
            ctx.set_fill_style_str(JOINT_GLOW);
            ctx.begin_path();
            let _ = ctx.arc(x, y, radius + 6.0, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }

        ctx.set_fill_style_str(JOINT_FILL);
        ctx.begin_path();
        let _ = ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU);
        ctx.fill();
    }
}

fn draw_metrics_panel(
    ctx: &CanvasRenderingContext2d,
    metrics: &MetricsSnapshot,
    tracked_joints: usize,
) {
    ctx.set_fill_style_str(PANEL_BG);
    ctx.fill_rect(10.0, 10.0, 170.0, 110.0);

    ctx.set_fill_style_str(PANEL_TEXT);
    ctx.set_font("12px monospace");

    let lines = [
        format!("SPEED  {:7.1}", metrics.speed),
        format!("ACCEL  {:7.1}", metrics.acceleration),
        format!("STRIDE {:7.1}", metrics.stride_length),
        format!("FLOW   {:6.0}%", metrics.flow_state * 100.0),
        format!("TRACK  {:>4}/16", tracked_joints),
    ];
    for (i, line) in lines.iter().enumerate() {
        let _ = ctx.fill_text(line, 20.0, 30.0 + i as f64 * 18.0);
    }
}

/// Vertical gauge whose fill proportion equals the fatigue score
fn draw_fatigue_gauge(ctx: &CanvasRenderingContext2d, fatigue: f32, width: f64, height: f64) {
    let track_x = width - 34.0;
    let track_y = 60.0;
    let track_h = height - 120.0;

    ctx.set_fill_style_str(GAUGE_TRACK);
    ctx.fill_rect(track_x, track_y, 14.0, track_h);

    let fill_h = track_h * fatigue as f64;
    ctx.set_fill_style_str(gauge_color(fatigue));
    ctx.fill_rect(track_x, track_y + track_h - fill_h, 14.0, fill_h);

    ctx.set_fill_style_str(PANEL_TEXT);
    ctx.set_font("10px sans-serif");
    let _ = ctx.fill_text("FTG", track_x - 2.0, track_y + track_h + 16.0);

    if fatigue > FATIGUE_WARNING_THRESHOLD {
        ctx.set_fill_style_str(BONE_ALERT);
        ctx.set_font("bold 12px sans-serif");
        let _ = ctx.fill_text("HIGH FATIGUE", track_x - 80.0, track_y - 10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{HEAD, PELVIS};

    #[test]
    fn test_joint_strain_mapping() {
        let angles = JointAngles {
            left_knee: 100.0,  // under strain (< 120)
            right_knee: 150.0, // relaxed
            left_elbow: 70.0,  // under strain (< 80)
            right_elbow: 95.0, // relaxed
        };

        assert!(joint_under_strain(LEFT_KNEE, &angles));
        assert!(!joint_under_strain(RIGHT_KNEE, &angles));
        assert!(joint_under_strain(LEFT_ELBOW, &angles));
        assert!(!joint_under_strain(RIGHT_ELBOW, &angles));
    }

    #[test]
    fn test_untracked_joints_never_glow() {
        // Angles that would flag every tracked joint
        let angles = JointAngles {
            left_knee: 0.0,
            right_knee: 0.0,
            left_elbow: 0.0,
            right_elbow: 0.0,
        };
        assert!(!joint_under_strain(HEAD, &angles));
        assert!(!joint_under_strain(PELVIS, &angles));
    }

    #[test]
    fn test_gauge_color_tiers() {
        assert_eq!(gauge_color(0.0), "#51cf66");
        assert_eq!(gauge_color(0.5), "#ffd43b");
        assert_eq!(gauge_color(0.9), "#ff4757");
        assert_ne!(gauge_color(0.1), gauge_color(0.9));
    }
}
