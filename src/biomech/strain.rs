//! Segment and joint strain heuristics
//!
//! Strain here is an angle-deviation load indicator, not a validated
//! clinical measure. The segment formula compares a bone's absolute angle
//! against a synthetic horizontal reference and is kept as-is for
//! compatibility with the upstream analytics pipeline.

/// Knee angles below this are flagged as under strain (degrees)
pub const KNEE_STRAIN_THRESHOLD: f32 = 120.0;

/// Elbow angles below this are flagged as under strain (degrees)
pub const ELBOW_STRAIN_THRESHOLD: f32 = 80.0;

/// Segments with strain above this render in the alert color
pub const SEGMENT_ALERT_THRESHOLD: f32 = 0.5;

/// Heuristic strain of a bone segment, 0-1.
///
/// Deviation of the segment's absolute angle from 90° against a
/// horizontal reference, normalized by 90: a vertical segment scores 0,
/// a horizontal one scores 1.
pub fn segment_strain(a: (f32, f32), b: (f32, f32)) -> f32 {
    let angle = (b.1 - a.1).atan2(b.0 - a.0).to_degrees().abs();
    (angle - 90.0).abs() / 90.0
}

/// Whether a knee joint angle indicates strain
pub fn knee_under_strain(angle: f32) -> bool {
    angle < KNEE_STRAIN_THRESHOLD
}

/// Whether an elbow joint angle indicates strain
pub fn elbow_under_strain(angle: f32) -> bool {
    angle < ELBOW_STRAIN_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_segment_relaxed() {
        let strain = segment_strain((10.0, 0.0), (10.0, 50.0));
        assert!(strain < 1e-5);
    }

    #[test]
    fn test_horizontal_segment_maximal() {
        let strain = segment_strain((0.0, 10.0), (50.0, 10.0));
        assert!((strain - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_diagonal_segment_middling() {
        let strain = segment_strain((0.0, 0.0), (10.0, 10.0));
        assert!((strain - 0.5).abs() < 1e-5);
        assert!(strain <= SEGMENT_ALERT_THRESHOLD);
    }

    #[test]
    fn test_joint_strain_thresholds() {
        assert!(knee_under_strain(119.9));
        assert!(!knee_under_strain(120.0));
        assert!(elbow_under_strain(79.9));
        assert!(!elbow_under_strain(80.0));
    }
}
