//! Keypoint storage and JS bridge
//!
//! Receives pose-estimator keypoints from JavaScript and exposes the
//! fixed 16-joint skeletal topology used by the metrics and rendering
//! systems. The estimator itself runs outside this module; we only
//! consume its output.

// ============================================================================
// JOINT INDICES (16 total)
// ============================================================================
//
// Index assignment is positional and fixed for the lifetime of an overlay.
// Renumbering silently breaks every angle computation downstream, so the
// full table lives here and nowhere else:
//
// |  0 | head           |  8 | right elbow  |
// |  1 | neck           |  9 | right wrist  |
// |  2 | chest          | 10 | left hip     |
// |  3 | pelvis         | 11 | left knee    |
// |  4 | left shoulder  | 12 | left ankle   |
// |  5 | left elbow     | 13 | right hip    |
// |  6 | left wrist     | 14 | right knee   |
// |  7 | right shoulder | 15 | right ankle  |

pub const HEAD: usize = 0;
pub const NECK: usize = 1;
pub const CHEST: usize = 2;
pub const PELVIS: usize = 3;
pub const LEFT_SHOULDER: usize = 4;
pub const LEFT_ELBOW: usize = 5;
pub const LEFT_WRIST: usize = 6;
pub const RIGHT_SHOULDER: usize = 7;
pub const RIGHT_ELBOW: usize = 8;
pub const RIGHT_WRIST: usize = 9;
pub const LEFT_HIP: usize = 10;
pub const LEFT_KNEE: usize = 11;
pub const LEFT_ANKLE: usize = 12;
pub const RIGHT_HIP: usize = 13;
pub const RIGHT_KNEE: usize = 14;
pub const RIGHT_ANKLE: usize = 15;

/// Number of joints in a complete skeleton frame
pub const JOINT_COUNT: usize = 16;

/// Floats per joint in the flat JS array (x, y, confidence)
pub const FLOATS_PER_JOINT: usize = 3;

/// Bone connections (pairs of joint indices)
pub const BONES: [(usize, usize); 15] = [
    (HEAD, NECK),
    (NECK, CHEST),
    (CHEST, PELVIS),
    (NECK, LEFT_SHOULDER),
    (LEFT_SHOULDER, LEFT_ELBOW),
    (LEFT_ELBOW, LEFT_WRIST),
    (NECK, RIGHT_SHOULDER),
    (RIGHT_SHOULDER, RIGHT_ELBOW),
    (RIGHT_ELBOW, RIGHT_WRIST),
    (PELVIS, LEFT_HIP),
    (LEFT_HIP, LEFT_KNEE),
    (LEFT_KNEE, LEFT_ANKLE),
    (PELVIS, RIGHT_HIP),
    (RIGHT_HIP, RIGHT_KNEE),
    (RIGHT_KNEE, RIGHT_ANKLE),
];

// ============================================================================
// KEYPOINT DATA STRUCTURE
// ============================================================================

/// A single tracked anatomical landmark (pixel coordinates)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Detection confidence, 0-1
    pub confidence: f32,
}

impl Keypoint {
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Decode a flat Float32Array of 48 values (16 joints x x,y,confidence)
/// into a skeleton frame.
///
/// Returns `None` on a length mismatch; an incomplete frame never reaches
/// the metrics or rendering path.
pub fn decode_frame(data: &[f32]) -> Option<Vec<Keypoint>> {
    if data.len() != JOINT_COUNT * FLOATS_PER_JOINT {
        log::warn!(
            "invalid keypoint data length: {} (expected {})",
            data.len(),
            JOINT_COUNT * FLOATS_PER_JOINT
        );
        return None;
    }

    let mut frame = Vec::with_capacity(JOINT_COUNT);
    for i in 0..JOINT_COUNT {
        frame.push(Keypoint {
            x: data[i * FLOATS_PER_JOINT],
            y: data[i * FLOATS_PER_JOINT + 1],
            confidence: data[i * FLOATS_PER_JOINT + 2],
        });
    }
    Some(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_complete_frame() {
        let mut data = vec![0.0f32; JOINT_COUNT * FLOATS_PER_JOINT];
        data[PELVIS * 3] = 120.0;
        data[PELVIS * 3 + 1] = 240.0;
        data[PELVIS * 3 + 2] = 0.9;

        let frame = decode_frame(&data).unwrap();
        assert_eq!(frame.len(), JOINT_COUNT);
        assert_eq!(frame[PELVIS].x, 120.0);
        assert_eq!(frame[PELVIS].y, 240.0);
        assert_eq!(frame[PELVIS].confidence, 0.9);
    }

    #[test]
    fn test_decode_rejects_short_frame() {
        let data = vec![0.0f32; 45];
        assert!(decode_frame(&data).is_none());
    }

    #[test]
    fn test_bone_indices_in_range() {
        for (a, b) in BONES.iter() {
            assert!(*a < JOINT_COUNT);
            assert!(*b < JOINT_COUNT);
        }
    }
}
