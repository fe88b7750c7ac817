//! Bridge module - JS ↔ Rust boundary types
//!
//! Keypoint decoding and the consent capability live here.
//! Re-exports only in mod.rs, logic in submodules.

mod consent;
mod keypoints;

pub use consent::{
    ConsentStore, LocalStorageConsent, MemoryConsent, CONSENT_GRANTED, CONSENT_KEY,
};

pub use keypoints::{
    decode_frame, Keypoint,
    // Constants
    HEAD, NECK, CHEST, PELVIS,
    LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST,
    RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST,
    LEFT_HIP, LEFT_KNEE, LEFT_ANKLE,
    RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE,
    BONES, FLOATS_PER_JOINT, JOINT_COUNT,
};
