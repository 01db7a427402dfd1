//! Reference T-pose of the built-in mannequin.
//!
//! Metres, +Y up, +Z forward, character left at -X. Only left-side joints
//! are listed; the right side is their [`mirror`].

use glam::Vec3;

pub const HIPS: Vec3 = Vec3::new(0.0, 0.95, 0.0);
pub const SPINE: Vec3 = Vec3::new(0.0, 1.05, 0.0);
pub const CHEST: Vec3 = Vec3::new(0.0, 1.2, 0.0);
pub const UPPER_CHEST: Vec3 = Vec3::new(0.0, 1.35, 0.0);
pub const NECK: Vec3 = Vec3::new(0.0, 1.5, 0.0);
pub const HEAD: Vec3 = Vec3::new(0.0, 1.6, 0.0);
pub const HAIR_ROOT: Vec3 = Vec3::new(0.0, 1.75, 0.0);

pub const LEFT_SHOULDER: Vec3 = Vec3::new(-0.05, 1.45, 0.0);
pub const LEFT_UPPER_ARM: Vec3 = Vec3::new(-0.18, 1.45, 0.0);
pub const LEFT_UPPER_ARM_TWIST: Vec3 = Vec3::new(-0.3, 1.45, 0.0);
pub const LEFT_LOWER_ARM: Vec3 = Vec3::new(-0.45, 1.45, 0.0);
pub const LEFT_HAND: Vec3 = Vec3::new(-0.7, 1.45, 0.0);

/// Proximal joints of the left fingers, thumb first
pub const LEFT_FINGER_ROOTS: [Vec3; 5] = [
    Vec3::new(-0.73, 1.43, 0.04),
    Vec3::new(-0.79, 1.45, 0.03),
    Vec3::new(-0.8, 1.45, 0.01),
    Vec3::new(-0.79, 1.45, -0.01),
    Vec3::new(-0.77, 1.45, -0.03),
];
/// Phalanx length step for the left hand
pub const LEFT_FINGER_SEGMENT: Vec3 = Vec3::new(-0.03, 0.0, 0.0);
pub const LEFT_THUMB_SEGMENT: Vec3 = Vec3::new(-0.02, 0.0, 0.02);

pub const LEFT_UPPER_LEG: Vec3 = Vec3::new(-0.09, 0.9, 0.0);
pub const LEFT_LOWER_LEG: Vec3 = Vec3::new(-0.09, 0.5, 0.0);
pub const LEFT_FOOT: Vec3 = Vec3::new(-0.09, 0.08, 0.0);
pub const LEFT_TOES: Vec3 = Vec3::new(-0.09, 0.02, 0.12);

/// Skin radius around each segment
pub const TORSO_RADIUS: f32 = 0.14;
pub const NECK_RADIUS: f32 = 0.05;
pub const HEAD_RADIUS: f32 = 0.1;
pub const HAIR_RADIUS: f32 = 0.11;
pub const SHOULDER_RADIUS: f32 = 0.05;
pub const UPPER_ARM_RADIUS: f32 = 0.05;
pub const LOWER_ARM_RADIUS: f32 = 0.04;
pub const HAND_RADIUS: f32 = 0.03;
pub const FINGER_RADIUS: f32 = 0.009;
pub const THIGH_RADIUS: f32 = 0.08;
pub const SHIN_RADIUS: f32 = 0.055;
pub const FOOT_RADIUS: f32 = 0.04;
pub const TOE_RADIUS: f32 = 0.02;

/// Heel offset behind the ankle, and toe length past the toe joint
pub const HEEL_DEPTH: f32 = 0.05;
pub const TOE_LENGTH: f32 = 0.07;

/// Mirror a left-side position to the right side
#[inline]
pub const fn mirror(v: Vec3) -> Vec3 {
    Vec3::new(-v.x, v.y, v.z)
}

/// Expected segment lengths of the mannequin, used by tests
pub struct BoneLengths {
    pub upper_arm: f32,
    pub forearm: f32,
    pub thigh: f32,
    pub shin: f32,
    pub hip_width: f32,
}

impl BoneLengths {
    pub fn from_default() -> Self {
        Self {
            upper_arm: LEFT_UPPER_ARM.distance(LEFT_LOWER_ARM),
            forearm: LEFT_LOWER_ARM.distance(LEFT_HAND),
            thigh: LEFT_UPPER_LEG.distance(LEFT_LOWER_LEG),
            shin: LEFT_LOWER_LEG.distance(LEFT_FOOT),
            hip_width: LEFT_UPPER_LEG.distance(mirror(LEFT_UPPER_LEG)),
        }
    }
}
