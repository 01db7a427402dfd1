use heck::ToUpperCamelCase;
use serde::{Deserialize, Serialize};

/// Canonical humanoid bone role.
///
/// Ordered for topological traversal (parents before children) in a
/// standard humanoid rig. Finger roles are laid out per side as
/// finger-major, phalanx-minor so they can be addressed arithmetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum HumanBone {
    // Root
    Hips = 0,

    // Spine chain
    Spine = 1,
    Chest = 2,
    UpperChest = 3,
    Neck = 4,
    Head = 5,
    LeftEye = 6,
    RightEye = 7,
    Jaw = 8,

    // Left arm chain
    LeftShoulder = 9,
    LeftUpperArm = 10,
    LeftLowerArm = 11,
    LeftHand = 12,

    // Right arm chain
    RightShoulder = 13,
    RightUpperArm = 14,
    RightLowerArm = 15,
    RightHand = 16,

    // Left leg chain
    LeftUpperLeg = 17,
    LeftLowerLeg = 18,
    LeftFoot = 19,
    LeftToes = 20,

    // Right leg chain
    RightUpperLeg = 21,
    RightLowerLeg = 22,
    RightFoot = 23,
    RightToes = 24,

    // Left fingers
    LeftThumbProximal = 25,
    LeftThumbIntermediate = 26,
    LeftThumbDistal = 27,
    LeftIndexProximal = 28,
    LeftIndexIntermediate = 29,
    LeftIndexDistal = 30,
    LeftMiddleProximal = 31,
    LeftMiddleIntermediate = 32,
    LeftMiddleDistal = 33,
    LeftRingProximal = 34,
    LeftRingIntermediate = 35,
    LeftRingDistal = 36,
    LeftLittleProximal = 37,
    LeftLittleIntermediate = 38,
    LeftLittleDistal = 39,

    // Right fingers
    RightThumbProximal = 40,
    RightThumbIntermediate = 41,
    RightThumbDistal = 42,
    RightIndexProximal = 43,
    RightIndexIntermediate = 44,
    RightIndexDistal = 45,
    RightMiddleProximal = 46,
    RightMiddleIntermediate = 47,
    RightMiddleDistal = 48,
    RightRingProximal = 49,
    RightRingIntermediate = 50,
    RightRingDistal = 51,
    RightLittleProximal = 52,
    RightLittleIntermediate = 53,
    RightLittleDistal = 54,
}

/// Body side of a lateral bone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Little,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phalanx {
    Proximal,
    Intermediate,
    Distal,
}

/// Coarse body region of a role, used by per-level and per-shape tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneRegion {
    Torso,
    Neck,
    Head,
    Face,
    Shoulder,
    UpperArm,
    LowerArm,
    Hand,
    Finger,
    UpperLeg,
    LowerLeg,
    Foot,
    Toes,
}

const FIRST_FINGER: usize = HumanBone::LeftThumbProximal as usize;
const FINGERS_PER_SIDE: usize = 15;

const NAMES: [&str; HumanBone::COUNT] = [
    "Hips",
    "Spine",
    "Chest",
    "UpperChest",
    "Neck",
    "Head",
    "LeftEye",
    "RightEye",
    "Jaw",
    "LeftShoulder",
    "LeftUpperArm",
    "LeftLowerArm",
    "LeftHand",
    "RightShoulder",
    "RightUpperArm",
    "RightLowerArm",
    "RightHand",
    "LeftUpperLeg",
    "LeftLowerLeg",
    "LeftFoot",
    "LeftToes",
    "RightUpperLeg",
    "RightLowerLeg",
    "RightFoot",
    "RightToes",
    "LeftThumbProximal",
    "LeftThumbIntermediate",
    "LeftThumbDistal",
    "LeftIndexProximal",
    "LeftIndexIntermediate",
    "LeftIndexDistal",
    "LeftMiddleProximal",
    "LeftMiddleIntermediate",
    "LeftMiddleDistal",
    "LeftRingProximal",
    "LeftRingIntermediate",
    "LeftRingDistal",
    "LeftLittleProximal",
    "LeftLittleIntermediate",
    "LeftLittleDistal",
    "RightThumbProximal",
    "RightThumbIntermediate",
    "RightThumbDistal",
    "RightIndexProximal",
    "RightIndexIntermediate",
    "RightIndexDistal",
    "RightMiddleProximal",
    "RightMiddleIntermediate",
    "RightMiddleDistal",
    "RightRingProximal",
    "RightRingIntermediate",
    "RightRingDistal",
    "RightLittleProximal",
    "RightLittleIntermediate",
    "RightLittleDistal",
];

impl HumanBone {
    /// Total number of humanoid roles
    pub const COUNT: usize = 55;

    /// Convert to array index
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// All roles in topological order (parents before children)
    pub const ALL: [HumanBone; Self::COUNT] = [
        HumanBone::Hips,
        HumanBone::Spine,
        HumanBone::Chest,
        HumanBone::UpperChest,
        HumanBone::Neck,
        HumanBone::Head,
        HumanBone::LeftEye,
        HumanBone::RightEye,
        HumanBone::Jaw,
        HumanBone::LeftShoulder,
        HumanBone::LeftUpperArm,
        HumanBone::LeftLowerArm,
        HumanBone::LeftHand,
        HumanBone::RightShoulder,
        HumanBone::RightUpperArm,
        HumanBone::RightLowerArm,
        HumanBone::RightHand,
        HumanBone::LeftUpperLeg,
        HumanBone::LeftLowerLeg,
        HumanBone::LeftFoot,
        HumanBone::LeftToes,
        HumanBone::RightUpperLeg,
        HumanBone::RightLowerLeg,
        HumanBone::RightFoot,
        HumanBone::RightToes,
        HumanBone::LeftThumbProximal,
        HumanBone::LeftThumbIntermediate,
        HumanBone::LeftThumbDistal,
        HumanBone::LeftIndexProximal,
        HumanBone::LeftIndexIntermediate,
        HumanBone::LeftIndexDistal,
        HumanBone::LeftMiddleProximal,
        HumanBone::LeftMiddleIntermediate,
        HumanBone::LeftMiddleDistal,
        HumanBone::LeftRingProximal,
        HumanBone::LeftRingIntermediate,
        HumanBone::LeftRingDistal,
        HumanBone::LeftLittleProximal,
        HumanBone::LeftLittleIntermediate,
        HumanBone::LeftLittleDistal,
        HumanBone::RightThumbProximal,
        HumanBone::RightThumbIntermediate,
        HumanBone::RightThumbDistal,
        HumanBone::RightIndexProximal,
        HumanBone::RightIndexIntermediate,
        HumanBone::RightIndexDistal,
        HumanBone::RightMiddleProximal,
        HumanBone::RightMiddleIntermediate,
        HumanBone::RightMiddleDistal,
        HumanBone::RightRingProximal,
        HumanBone::RightRingIntermediate,
        HumanBone::RightRingDistal,
        HumanBone::RightLittleProximal,
        HumanBone::RightLittleIntermediate,
        HumanBone::RightLittleDistal,
    ];

    /// Canonical UpperCamelCase name
    #[inline]
    pub const fn name(self) -> &'static str {
        NAMES[self.index()]
    }

    /// Parse a role name in any case convention
    /// (`LeftUpperArm`, `left_upper_arm`, `leftUpperArm`, `Left Upper Arm`).
    pub fn from_name(name: &str) -> Option<HumanBone> {
        let canonical = name.trim().to_upper_camel_case();
        NAMES
            .iter()
            .position(|n| *n == canonical)
            .map(|i| Self::ALL[i])
    }

    /// Role for a finger segment
    pub const fn finger(side: Side, finger: Finger, phalanx: Phalanx) -> HumanBone {
        let f = match finger {
            Finger::Thumb => 0,
            Finger::Index => 1,
            Finger::Middle => 2,
            Finger::Ring => 3,
            Finger::Little => 4,
        };
        let p = match phalanx {
            Phalanx::Proximal => 0,
            Phalanx::Intermediate => 1,
            Phalanx::Distal => 2,
        };
        Self::ALL[FIRST_FINGER + side.index() * FINGERS_PER_SIDE + f * 3 + p]
    }

    /// Decompose a finger role into its side, finger and phalanx
    pub const fn finger_parts(self) -> Option<(Side, Finger, Phalanx)> {
        let i = self.index();
        if i < FIRST_FINGER {
            return None;
        }
        let rel = i - FIRST_FINGER;
        let side = if rel < FINGERS_PER_SIDE {
            Side::Left
        } else {
            Side::Right
        };
        let within = rel % FINGERS_PER_SIDE;
        let finger = Finger::ALL[within / 3];
        let phalanx = match within % 3 {
            0 => Phalanx::Proximal,
            1 => Phalanx::Intermediate,
            _ => Phalanx::Distal,
        };
        Some((side, finger, phalanx))
    }

    /// Body side, `None` for midline bones
    pub const fn side(self) -> Option<Side> {
        use HumanBone::*;
        match self {
            LeftEye | LeftShoulder | LeftUpperArm | LeftLowerArm | LeftHand | LeftUpperLeg
            | LeftLowerLeg | LeftFoot | LeftToes => Some(Side::Left),
            RightEye | RightShoulder | RightUpperArm | RightLowerArm | RightHand
            | RightUpperLeg | RightLowerLeg | RightFoot | RightToes => Some(Side::Right),
            _ => match self.finger_parts() {
                Some((side, _, _)) => Some(side),
                None => None,
            },
        }
    }

    pub const fn region(self) -> BoneRegion {
        use HumanBone::*;
        match self {
            Hips | Spine | Chest | UpperChest => BoneRegion::Torso,
            Neck => BoneRegion::Neck,
            Head => BoneRegion::Head,
            LeftEye | RightEye | Jaw => BoneRegion::Face,
            LeftShoulder | RightShoulder => BoneRegion::Shoulder,
            LeftUpperArm | RightUpperArm => BoneRegion::UpperArm,
            LeftLowerArm | RightLowerArm => BoneRegion::LowerArm,
            LeftHand | RightHand => BoneRegion::Hand,
            LeftUpperLeg | RightUpperLeg => BoneRegion::UpperLeg,
            LeftLowerLeg | RightLowerLeg => BoneRegion::LowerLeg,
            LeftFoot | RightFoot => BoneRegion::Foot,
            LeftToes | RightToes => BoneRegion::Toes,
            _ => BoneRegion::Finger,
        }
    }

    #[inline]
    pub const fn is_foot(self) -> bool {
        matches!(self.region(), BoneRegion::Foot)
    }

    /// Same-side lateral counterpart for a side and region, if the region is lateral
    pub const fn lateral(side: Side, region: BoneRegion) -> Option<HumanBone> {
        use HumanBone::*;
        let pair = match region {
            BoneRegion::Shoulder => (LeftShoulder, RightShoulder),
            BoneRegion::UpperArm => (LeftUpperArm, RightUpperArm),
            BoneRegion::LowerArm => (LeftLowerArm, RightLowerArm),
            BoneRegion::Hand => (LeftHand, RightHand),
            BoneRegion::UpperLeg => (LeftUpperLeg, RightUpperLeg),
            BoneRegion::LowerLeg => (LeftLowerLeg, RightLowerLeg),
            BoneRegion::Foot => (LeftFoot, RightFoot),
            BoneRegion::Toes => (LeftToes, RightToes),
            _ => return None,
        };
        Some(match side {
            Side::Left => pair.0,
            Side::Right => pair.1,
        })
    }

    /// Roles that continue this bone's chain, most preferred first.
    ///
    /// Used to pick the child a bone points at when it has several role
    /// children, or when an optional segment is missing from the rig.
    pub fn continuation(self) -> &'static [HumanBone] {
        use HumanBone::*;
        match self {
            Hips => &[UpperChest, Chest, Spine],
            Spine => &[Chest, UpperChest, Neck],
            Chest => &[UpperChest, Neck],
            UpperChest => &[Neck],
            Neck => &[Head],
            LeftShoulder => &[LeftUpperArm],
            LeftUpperArm => &[LeftLowerArm],
            LeftLowerArm => &[LeftHand],
            RightShoulder => &[RightUpperArm],
            RightUpperArm => &[RightLowerArm],
            RightLowerArm => &[RightHand],
            LeftUpperLeg => &[LeftLowerLeg],
            LeftLowerLeg => &[LeftFoot],
            LeftFoot => &[LeftToes],
            RightUpperLeg => &[RightLowerLeg],
            RightLowerLeg => &[RightFoot],
            RightFoot => &[RightToes],
            _ => match self.finger_parts() {
                Some((side, finger, Phalanx::Proximal)) => FINGER_CONTINUATION
                    [side.index()][finger_slot(finger)][0]
                    .as_slice(),
                Some((side, finger, Phalanx::Intermediate)) => FINGER_CONTINUATION
                    [side.index()][finger_slot(finger)][1]
                    .as_slice(),
                _ => &[],
            },
        }
    }
}

const fn finger_slot(finger: Finger) -> usize {
    match finger {
        Finger::Thumb => 0,
        Finger::Index => 1,
        Finger::Middle => 2,
        Finger::Ring => 3,
        Finger::Little => 4,
    }
}

/// Continuations for [proximal, intermediate] of each finger, per side.
/// Proximal skips to distal when the intermediate segment is absent.
const fn finger_continuations(side: Side) -> [[[HumanBone; 2]; 2]; 5] {
    let mut out = [[[HumanBone::Hips; 2]; 2]; 5];
    let mut f = 0;
    while f < 5 {
        let finger = Finger::ALL[f];
        let inter = HumanBone::finger(side, finger, Phalanx::Intermediate);
        let distal = HumanBone::finger(side, finger, Phalanx::Distal);
        out[f] = [[inter, distal], [distal, distal]];
        f += 1;
    }
    out
}

static FINGER_CONTINUATION: [[[[HumanBone; 2]; 2]; 5]; 2] = [
    finger_continuations(Side::Left),
    finger_continuations(Side::Right),
];
