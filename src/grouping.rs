//! Key-bone selection per generation level and vertex ownership.
//!
//! A key bone owns its own collider. Every other transform either donates its
//! vertices to the nearest key ancestor (inherit) or drops them (suppressed).

use crate::bone::{BoneKind, BoneMask, BoneTree, HumanBone};
use crate::error::ColliderError;
use crate::skeleton::{Hierarchy, TransformId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse detail knob controlling collider count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GenerationLevel {
    None,
    Minimal,
    #[default]
    Medium,
    Full,
}

impl GenerationLevel {
    pub const ALL: [GenerationLevel; 4] = [
        GenerationLevel::None,
        GenerationLevel::Minimal,
        GenerationLevel::Medium,
        GenerationLevel::Full,
    ];
}

impl fmt::Display for GenerationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationLevel::None => "None",
            GenerationLevel::Minimal => "Minimal",
            GenerationLevel::Medium => "Medium",
            GenerationLevel::Full => "Full",
        };
        f.write_str(name)
    }
}

impl FromStr for GenerationLevel {
    type Err = ColliderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GenerationLevel::ALL
            .into_iter()
            .find(|level| level.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ColliderError::InvalidConfig(format!("unknown level '{}'", s)))
    }
}

use HumanBone::*;

const TORSO: BoneMask = BoneMask::from_bones(&[Hips, Spine, Chest, UpperChest]);

const FOREARM_AND_HAND: BoneMask = BoneMask::from_bones(&[
    LeftLowerArm,
    LeftHand,
    LeftIndexDistal,
    LeftThumbDistal,
    RightLowerArm,
    RightHand,
    RightIndexDistal,
    RightThumbDistal,
]);

const HEAD: BoneMask = BoneMask::from_bones(&[Head]);

const NECK: BoneMask = BoneMask::from_bones(&[Neck]);

const UPPER_ARMS: BoneMask = BoneMask::from_bones(&[LeftUpperArm, RightUpperArm]);

const LEGS: BoneMask =
    BoneMask::from_bones(&[LeftUpperLeg, LeftLowerLeg, RightUpperLeg, RightLowerLeg]);

const FEET: BoneMask = BoneMask::from_bones(&[LeftFoot, LeftToes, RightFoot, RightToes]);

const SHOULDERS: BoneMask = BoneMask::from_bones(&[LeftShoulder, RightShoulder]);

const FACE: BoneMask = BoneMask::from_bones(&[LeftEye, RightEye, Jaw]);

/// Every finger segment except the index and thumb tips
const OTHER_FINGERS: BoneMask = BoneMask::from_bones(&[
    LeftThumbProximal,
    LeftThumbIntermediate,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,
    RightThumbProximal,
    RightThumbIntermediate,
    RightIndexProximal,
    RightIndexIntermediate,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,
]);

/// Membership of a role in a level's key-bone mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Owns a collider; descendants donate to it
    Active,
    /// Vertices at and below are dropped until the next active bone
    Suppressed,
}

/// Role → active/suppressed for one level. Unlisted roles inherit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBoneMapping {
    pub active: BoneMask,
    pub suppressed: BoneMask,
}

impl KeyBoneMapping {
    pub const fn for_level(level: GenerationLevel) -> Self {
        match level {
            GenerationLevel::None => Self {
                active: BoneMask::EMPTY,
                suppressed: BoneMask::EMPTY,
            },
            GenerationLevel::Minimal => Self {
                active: TORSO.union(FOREARM_AND_HAND),
                suppressed: HEAD
                    .union(UPPER_ARMS)
                    .union(OTHER_FINGERS)
                    .union(LEGS)
                    .union(FEET),
            },
            GenerationLevel::Medium => Self {
                active: TORSO
                    .union(FOREARM_AND_HAND)
                    .union(NECK)
                    .union(HEAD)
                    .union(UPPER_ARMS)
                    .union(LEGS),
                suppressed: OTHER_FINGERS.union(FEET),
            },
            GenerationLevel::Full => Self {
                active: TORSO
                    .union(FOREARM_AND_HAND)
                    .union(NECK)
                    .union(HEAD)
                    .union(UPPER_ARMS)
                    .union(LEGS)
                    .union(OTHER_FINGERS)
                    .union(FEET)
                    .union(SHOULDERS)
                    .union(FACE),
                suppressed: BoneMask::EMPTY,
            },
        }
    }

    pub const fn state(&self, role: HumanBone) -> Option<KeyState> {
        if self.active.contains(role) {
            Some(KeyState::Active)
        } else if self.suppressed.contains(role) {
            Some(KeyState::Suppressed)
        } else {
            None
        }
    }

    #[inline]
    pub const fn key_bones(&self) -> BoneMask {
        self.active
    }
}

/// Owning key bone for every transform of the hierarchy
#[derive(Debug, Clone, Default)]
pub struct BoneOwnership {
    owners: Vec<Option<TransformId>>,
}

impl BoneOwnership {
    /// Key bone whose bucket receives vertices skinned to `transform`
    #[inline]
    pub fn owner_of(&self, transform: TransformId) -> Option<TransformId> {
        self.owners.get(transform.index()).copied().flatten()
    }

    /// Number of transforms covered (always the hierarchy size)
    #[inline]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Output of the grouping policy for one pass
#[derive(Debug, Clone)]
pub struct Grouping {
    pub level: GenerationLevel,
    pub mapping: KeyBoneMapping,
    pub ownership: BoneOwnership,
    /// Key bones present in the rig, in tree pre-order
    pub key_nodes: Vec<(usize, HumanBone)>,
}

impl Grouping {
    /// Pre-order walk from Hips carrying the current owner.
    ///
    /// Active bones become the owner, suppressed bones clear it, everything
    /// else inherits. Transforms outside the Hips subtree own nothing.
    pub fn assign(level: GenerationLevel, tree: &BoneTree, hierarchy: &Hierarchy) -> Self {
        let mapping = KeyBoneMapping::for_level(level);
        let mut owners = vec![None; hierarchy.len()];
        let mut key_nodes = Vec::new();

        let root = tree.node(tree.root()).transform;
        let mut stack = vec![(root, None)];
        while let Some((transform, inherited)) = stack.pop() {
            let state = tree
                .node_of(transform)
                .and_then(|i| match tree.node(i).kind {
                    BoneKind::Role(role) => Some((i, role)),
                    BoneKind::Auxiliary => None,
                })
                .and_then(|(i, role)| mapping.state(role).map(|s| (i, role, s)));

            let owner = match state {
                Some((i, role, KeyState::Active)) => {
                    key_nodes.push((i, role));
                    Some(transform)
                }
                Some((_, _, KeyState::Suppressed)) => None,
                None => inherited,
            };
            owners[transform.index()] = owner;

            // Reverse so children pop in hierarchy order
            for &child in hierarchy.children(transform).iter().rev() {
                stack.push((child, owner));
            }
        }

        key_nodes.sort_by_key(|(i, _)| *i);
        log::debug!("{} level: {} key bones", level, key_nodes.len());

        Self {
            level,
            mapping,
            ownership: BoneOwnership { owners },
            key_nodes,
        }
    }
}
