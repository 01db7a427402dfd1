//! Shape resolution for a key bone

use super::overrides::{Override, OverrideRegistry};
use super::ShapeKind;
use crate::bone::{BoneRegion, HumanBone};
use crate::skeleton::TransformId;
use serde::{Deserialize, Serialize};

/// How bones without an override pick their shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultBody {
    /// Per-role table, falling back to the default shape
    #[default]
    Humanoid,
    /// Every bone uses the default shape
    Uniform,
}

/// Per-role default shape for humanoid bodies
pub fn role_default_shape(role: HumanBone) -> Option<ShapeKind> {
    match role.region() {
        BoneRegion::Torso | BoneRegion::Hand | BoneRegion::Foot | BoneRegion::Toes => {
            Some(ShapeKind::Box)
        }
        BoneRegion::Neck
        | BoneRegion::Head
        | BoneRegion::Shoulder
        | BoneRegion::UpperArm
        | BoneRegion::LowerArm
        | BoneRegion::Finger
        | BoneRegion::UpperLeg
        | BoneRegion::LowerLeg => Some(ShapeKind::Capsule),
        BoneRegion::Face => None,
    }
}

/// Shape for a key bone, or `None` when it is excluded.
pub fn select_shape(
    role: HumanBone,
    transform: TransformId,
    overrides: &OverrideRegistry,
    body: DefaultBody,
    default_shape: ShapeKind,
) -> Option<ShapeKind> {
    match overrides.lookup(transform) {
        Some(Override::Exclude) => None,
        Some(Override::Force(shape)) => Some(shape),
        None => Some(match body {
            DefaultBody::Humanoid => role_default_shape(role).unwrap_or(default_shape),
            DefaultBody::Uniform => default_shape,
        }),
    }
}
