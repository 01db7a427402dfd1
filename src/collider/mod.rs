//! Collider shapes, selection, sizing and materialization.

pub mod build;
pub mod host;
pub mod overrides;
pub mod select;

pub use build::*;
pub use host::*;
pub use overrides::*;
pub use select::*;

use crate::bone::HumanBone;
use crate::math::Axis;
use crate::skeleton::TransformId;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primitive collider kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Box,
    Capsule,
    Sphere,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShapeKind::Box => "Box",
            ShapeKind::Capsule => "Capsule",
            ShapeKind::Sphere => "Sphere",
        })
    }
}

impl FromStr for ShapeKind {
    type Err = crate::error::ColliderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [ShapeKind::Box, ShapeKind::Capsule, ShapeKind::Sphere]
            .into_iter()
            .find(|k| k.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                crate::error::ColliderError::InvalidConfig(format!("unknown shape '{}'", s))
            })
    }
}

/// Sized collider primitive, in the collider's own frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ColliderShape {
    Box {
        size: Vec3,
    },
    Capsule {
        radius: f32,
        height: f32,
        /// Long axis
        direction: Axis,
    },
    Sphere {
        radius: f32,
    },
}

impl ColliderShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ColliderShape::Box { .. } => ShapeKind::Box,
            ColliderShape::Capsule { .. } => ShapeKind::Capsule,
            ColliderShape::Sphere { .. } => ShapeKind::Sphere,
        }
    }

    /// True when every dimension is finite
    pub fn is_finite(&self) -> bool {
        match *self {
            ColliderShape::Box { size } => crate::math::is_finite_vec(size),
            ColliderShape::Capsule { radius, height, .. } => {
                radius.is_finite() && height.is_finite()
            }
            ColliderShape::Sphere { radius } => radius.is_finite(),
        }
    }
}

/// A collider ready to attach under its bone
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColliderSpec {
    /// Bone transform the collider is parented to
    pub bone: TransformId,
    pub role: HumanBone,
    pub shape: ColliderShape,
    /// Rotation relative to the bone; collider X runs along the bone
    pub local_rotation: Quat,
    /// Center in the collider's frame, which sits at the bone's origin
    pub center: Vec3,
}

impl ColliderSpec {
    /// World-space center given the bone's world position and rotation
    pub fn world_center(&self, bone_position: Vec3, bone_rotation: Quat) -> Vec3 {
        bone_position + bone_rotation * self.local_rotation * self.center
    }

    /// World-space rotation given the bone's world rotation
    pub fn world_rotation(&self, bone_rotation: Quat) -> Quat {
        bone_rotation * self.local_rotation
    }
}
