//! Humanoid Colliders - automatic physics colliders for skinned characters
//!
//! Derives one Box, Capsule or Sphere collider per key bone of a humanoid rig
//! from the bind-pose skin of its meshes.

pub mod align;
pub mod bone;
pub mod bounds;
pub mod character;
pub mod collider;
pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod grouping;
pub mod mannequin;
pub mod math;
pub mod mesh;
pub mod sampler;
pub mod skeleton;
pub mod skeleton_constants;

pub use bone::{BoneTree, HumanBone};
pub use character::Character;
pub use collider::{ColliderHost, ColliderSet, ColliderShape, ColliderSpec, ShapeKind};
pub use config::{BoneRef, GenerationConfig};
pub use document::CharacterDocument;
pub use error::{ColliderError, Result};
pub use generator::{ColliderGenerator, GenerationReport};
pub use glam::{Quat, Vec3};
pub use grouping::GenerationLevel;
pub use mannequin::mannequin;
pub use skeleton::{Hierarchy, HumanoidMap, TransformId};
