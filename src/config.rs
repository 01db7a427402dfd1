//! Generation settings
//!
//! All fields are optional in JSON; missing ones take their defaults.
//!
//! ```json
//! {
//!   "level": "Full",
//!   "size_multiplier": 1.1,
//!   "overrides": { "force_sphere": ["Head"], "exclude": ["HairRoot"] }
//! }
//! ```

use crate::bone::HumanBone;
use crate::collider::{DefaultBody, ShapeKind};
use crate::error::{ColliderError, Result};
use crate::grouping::GenerationLevel;
use crate::skeleton::{Hierarchy, HumanoidMap, TransformId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A bone named either by humanoid role (any case convention) or by
/// transform name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoneRef(pub String);

impl BoneRef {
    /// Role first, so `"Hips"` means the humanoid hips even if a transform
    /// with another role is literally named "Hips".
    pub fn resolve(&self, hierarchy: &Hierarchy, humanoid: &HumanoidMap) -> Result<TransformId> {
        HumanBone::from_name(&self.0)
            .and_then(|role| humanoid.get(role))
            .or_else(|| hierarchy.find(&self.0))
            .ok_or_else(|| ColliderError::UnknownBone(self.0.clone()))
    }
}

impl From<&str> for BoneRef {
    fn from(s: &str) -> Self {
        BoneRef(s.to_string())
    }
}

/// Per-bone override lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideLists {
    pub force_capsule: Vec<BoneRef>,
    pub force_sphere: Vec<BoneRef>,
    pub force_box: Vec<BoneRef>,
    pub exclude: Vec<BoneRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    pub level: GenerationLevel,
    /// Uniform scale applied to every collider dimension
    pub size_multiplier: f32,
    pub default_body: DefaultBody,
    /// Shape for bones the per-role table does not cover
    pub default_shape: ShapeKind,
    pub overrides: OverrideLists,
    /// Mesh names to sample. `None` samples every mesh.
    pub include_meshes: Option<Vec<String>>,
    /// Collider mass hint for downstream physics setup
    pub weight: f32,
    /// Joint range hint for downstream ragdoll setup (degrees)
    pub joint_range: f32,
}

fn default_version() -> u32 {
    1
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            level: GenerationLevel::default(),
            size_multiplier: 1.0,
            default_body: DefaultBody::default(),
            default_shape: ShapeKind::Box,
            overrides: OverrideLists::default(),
            include_meshes: None,
            weight: 1.0,
            joint_range: 45.0,
        }
    }
}

impl GenerationConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.size_multiplier.is_finite() || self.size_multiplier <= 0.0 {
            return Err(ColliderError::InvalidConfig(format!(
                "size_multiplier must be positive, got {}",
                self.size_multiplier
            )));
        }
        Ok(())
    }

    /// Whether a mesh takes part in sampling
    pub fn includes_mesh(&self, name: &str) -> bool {
        match &self.include_meshes {
            Some(names) => names.iter().any(|n| n == name),
            None => true,
        }
    }
}
