//! JSON character documents
//!
//! Transforms are listed parents first and reference their parent by name.
//! Positions and rotations are world space in bind pose; rotations are
//! `[x, y, z, w]` quaternions and default to identity.

use crate::bone::HumanBone;
use crate::character::Character;
use crate::error::{ColliderError, Result};
use crate::mesh::{SkinnedMesh, SkinnedVertex};
use crate::skeleton::{Hierarchy, HumanoidMap, TransformId};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransformJson {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub position: Vec3,
    #[serde(default = "identity")]
    pub rotation: Quat,
}

fn identity() -> Quat {
    Quat::IDENTITY
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VertexJson {
    pub position: Vec3,
    #[serde(default)]
    pub bones: [u32; 4],
    #[serde(default = "rigid_weights")]
    pub weights: [f32; 4],
}

fn rigid_weights() -> [f32; 4] {
    [1.0, 0.0, 0.0, 0.0]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MeshJson {
    pub name: String,
    /// Transform names; vertex bone indices point into this list
    pub bones: Vec<String>,
    #[serde(default)]
    pub vertices: Vec<VertexJson>,
}

/// On-disk character format
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CharacterDocument {
    #[serde(rename = "$schema", default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub name: String,
    pub transforms: Vec<TransformJson>,
    /// Role name → transform name
    #[serde(default)]
    pub humanoid: BTreeMap<String, String>,
    #[serde(default)]
    pub meshes: Vec<MeshJson>,
}

fn default_version() -> u32 {
    1
}

impl CharacterDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve names into a [`Character`].
    pub fn into_character(self) -> Result<Character> {
        let mut hierarchy = Hierarchy::new();
        let mut by_name: HashMap<String, TransformId> = HashMap::new();

        for t in self.transforms {
            let parent = match &t.parent {
                Some(name) => Some(
                    by_name
                        .get(name)
                        .copied()
                        .ok_or_else(|| ColliderError::UnknownBone(name.clone()))?,
                ),
                None => None,
            };
            if by_name.contains_key(&t.name) {
                return Err(ColliderError::InvalidConfig(format!(
                    "duplicate transform name '{}'",
                    t.name
                )));
            }
            let id = hierarchy.add(t.name.clone(), parent, t.position, t.rotation);
            by_name.insert(t.name, id);
        }

        let lookup = |name: &str| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| ColliderError::UnknownBone(name.to_string()))
        };

        let mut humanoid = HumanoidMap::new();
        for (role_name, transform) in &self.humanoid {
            let role = HumanBone::from_name(role_name).ok_or_else(|| {
                ColliderError::InvalidConfig(format!("unknown humanoid role '{}'", role_name))
            })?;
            humanoid.set(role, lookup(transform.as_str())?);
        }

        let mut character = Character::new(self.name, hierarchy, humanoid);
        for mesh in self.meshes {
            let bones = mesh
                .bones
                .iter()
                .map(|name| lookup(name.as_str()))
                .collect::<Result<Vec<_>>>()?;
            let vertices = mesh
                .vertices
                .iter()
                .map(|v| SkinnedVertex {
                    position: v.position.to_array(),
                    bone_indices: v.bones,
                    bone_weights: v.weights,
                })
                .collect();
            character.meshes.push(SkinnedMesh::new(mesh.name, bones, vertices));
        }

        log::debug!(
            "Loaded {}: {} transforms, {} meshes",
            character.name,
            character.hierarchy.len(),
            character.meshes.len()
        );
        Ok(character)
    }

    /// Export a character. Mesh transforms are baked into vertex positions.
    pub fn from_character(character: &Character) -> Self {
        let h = &character.hierarchy;
        let transforms = h
            .iter()
            .map(|(_, t)| TransformJson {
                name: t.name.clone(),
                parent: t.parent.map(|p| h.name(p).to_string()),
                position: t.position,
                rotation: t.rotation,
            })
            .collect();

        let humanoid = character
            .humanoid
            .iter()
            .map(|(role, t)| (role.name().to_string(), h.name(t).to_string()))
            .collect();

        let meshes = character
            .meshes
            .iter()
            .map(|m| MeshJson {
                name: m.name.clone(),
                bones: m.bones.iter().map(|b| h.name(*b).to_string()).collect(),
                vertices: m
                    .vertices
                    .iter()
                    .map(|v| VertexJson {
                        position: m.to_world.transform_point3(Vec3::from_array(v.position)),
                        bones: v.bone_indices,
                        weights: v.bone_weights,
                    })
                    .collect(),
            })
            .collect();

        Self {
            schema: None,
            version: default_version(),
            name: character.name.clone(),
            transforms,
            humanoid,
            meshes,
        }
    }
}
