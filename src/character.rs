//! A rigged, skinned character: the input of a generation pass

use crate::mesh::{SkinSource, SkinnedMesh};
use crate::skeleton::{Hierarchy, HumanoidMap};

#[derive(Debug, Clone, Default)]
pub struct Character {
    pub name: String,
    pub hierarchy: Hierarchy,
    pub humanoid: HumanoidMap,
    pub meshes: Vec<SkinnedMesh>,
}

impl Character {
    pub fn new(name: impl Into<String>, hierarchy: Hierarchy, humanoid: HumanoidMap) -> Self {
        Self {
            name: name.into(),
            hierarchy,
            humanoid,
            meshes: Vec::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: SkinnedMesh) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn mesh(&self, name: &str) -> Option<&SkinnedMesh> {
        self.meshes.iter().find(|m| m.name == name)
    }

    /// Meshes accepted by `include`, as sampler sources
    pub fn skin_sources(&self, include: impl Fn(&str) -> bool) -> Vec<&dyn SkinSource> {
        self.meshes
            .iter()
            .filter(|m| include(&m.name))
            .map(|m| m as &dyn SkinSource)
            .collect()
    }
}
