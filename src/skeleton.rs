//! Transform hierarchy and humanoid role map
//!
//! The hierarchy is an arena of transforms addressed by [`TransformId`].
//! Positions and rotations are world space, captured in bind pose.
//! [`HumanoidMap`] resolves canonical roles to transforms in that arena.

use crate::bone::HumanBone;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable index of a transform within its [`Hierarchy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformId(u32);

impl TransformId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Convert to array index
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the scene hierarchy in bind pose
#[derive(Debug, Clone)]
pub struct Transform {
    pub name: String,
    pub parent: Option<TransformId>,
    /// World position
    pub position: Vec3,
    /// World rotation
    pub rotation: Quat,
}

/// Arena of transforms with parent links and derived child lists.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    transforms: Vec<Transform>,
    children: Vec<Vec<TransformId>>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform. `parent` must come from this hierarchy.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        parent: Option<TransformId>,
        position: Vec3,
        rotation: Quat,
    ) -> TransformId {
        let id = TransformId::new(self.transforms.len());
        let parent = parent.filter(|p| {
            let known = self.contains(*p);
            if !known {
                log::warn!("parent {:?} is not in this hierarchy; treated as root", p);
            }
            known
        });
        self.transforms.push(Transform {
            name: name.into(),
            parent,
            position,
            rotation,
        });
        self.children.push(Vec::new());
        if let Some(parent) = parent {
            self.children[parent.index()].push(id);
        }
        id
    }

    #[inline]
    pub fn get(&self, id: TransformId) -> Option<&Transform> {
        self.transforms.get(id.index())
    }

    #[inline]
    pub fn contains(&self, id: TransformId) -> bool {
        id.index() < self.transforms.len()
    }

    /// Direct children in insertion order
    pub fn children(&self, id: TransformId) -> &[TransformId] {
        self.children
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First transform with the given name
    pub fn find(&self, name: &str) -> Option<TransformId> {
        self.transforms
            .iter()
            .position(|t| t.name == name)
            .map(TransformId::new)
    }

    pub fn position(&self, id: TransformId) -> Option<Vec3> {
        self.get(id).map(|t| t.position)
    }

    pub fn name(&self, id: TransformId) -> &str {
        self.get(id).map(|t| t.name.as_str()).unwrap_or("<missing>")
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransformId, &Transform)> {
        self.transforms
            .iter()
            .enumerate()
            .map(|(i, t)| (TransformId::new(i), t))
    }

    /// True when `id` is `ancestor` or lies below it
    pub fn is_descendant_of(&self, id: TransformId, ancestor: TransformId) -> bool {
        let mut current = Some(id);
        // Parent links always point at earlier entries, so this terminates.
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.get(c).and_then(|t| t.parent);
        }
        false
    }
}

/// Role → transform resolver for a humanoid rig
#[derive(Debug, Clone)]
pub struct HumanoidMap {
    bones: [Option<TransformId>; HumanBone::COUNT],
}

impl Default for HumanoidMap {
    fn default() -> Self {
        Self {
            bones: [None; HumanBone::COUNT],
        }
    }
}

impl HumanoidMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, role: HumanBone, transform: TransformId) {
        self.bones[role.index()] = Some(transform);
    }

    pub fn with(mut self, role: HumanBone, transform: TransformId) -> Self {
        self.set(role, transform);
        self
    }

    pub fn remove(&mut self, role: HumanBone) {
        self.bones[role.index()] = None;
    }

    #[inline]
    pub fn get(&self, role: HumanBone) -> Option<TransformId> {
        self.bones[role.index()]
    }

    /// Resolved roles in topological order
    pub fn iter(&self) -> impl Iterator<Item = (HumanBone, TransformId)> + '_ {
        HumanBone::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|t| (role, t)))
    }

    /// Reverse lookup table, transform → role.
    /// A transform claimed by two roles keeps the first in topological order.
    pub fn roles_by_transform(&self) -> HashMap<TransformId, HumanBone> {
        let mut map = HashMap::new();
        for (role, transform) in self.iter() {
            if map.contains_key(&transform) {
                log::warn!("{:?} shares a transform with another role; ignored", role);
                continue;
            }
            map.insert(transform, role);
        }
        map
    }
}
