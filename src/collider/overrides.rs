//! Per-bone shape overrides and exclusions

use super::ShapeKind;
use crate::bone::HumanBone;
use crate::config::OverrideLists;
use crate::error::Result;
use crate::skeleton::{Hierarchy, HumanoidMap, TransformId};
use std::collections::HashSet;

/// Caller decision about a single bone's collider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    Exclude,
    Force(ShapeKind),
}

/// Force/exclude sets keyed by transform.
///
/// Exclude dominates every force list. A transform forced to several shapes
/// resolves Capsule, then Sphere, then Box.
#[derive(Debug, Clone, Default)]
pub struct OverrideRegistry {
    force_capsule: HashSet<TransformId>,
    force_sphere: HashSet<TransformId>,
    force_box: HashSet<TransformId>,
    exclude: HashSet<TransformId>,
}

impl OverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve configured bone references against a character.
    pub fn resolve(
        lists: &OverrideLists,
        hierarchy: &Hierarchy,
        humanoid: &HumanoidMap,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for bone in &lists.force_capsule {
            registry.force(bone.resolve(hierarchy, humanoid)?, ShapeKind::Capsule);
        }
        for bone in &lists.force_sphere {
            registry.force(bone.resolve(hierarchy, humanoid)?, ShapeKind::Sphere);
        }
        for bone in &lists.force_box {
            registry.force(bone.resolve(hierarchy, humanoid)?, ShapeKind::Box);
        }
        for bone in &lists.exclude {
            registry.exclude(bone.resolve(hierarchy, humanoid)?);
        }

        for id in registry.conflicts() {
            log::warn!(
                "{} is forced to several shapes; using {}",
                hierarchy.name(id),
                registry.forced_shape(id).unwrap_or_default()
            );
        }
        if let Some(hips) = humanoid.get(HumanBone::Hips) {
            for id in registry.outside_subtree(hierarchy, hips) {
                log::warn!(
                    "override on {} has no effect; it is not below Hips",
                    hierarchy.name(id)
                );
            }
        }
        Ok(registry)
    }

    pub fn force(&mut self, bone: TransformId, shape: ShapeKind) {
        match shape {
            ShapeKind::Capsule => self.force_capsule.insert(bone),
            ShapeKind::Sphere => self.force_sphere.insert(bone),
            ShapeKind::Box => self.force_box.insert(bone),
        };
    }

    pub fn exclude(&mut self, bone: TransformId) {
        self.exclude.insert(bone);
    }

    pub fn is_excluded(&self, bone: TransformId) -> bool {
        self.exclude.contains(&bone)
    }

    fn forced_shape(&self, bone: TransformId) -> Option<ShapeKind> {
        if self.force_capsule.contains(&bone) {
            Some(ShapeKind::Capsule)
        } else if self.force_sphere.contains(&bone) {
            Some(ShapeKind::Sphere)
        } else if self.force_box.contains(&bone) {
            Some(ShapeKind::Box)
        } else {
            None
        }
    }

    /// Effective override for a bone, if any
    pub fn lookup(&self, bone: TransformId) -> Option<Override> {
        if self.is_excluded(bone) {
            return Some(Override::Exclude);
        }
        self.forced_shape(bone).map(Override::Force)
    }

    /// Transforms present in more than one force list, sorted
    pub fn conflicts(&self) -> Vec<TransformId> {
        let mut out: Vec<TransformId> = self
            .force_capsule
            .iter()
            .chain(&self.force_sphere)
            .chain(&self.force_box)
            .copied()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|id| {
                [&self.force_capsule, &self.force_sphere, &self.force_box]
                    .iter()
                    .filter(|set| set.contains(id))
                    .count()
                    > 1
            })
            .collect();
        out.sort();
        out
    }

    /// Overridden transforms that never receive a collider because they
    /// lie outside the subtree rooted at `root`, sorted
    pub fn outside_subtree(&self, hierarchy: &Hierarchy, root: TransformId) -> Vec<TransformId> {
        let mut out: Vec<TransformId> = self
            .force_capsule
            .iter()
            .chain(&self.force_sphere)
            .chain(&self.force_box)
            .chain(&self.exclude)
            .copied()
            .filter(|id| !hierarchy.is_descendant_of(*id, root))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        out.sort();
        out
    }

    pub fn is_empty(&self) -> bool {
        self.force_capsule.is_empty()
            && self.force_sphere.is_empty()
            && self.force_box.is_empty()
            && self.exclude.is_empty()
    }
}
