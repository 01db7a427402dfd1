//! Where generated colliders live.
//!
//! A [`ColliderHost`] is the scene the colliders are attached into. The
//! in-memory [`ColliderSet`] is used by the CLI and tests; an engine
//! integration implements the trait over its own scene objects.

use super::ColliderSpec;
use crate::skeleton::TransformId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Opaque id of an attached collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ColliderHandle(pub u64);

pub trait ColliderHost {
    /// Attach a collider under its bone
    fn attach(&mut self, spec: &ColliderSpec) -> ColliderHandle;

    /// Destroy a previously attached collider. Returns false if unknown.
    fn destroy(&mut self, handle: ColliderHandle) -> bool;
}

/// In-memory host keeping colliders in attach order
#[derive(Debug, Clone, Default)]
pub struct ColliderSet {
    colliders: BTreeMap<ColliderHandle, ColliderSpec>,
    next: u64,
}

impl ColliderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: ColliderHandle) -> Option<&ColliderSpec> {
        self.colliders.get(&handle)
    }

    /// Colliders attached under a bone
    pub fn on_bone(&self, bone: TransformId) -> impl Iterator<Item = &ColliderSpec> {
        self.colliders.values().filter(move |c| c.bone == bone)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColliderHandle, &ColliderSpec)> {
        self.colliders.iter().map(|(h, c)| (*h, c))
    }

    pub fn specs(&self) -> Vec<ColliderSpec> {
        self.colliders.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl ColliderHost for ColliderSet {
    fn attach(&mut self, spec: &ColliderSpec) -> ColliderHandle {
        let handle = ColliderHandle(self.next);
        self.next += 1;
        self.colliders.insert(handle, *spec);
        handle
    }

    fn destroy(&mut self, handle: ColliderHandle) -> bool {
        self.colliders.remove(&handle).is_some()
    }
}

/// Handles created by the last pass, destroyed wholesale on the next
#[derive(Debug, Clone, Default)]
pub struct GeneratedColliders {
    handles: Vec<ColliderHandle>,
}

impl GeneratedColliders {
    pub fn record(&mut self, handle: ColliderHandle) {
        self.handles.push(handle);
    }

    /// Destroy every recorded collider in `host` and forget them.
    /// Returns how many the host still knew about.
    pub fn destroy_all<H: ColliderHost + ?Sized>(&mut self, host: &mut H) -> usize {
        self.handles
            .drain(..)
            .filter(|h| host.destroy(*h))
            .count()
    }

    pub fn handles(&self) -> &[ColliderHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bone::HumanBone;
    use crate::collider::ColliderShape;
    use glam::{Quat, Vec3};

    fn spec(bone: usize) -> ColliderSpec {
        ColliderSpec {
            bone: TransformId::new(bone),
            role: HumanBone::Spine,
            shape: ColliderShape::Sphere { radius: 0.1 },
            local_rotation: Quat::IDENTITY,
            center: Vec3::ZERO,
        }
    }

    #[test]
    fn test_attach_and_destroy() {
        let mut set = ColliderSet::new();
        let a = set.attach(&spec(1));
        let b = set.attach(&spec(2));
        assert_ne!(a, b);
        assert_eq!(set.len(), 2);
        assert!(set.destroy(a));
        assert!(!set.destroy(a), "double destroy should report unknown");
        assert_eq!(set.on_bone(TransformId::new(2)).count(), 1);
    }

    #[test]
    fn test_registry_leaves_foreign_colliders() {
        let mut set = ColliderSet::new();
        let manual = set.attach(&spec(0));
        let mut generated = GeneratedColliders::default();
        generated.record(set.attach(&spec(1)));
        generated.record(set.attach(&spec(2)));

        assert_eq!(generated.destroy_all(&mut set), 2);
        assert!(generated.is_empty());
        assert_eq!(set.len(), 1);
        assert!(set.get(manual).is_some());
    }

    #[test]
    fn test_registry_tolerates_externally_removed() {
        let mut set = ColliderSet::new();
        let mut generated = GeneratedColliders::default();
        let h = set.attach(&spec(1));
        generated.record(h);
        set.destroy(h);
        assert_eq!(generated.destroy_all(&mut set), 0);
    }
}
