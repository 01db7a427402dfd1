//! Bone tree built from a transform hierarchy and a humanoid role map.
//!
//! Nodes live in an arena and are addressed by index. Role bones and the
//! auxiliary transforms between them share one tagged node type; auxiliary
//! nodes are attached to their nearest role-bone ancestor.
//!
//! ## Child direction
//!
//! Each role bone gets a world-space "child direction": the vector from the
//! bone to the point its collider should extend toward. It is derived in a
//! second pass, once every node exists, and drives both the alignment frame
//! and the bounds filter.

use super::id::{BoneRegion, Finger, HumanBone, Phalanx, Side};
use crate::bounds::AlignedBounds;
use crate::error::{ColliderError, Result};
use crate::math::EPSILON;
use crate::skeleton::{Hierarchy, HumanoidMap, TransformId};
use glam::Vec3;
use std::collections::HashMap;

/// Foot direction when the rig has no toe bone (meters, character forward)
pub const FOOT_FORWARD_FALLBACK: Vec3 = Vec3::new(0.0, 0.0, 0.1);

/// Fingers averaged for the hand direction. The thumb diverges too far
/// from the hand's long axis to be included.
const HAND_DIRECTION_FINGERS: [Finger; 4] =
    [Finger::Index, Finger::Middle, Finger::Ring, Finger::Little];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneKind {
    Role(HumanBone),
    Auxiliary,
}

#[derive(Debug, Clone)]
pub struct BoneNode {
    pub kind: BoneKind,
    pub transform: TransformId,
    /// World position of the transform in bind pose
    pub position: Vec3,
    /// Nearest role-bone ancestor. Back-reference only.
    pub parent: Option<usize>,
    /// Role-bone children, in hierarchy order
    pub children: Vec<usize>,
    /// Non-role transforms whose nearest role ancestor is this bone
    pub auxiliary: Vec<usize>,
    /// World-space vector toward the bone's continuation (role bones only)
    pub child_direction: Vec3,
    /// Aligned-space bounds, set once bounds are accumulated for a key bone
    pub bounds: Option<AlignedBounds>,
    /// World-space collider center, set alongside `bounds`
    pub center: Option<Vec3>,
}

impl BoneNode {
    #[inline]
    pub fn role(&self) -> Option<HumanBone> {
        match self.kind {
            BoneKind::Role(role) => Some(role),
            BoneKind::Auxiliary => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoneTree {
    nodes: Vec<BoneNode>,
    by_role: [Option<usize>; HumanBone::COUNT],
    by_transform: HashMap<TransformId, usize>,
}

impl BoneTree {
    /// Build the tree rooted at the rig's Hips.
    ///
    /// Fails when Hips is unresolved or not part of `hierarchy`.
    pub fn build(hierarchy: &Hierarchy, humanoid: &HumanoidMap) -> Result<Self> {
        let hips = humanoid
            .get(HumanBone::Hips)
            .filter(|t| hierarchy.contains(*t))
            .ok_or_else(|| {
                ColliderError::Precondition("Hips bone is not resolvable".to_string())
            })?;

        let roles = humanoid.roles_by_transform();
        let mut tree = BoneTree {
            nodes: Vec::with_capacity(hierarchy.len()),
            by_role: [None; HumanBone::COUNT],
            by_transform: HashMap::new(),
        };
        tree.walk(hierarchy, &roles, hips);

        for (role, transform) in humanoid.iter() {
            if tree.by_role[role.index()].is_none() {
                log::warn!(
                    "{:?} ({}) is outside the Hips subtree; ignored",
                    role,
                    hierarchy.name(transform)
                );
            }
        }

        tree.compute_child_directions();
        Ok(tree)
    }

    /// Pre-order walk from `root`, attaching auxiliary transforms to the
    /// nearest role ancestor.
    fn walk(
        &mut self,
        hierarchy: &Hierarchy,
        roles: &HashMap<TransformId, HumanBone>,
        root: TransformId,
    ) {
        let mut stack: Vec<(TransformId, Option<usize>)> = vec![(root, None)];
        while let Some((transform, role_parent)) = stack.pop() {
            // Hips is always the root node, even if the map tags it oddly.
            let kind = match (role_parent, roles.get(&transform)) {
                (None, _) => BoneKind::Role(HumanBone::Hips),
                (Some(_), Some(role)) => BoneKind::Role(*role),
                (Some(_), None) => BoneKind::Auxiliary,
            };

            let index = self.nodes.len();
            self.nodes.push(BoneNode {
                kind,
                transform,
                position: hierarchy.position(transform).unwrap_or(Vec3::ZERO),
                parent: role_parent,
                children: Vec::new(),
                auxiliary: Vec::new(),
                child_direction: Vec3::ZERO,
                bounds: None,
                center: None,
            });
            self.by_transform.insert(transform, index);

            let next_parent = match kind {
                BoneKind::Role(role) => {
                    self.by_role[role.index()] = Some(index);
                    if let Some(parent) = role_parent {
                        self.nodes[parent].children.push(index);
                    }
                    Some(index)
                }
                BoneKind::Auxiliary => {
                    if let Some(parent) = role_parent {
                        self.nodes[parent].auxiliary.push(index);
                    }
                    role_parent
                }
            };

            // Reverse so children pop in hierarchy order
            for &child in hierarchy.children(transform).iter().rev() {
                stack.push((child, next_parent));
            }
        }
    }

    fn compute_child_directions(&mut self) {
        // Nodes are in pre-order, so parents are resolved before children.
        for index in 0..self.nodes.len() {
            let role = match self.nodes[index].role() {
                Some(role) => role,
                None => continue,
            };
            let direction = self.derive_direction(index, role);
            let direction = if direction.length_squared() > EPSILON * EPSILON {
                direction
            } else {
                self.parent_direction(index)
            };
            self.nodes[index].child_direction = direction;
        }
    }

    fn derive_direction(&self, index: usize, role: HumanBone) -> Vec3 {
        let node = &self.nodes[index];
        match role.region() {
            BoneRegion::Head => Vec3::Y,
            BoneRegion::Hand => {
                let side = role.side().unwrap_or(Side::Left);
                let tips: Vec<Vec3> = HAND_DIRECTION_FINGERS
                    .iter()
                    .filter_map(|f| self.role(HumanBone::finger(side, *f, Phalanx::Proximal)))
                    .map(|n| n.position)
                    .collect();
                if tips.is_empty() {
                    self.default_direction(index, role)
                } else {
                    let avg = tips.iter().copied().sum::<Vec3>() / tips.len() as f32;
                    avg - node.position
                }
            }
            BoneRegion::Foot => {
                let toward = match self.continuation_of(role) {
                    Some(toes) => toes.position - node.position,
                    None => FOOT_FORWARD_FALLBACK,
                };
                // Feet stay ground-parallel
                let flat = Vec3::new(toward.x, 0.0, toward.z);
                if flat.length_squared() > EPSILON * EPSILON {
                    flat
                } else {
                    FOOT_FORWARD_FALLBACK
                }
            }
            _ => self.default_direction(index, role),
        }
    }

    /// Toward the preferred continuation, else the only role child,
    /// else inherited from the parent.
    fn default_direction(&self, index: usize, role: HumanBone) -> Vec3 {
        let node = &self.nodes[index];
        if let Some(next) = self.continuation_of(role) {
            return next.position - node.position;
        }
        if let [only] = node.children.as_slice() {
            return self.nodes[*only].position - node.position;
        }
        self.parent_direction(index)
    }

    fn continuation_of(&self, role: HumanBone) -> Option<&BoneNode> {
        role.continuation().iter().find_map(|r| self.role(*r))
    }

    fn parent_direction(&self, index: usize) -> Vec3 {
        match self.nodes[index].parent {
            Some(parent) => self.nodes[parent].child_direction,
            None => Vec3::Y,
        }
    }

    /// Index of the root (Hips) node
    #[inline]
    pub const fn root(&self) -> usize {
        0
    }

    #[inline]
    pub fn node(&self, index: usize) -> &BoneNode {
        &self.nodes[index]
    }

    #[inline]
    pub fn node_mut(&mut self, index: usize) -> &mut BoneNode {
        &mut self.nodes[index]
    }

    pub fn nodes(&self) -> &[BoneNode] {
        &self.nodes
    }

    #[inline]
    pub fn role_index(&self, role: HumanBone) -> Option<usize> {
        self.by_role[role.index()]
    }

    pub fn role(&self, role: HumanBone) -> Option<&BoneNode> {
        self.role_index(role).map(|i| &self.nodes[i])
    }

    pub fn node_of(&self, transform: TransformId) -> Option<usize> {
        self.by_transform.get(&transform).copied()
    }

    /// Role nodes in pre-order
    pub fn role_nodes(&self) -> impl Iterator<Item = (usize, HumanBone)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.role().map(|r| (i, r)))
    }

    /// Distance between the two upper-leg joints, if both exist
    pub fn hip_width(&self) -> Option<f32> {
        let left = self.role(HumanBone::LeftUpperLeg)?;
        let right = self.role(HumanBone::RightUpperLeg)?;
        Some(left.position.distance(right.position))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
