//! One collider generation pass over a character.
//!
//! Everything that can fail fatally (missing Hips, bad override names, no
//! selected mesh, cancellation) happens before the host is touched, so an
//! aborted pass leaves the previous colliders in place.

use crate::align::alignment_rotation;
use crate::bone::{BoneRegion, BoneTree, HumanBone, Side};
use crate::bounds::{accumulate, BoneBounds};
use crate::character::Character;
use crate::collider::{
    build_collider, select_shape, ColliderHandle, ColliderHost, ColliderShape, ColliderSpec,
    GeneratedColliders, OverrideRegistry, ShapeKind, SizingContext,
};
use crate::config::GenerationConfig;
use crate::error::{ColliderError, Result};
use crate::grouping::{GenerationLevel, Grouping};
use crate::sampler::{CancelToken, VertexWeightSampler};
use glam::{Quat, Vec3};
use serde::Serialize;

/// One attached collider, as reported to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColliderReport {
    pub handle: ColliderHandle,
    pub bone: String,
    pub role: HumanBone,
    pub shape: ColliderShape,
    pub center: Vec3,
    pub local_rotation: Quat,
    pub world_center: Vec3,
    pub world_rotation: Quat,
    /// Vertices that shaped the bounds; zero means synthesized bounds
    pub samples: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    Excluded,
    DegenerateBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedBone {
    pub bone: String,
    pub role: HumanBone,
    pub reason: SkipReason,
}

/// Summary of a completed pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub character: String,
    pub level: GenerationLevel,
    pub meshes: Vec<String>,
    pub sampled_vertices: usize,
    pub key_bones: usize,
    /// Previously generated colliders destroyed by this pass
    pub removed: usize,
    pub colliders: Vec<ColliderReport>,
    pub skipped: Vec<SkippedBone>,
}

impl GenerationReport {
    pub fn collider(&self, role: HumanBone) -> Option<&ColliderReport> {
        self.colliders.iter().find(|c| c.role == role)
    }

    pub fn count(&self, kind: ShapeKind) -> usize {
        self.colliders
            .iter()
            .filter(|c| c.shape.kind() == kind)
            .count()
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

struct Planned {
    role: HumanBone,
    kind: ShapeKind,
    node: usize,
    bounds: BoneBounds,
}

/// Runs generation passes for one character.
///
/// Keeps the sampler cache and the handles of the colliders it created, so
/// a second pass replaces the first one's colliders instead of adding to
/// them. Use one generator per character.
#[derive(Debug, Default)]
pub struct ColliderGenerator {
    config: GenerationConfig,
    sampler: VertexWeightSampler,
    generated: GeneratedColliders,
    cancel: CancelToken,
}

impl ColliderGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Change settings for the next pass. The sample cache stays valid.
    pub fn set_config(&mut self, config: GenerationConfig) {
        self.config = config;
    }

    /// Token that aborts the running pass between meshes when cancelled
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn sampler_mut(&mut self) -> &mut VertexWeightSampler {
        &mut self.sampler
    }

    pub fn generated(&self) -> &GeneratedColliders {
        &self.generated
    }

    /// Destroy every collider a previous pass created
    pub fn clear<H: ColliderHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let removed = self.generated.destroy_all(host);
        log::info!("Cleared {} generated colliders", removed);
        removed
    }

    pub fn generate<H: ColliderHost + ?Sized>(
        &mut self,
        character: &Character,
        host: &mut H,
    ) -> Result<GenerationReport> {
        self.config.validate()?;
        let config = &self.config;
        let hierarchy = &character.hierarchy;

        if config.weight != GenerationConfig::default().weight
            || config.joint_range != GenerationConfig::default().joint_range
        {
            log::debug!(
                "weight {} and joint range {} are not used by collider sizing",
                config.weight,
                config.joint_range
            );
        }

        let mut tree = BoneTree::build(hierarchy, &character.humanoid)?;
        let overrides =
            OverrideRegistry::resolve(&config.overrides, hierarchy, &character.humanoid)?;

        let sources = character.skin_sources(|name| config.includes_mesh(name));
        if sources.is_empty() {
            return Err(ColliderError::EmptySelection);
        }

        let grouping = Grouping::assign(config.level, &tree, hierarchy);
        let buckets = self
            .sampler
            .sample(&sources, &grouping.ownership, &self.cancel)?;

        let mut planned = Vec::with_capacity(grouping.key_nodes.len());
        let mut skipped = Vec::new();

        for &(index, role) in &grouping.key_nodes {
            let node = tree.node(index);
            let transform = node.transform;

            let kind = match select_shape(
                role,
                transform,
                &overrides,
                config.default_body,
                config.default_shape,
            ) {
                Some(kind) => kind,
                None => {
                    log::debug!("{:?}: excluded", role);
                    skipped.push(SkippedBone {
                        bone: hierarchy.name(transform).to_string(),
                        role,
                        reason: SkipReason::Excluded,
                    });
                    continue;
                }
            };

            let direction = node.child_direction;
            let rotation = alignment_rotation(direction);
            let bounds = accumulate(
                node.position,
                direction,
                rotation,
                role.is_foot(),
                buckets.get(transform),
            );
            if bounds.synthesized() {
                log::debug!("{:?}: no vertices survived, bounds synthesized", role);
            }

            let node = tree.node_mut(index);
            node.bounds = Some(bounds.bounds);
            node.center = Some(bounds.world_center);

            planned.push(Planned {
                role,
                kind,
                node: index,
                bounds,
            });
        }

        let mut ctx = SizingContext {
            size_multiplier: config.size_multiplier,
            hip_width: tree.hip_width(),
            lower_leg_collider: [false; 2],
        };
        // A lower leg always precedes its foot in tree order
        let mut built: Vec<(ColliderSpec, &Planned)> = Vec::with_capacity(planned.len());
        for plan in &planned {
            let node = tree.node(plan.node);
            let bone_rotation = hierarchy
                .get(node.transform)
                .map(|t| t.rotation)
                .unwrap_or(Quat::IDENTITY);

            let result = build_collider(
                node.transform,
                plan.role,
                plan.kind,
                bone_rotation,
                &plan.bounds,
                &ctx,
            );
            match result {
                Ok(spec) => {
                    if plan.role.region() == BoneRegion::LowerLeg {
                        let side = plan.role.side().unwrap_or(Side::Left);
                        ctx.lower_leg_collider[side.index()] = true;
                    }
                    log::debug!("{:?}: {:?}", plan.role, spec.shape);
                    built.push((spec, plan));
                }
                Err(err @ ColliderError::DegenerateBounds { .. }) => {
                    log::warn!("{}; no collider for {}", err, hierarchy.name(node.transform));
                    skipped.push(SkippedBone {
                        bone: hierarchy.name(node.transform).to_string(),
                        role: plan.role,
                        reason: SkipReason::DegenerateBounds,
                    });
                }
                Err(err) => return Err(err),
            }
        }

        let removed = self.generated.destroy_all(host);

        let mut colliders = Vec::with_capacity(built.len());
        for (spec, plan) in &built {
            let bone_rotation = hierarchy
                .get(spec.bone)
                .map(|t| t.rotation)
                .unwrap_or(Quat::IDENTITY);
            let handle = host.attach(spec);
            self.generated.record(handle);
            colliders.push(ColliderReport {
                handle,
                bone: hierarchy.name(spec.bone).to_string(),
                role: spec.role,
                shape: spec.shape,
                center: spec.center,
                local_rotation: spec.local_rotation,
                world_center: plan.bounds.world_center,
                world_rotation: spec.world_rotation(bone_rotation),
                samples: plan.bounds.samples,
            });
        }

        let report = GenerationReport {
            character: character.name.clone(),
            level: config.level,
            meshes: sources.iter().map(|s| s.name().to_string()).collect(),
            sampled_vertices: buckets.vertex_count(),
            key_bones: grouping.key_nodes.len(),
            removed,
            colliders,
            skipped,
        };

        log::info!(
            "{}: {} colliders at {} level ({} boxes, {} capsules, {} spheres), {} skipped, {} replaced",
            report.character,
            report.colliders.len(),
            report.level,
            report.count(ShapeKind::Box),
            report.count(ShapeKind::Capsule),
            report.count(ShapeKind::Sphere),
            report.skipped.len(),
            report.removed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::ColliderSet;
    use crate::config::BoneRef;
    use crate::mannequin::mannequin;
    use crate::mesh::SkinnedMesh;
    use crate::skeleton::{Hierarchy, HumanoidMap};

    #[test]
    fn test_medium_pass_on_mannequin() {
        let character = mannequin();
        let mut host = ColliderSet::new();
        let mut generator = ColliderGenerator::default();
        let report = generator.generate(&character, &mut host).unwrap();

        assert_eq!(report.colliders.len(), report.key_bones);
        assert_eq!(host.len(), report.colliders.len());
        assert!(report.collider(HumanBone::LeftUpperArm).is_some());
        assert!(report.collider(HumanBone::LeftFoot).is_none(), "feet suppressed at Medium");
        assert!(report.collider(HumanBone::LeftShoulder).is_none(), "shoulder donates");
        assert_eq!(report.meshes, vec!["Body", "Hair"]);
    }

    #[test]
    fn test_second_pass_replaces_first() {
        let character = mannequin();
        let mut host = ColliderSet::new();
        let mut generator = ColliderGenerator::default();
        let first = generator.generate(&character, &mut host).unwrap();
        let second = generator.generate(&character, &mut host).unwrap();
        assert_eq!(second.removed, first.colliders.len());
        assert_eq!(host.len(), second.colliders.len());
    }

    #[test]
    fn test_missing_hips_leaves_host_untouched() {
        let mut host = ColliderSet::new();
        let mut generator = ColliderGenerator::default();
        generator.generate(&mannequin(), &mut host).unwrap();
        let before = host.len();

        let mut broken = mannequin();
        broken.humanoid.remove(HumanBone::Hips);
        let err = generator.generate(&broken, &mut host).unwrap_err();
        assert!(matches!(err, ColliderError::Precondition(_)));
        assert_eq!(host.len(), before);
    }

    #[test]
    fn test_empty_selection() {
        let mut config = GenerationConfig::default();
        config.include_meshes = Some(vec!["Cape".to_string()]);
        let mut generator = ColliderGenerator::new(config);
        let err = generator
            .generate(&mannequin(), &mut ColliderSet::new())
            .unwrap_err();
        assert!(matches!(err, ColliderError::EmptySelection));
    }

    #[test]
    fn test_cancel_aborts_before_mutation() {
        let mut generator = ColliderGenerator::default();
        let mut host = ColliderSet::new();
        generator.cancel_token().cancel();
        let err = generator.generate(&mannequin(), &mut host).unwrap_err();
        assert!(matches!(err, ColliderError::Cancelled));
        assert!(host.is_empty());
    }

    #[test]
    fn test_excluded_bone_is_reported() {
        let mut config = GenerationConfig::default();
        config.overrides.exclude.push(BoneRef::from("Head"));
        let mut generator = ColliderGenerator::new(config);
        let report = generator
            .generate(&mannequin(), &mut ColliderSet::new())
            .unwrap();
        assert!(report.collider(HumanBone::Head).is_none());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::Excluded);
    }

    #[test]
    fn test_level_none_clears() {
        let character = mannequin();
        let mut host = ColliderSet::new();
        let mut generator = ColliderGenerator::default();
        generator.generate(&character, &mut host).unwrap();

        let mut config = generator.config().clone();
        config.level = GenerationLevel::None;
        generator.set_config(config);
        let report = generator.generate(&character, &mut host).unwrap();
        assert!(report.colliders.is_empty());
        assert!(host.is_empty());
    }

    #[test]
    fn test_bone_without_vertices_gets_synthesized_collider() {
        let mut h = Hierarchy::new();
        let hips = h.add("Hips", None, Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY);
        let spine = h.add("Spine", Some(hips), Vec3::new(0.0, 1.2, 0.0), Quat::IDENTITY);
        let m = HumanoidMap::new()
            .with(HumanBone::Hips, hips)
            .with(HumanBone::Spine, spine);
        let character = Character::new("bare", h, m).with_mesh(SkinnedMesh::new("Empty", vec![], vec![]));

        let report = ColliderGenerator::default()
            .generate(&character, &mut ColliderSet::new())
            .unwrap();
        let hips = report.collider(HumanBone::Hips).unwrap();
        assert_eq!(hips.samples, 0);
        // Synthesized from a 0.2 span: 0.2 x 0.18 x 0.18, tightened
        match hips.shape {
            ColliderShape::Box { size } => {
                assert!((size - Vec3::new(0.2, 0.18, 0.18) * 0.9).length() < 1e-5, "{:?}", size)
            }
            other => panic!("expected box, got {:?}", other),
        }
    }
}
