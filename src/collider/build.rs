//! Collider sizing from aligned bounds.
//!
//! Every shape is shrunk slightly below the skin bounds so neighbouring
//! colliders do not start out interpenetrating.

use super::{ColliderShape, ColliderSpec, ShapeKind};
use crate::bone::{BoneRegion, HumanBone, Side};
use crate::bounds::BoneBounds;
use crate::error::{ColliderError, Result};
use crate::math::{is_finite_vec, longest_axis};
use crate::skeleton::TransformId;
use glam::{Quat, Vec3};

/// Capsule height relative to the longest extent
pub const CAPSULE_HEIGHT_FACTOR: f32 = 0.95;
/// Cross-section extents relative to the skin bounds, before averaging
pub const CAPSULE_SECTION_FACTOR: f32 = BOX_SIZE_FACTOR;
/// Capsule radius relative to the mean half cross-section
pub const CAPSULE_RADIUS_FACTOR: f32 = 0.9;
/// Upper-leg radius cap relative to half the hip width
pub const THIGH_RADIUS_FACTOR: f32 = 0.85;
/// Box size relative to the extents
pub const BOX_SIZE_FACTOR: f32 = 0.9;
/// Foot box height when the lower leg also gets a collider
pub const FOOT_HEIGHT_FACTOR: f32 = 0.8;
/// Foot box height cap relative to the ankle height
pub const ANKLE_HEIGHT_FACTOR: f32 = 0.7;
/// Sphere radius relative to the smallest extent
pub const SPHERE_RADIUS_DIVISOR: f32 = 4.0;

/// Per-pass facts the sizing rules depend on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingContext {
    pub size_multiplier: f32,
    /// Distance between the two upper-leg joints
    pub hip_width: Option<f32>,
    /// Whether each side's lower leg receives a collider this pass
    pub lower_leg_collider: [bool; 2],
}

impl Default for SizingContext {
    fn default() -> Self {
        Self {
            size_multiplier: 1.0,
            hip_width: None,
            lower_leg_collider: [false; 2],
        }
    }
}

/// Size a collider of `kind` for one key bone.
///
/// Returns [`ColliderError::DegenerateBounds`] if any resulting dimension
/// or the center is not finite.
pub fn build_collider(
    bone: TransformId,
    role: HumanBone,
    kind: ShapeKind,
    bone_rotation: Quat,
    bounds: &BoneBounds,
    ctx: &SizingContext,
) -> Result<ColliderSpec> {
    let (shape, center) = match kind {
        ShapeKind::Capsule => (capsule(role, bounds, ctx), bounds.center),
        ShapeKind::Box => size_box(role, bounds, ctx),
        ShapeKind::Sphere => (sphere(bounds, ctx), bounds.center),
    };

    if !shape.is_finite() || !is_finite_vec(center) {
        return Err(ColliderError::DegenerateBounds { role });
    }

    Ok(ColliderSpec {
        bone,
        role,
        shape,
        local_rotation: bone_rotation.inverse() * bounds.rotation.inverse(),
        center,
    })
}

fn capsule(role: HumanBone, bounds: &BoneBounds, ctx: &SizingContext) -> ColliderShape {
    let extents = bounds.bounds.extents();
    let direction = longest_axis(extents);
    let (a, b) = direction.others();

    let height = direction.component(extents) * ctx.size_multiplier * CAPSULE_HEIGHT_FACTOR;
    let section = (a.component(extents) + b.component(extents)) / 2.0 * CAPSULE_SECTION_FACTOR;
    let mut radius = section * ctx.size_multiplier / 2.0 * CAPSULE_RADIUS_FACTOR;

    if role.region() == BoneRegion::UpperLeg {
        if let Some(hip_width) = ctx.hip_width {
            radius = radius.min(THIGH_RADIUS_FACTOR * hip_width / 2.0);
        }
    }
    radius = radius.min(height / 2.0);

    ColliderShape::Capsule {
        radius,
        height,
        direction,
    }
}

fn size_box(role: HumanBone, bounds: &BoneBounds, ctx: &SizingContext) -> (ColliderShape, Vec3) {
    let mut size = bounds.bounds.extents() * ctx.size_multiplier * BOX_SIZE_FACTOR;
    let mut center = bounds.center;

    if role.is_foot() {
        let side = role.side().unwrap_or(Side::Left);
        if ctx.lower_leg_collider[side.index()] {
            let sole = center.y - size.y / 2.0;
            size.y *= FOOT_HEIGHT_FACTOR;
            center.y = sole + size.y / 2.0;
        }

        // Foot frames keep world up as Y, so -min.y is the ankle height
        let ankle_height = -bounds.bounds.min.y;
        if ankle_height > 0.0 && size.y > ankle_height {
            let sole = center.y - size.y / 2.0;
            size.y = ANKLE_HEIGHT_FACTOR * ankle_height;
            center.y = sole + size.y / 2.0;
        }
    }

    (ColliderShape::Box { size }, center)
}

fn sphere(bounds: &BoneBounds, ctx: &SizingContext) -> ColliderShape {
    let smallest = bounds.bounds.extents().min_element();
    ColliderShape::Sphere {
        radius: smallest * ctx.size_multiplier / SPHERE_RADIUS_DIVISOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::alignment_rotation;
    use crate::bounds::{accumulate, AlignedBounds};
    use crate::math::Axis;

    fn bounds(min: Vec3, max: Vec3) -> BoneBounds {
        let b = AlignedBounds { min, max };
        BoneBounds {
            bounds: b,
            center: b.center(),
            world_center: b.center(),
            rotation: Quat::IDENTITY,
            samples: 8,
        }
    }

    fn arm() -> BoneBounds {
        bounds(Vec3::new(0.0, -0.05, -0.06), Vec3::new(0.25, 0.05, 0.06))
    }

    #[test]
    fn test_upper_arm_capsule() {
        let spec = build_collider(
            TransformId::new(3),
            HumanBone::LeftUpperArm,
            ShapeKind::Capsule,
            Quat::IDENTITY,
            &arm(),
            &SizingContext::default(),
        )
        .unwrap();
        match spec.shape {
            ColliderShape::Capsule {
                radius,
                height,
                direction,
            } => {
                assert_eq!(direction, Axis::X);
                assert!((height - 0.2375).abs() < 1e-5, "height {}", height);
                // mean cross-section 0.11 tightened to 0.099, halved, then 0.9
                assert!((radius - 0.04455).abs() < 1e-5, "radius {}", radius);
                assert!((radius - 0.045).abs() < 1e-3);
                assert!(radius <= height / 2.0);
            }
            other => panic!("expected capsule, got {:?}", other),
        }
    }

    #[test]
    fn test_capsule_radius_clamped_to_half_height() {
        let stubby = bounds(Vec3::new(0.0, -0.2, -0.2), Vec3::new(0.21, 0.2, 0.2));
        let spec = build_collider(
            TransformId::new(0),
            HumanBone::Neck,
            ShapeKind::Capsule,
            Quat::IDENTITY,
            &stubby,
            &SizingContext::default(),
        )
        .unwrap();
        if let ColliderShape::Capsule { radius, height, .. } = spec.shape {
            assert!(radius <= height / 2.0 + 1e-6, "{} > {}/2", radius, height);
        } else {
            panic!("expected capsule");
        }
    }

    #[test]
    fn test_thigh_radius_capped_by_hip_width() {
        let thigh = bounds(Vec3::new(0.0, -0.1, -0.1), Vec3::new(0.45, 0.1, 0.1));
        let ctx = SizingContext {
            hip_width: Some(0.16),
            ..Default::default()
        };
        let spec = build_collider(
            TransformId::new(0),
            HumanBone::RightUpperLeg,
            ShapeKind::Capsule,
            Quat::IDENTITY,
            &thigh,
            &ctx,
        )
        .unwrap();
        if let ColliderShape::Capsule { radius, .. } = spec.shape {
            assert!((radius - 0.068).abs() < 1e-5, "radius {}", radius);
        } else {
            panic!("expected capsule");
        }
    }

    #[test]
    fn test_box_and_sphere_scale_with_multiplier() {
        let ctx = SizingContext {
            size_multiplier: 2.0,
            ..Default::default()
        };
        let b = build_collider(
            TransformId::new(0),
            HumanBone::Chest,
            ShapeKind::Box,
            Quat::IDENTITY,
            &arm(),
            &ctx,
        )
        .unwrap();
        assert_eq!(
            b.shape,
            ColliderShape::Box {
                size: Vec3::new(0.25, 0.1, 0.12) * 2.0 * BOX_SIZE_FACTOR
            }
        );

        let s = build_collider(
            TransformId::new(0),
            HumanBone::Chest,
            ShapeKind::Sphere,
            Quat::IDENTITY,
            &arm(),
            &ctx,
        )
        .unwrap();
        if let ColliderShape::Sphere { radius } = s.shape {
            assert!((radius - 0.05).abs() < 1e-6);
        } else {
            panic!("expected sphere");
        }
    }

    #[test]
    fn test_foot_box_keeps_sole_when_shortened() {
        // Ankle 0.08 above the sole, heel behind the joint
        let foot = bounds(Vec3::new(-0.05, -0.08, -0.05), Vec3::new(0.2, 0.0, 0.05));
        let plain = build_collider(
            TransformId::new(0),
            HumanBone::LeftFoot,
            ShapeKind::Box,
            Quat::IDENTITY,
            &foot,
            &SizingContext::default(),
        )
        .unwrap();

        let ctx = SizingContext {
            lower_leg_collider: [true, false],
            ..Default::default()
        };
        let shortened = build_collider(
            TransformId::new(0),
            HumanBone::LeftFoot,
            ShapeKind::Box,
            Quat::IDENTITY,
            &foot,
            &ctx,
        )
        .unwrap();

        let (ColliderShape::Box { size: a }, ColliderShape::Box { size: b }) =
            (plain.shape, shortened.shape)
        else {
            panic!("expected boxes");
        };
        assert!((b.y - a.y * FOOT_HEIGHT_FACTOR).abs() < 1e-6);
        let sole_a = plain.center.y - a.y / 2.0;
        let sole_b = shortened.center.y - b.y / 2.0;
        assert!((sole_a - sole_b).abs() < 1e-6, "sole moved {} -> {}", sole_a, sole_b);
        assert!(shortened.center.y < plain.center.y);

        // The right lower leg has no collider, so the right foot keeps full height
        let right = build_collider(
            TransformId::new(1),
            HumanBone::RightFoot,
            ShapeKind::Box,
            Quat::IDENTITY,
            &foot,
            &ctx,
        )
        .unwrap();
        assert_eq!(right.shape, plain.shape);
    }

    #[test]
    fn test_tall_foot_compressed_to_ankle() {
        // Box reaches well above the ankle joint
        let foot = bounds(Vec3::new(0.0, -0.05, -0.05), Vec3::new(0.2, 0.15, 0.05));
        let spec = build_collider(
            TransformId::new(0),
            HumanBone::RightFoot,
            ShapeKind::Box,
            Quat::IDENTITY,
            &foot,
            &SizingContext::default(),
        )
        .unwrap();
        let ColliderShape::Box { size } = spec.shape else {
            panic!("expected box");
        };
        assert!((size.y - ANKLE_HEIGHT_FACTOR * 0.05).abs() < 1e-6, "{}", size.y);
        // Sole stays where the uncompressed box put it
        let sole = spec.center.y - size.y / 2.0;
        assert!((sole - (0.05 - 0.18 / 2.0)).abs() < 1e-6, "sole {}", sole);
    }

    #[test]
    fn test_non_finite_is_degenerate() {
        let broken = bounds(Vec3::new(0.0, f32::NEG_INFINITY, 0.0), Vec3::new(0.1, 0.1, 0.1));
        let err = build_collider(
            TransformId::new(0),
            HumanBone::Spine,
            ShapeKind::Box,
            Quat::IDENTITY,
            &broken,
            &SizingContext::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ColliderError::DegenerateBounds { role: HumanBone::Spine }));
    }

    #[test]
    fn test_local_frame_reproduces_world_center() {
        let bone_pos = Vec3::new(-0.2, 1.4, 0.0);
        let bone_rot = Quat::from_rotation_z(0.3);
        let dir = Vec3::new(-0.25, -0.02, 0.0);
        let r = alignment_rotation(dir);
        let verts = [
            bone_pos + Vec3::new(-0.05, 0.04, 0.03),
            bone_pos + Vec3::new(-0.2, -0.05, -0.04),
        ];
        let bb = accumulate(bone_pos, dir, r, false, &verts);
        let spec = build_collider(
            TransformId::new(0),
            HumanBone::LeftUpperArm,
            ShapeKind::Capsule,
            bone_rot,
            &bb,
            &SizingContext::default(),
        )
        .unwrap();
        let world = spec.world_center(bone_pos, bone_rot);
        assert!((world - bb.world_center).length() < 1e-5, "{:?} vs {:?}", world, bb.world_center);
        // Collider X runs along the bone
        let along = spec.world_rotation(bone_rot) * Vec3::X;
        assert!((along - dir.normalize()).length() < 1e-5);
    }
}
