//! Aligned-space bounds accumulation per key bone

use glam::{Quat, Vec3};
use serde::Serialize;

/// Half-width of synthesized bounds, as a fraction of the joint span
pub const SYNTHESIZED_HALF_WIDTH: f32 = 0.45;

/// Axis-aligned box in a bone's aligned space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignedBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl AlignedBounds {
    /// Bounds used when no vertex survives filtering
    pub fn synthesized(span: f32) -> Self {
        let half = SYNTHESIZED_HALF_WIDTH * span;
        Self {
            min: Vec3::new(0.0, -half, -half),
            max: Vec3::new(span, half, half),
        }
    }

    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.min + self.extents() / 2.0
    }

    /// Componentwise containment test with a small tolerance
    pub fn contains(&self, p: Vec3, tolerance: f32) -> bool {
        p.cmpge(self.min - Vec3::splat(tolerance)).all()
            && p.cmple(self.max + Vec3::splat(tolerance)).all()
    }
}

/// Result of accumulating one bone's vertex bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneBounds {
    pub bounds: AlignedBounds,
    /// Collider center in aligned space, X clamped to half the joint span
    pub center: Vec3,
    /// `center` mapped back to world space
    pub world_center: Vec3,
    /// Alignment rotation the bounds were accumulated in
    pub rotation: Quat,
    /// Number of vertices that contributed
    pub samples: usize,
}

impl BoneBounds {
    #[inline]
    pub fn synthesized(&self) -> bool {
        self.samples == 0
    }
}

/// Accumulate aligned bounds for one bone.
///
/// Each vertex is moved into the bone's aligned frame (`rotation * (v - bone)`).
/// Unless `keep_behind_joint` is set (feet), points behind the joint
/// (`x < 0`) or past the next joint (`x > |direction|`) are discarded.
pub fn accumulate(
    bone_position: Vec3,
    direction: Vec3,
    rotation: Quat,
    keep_behind_joint: bool,
    vertices: &[Vec3],
) -> BoneBounds {
    let span = direction.length();

    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    let mut samples = 0;

    for &v in vertices {
        let p = rotation * (v - bone_position);
        if !keep_behind_joint && (p.x < 0.0 || p.x > span) {
            continue;
        }
        min = min.min(p);
        max = max.max(p);
        samples += 1;
    }

    let bounds = if samples == 0 {
        AlignedBounds::synthesized(span)
    } else {
        AlignedBounds { min, max }
    };

    let mut center = bounds.center();
    // Keep the collider from drifting toward the child joint
    center.x = center.x.min(span / 2.0);

    let world_center = bone_position + rotation.inverse() * center;

    BoneBounds {
        bounds,
        center,
        world_center,
        rotation,
        samples,
    }
}
