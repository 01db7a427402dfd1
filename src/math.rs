//! Linear algebra helpers on top of glam.

pub use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Small epsilon value for floating-point comparisons
pub const EPSILON: f32 = 1e-6;

/// One of the three cartesian axes.
///
/// Used both for the dominant component of a direction and for the long
/// axis of a capsule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along this axis
    #[inline]
    pub const fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Component of `v` along this axis
    #[inline]
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// The two remaining axes, in cyclic order
    #[inline]
    pub const fn others(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::Z, Axis::X),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

/// Axis with the largest absolute component. Ties resolve X, then Y, then Z.
pub fn dominant_axis(v: Vec3) -> Axis {
    let a = v.abs();
    if a.x >= a.y && a.x >= a.z {
        Axis::X
    } else if a.y >= a.z {
        Axis::Y
    } else {
        Axis::Z
    }
}

/// Axis with the largest component of a (non-negative) extent vector.
pub fn longest_axis(extents: Vec3) -> Axis {
    dominant_axis(extents)
}

/// True when every component is finite
#[inline]
pub fn is_finite_vec(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}
