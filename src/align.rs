//! Per-bone alignment frames
//!
//! A bone's alignment rotation maps its child direction onto +X so bounds
//! can be accumulated along the bone's physical long axis. The rotation is
//! always built from single-axis steps; `Quat::from_rotation_arc` picks an
//! arbitrary axis when source and target are anti-parallel, which would make
//! left and right limbs (pointing -X and +X) end up with unrelated frames.

use crate::math::{dominant_axis, Axis, EPSILON};
use glam::{Quat, Vec3};

/// Rotation `R` such that `R * direction` points along +X with the same length.
///
/// - X or Z dominant: heading about Y removes the Z component, then a pitch
///   about Z removes Y. The horizontal part is never small here.
/// - Y dominant: rotate about X onto the ±Z axis (sign taken from
///   `direction.z`), then heading about Y onto +X.
///
/// A zero vector yields the identity.
pub fn alignment_rotation(direction: Vec3) -> Quat {
    if direction.length_squared() < EPSILON * EPSILON {
        return Quat::IDENTITY;
    }

    match dominant_axis(direction) {
        Axis::X | Axis::Z => horizontal_alignment(direction),
        Axis::Y => vertical_alignment(direction),
    }
}

fn horizontal_alignment(d: Vec3) -> Quat {
    let heading = Quat::from_rotation_y(d.z.atan2(d.x));
    let flat = heading * d;
    // flat = (h, y, 0) with h >= 0
    let pitch = Quat::from_rotation_z(-flat.y.atan2(flat.x));
    (pitch * heading).normalize()
}

fn vertical_alignment(d: Vec3) -> Quat {
    // Intermediate axis keeps a consistent winding on either side of the YZ plane.
    let sign = if d.z >= 0.0 { 1.0 } else { -1.0 };
    let roll = Quat::from_rotation_x((sign * d.y).atan2(sign * d.z));
    let forward = roll * d;
    // forward = (x, 0, ±m) with m > 0
    let heading = Quat::from_rotation_y(forward.z.atan2(forward.x));
    (heading * roll).normalize()
}
