//! Built-in reference character
//!
//! A T-posed humanoid with every role mapped, a few auxiliary transforms
//! (armature root, upper-arm twist bones, hair root) and a rigidly skinned
//! body built from cylinders and spheres, plus a separate hair mesh.

use crate::bone::{Finger, HumanBone, Phalanx, Side};
use crate::character::Character;
use crate::mesh::{SkinnedMesh, SkinnedVertex};
use crate::skeleton::{Hierarchy, HumanoidMap, TransformId};
use crate::skeleton_constants::*;
use glam::{Quat, Vec3};

/// Number of segments around a cylinder ring
pub const CYLINDER_SEGMENTS: usize = 12;
/// Rings sampled along each cylinder
pub const CYLINDER_RINGS: usize = 5;
/// Number of latitude segments for sphere geometry
pub const SPHERE_LAT_SEGMENTS: usize = 8;
/// Number of longitude segments for sphere geometry
pub const SPHERE_LON_SEGMENTS: usize = 12;

/// Keeps the end rings just inside the joints they connect
const RING_INSET: f32 = 0.01;

/// Positions a vertex is emitted at along a cylinder, as fractions of its length
fn ring_stations() -> impl Iterator<Item = f32> {
    (0..CYLINDER_RINGS)
        .map(|i| RING_INSET + (1.0 - 2.0 * RING_INSET) * i as f32 / (CYLINDER_RINGS - 1) as f32)
}

fn add_cylinder(vertices: &mut Vec<SkinnedVertex>, start: Vec3, end: Vec3, radius: f32, bone: u32) {
    let length = start.distance(end).max(0.0001);
    let dir = (end - start) / length;

    let up = if dir.abs().dot(Vec3::Y) > 0.99 {
        Vec3::X
    } else {
        Vec3::Y
    };
    let right = dir.cross(up).normalize();
    let up = right.cross(dir).normalize();

    for t in ring_stations() {
        let d = t * length;
        for i in 0..CYLINDER_SEGMENTS {
            let angle = (i as f32 / CYLINDER_SEGMENTS as f32) * std::f32::consts::TAU;
            let (sin, cos) = angle.sin_cos();
            let p = start + right * (cos * radius) + up * (sin * radius) + dir * d;
            vertices.push(SkinnedVertex::rigid(p, bone));
        }
    }
}

fn add_sphere(vertices: &mut Vec<SkinnedVertex>, center: Vec3, radius: f32, bone: u32) {
    for i in 0..=SPHERE_LAT_SEGMENTS {
        let theta = (i as f32 / SPHERE_LAT_SEGMENTS as f32) * std::f32::consts::PI;
        let sin_theta = theta.sin();
        for j in 0..SPHERE_LON_SEGMENTS {
            let phi = (j as f32 / SPHERE_LON_SEGMENTS as f32) * std::f32::consts::TAU;
            let p = center
                + Vec3::new(
                    radius * sin_theta * phi.cos(),
                    radius * theta.cos(),
                    radius * sin_theta * phi.sin(),
                );
            vertices.push(SkinnedVertex::rigid(p, bone));
        }
    }
}

struct RigBuilder {
    hierarchy: Hierarchy,
    humanoid: HumanoidMap,
}

impl RigBuilder {
    fn role(&mut self, role: HumanBone, parent: Option<TransformId>, position: Vec3) -> TransformId {
        let id = self.aux(role.name(), parent, position);
        self.humanoid.set(role, id);
        id
    }

    fn aux(&mut self, name: &str, parent: Option<TransformId>, position: Vec3) -> TransformId {
        self.hierarchy.add(name, parent, position, Quat::IDENTITY)
    }
}

fn side_position(side: Side, left: Vec3) -> Vec3 {
    match side {
        Side::Left => left,
        Side::Right => mirror(left),
    }
}

fn finger_step(side: Side, finger: Finger) -> Vec3 {
    let left = match finger {
        Finger::Thumb => LEFT_THUMB_SEGMENT,
        _ => LEFT_FINGER_SEGMENT,
    };
    side_position(side, left)
}

const PHALANGES: [Phalanx; 3] = [Phalanx::Proximal, Phalanx::Intermediate, Phalanx::Distal];

/// Build the reference mannequin.
pub fn mannequin() -> Character {
    use crate::bone::BoneRegion as R;
    use HumanBone::*;

    let mut rig = RigBuilder {
        hierarchy: Hierarchy::new(),
        humanoid: HumanoidMap::new(),
    };
    let armature = rig.aux("Armature", None, Vec3::ZERO);
    let hips = rig.role(Hips, Some(armature), HIPS);
    let spine = rig.role(Spine, Some(hips), SPINE);
    let chest = rig.role(Chest, Some(spine), CHEST);
    let upper_chest = rig.role(UpperChest, Some(chest), UPPER_CHEST);
    let neck = rig.role(Neck, Some(upper_chest), NECK);
    let head = rig.role(Head, Some(neck), HEAD);
    let hair_root = rig.aux("HairRoot", Some(head), HAIR_ROOT);

    let mut body = Vec::new();
    let slot = |id: TransformId| id.index() as u32;

    add_cylinder(&mut body, HIPS - Vec3::Y * 0.1, SPINE, TORSO_RADIUS, slot(hips));
    add_cylinder(&mut body, SPINE, CHEST, TORSO_RADIUS, slot(spine));
    add_cylinder(&mut body, CHEST, UPPER_CHEST, TORSO_RADIUS, slot(chest));
    add_cylinder(&mut body, UPPER_CHEST, NECK, TORSO_RADIUS * 0.9, slot(upper_chest));
    add_cylinder(&mut body, NECK, HEAD, NECK_RADIUS, slot(neck));
    add_sphere(&mut body, HEAD + Vec3::Y * HEAD_RADIUS, HEAD_RADIUS, slot(head));

    for side in Side::BOTH {
        let at = |left: Vec3| side_position(side, left);
        let lateral = |region| HumanBone::lateral(side, region).unwrap_or(Hips);

        let shoulder = rig.role(lateral(R::Shoulder), Some(upper_chest), at(LEFT_SHOULDER));
        let upper_arm = rig.role(lateral(R::UpperArm), Some(shoulder), at(LEFT_UPPER_ARM));
        let twist_name = format!("{}Twist", lateral(R::UpperArm).name());
        let twist = rig.aux(&twist_name, Some(upper_arm), at(LEFT_UPPER_ARM_TWIST));
        let lower_arm = rig.role(lateral(R::LowerArm), Some(twist), at(LEFT_LOWER_ARM));
        let hand = rig.role(lateral(R::Hand), Some(lower_arm), at(LEFT_HAND));

        add_cylinder(&mut body, at(LEFT_SHOULDER), at(LEFT_UPPER_ARM), SHOULDER_RADIUS, slot(shoulder));
        add_cylinder(&mut body, at(LEFT_UPPER_ARM), at(LEFT_UPPER_ARM_TWIST), UPPER_ARM_RADIUS, slot(upper_arm));
        add_cylinder(&mut body, at(LEFT_UPPER_ARM_TWIST), at(LEFT_LOWER_ARM), UPPER_ARM_RADIUS, slot(twist));
        add_cylinder(&mut body, at(LEFT_LOWER_ARM), at(LEFT_HAND), LOWER_ARM_RADIUS, slot(lower_arm));
        // Palm runs to the middle finger root
        add_cylinder(&mut body, at(LEFT_HAND), at(LEFT_FINGER_ROOTS[2]), HAND_RADIUS, slot(hand));

        for (finger, root) in Finger::ALL.into_iter().zip(LEFT_FINGER_ROOTS) {
            let step = finger_step(side, finger);
            let mut parent = hand;
            let mut joint = at(root);
            for phalanx in PHALANGES {
                let id = rig.role(HumanBone::finger(side, finger, phalanx), Some(parent), joint);
                add_cylinder(&mut body, joint, joint + step, FINGER_RADIUS, slot(id));
                parent = id;
                joint += step;
            }
        }

        let upper_leg = rig.role(lateral(R::UpperLeg), Some(hips), at(LEFT_UPPER_LEG));
        let lower_leg = rig.role(lateral(R::LowerLeg), Some(upper_leg), at(LEFT_LOWER_LEG));
        let foot = rig.role(lateral(R::Foot), Some(lower_leg), at(LEFT_FOOT));
        let toes = rig.role(lateral(R::Toes), Some(foot), at(LEFT_TOES));

        add_cylinder(&mut body, at(LEFT_UPPER_LEG), at(LEFT_LOWER_LEG), THIGH_RADIUS, slot(upper_leg));
        add_cylinder(&mut body, at(LEFT_LOWER_LEG), at(LEFT_FOOT), SHIN_RADIUS, slot(lower_leg));
        let sole = Vec3::Y * FOOT_RADIUS;
        let heel = Vec3::new(at(LEFT_FOOT).x, 0.0, -HEEL_DEPTH) + sole;
        let ball = Vec3::new(at(LEFT_TOES).x, 0.0, LEFT_TOES.z) + sole;
        add_cylinder(&mut body, heel, ball, FOOT_RADIUS, slot(foot));
        let toe_root = Vec3::new(at(LEFT_TOES).x, TOE_RADIUS, LEFT_TOES.z);
        add_cylinder(&mut body, toe_root, toe_root + Vec3::Z * TOE_LENGTH, TOE_RADIUS, slot(toes));
    }

    let mut hair = Vec::new();
    add_sphere(&mut hair, Vec3::ZERO, HAIR_RADIUS, 0);

    let RigBuilder {
        hierarchy,
        humanoid,
    } = rig;
    let bones: Vec<TransformId> = hierarchy.iter().map(|(id, _)| id).collect();

    Character::new("Mannequin", hierarchy, humanoid)
        .with_mesh(SkinnedMesh::new("Body", bones, body))
        .with_mesh(
            // Authored around its own origin, placed on the hair root
            SkinnedMesh::new("Hair", vec![hair_root], hair)
                .with_transform(glam::Affine3A::from_translation(HAIR_ROOT)),
        )
}
