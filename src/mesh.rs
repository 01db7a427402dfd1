//! Skinned mesh sources
//!
//! CPU-side skinned vertex data. Each vertex carries up to four bone
//! slots; slot 0 holds the dominant bone.

use crate::error::{ColliderError, Result};
use crate::skeleton::TransformId;
use glam::{Affine3A, Vec3};

/// Vertex format for skinned mesh data
///
/// `bone_indices` index into the owning mesh's bone list, not the hierarchy.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkinnedVertex {
    /// Position in mesh space
    pub position: [f32; 3],
    /// Indices into the mesh bone list, dominant first
    pub bone_indices: [u32; 4],
    /// Blend weights matching `bone_indices`
    pub bone_weights: [f32; 4],
}

impl SkinnedVertex {
    /// Vertex fully weighted to a single bone
    pub fn rigid(position: Vec3, bone: u32) -> Self {
        Self {
            position: position.to_array(),
            bone_indices: [bone, 0, 0, 0],
            bone_weights: [1.0, 0.0, 0.0, 0.0],
        }
    }
}

/// A bind-pose vertex reduced to its dominant bone slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BakedVertex {
    /// World-space position in bind pose
    pub position: Vec3,
    /// Index into [`SkinSource::bones`]
    pub bone: u32,
    pub weight: f32,
}

/// A mesh + skin provider the sampler can bake.
pub trait SkinSource {
    /// Stable name, used as the sampler cache key and for mesh selection
    fn name(&self) -> &str;

    /// Skin bone list; vertex bone indices point into it
    fn bones(&self) -> &[TransformId];

    /// World-space bind-pose positions with their dominant bone slot
    fn bake_bind_pose(&self) -> Vec<BakedVertex>;
}

/// In-memory skinned mesh
#[derive(Debug, Clone)]
pub struct SkinnedMesh {
    pub name: String,
    pub bones: Vec<TransformId>,
    /// Mesh space → world, in bind pose
    pub to_world: Affine3A,
    pub vertices: Vec<SkinnedVertex>,
}

impl SkinnedMesh {
    pub fn new(name: impl Into<String>, bones: Vec<TransformId>, vertices: Vec<SkinnedVertex>) -> Self {
        Self {
            name: name.into(),
            bones,
            to_world: Affine3A::IDENTITY,
            vertices,
        }
    }

    pub fn with_transform(mut self, to_world: Affine3A) -> Self {
        self.to_world = to_world;
        self
    }

    /// Decode a packed vertex buffer in [`SkinnedVertex`] layout.
    pub fn from_vertex_bytes(
        name: impl Into<String>,
        bones: Vec<TransformId>,
        bytes: &[u8],
    ) -> Result<Self> {
        let stride = std::mem::size_of::<SkinnedVertex>();
        if bytes.len() % stride != 0 {
            return Err(ColliderError::InvalidConfig(format!(
                "vertex buffer of {} bytes is not a multiple of the {}-byte stride",
                bytes.len(),
                stride
            )));
        }
        // Copies, so the input slice needs no particular alignment
        let vertices: Vec<SkinnedVertex> = bytemuck::pod_collect_to_vec(bytes);
        Ok(Self::new(name, bones, vertices))
    }

    /// Raw bytes of the vertex buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl SkinSource for SkinnedMesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn bones(&self) -> &[TransformId] {
        &self.bones
    }

    fn bake_bind_pose(&self) -> Vec<BakedVertex> {
        self.vertices
            .iter()
            .map(|v| BakedVertex {
                position: self.to_world.transform_point3(Vec3::from_array(v.position)),
                bone: v.bone_indices[0],
                weight: v.bone_weights[0],
            })
            .collect()
    }
}
