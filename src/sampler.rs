//! Bind-pose vertex sampling into per-key-bone buckets.
//!
//! Baking is the expensive part of a pass, so the baked `(bone, position)`
//! samples of each mesh are cached by mesh name. A regenerate pass with a
//! different level or override set only re-buckets the cached samples.

use crate::error::{ColliderError, Result};
use crate::grouping::BoneOwnership;
use crate::mesh::SkinSource;
use crate::skeleton::TransformId;
use glam::Vec3;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag, checked between meshes
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Key bone → world-space bind-pose positions, in mesh then vertex order
#[derive(Debug, Clone, Default)]
pub struct VertexBuckets {
    buckets: HashMap<TransformId, Vec<Vec3>>,
}

impl VertexBuckets {
    pub fn get(&self, bone: TransformId) -> &[Vec3] {
        self.buckets.get(&bone).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push(&mut self, bone: TransformId, position: Vec3) {
        self.buckets.entry(bone).or_default().push(position);
    }

    /// Total number of bucketed vertices
    pub fn vertex_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Number of non-empty buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransformId, &[Vec3])> {
        self.buckets.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

#[derive(Debug, Clone, Copy)]
struct RawSample {
    bone: TransformId,
    position: Vec3,
}

/// Bakes skin sources and buckets vertices by their owning key bone.
#[derive(Debug, Default)]
pub struct VertexWeightSampler {
    cache: HashMap<String, Vec<RawSample>>,
}

impl VertexWeightSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the mesh has been baked and will be skipped next pass
    pub fn is_cached(&self, mesh: &str) -> bool {
        self.cache.contains_key(mesh)
    }

    /// Drop the cached samples of one mesh (e.g. after it was edited)
    pub fn invalidate(&mut self, mesh: &str) -> bool {
        self.cache.remove(mesh).is_some()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Bucket every weighted vertex of `sources` under its owning key bone.
    ///
    /// Vertices with a zero dominant weight, an out-of-range bone slot or no
    /// owner are dropped. Cancellation is honoured between meshes only.
    pub fn sample(
        &mut self,
        sources: &[&dyn SkinSource],
        ownership: &BoneOwnership,
        cancel: &CancelToken,
    ) -> Result<VertexBuckets> {
        let mut buckets = VertexBuckets::default();

        for source in sources {
            if cancel.is_cancelled() {
                log::info!("Sampling cancelled before {}", source.name());
                return Err(ColliderError::Cancelled);
            }

            if self.cache.contains_key(source.name()) {
                log::debug!("{}: reusing cached samples", source.name());
            } else {
                let baked = Self::bake(*source);
                self.cache.insert(source.name().to_string(), baked);
            }
            let samples = &self.cache[source.name()];

            let mut dropped = 0usize;
            for sample in samples {
                match ownership.owner_of(sample.bone) {
                    Some(owner) => buckets.push(owner, sample.position),
                    None => dropped += 1,
                }
            }
            log::debug!(
                "{}: {} vertices bucketed, {} without owner",
                source.name(),
                samples.len() - dropped,
                dropped
            );
        }

        Ok(buckets)
    }

    fn bake(source: &dyn SkinSource) -> Vec<RawSample> {
        let bones = source.bones();
        let baked = source.bake_bind_pose();
        let mut out = Vec::with_capacity(baked.len());
        let mut unbound = 0usize;

        for v in baked {
            if v.weight == 0.0 {
                continue;
            }
            match bones.get(v.bone as usize) {
                Some(bone) => out.push(RawSample {
                    bone: *bone,
                    position: v.position,
                }),
                None => unbound += 1,
            }
        }

        if unbound > 0 {
            log::warn!(
                "{}: {} vertices reference bone slots outside the skin",
                source.name(),
                unbound
            );
        }
        out
    }
}
