//! Per-frame update driver: refresh object world bounds in parallel,
//! rebuild the octree, and hand the flattened snapshot to the device sink.
//!
//! Called once per frame from a single control thread. The two phases have
//! different concurrency shapes:
//!
//! - **Phase A** (world-bound refresh) is independent per object and runs
//!   on rayon in fixed-size chunks; each task writes only its own objects'
//!   cached bounds, so no locks are involved.
//! - **Phase B** (tree aggregation + flatten + upload) is sequential
//!   top-down.
//!
//! Cancellation is cooperative and polled between the phases. A canceled
//! update uploads nothing, so the device-visible copy always describes a
//! complete previous frame, never a half-updated tree.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::{Affine3A, Vec3};
use rayon::prelude::*;
use web_time::Instant;

use crate::octree::{FlatNode, OctreeBuilder};
use crate::types::{Aabb, VolumeDescriptor};

/// Phase-A chunk size: objects whose bounds one rayon task refreshes.
pub const OBJECTS_PER_TASK: usize = 32;

/// One volumetric scene object tracked across frames.
///
/// The transform is owned by the caller and updated as the object moves;
/// `refresh_world_bound` re-derives the cached world-space bound from it.
#[derive(Clone, Debug)]
pub struct VolumeObject {
  /// Object-to-world transform for the current frame.
  pub transform: Affine3A,
  /// Bounding box of the voxel grid in object space.
  pub local_bound: Aabb,
  /// Voxel grid depth (1 = flat image data, excluded from the tree).
  pub grid_depth: u32,
  /// Componentwise minimum extinction of the grid.
  pub min_extinction: Vec3,
  /// Componentwise maximum extinction of the grid.
  pub max_extinction: Vec3,
  /// Slot id recorded in node volume lists.
  pub slot: u32,
  /// Cached world-space bound, valid after `refresh_world_bound`.
  world_bound: Aabb,
}

impl VolumeObject {
  pub fn new(
    transform: Affine3A,
    local_bound: Aabb,
    grid_depth: u32,
    min_extinction: Vec3,
    max_extinction: Vec3,
    slot: u32,
  ) -> Self {
    Self {
      transform,
      local_bound,
      grid_depth,
      min_extinction,
      max_extinction,
      slot,
      world_bound: Aabb::empty(),
    }
  }

  /// Recompute the cached world bound from the current transform.
  #[inline]
  pub fn refresh_world_bound(&mut self) {
    self.world_bound = self.local_bound.transformed(&self.transform);
  }

  /// The cached world bound from the last refresh.
  #[inline]
  pub fn world_bound(&self) -> &Aabb {
    &self.world_bound
  }

  /// Descriptor view of this object for the builder.
  #[inline]
  pub fn descriptor(&self) -> VolumeDescriptor {
    VolumeDescriptor {
      world_bound: self.world_bound,
      depth: self.grid_depth,
      min_extinction: self.min_extinction,
      max_extinction: self.max_extinction,
      slot: self.slot,
    }
  }
}

/// Shared flag for cooperatively abandoning an in-progress update.
///
/// Cloning shares the flag. Polled between update phases only; nothing is
/// interrupted mid-computation.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  /// Request cancellation of the current update.
  pub fn cancel(&self) {
    self.0.store(true, Ordering::Relaxed);
  }

  pub fn is_canceled(&self) -> bool {
    self.0.load(Ordering::Relaxed)
  }

  /// Re-arm the token for the next frame.
  pub fn reset(&self) {
    self.0.store(false, Ordering::Relaxed);
  }
}

/// Opaque destination for flattened snapshots (a device buffer in the real
/// renderer). The sink must treat the records as read-only.
pub trait DeviceSink {
  fn upload_octree(&mut self, nodes: &[FlatNode]);
}

/// Timing and population counters for one completed update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
  /// Objects whose world bounds were refreshed in phase A.
  pub objects_seen: usize,
  /// Objects that participated in aggregation (volumetric, non-degenerate).
  pub volumes_active: usize,
  /// Nodes whose volume list hit the slot cap this frame.
  pub overflowed_nodes: usize,
  /// Phase-A duration in microseconds.
  pub bounds_time_us: u64,
  /// Phase-B duration (rebuild + flatten + upload) in microseconds.
  pub rebuild_time_us: u64,
}

/// What a `device_update` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
  /// Tree rebuilt and uploaded.
  Completed(UpdateStats),
  /// Canceled between phases; previous frame's tree and device copy stand.
  Canceled,
  /// `need_update` was not set; nothing done.
  UpToDate,
}

/// Owns the octree builder and drives the per-frame rebuild.
pub struct VolumeManager {
  builder: OctreeBuilder,
  /// Set when scene volumes changed; cleared after a completed update.
  pub need_update: bool,
}

impl VolumeManager {
  /// Create a manager with a tree of the given depth. The first
  /// `device_update` call will build and upload.
  pub fn new(depth: u32) -> Self {
    Self {
      builder: OctreeBuilder::new(depth),
      need_update: true,
    }
  }

  /// The owned builder (current frame's tree).
  #[inline]
  pub fn builder(&self) -> &OctreeBuilder {
    &self.builder
  }

  /// Mark the tree stale, forcing the next `device_update` to rebuild.
  pub fn tag_update(&mut self) {
    self.need_update = true;
  }

  /// Run the per-frame update.
  ///
  /// Phase A refreshes each object's cached world bound in parallel chunks
  /// of [`OBJECTS_PER_TASK`]. If the token is canceled after phase A, the
  /// builder keeps its previous-frame state and the sink is not touched.
  /// Phase B resets and rebuilds the tree from the refreshed descriptors,
  /// flattens it, and uploads the snapshot.
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "volume::device_update")
  )]
  pub fn device_update<S: DeviceSink>(
    &mut self,
    objects: &mut [VolumeObject],
    cancel: &CancelToken,
    sink: &mut S,
  ) -> UpdateOutcome {
    if !self.need_update {
      return UpdateOutcome::UpToDate;
    }

    // Phase A: parallel world-bound refresh. Writes are disjoint per
    // object, so chunks need no synchronization.
    let phase_a = Instant::now();
    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("refresh_world_bounds").entered();
      objects.par_chunks_mut(OBJECTS_PER_TASK).for_each(|chunk| {
        for object in chunk {
          object.refresh_world_bound();
        }
      });
    }
    let bounds_time_us = phase_a.elapsed().as_micros() as u64;

    if cancel.is_canceled() {
      return UpdateOutcome::Canceled;
    }

    // Phase B: sequential rebuild and upload.
    let phase_b = Instant::now();
    let stats = {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("rebuild_octree").entered();

      let descriptors: Vec<VolumeDescriptor> = objects.iter().map(|o| o.descriptor()).collect();

      self.builder.reset();
      self.builder.update(&descriptors);

      let nodes = self.builder.flatten();
      sink.upload_octree(&nodes);

      UpdateStats {
        objects_seen: objects.len(),
        volumes_active: descriptors.iter().filter(|d| d.is_volumetric()).count(),
        overflowed_nodes: self.builder.overflowed_nodes(),
        bounds_time_us,
        rebuild_time_us: phase_b.elapsed().as_micros() as u64,
      }
    };

    self.need_update = false;
    UpdateOutcome::Completed(stats)
  }
}

#[cfg(test)]
#[path = "update_test.rs"]
mod update_test;
