//! OctNode - one octant of space at a given recursion level, plus the
//! index math that replaces stored parent/child links.

use glam::Vec3;
use smallvec::SmallVec;

use crate::types::{Aabb, VolumeDescriptor};

/// Hard cap on the number of volume slots recorded per node.
///
/// Volumes beyond the cap still count toward [`OctNode::num_volumes`] (so
/// truncation is observable) but their slots are dropped from the list.
pub const MAX_VOLUMES_PER_NODE: usize = 1024;

/// Total node count of a complete 8-ary tree with `depth` levels below the
/// root: `(8^(depth+1) - 1) / 7`.
///
/// depth 0 → 1, depth 1 → 9, depth 2 → 73, depth 3 → 585.
#[inline]
pub fn num_nodes_for_depth(depth: u32) -> usize {
  ((8usize.pow(depth + 1)) - 1) / 7
}

/// Arena index of a node's child for the given octant (0-7).
///
/// The root is index 0 and each node's 8 children are stored contiguously,
/// so ids are stable and collision-free regardless of traversal order.
#[inline]
pub fn child_index(idx: usize, octant: u8) -> usize {
  idx * 8 + octant as usize + 1
}

/// Arena index of a node's parent. The root (index 0) has no parent.
#[inline]
pub fn parent_index(idx: usize) -> Option<usize> {
  if idx == 0 {
    None
  } else {
    Some((idx - 1) / 8)
  }
}

/// Split a parent box into one of its 8 octants.
///
/// Octant bits select the lower or upper half per axis:
/// - bit 0: X (0 = lower, 1 = upper)
/// - bit 1: Y
/// - bit 2: Z
///
/// The 8 octants partition the parent exactly: interiors are disjoint and
/// the union equals the parent box.
#[inline]
pub fn octant_bbox(parent: &Aabb, octant: u8) -> Aabb {
  let mid = parent.center();
  let min = Vec3::new(
    if octant & 1 == 0 { parent.min.x } else { mid.x },
    if octant & 2 == 0 { parent.min.y } else { mid.y },
    if octant & 4 == 0 { parent.min.z } else { mid.z },
  );
  let max = Vec3::new(
    if octant & 1 == 0 { mid.x } else { parent.max.x },
    if octant & 2 == 0 { mid.y } else { parent.max.y },
    if octant & 4 == 0 { mid.z } else { parent.max.z },
  );
  Aabb::new(min, max)
}

/// One octree node.
///
/// Structural fields (`depth`, `has_children`) are fixed at construction;
/// aggregate fields are recomputed every frame by the builder. A node with
/// zero volumes still keeps its children — population never changes the
/// topology.
#[derive(Clone, Debug)]
pub struct OctNode {
  /// World bounds of this octant. Empty sentinel until computed.
  pub bbox: Aabb,
  /// Recursion levels remaining below this node (leaves are 0).
  pub depth: u32,
  /// Structural: true iff this node was built with children.
  pub has_children: bool,
  /// Count of ALL volumes whose bound intersects this node, including any
  /// dropped past the slot cap.
  pub num_volumes: u32,
  /// Slot ids of intersecting volumes, truncated at
  /// [`MAX_VOLUMES_PER_NODE`].
  pub vol_indices: SmallVec<[u32; 16]>,
  /// Componentwise minimum extinction over assigned volumes.
  /// Identity: +INF per component.
  pub min_extinction: Vec3,
  /// Componentwise maximum extinction over assigned volumes.
  /// Identity: 0 per component.
  pub max_extinction: Vec3,
}

impl OctNode {
  pub(crate) fn new(depth: u32) -> Self {
    Self {
      bbox: Aabb::empty(),
      depth,
      has_children: depth > 0,
      num_volumes: 0,
      vol_indices: SmallVec::new(),
      min_extinction: Vec3::INFINITY,
      max_extinction: Vec3::ZERO,
    }
  }

  /// Fold one volume into this node's aggregates.
  ///
  /// The caller has already decided the volume belongs here (intersection
  /// against `bbox` for children, unconditional for the root).
  #[inline]
  pub(crate) fn fold_volume(&mut self, vol: &VolumeDescriptor) {
    if self.vol_indices.len() < MAX_VOLUMES_PER_NODE {
      self.vol_indices.push(vol.slot);
    }
    self.num_volumes += 1;
    self.min_extinction = self.min_extinction.min(vol.min_extinction);
    self.max_extinction = self.max_extinction.max(vol.max_extinction);
  }

  /// Restore aggregate fields to their identities; structure untouched.
  pub(crate) fn clear(&mut self) {
    self.bbox = Aabb::empty();
    self.num_volumes = 0;
    self.vol_indices.clear();
    self.min_extinction = Vec3::INFINITY;
    self.max_extinction = Vec3::ZERO;
  }

  /// True if more volumes intersected this node than the slot cap holds.
  #[inline]
  pub fn overflowed(&self) -> bool {
    self.num_volumes as usize > self.vol_indices.len()
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
