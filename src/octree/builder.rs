//! OctreeBuilder - owns the node arena and recomputes it every frame.

use crate::types::VolumeDescriptor;

use super::flatten::FlatNode;
use super::node::{child_index, num_nodes_for_depth, octant_bbox, OctNode};

/// Builds and owns the volume octree.
///
/// The skeleton (arena size, per-node depth, `has_children`) is fixed by
/// [`OctreeBuilder::new`] and lives for the builder's lifetime. Each frame:
/// [`reset`](OctreeBuilder::reset) clears aggregates,
/// [`update`](OctreeBuilder::update) recomputes them from the current
/// descriptor set, and [`flatten`](OctreeBuilder::flatten) snapshots the
/// arena into device records.
pub struct OctreeBuilder {
  nodes: Vec<OctNode>,
  depth: u32,
}

impl OctreeBuilder {
  /// Allocate the complete 8-ary tree skeleton for the given depth.
  ///
  /// Node `i`'s children occupy arena slots `8*i + 1 ..= 8*i + 8`; level
  /// `l` of the tree is the contiguous range starting at `(8^l - 1) / 7`.
  /// No bounding boxes are assigned here - bounds are data-dependent and
  /// computed in `update`.
  pub fn new(depth: u32) -> Self {
    let mut nodes = Vec::with_capacity(num_nodes_for_depth(depth));
    let mut level_count = 1usize;
    for level in 0..=depth {
      let below = depth - level;
      for _ in 0..level_count {
        nodes.push(OctNode::new(below));
      }
      level_count *= 8;
    }

    Self { nodes, depth }
  }

  /// Configured depth below the root.
  #[inline]
  pub fn depth(&self) -> u32 {
    self.depth
  }

  /// Total node count: `(8^(depth+1) - 1) / 7`. Pure function of the
  /// configuration, independent of population.
  #[inline]
  pub fn num_nodes(&self) -> usize {
    num_nodes_for_depth(self.depth)
  }

  /// The root node (arena slot 0).
  #[inline]
  pub fn root(&self) -> &OctNode {
    &self.nodes[0]
  }

  /// Read access to the arena, indexed by node id.
  #[inline]
  pub fn nodes(&self) -> &[OctNode] {
    &self.nodes
  }

  /// Recompute every node's aggregates from the given descriptor set.
  ///
  /// Only volumetric descriptors participate (`depth > 1`, non-degenerate
  /// world bound); the rest are filtered without signaling. The root bound
  /// grows to the union of all participating volumes, then each level
  /// splits its parent's box into octants and assigns every volume whose
  /// bound intersects the octant. A parent's box is always finalized
  /// before its children's boxes are derived from it.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::update"))]
  pub fn update(&mut self, volumes: &[VolumeDescriptor]) {
    if self.nodes.is_empty() {
      return;
    }

    for vol in volumes.iter().filter(|v| v.is_volumetric()) {
      let root = &mut self.nodes[0];
      root.bbox.grow_aabb(&vol.world_bound);
      root.fold_volume(vol);
    }

    // Nothing volumetric this frame: children keep their cleared state
    // rather than inheriting splits of the empty sentinel.
    if !self.nodes[0].bbox.is_valid() {
      return;
    }

    self.update_rec(0, volumes);
  }

  fn update_rec(&mut self, idx: usize, volumes: &[VolumeDescriptor]) {
    if !self.nodes[idx].has_children {
      return;
    }

    let parent_bbox = self.nodes[idx].bbox;
    for octant in 0..8u8 {
      let child = child_index(idx, octant);
      let child_bbox = octant_bbox(&parent_bbox, octant);
      self.nodes[child].bbox = child_bbox;

      for vol in volumes.iter().filter(|v| v.is_volumetric()) {
        if vol.world_bound.intersects(&child_bbox) {
          self.nodes[child].fold_volume(vol);
        }
      }

      self.update_rec(child, volumes);
    }
  }

  /// Clear every node's aggregates back to their identity values,
  /// leaving the skeleton untouched. Idempotent.
  pub fn reset(&mut self) {
    for node in &mut self.nodes {
      node.clear();
    }
  }

  /// Count of nodes whose volume list was truncated in the last update.
  pub fn overflowed_nodes(&self) -> usize {
    self.nodes.iter().filter(|n| n.overflowed()).count()
  }

  /// Snapshot the arena into dense device records.
  ///
  /// `out[i]` is derived from node `i`, so `out[0]` is always the root and
  /// the child indices baked into each record address the same array. The
  /// snapshot is decoupled from the tree: later updates do not affect a
  /// previously produced array.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::flatten"))]
  pub fn flatten(&self) -> Vec<FlatNode> {
    self
      .nodes
      .iter()
      .enumerate()
      .map(|(idx, node)| FlatNode::from_node(idx, node))
      .collect()
  }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
