//! FlatNode - plain-old-data snapshot record consumed by the traversal
//! side, which addresses nodes by integer index only.

use bytemuck::{Pod, Zeroable};

use super::node::{child_index, parent_index, OctNode, MAX_VOLUMES_PER_NODE};

/// One node record in the flattened octree, in the exact layout copied to
/// the device buffer.
///
/// Index-linked: `child_idx` entries address the flattened array itself and
/// are only meaningful when `has_children != 0`. The root record sits at
/// index 0 and carries `parent_idx == 0`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FlatNode {
  /// World bounds minimum corner.
  pub bbox_min: [f32; 3],
  /// World bounds maximum corner.
  pub bbox_max: [f32; 3],
  /// Componentwise minimum extinction of assigned volumes.
  pub min_extinction: [f32; 3],
  /// Componentwise maximum extinction of assigned volumes.
  pub max_extinction: [f32; 3],
  /// Recursion levels remaining below this node.
  pub depth: i32,
  /// Non-zero iff the node has children.
  pub has_children: u32,
  /// Index of the parent record (0 for the root itself).
  pub parent_idx: u32,
  /// Number of valid entries in `vol_indices`. This is the post-truncation
  /// count - the device side can iterate it without bounds concern.
  pub num_volumes: u32,
  /// Indices of the 8 child records.
  pub child_idx: [u32; 8],
  /// Slot ids of volumes intersecting this node.
  pub vol_indices: [u32; MAX_VOLUMES_PER_NODE],
}

impl FlatNode {
  /// Build the device record for the node at arena slot `idx`.
  pub(crate) fn from_node(idx: usize, node: &OctNode) -> Self {
    let mut vol_indices = [0u32; MAX_VOLUMES_PER_NODE];
    vol_indices[..node.vol_indices.len()].copy_from_slice(&node.vol_indices);

    let mut child_idx = [0u32; 8];
    if node.has_children {
      for (octant, slot) in child_idx.iter_mut().enumerate() {
        *slot = child_index(idx, octant as u8) as u32;
      }
    }

    Self {
      bbox_min: node.bbox.min.to_array(),
      bbox_max: node.bbox.max.to_array(),
      min_extinction: node.min_extinction.to_array(),
      max_extinction: node.max_extinction.to_array(),
      depth: node.depth as i32,
      has_children: node.has_children as u32,
      parent_idx: parent_index(idx).unwrap_or(0) as u32,
      num_volumes: node.vol_indices.len() as u32,
      child_idx,
      vol_indices,
    }
  }
}

/// View a flattened snapshot as raw bytes for the device buffer sink.
pub fn as_bytes(nodes: &[FlatNode]) -> &[u8] {
  bytemuck::cast_slice(nodes)
}

#[cfg(test)]
#[path = "flatten_test.rs"]
mod flatten_test;
