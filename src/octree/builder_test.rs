use glam::Vec3;

use super::*;
use crate::octree::node::MAX_VOLUMES_PER_NODE;
use crate::types::{Aabb, VolumeDescriptor};

fn unit_volume(slot: u32) -> VolumeDescriptor {
  VolumeDescriptor {
    world_bound: Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
    depth: 64,
    min_extinction: Vec3::splat(0.1),
    max_extinction: Vec3::splat(0.9),
    slot,
  }
}

#[test]
fn test_skeleton_sizes() {
  assert_eq!(OctreeBuilder::new(0).num_nodes(), 1);
  assert_eq!(OctreeBuilder::new(1).num_nodes(), 9);
  assert_eq!(OctreeBuilder::new(2).num_nodes(), 73);
  assert_eq!(OctreeBuilder::new(3).num_nodes(), 585);

  assert_eq!(OctreeBuilder::new(2).nodes().len(), 73);
}

#[test]
fn test_skeleton_depths_and_structure() {
  let builder = OctreeBuilder::new(2);
  let nodes = builder.nodes();

  assert_eq!(nodes[0].depth, 2);
  assert!(nodes[0].has_children);

  // Level 1: indices 1..=8
  for idx in 1..=8 {
    assert_eq!(nodes[idx].depth, 1);
    assert!(nodes[idx].has_children);
  }

  // Level 2 (leaves): indices 9..=72
  for idx in 9..73 {
    assert_eq!(nodes[idx].depth, 0);
    assert!(!nodes[idx].has_children);
  }
}

#[test]
fn test_single_volume_aggregation() {
  let mut builder = OctreeBuilder::new(1);
  builder.update(&[unit_volume(0)]);

  let root = builder.root();
  assert_eq!(root.num_volumes, 1);
  assert_eq!(root.bbox, Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)));
  assert_eq!(root.min_extinction, Vec3::splat(0.1));
  assert_eq!(root.max_extinction, Vec3::splat(0.9));

  // Every octant of [-1,1]^3 intersects the volume's own bound, so all 8
  // children report it too.
  for idx in 1..=8 {
    let child = &builder.nodes()[idx];
    assert_eq!(child.num_volumes, 1, "child {} should see the volume", idx);
    assert_eq!(child.vol_indices.as_slice(), &[0]);
    assert_eq!(child.min_extinction, Vec3::splat(0.1));
    assert_eq!(child.max_extinction, Vec3::splat(0.9));
  }
}

#[test]
fn test_volume_confined_to_one_octant() {
  // Two volumes: one spanning everything, one tucked into the upper-corner
  // octant. Only octant 7 (upper X, Y, Z) sees the second volume.
  let small = VolumeDescriptor {
    world_bound: Aabb::new(Vec3::splat(0.1), Vec3::splat(0.9)),
    depth: 32,
    min_extinction: Vec3::splat(0.3),
    max_extinction: Vec3::splat(0.4),
    slot: 1,
  };

  let mut builder = OctreeBuilder::new(1);
  builder.update(&[unit_volume(0), small]);

  assert_eq!(builder.root().num_volumes, 2);

  for octant in 0u8..8 {
    let child = &builder.nodes()[child_index(0, octant)];
    if octant == 7 {
      assert_eq!(child.num_volumes, 2);
      assert_eq!(child.vol_indices.as_slice(), &[0, 1]);
    } else {
      assert_eq!(child.num_volumes, 1);
      assert_eq!(child.vol_indices.as_slice(), &[0]);
    }
  }
}

#[test]
fn test_child_bboxes_partition_parent() {
  let mut builder = OctreeBuilder::new(2);
  builder.update(&[unit_volume(0)]);

  // Spot-check every interior node: children's union equals the parent box
  for idx in 0..9usize {
    let parent_bbox = builder.nodes()[idx].bbox;
    let mut union = Aabb::empty();
    for octant in 0u8..8 {
      union.grow_aabb(&builder.nodes()[child_index(idx, octant)].bbox);
    }
    assert_eq!(union, parent_bbox, "children of node {} must tile it", idx);
  }
}

#[test]
fn test_non_volumetric_descriptors_filtered() {
  let flat_image = VolumeDescriptor {
    depth: 1,
    ..unit_volume(0)
  };
  let degenerate = VolumeDescriptor {
    world_bound: Aabb::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)),
    ..unit_volume(1)
  };

  let mut builder = OctreeBuilder::new(1);
  builder.update(&[flat_image, degenerate]);

  assert_eq!(builder.root().num_volumes, 0);
  assert!(!builder.root().bbox.is_valid());
  for idx in 1..=8 {
    assert_eq!(builder.nodes()[idx].num_volumes, 0);
  }
}

#[test]
fn test_empty_update_is_noop() {
  let mut builder = OctreeBuilder::new(1);
  builder.update(&[]);

  assert_eq!(builder.root().num_volumes, 0);
  assert!(!builder.root().bbox.is_valid());
}

#[test]
fn test_reset_restores_identities() {
  let mut builder = OctreeBuilder::new(2);
  builder.update(&[unit_volume(0), unit_volume(1)]);
  assert!(builder.root().num_volumes > 0);

  builder.reset();

  for node in builder.nodes() {
    assert_eq!(node.num_volumes, 0);
    assert!(node.vol_indices.is_empty());
    assert_eq!(node.min_extinction, Vec3::INFINITY);
    assert_eq!(node.max_extinction, Vec3::ZERO);
    assert!(!node.bbox.is_valid());
  }

  // Structure survives
  assert!(builder.root().has_children);
  assert_eq!(builder.num_nodes(), 73);

  // Resetting again changes nothing
  builder.reset();
  assert_eq!(builder.root().num_volumes, 0);
}

#[test]
fn test_per_frame_rebuild_reflects_movement() {
  let mut builder = OctreeBuilder::new(1);
  builder.update(&[unit_volume(0)]);
  assert_eq!(builder.root().bbox.max, Vec3::splat(1.0));

  // Next frame: the volume moved
  let moved = VolumeDescriptor {
    world_bound: Aabb::new(Vec3::splat(9.0), Vec3::splat(11.0)),
    ..unit_volume(0)
  };
  builder.reset();
  builder.update(&[moved]);

  assert_eq!(builder.root().num_volumes, 1);
  assert_eq!(builder.root().bbox.min, Vec3::splat(9.0));
  assert_eq!(builder.root().bbox.max, Vec3::splat(11.0));
}

/// Feeding more than the slot cap into one node must not corrupt anything:
/// the list truncates at the cap while the count keeps the true total.
#[test]
fn test_capacity_overflow_is_observable() {
  let count = MAX_VOLUMES_PER_NODE + 76;
  let volumes: Vec<VolumeDescriptor> = (0..count).map(|i| unit_volume(i as u32)).collect();

  let mut builder = OctreeBuilder::new(1);
  builder.update(&volumes);

  let root = builder.root();
  assert_eq!(root.vol_indices.len(), MAX_VOLUMES_PER_NODE);
  assert_eq!(root.num_volumes as usize, count);
  assert!(root.overflowed());

  // Stored slots are the first CAP ids, in feed order
  assert_eq!(root.vol_indices[0], 0);
  assert_eq!(
    root.vol_indices[MAX_VOLUMES_PER_NODE - 1],
    (MAX_VOLUMES_PER_NODE - 1) as u32
  );

  // All 9 nodes see every volume, so all 9 overflow
  assert_eq!(builder.overflowed_nodes(), 9);

  // The flattened record reports the usable (truncated) count
  let flat = builder.flatten();
  assert_eq!(flat[0].num_volumes as usize, MAX_VOLUMES_PER_NODE);
}

#[test]
fn test_no_overflow_reported_when_under_cap() {
  let mut builder = OctreeBuilder::new(1);
  builder.update(&[unit_volume(0), unit_volume(1)]);
  assert_eq!(builder.overflowed_nodes(), 0);
}
