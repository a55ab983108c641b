//! Core data types: bounding boxes and volume descriptors.

use glam::{Affine3A, Vec3};

/// Axis-aligned bounding box in world space.
///
/// Starts from an inverted "empty" sentinel (min = +INF, max = -INF) so that
/// growing it by any point or box yields that point or box. This mirrors the
/// neutral-identity accumulation used for extinction ranges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
  /// Minimum corner (inclusive).
  pub min: Vec3,
  /// Maximum corner (inclusive).
  pub max: Vec3,
}

impl Aabb {
  /// Create an AABB with inverted extents (ready for growing).
  pub fn empty() -> Self {
    Self {
      min: Vec3::INFINITY,
      max: Vec3::NEG_INFINITY,
    }
  }

  /// Create an AABB from min and max corners.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    Self { min, max }
  }

  /// Expand to include a point.
  #[inline]
  pub fn grow(&mut self, point: Vec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  /// Expand to include another AABB.
  #[inline]
  pub fn grow_aabb(&mut self, other: &Aabb) {
    self.min = self.min.min(other.min);
    self.max = self.max.max(other.max);
  }

  /// Check if this AABB overlaps with another.
  ///
  /// Boxes that merely touch at a face, edge, or corner count as
  /// overlapping. This is an intersection test, not containment.
  #[inline]
  pub fn intersects(&self, other: &Aabb) -> bool {
    self.min.x <= other.max.x
      && self.max.x >= other.min.x
      && self.min.y <= other.max.y
      && self.max.y >= other.min.y
      && self.min.z <= other.max.z
      && self.max.z >= other.min.z
  }

  /// Check if this AABB contains a point (boundary inclusive).
  #[inline]
  pub fn contains_point(&self, point: Vec3) -> bool {
    point.x >= self.min.x
      && point.x <= self.max.x
      && point.y >= self.min.y
      && point.y <= self.max.y
      && point.z >= self.min.z
      && point.z <= self.max.z
  }

  /// Get the size of the AABB (max - min).
  #[inline]
  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  /// Get the center of the AABB.
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  /// Check if min <= max on all axes.
  pub fn is_valid(&self) -> bool {
    self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
  }

  /// Check if the box has strictly positive extent on all three axes.
  ///
  /// Flat (2-D) or degenerate boxes fail this test and are excluded from
  /// aggregation.
  pub fn is_volume(&self) -> bool {
    let size = self.size();
    size.x > 0.0 && size.y > 0.0 && size.z > 0.0
  }

  /// Transform the box by an affine transform, returning the AABB of the
  /// 8 transformed corners.
  pub fn transformed(&self, tfm: &Affine3A) -> Aabb {
    let mut out = Aabb::empty();
    for i in 0..8u8 {
      let corner = Vec3::new(
        if i & 1 == 0 { self.min.x } else { self.max.x },
        if i & 2 == 0 { self.min.y } else { self.max.y },
        if i & 4 == 0 { self.min.z } else { self.max.z },
      );
      out.grow(tfm.transform_point3(corner));
    }
    out
  }
}

impl Default for Aabb {
  fn default() -> Self {
    Self::empty()
  }
}

/// Metadata record describing one volumetric object, as supplied by the
/// external image/attribute provider.
///
/// The octree never inspects voxel data; it only sees each volume's world
/// bound, extinction range, grid depth, and an opaque slot id that the
/// traversal side uses to look the volume up again.
#[derive(Clone, Copy, Debug)]
pub struct VolumeDescriptor {
  /// World-space bounding box of the voxel grid.
  pub world_bound: Aabb,
  /// Voxel grid depth. A depth of 1 means flat (2-D image) data.
  pub depth: u32,
  /// Componentwise minimum extinction over the grid.
  pub min_extinction: Vec3,
  /// Componentwise maximum extinction over the grid.
  pub max_extinction: Vec3,
  /// Opaque slot id stored in node volume lists.
  pub slot: u32,
}

impl VolumeDescriptor {
  /// True if this descriptor carries genuine 3-D data: more than one voxel
  /// slice deep and a non-degenerate world bound on all three axes.
  ///
  /// Non-volumetric descriptors are silently excluded from aggregation.
  #[inline]
  pub fn is_volumetric(&self) -> bool {
    self.depth > 1 && self.world_bound.is_volume()
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
