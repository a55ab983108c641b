//! Ray traversal against the flattened octree.
//!
//! The traversal side only sees [`FlatNode`] records by integer index, never
//! the builder's arena. The test implemented here is the whole-tree bounding
//! test: a slab-method intersection of the ray against the root record's
//! box, reporting the entry distance and whether the ray origin already sits
//! inside the volume bounds. Per-node descent into the octree for
//! empty-space skipping is an extension point on top of this.

use glam::Vec3;

use crate::octree::FlatNode;

/// Directions are clamped away from exact zero so the per-axis inverse
/// stays finite.
const DIR_EPS: f32 = 1e-6;

/// A ray with precomputed inverse direction.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
  /// Origin point.
  pub origin: Vec3,
  /// Direction, clamped away from zero per component. Not required to be
  /// normalized; entry distances are parametric in this direction.
  pub dir: Vec3,
  /// Componentwise inverse of `dir`.
  pub idir: Vec3,
  /// Maximum parametric distance; hits beyond this are rejected.
  pub t_max: f32,
}

impl Ray {
  /// Create a ray, clamping near-zero direction components.
  pub fn new(origin: Vec3, dir: Vec3, t_max: f32) -> Self {
    let dir = clamp_direction(dir);
    Self {
      origin,
      dir,
      idir: dir.recip(),
      t_max,
    }
  }
}

/// Replace direction components smaller than [`DIR_EPS`] in magnitude with
/// `±DIR_EPS`, keeping the sign.
#[inline]
fn clamp_direction(dir: Vec3) -> Vec3 {
  Vec3::new(
    clamp_component(dir.x),
    clamp_component(dir.y),
    clamp_component(dir.z),
  )
}

#[inline]
fn clamp_component(d: f32) -> f32 {
  if d.abs() < DIR_EPS {
    DIR_EPS.copysign(d)
  } else {
    d
  }
}

/// Result of a successful ray vs. volume bounds test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeHit {
  /// Parametric entry distance. 0 when the ray starts inside the box.
  pub t_enter: f32,
  /// True iff the ray origin lies within the box on all three axes.
  pub inside: bool,
}

/// Slab-method test of a ray against the root record's bounding box.
///
/// Returns `None` when the root tracks no volumes, when the box lies
/// entirely behind the origin, farther than `ray.t_max`, or when the ray
/// misses it. Stateless; invoked once per ray.
pub fn intersect_root(ray: &Ray, root: &FlatNode) -> Option<VolumeHit> {
  if root.num_volumes == 0 {
    return None;
  }

  let bmin = Vec3::from_array(root.bbox_min);
  let bmax = Vec3::from_array(root.bbox_max);

  let t1 = (bmin.x - ray.origin.x) * ray.idir.x;
  let t2 = (bmax.x - ray.origin.x) * ray.idir.x;
  let t3 = (bmin.y - ray.origin.y) * ray.idir.y;
  let t4 = (bmax.y - ray.origin.y) * ray.idir.y;
  let t5 = (bmin.z - ray.origin.z) * ray.idir.z;
  let t6 = (bmax.z - ray.origin.z) * ray.idir.z;

  let t_min = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
  let t_max = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

  if t_max <= 0.0 {
    return None; // box is behind
  }
  if t_min > ray.t_max {
    return None; // nearer hit already known
  }
  if t_min > t_max {
    return None; // ray missed
  }

  Some(VolumeHit {
    t_enter: t_min.max(0.0),
    inside: ray.origin.x >= bmin.x
      && ray.origin.x <= bmax.x
      && ray.origin.y >= bmin.y
      && ray.origin.y <= bmax.y
      && ray.origin.z >= bmin.z
      && ray.origin.z <= bmax.z,
  })
}
