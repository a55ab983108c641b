//! volume_octree - Framework/engine independent volume aggregate octree
//!
//! This crate maintains a bounded-depth octree over heterogeneous volumetric
//! objects (each carrying a world-space bounding box and an extinction range)
//! and serializes it into a flat, index-addressable node table a ray-tracing
//! traversal stage can consume without pointer access.
//!
//! # Features
//!
//! - **Fixed-topology skeleton**: the complete 8-ary tree is allocated once
//!   for a configured depth; per-frame updates only touch aggregate fields
//! - **Per-frame rebuild**: world bounds are refreshed in parallel as objects
//!   move, then aggregates are recomputed top-down
//! - **Flat device snapshot**: `FlatNode` records are plain-old-data and can
//!   be viewed as raw bytes for upload to a device buffer
//! - **Slab-method traversal**: analytic ray vs. root-box test reporting
//!   entry distance and whether the ray origin starts inside the volume
//!
//! # Example
//!
//! ```ignore
//! use volume_octree::{OctreeBuilder, Ray, traverse};
//! use glam::Vec3;
//!
//! let mut builder = OctreeBuilder::new(3);
//! builder.update(&descriptors);
//!
//! let nodes = builder.flatten();
//! let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, f32::MAX);
//!
//! if let Some(hit) = traverse::intersect_root(&ray, &nodes[0]) {
//!     println!("entered volume at t = {}", hit.t_enter);
//! }
//! ```

pub mod types;

// Re-export commonly used items
pub use types::{Aabb, VolumeDescriptor};

// Octree module: skeleton, per-frame aggregation, flat device snapshot
pub mod octree;
pub use octree::{FlatNode, OctNode, OctreeBuilder, MAX_VOLUMES_PER_NODE};

// Ray vs. volume bounds traversal
pub mod traverse;
pub use traverse::{Ray, VolumeHit};

// Per-frame update driver (parallel bound refresh + rebuild + device upload)
pub mod update;
pub use update::{CancelToken, DeviceSink, UpdateOutcome, UpdateStats, VolumeManager, VolumeObject};

// Engine-agnostic metrics collection
pub mod metrics;
