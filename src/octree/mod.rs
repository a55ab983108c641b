//! Volume aggregate octree.
//!
//! The tree has a fixed topology chosen at construction time: a complete
//! 8-ary tree of configurable depth, stored in a single contiguous arena.
//! Node ids are implicit in the arena layout — node `i`'s children occupy
//! `8*i + 1 ..= 8*i + 8` — so parent/child relationships are pure index
//! math and the arena order is exactly the order the device consumer
//! addresses nodes by.
//!
//! Per frame, aggregate fields (bounding box, volume lists, extinction
//! range) are cleared and recomputed top-down from the current set of
//! volume descriptors; the structure itself never changes.
//!
//! # Module Structure
//!
//! - [`node`]: `OctNode` arena entry plus index math and the octant split
//! - [`builder`]: `OctreeBuilder` - init / update / reset / flatten
//! - [`flatten`]: `FlatNode` - plain-old-data device snapshot records

pub mod builder;
pub mod flatten;
pub mod node;

// Re-exports
pub use builder::OctreeBuilder;
pub use flatten::FlatNode;
pub use node::{
  child_index, num_nodes_for_depth, octant_bbox, parent_index, OctNode, MAX_VOLUMES_PER_NODE,
};
