//! Spatial partitioning tools.

pub use self::bvh::{Bvh, Bvh2, Bvh3, BvhNode};

mod bvh;
