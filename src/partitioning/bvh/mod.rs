pub use bvh_tree::{Bvh, Bvh2, Bvh3, BvhNode};

mod bvh_build;
mod bvh_debug;
mod bvh_refit;
mod bvh_traverse;
mod bvh_tree;
mod bvh_validation;
