//! Bounding volumes.

#[doc(inline)]
pub use crate::bounding_volume::aabb::{Aabb, Aabb2, Aabb3};
#[doc(inline)]
pub use crate::bounding_volume::bounding_volume::BoundingVolume;

#[doc(hidden)]
pub mod aabb;
#[doc(hidden)]
pub mod bounding_volume;
