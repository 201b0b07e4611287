//! Non-persistent geometric queries.
//!
//! This module provides the exact kernels the hierarchy dispatches to once a
//! leaf survives bounding-box pruning:
//!
//! * [`Ray`] with the slab test against an [`Aabb`](crate::bounding_volume::Aabb).
//! * [`details::intersect_vertical_rectangle`] for wall segments.
//! * [`details::ray_triangle_toi`], the Möller–Trumbore ray/triangle test.
//! * [`VisionTriangle`], a coarse frustum used to collect potentially visible obstacles.
//! * [`details::clip_polygon_z`] to cut a flat polygon with a horizontal plane.
//!
//! The behavior of every obstacle test is tuned by [`QueryOptions`].

pub use self::query_options::{QueryOptions, SenseType};
pub use self::ray::{Ray, Ray2, Ray3};
pub use self::vision_triangle::VisionTriangle;

mod clip;
mod query_options;
mod ray;
mod vision_triangle;

/// Queries dedicated to specific pairs of primitives.
pub mod details {
    pub use super::clip::*;
    pub use super::ray::{intersect_vertical_rectangle, ray_triangle_toi};
}
