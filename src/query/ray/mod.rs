//! Ray-casting related definitions and implementations.

#[doc(inline)]
pub use self::ray::{Ray, Ray2, Ray3};
pub use self::ray_plane::intersect_vertical_rectangle;
pub use self::ray_triangle::ray_triangle_toi;

#[doc(hidden)]
pub mod ray;
mod ray_aabb;
mod ray_plane;
mod ray_triangle;
