//! Various unsorted geometrical and logical operators.

pub use self::point_in_poly2d::point_in_poly2d;
pub use self::point_in_triangle::{
    barycentric, orient2d, orientation, point_in_triangle, Barycentric, Orientation,
};
pub use self::segments_intersection::{segment_intersection_toi, segments_intersect};

mod point_in_poly2d;
mod point_in_triangle;
mod segments_intersection;
