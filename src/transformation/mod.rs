//! Transformation and decomposition of flat polygons.

pub use self::convex_hull2::{convex_hull2, convex_hull2_idx};
pub use self::ear_clipping::triangulate_ear_clipping;

mod convex_hull2;
mod ear_clipping;
