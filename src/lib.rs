/*!
sightline
=========

**sightline** answers line-of-sight and collision questions between a viewer
and a target in a plan-view scene with elevation. Obstacles (walls, tiles,
tokens and arbitrary triangles) are indexed by a bounding volume hierarchy so
that each query only runs the exact geometric tests on the few obstacles whose
bounding boxes the sight line actually crosses.

The crate is organized as follows:

- [`bounding_volume`]: axis-aligned bounding boxes, generic over the dimension.
- [`query`]: rays, planes and the exact intersection kernels.
- [`shape`]: flat polygons in 3D space and their aggregates.
- [`blocking`]: the obstacle variants and the [`blocking::BlockingObject`] contract.
- [`partitioning`]: the bounding volume hierarchy.
- [`scene`]: a host-facing index that keeps the hierarchies in sync with a scene.
- [`transformation`]: convex hulls and triangulation of plan-view outlines.
- [`utils`]: small 2D predicates shared by the above.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;

pub mod blocking;
pub mod bounding_volume;
mod error;
pub mod partitioning;
pub mod query;
pub mod scene;
pub mod shape;
pub mod transformation;
pub mod utils;

pub use error::BvhError;

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    /// The scalar type used throughout this crate.
    pub use f64 as Real;

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = 1.0e-8;

    /// The elevation used for obstacles without an explicit top or bottom.
    pub const MAX_ELEVATION: Real = 1.0e6;

    /// A point with `D` coordinates.
    pub type Point<const D: usize> = na::Point<Real, D>;

    /// A vector with `D` components.
    pub type Vector<const D: usize> = na::SVector<Real, D>;

    /// A plan-view point.
    pub type Point2 = na::Point2<Real>;
    /// A point in plan-view coordinates plus elevation.
    pub type Point3 = na::Point3<Real>;
    /// A plan-view vector.
    pub type Vector2 = na::Vector2<Real>;
    /// A vector in plan-view coordinates plus elevation.
    pub type Vector3 = na::Vector3<Real>;
}
