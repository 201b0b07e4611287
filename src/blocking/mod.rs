//! Obstacles that may block a line of sight.
//!
//! Every obstacle kind implements [`BlockingObject`], the only contract the
//! [`Bvh`](crate::partitioning::Bvh) relies upon: an AABB used for pruning, and
//! an exact test run on the leaves that survive it. [`Blocker`] is the closed set
//! of obstacle kinds a scene is made of.
//!
//! Obstacles implement the contract in 3D, where the third axis is the elevation,
//! and in plan view. In plan view, walls, tokens and triangles are treated as
//! prisms extruded from their footprint while tiles, being flat floors, never block.

pub use self::tile::{AlphaMask, TileBlocker, TileFlags};
pub use self::token::TokenBlocker;
pub use self::triangle::TriangleBlocker;
pub use self::wall::{DoorState, SenseLevel, WallBlocker, WallDirection, WallSenses};

mod tile;
mod token;
mod triangle;
mod wall;

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, MAX_ELEVATION};
use crate::query::{QueryOptions, Ray};

/// The contract between the hierarchy and the objects it indexes.
pub trait BlockingObject<const D: usize> {
    /// The bounding box of this object.
    fn aabb(&self) -> Aabb<D>;

    /// The point used to sort this object while building a hierarchy.
    fn centroid(&self) -> Point<D> {
        self.aabb().center()
    }

    /// Coarse test: does the ray cross the bounding box of this object?
    #[inline]
    fn has_bounds_intersection(&self, ray: &Ray<D>) -> bool {
        ray.intersects_aabb(&self.aabb())
    }

    /// Exact test: the parameter along `ray` at which this object blocks it, if any.
    fn object_intersection(&self, ray: &Ray<D>, opts: &QueryOptions) -> Option<Real>;

    /// Exact test: does this object block `ray`?
    #[inline]
    fn has_object_intersection(&self, ray: &Ray<D>, opts: &QueryOptions) -> bool {
        self.object_intersection(ray, opts).is_some()
    }

    /// The elevation band `[bottom, top]` covered by this object.
    fn elevation_range(&self) -> (Real, Real);
}

/// A bare box blocks every ray crossing it.
impl<const D: usize> BlockingObject<D> for Aabb<D> {
    #[inline]
    fn aabb(&self) -> Aabb<D> {
        *self
    }

    #[inline]
    fn object_intersection(&self, ray: &Ray<D>, _: &QueryOptions) -> Option<Real> {
        ray.aabb_entry(self)
    }

    fn elevation_range(&self) -> (Real, Real) {
        if D > 2 {
            (self.mins[2], self.maxs[2])
        } else {
            (-MAX_ELEVATION, MAX_ELEVATION)
        }
    }
}

/// Any obstacle of a scene.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Blocker {
    /// A wall segment extruded between two elevations.
    Wall(WallBlocker),
    /// A horizontal floor tile, possibly partially transparent.
    Tile(TileBlocker),
    /// A token volume.
    Token(TokenBlocker),
    /// An arbitrary triangle.
    Triangle(TriangleBlocker),
}

impl From<WallBlocker> for Blocker {
    fn from(wall: WallBlocker) -> Self {
        Blocker::Wall(wall)
    }
}

impl From<TileBlocker> for Blocker {
    fn from(tile: TileBlocker) -> Self {
        Blocker::Tile(tile)
    }
}

impl From<TokenBlocker> for Blocker {
    fn from(token: TokenBlocker) -> Self {
        Blocker::Token(token)
    }
}

impl From<TriangleBlocker> for Blocker {
    fn from(triangle: TriangleBlocker) -> Self {
        Blocker::Triangle(triangle)
    }
}

impl Blocker {
    /// The plane containing this obstacle, if it is planar and not degenerate.
    pub fn plane(&self) -> Option<crate::shape::Plane> {
        match self {
            Blocker::Wall(wall) => wall.plane().copied(),
            Blocker::Tile(tile) => Some(tile.plane()),
            Blocker::Triangle(triangle) => triangle.plane(),
            Blocker::Token(_) => None,
        }
    }
}

macro_rules! dispatch(
    ($self: ident, $obj: ident => $e: expr) => {
        match $self {
            Blocker::Wall($obj) => $e,
            Blocker::Tile($obj) => $e,
            Blocker::Token($obj) => $e,
            Blocker::Triangle($obj) => $e,
        }
    }
);

impl BlockingObject<3> for Blocker {
    fn aabb(&self) -> Aabb<3> {
        dispatch!(self, obj => BlockingObject::<3>::aabb(obj))
    }

    fn centroid(&self) -> Point<3> {
        dispatch!(self, obj => BlockingObject::<3>::centroid(obj))
    }

    fn object_intersection(&self, ray: &Ray<3>, opts: &QueryOptions) -> Option<Real> {
        dispatch!(self, obj => BlockingObject::<3>::object_intersection(obj, ray, opts))
    }

    fn elevation_range(&self) -> (Real, Real) {
        dispatch!(self, obj => BlockingObject::<3>::elevation_range(obj))
    }
}

impl BlockingObject<2> for Blocker {
    fn aabb(&self) -> Aabb<2> {
        dispatch!(self, obj => BlockingObject::<2>::aabb(obj))
    }

    fn centroid(&self) -> Point<2> {
        dispatch!(self, obj => BlockingObject::<2>::centroid(obj))
    }

    fn object_intersection(&self, ray: &Ray<2>, opts: &QueryOptions) -> Option<Real> {
        dispatch!(self, obj => BlockingObject::<2>::object_intersection(obj, ray, opts))
    }

    fn elevation_range(&self) -> (Real, Real) {
        dispatch!(self, obj => BlockingObject::<2>::elevation_range(obj))
    }
}
