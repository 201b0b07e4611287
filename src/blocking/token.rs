use crate::blocking::BlockingObject;
use crate::bounding_volume::{Aabb, Aabb2};
use crate::math::{Point, Point2, Real, Vector2};
use crate::query::{QueryOptions, Ray};

/// A token volume: a plan-view footprint extruded between two elevations.
///
/// Tokens only have a bounds test. They are frequently both the viewer and the
/// target of a query, in which case they are expected to be excluded through
/// [`QueryOptions::excluded`].
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct TokenBlocker {
    /// The center of the footprint.
    pub center: Point2,
    /// The half-width and half-height of the footprint.
    pub half_extents: Vector2,
    /// The elevation of the bottom of the token.
    pub bottom: Real,
    /// The elevation of the top of the token.
    pub top: Real,
}

impl TokenBlocker {
    /// A token with a `width × height` footprint centered on `center`.
    pub fn new(center: Point2, width: Real, height: Real, bottom: Real, top: Real) -> Self {
        TokenBlocker {
            center,
            half_extents: Vector2::new(width.abs(), height.abs()) * 0.5,
            bottom: bottom.min(top),
            top: bottom.max(top),
        }
    }

    /// The plan-view footprint of this token.
    pub fn footprint(&self) -> Aabb2 {
        Aabb2::from_half_extents(self.center, self.half_extents)
    }
}

impl BlockingObject<3> for TokenBlocker {
    fn aabb(&self) -> Aabb<3> {
        self.footprint().with_elevation(self.bottom, self.top)
    }

    fn object_intersection(&self, ray: &Ray<3>, _: &QueryOptions) -> Option<Real> {
        ray.aabb_entry(&BlockingObject::<3>::aabb(self))
    }

    fn elevation_range(&self) -> (Real, Real) {
        (self.bottom, self.top)
    }
}

impl BlockingObject<2> for TokenBlocker {
    fn aabb(&self) -> Aabb<2> {
        self.footprint()
    }

    fn centroid(&self) -> Point<2> {
        self.center
    }

    fn object_intersection(&self, ray: &Ray<2>, _: &QueryOptions) -> Option<Real> {
        ray.aabb_entry(&self.footprint())
    }

    fn elevation_range(&self) -> (Real, Real) {
        (self.bottom, self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::query::Ray3;

    #[test]
    fn token_blocks_rays_crossing_its_volume() {
        let token = TokenBlocker::new(Point2::new(5.0, 0.0), 2.0, 2.0, 0.0, 6.0);
        let opts = QueryOptions::default();
        let through = Ray3::from_points(Point3::new(0.0, 0.0, 1.0), Point3::new(10.0, 0.0, 1.0));
        let above = Ray3::from_points(Point3::new(0.0, 0.0, 7.0), Point3::new(10.0, 0.0, 7.0));

        assert_relative_eq!(token.object_intersection(&through, &opts).unwrap(), 0.4);
        assert!(!token.has_object_intersection(&above, &opts));
        assert_eq!(
            BlockingObject::<3>::aabb(&token).maxs,
            Point3::new(6.0, 1.0, 6.0)
        );
    }
}
