//! The parametric ray used by every visibility query.

use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};

/// A ray for ray-casting queries.
///
/// A ray starts at `origin` and points along `dir`. The points it covers are
/// `origin + dir * t` for `t` in `[0, max_toi]`:
///
/// * A ray built with [`Ray::from_points`] is a **segment** from the viewer to the
///   target: `dir` is not normalized and `max_toi` is `1`.
/// * A ray built with [`Ray::from_points_normalized`] has a unit direction and
///   `max_toi` is the distance between both points, so times of impact are
///   expressed in world units.
///
/// The reciprocal of the direction is memoized at construction. Components of
/// the direction equal to zero yield infinite reciprocals, which the slab test
/// relies upon. Rays are immutable once built.
///
/// # Example
///
/// ```rust
/// use sightline::math::Point3;
/// use sightline::query::Ray3;
///
/// let ray = Ray3::from_points(Point3::origin(), Point3::new(10.0, 0.0, 0.0));
/// assert_eq!(ray.point_at(0.5), Point3::new(5.0, 0.0, 0.0));
/// assert_eq!(ray.max_toi(), 1.0);
/// assert_eq!(ray.distance_squared(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray<const D: usize> {
    origin: Point<D>,
    dir: Vector<D>,
    inv_dir: Vector<D>,
    distance_squared: Real,
    max_toi: Real,
}

/// A plan-view ray.
pub type Ray2 = Ray<2>;
/// A ray in plan-view coordinates plus elevation.
pub type Ray3 = Ray<3>;

impl<const D: usize> Ray<D> {
    /// Creates a new ray from an origin point and a direction vector.
    ///
    /// The ray is a segment of parametric length `1`.
    pub fn new(origin: Point<D>, dir: Vector<D>) -> Self {
        Self::with_max_toi(origin, dir, dir.norm_squared(), 1.0)
    }

    /// Creates the segment ray going from `origin` to `target`.
    pub fn from_points(origin: Point<D>, target: Point<D>) -> Self {
        Self::new(origin, target - origin)
    }

    /// Creates a ray going from `origin` towards `target` with a unit direction.
    ///
    /// Its maximum time of impact is the distance between both points. If both
    /// points coincide, the direction is zero and the ray hits nothing but the
    /// boxes containing its origin.
    pub fn from_points_normalized(origin: Point<D>, target: Point<D>) -> Self {
        let delta = target - origin;
        let distance = delta.norm();
        let dir = if distance > DEFAULT_EPSILON {
            delta / distance
        } else {
            Vector::<D>::zeros()
        };

        Self::with_max_toi(origin, dir, distance * distance, distance)
    }

    fn with_max_toi(origin: Point<D>, dir: Vector<D>, distance_squared: Real, max_toi: Real) -> Self {
        Ray {
            origin,
            dir,
            inv_dir: dir.map(|e| 1.0 / e),
            distance_squared,
            max_toi,
        }
    }

    /// The starting point of this ray.
    #[inline]
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// The direction of this ray.
    #[inline]
    pub fn dir(&self) -> &Vector<D> {
        &self.dir
    }

    /// The component-wise reciprocal of the direction.
    #[inline]
    pub fn inv_dir(&self) -> &Vector<D> {
        &self.inv_dir
    }

    /// The squared distance between the origin and the target of this ray.
    #[inline]
    pub fn distance_squared(&self) -> Real {
        self.distance_squared
    }

    /// The parameter of the target point: `1` for segment rays, the distance
    /// for normalized rays.
    #[inline]
    pub fn max_toi(&self) -> Real {
        self.max_toi
    }

    /// The point at the end of this ray.
    #[inline]
    pub fn target(&self) -> Point<D> {
        self.point_at(self.max_toi)
    }

    /// Computes the point at the given parameter along this ray.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<D> {
        self.origin + self.dir * t
    }

    /// Is `t` strictly between the origin and the target?
    #[inline]
    pub fn contains_toi(&self, t: Real) -> bool {
        t > DEFAULT_EPSILON && t < self.max_toi
    }
}

impl Ray<3> {
    /// The plan-view projection of this ray, elevation dropped.
    ///
    /// The result is always a segment ray joining the projections of the
    /// origin and of the target.
    pub fn project2d(&self) -> Ray<2> {
        Ray::from_points(self.origin.xy(), self.target().xy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point2, Point3};

    #[test]
    fn normalized_ray_measures_distances() {
        let ray = Ray3::from_points_normalized(Point3::new(1.0, 0.0, 0.0), Point3::new(4.0, 4.0, 0.0));
        assert_relative_eq!(ray.max_toi(), 5.0);
        assert_relative_eq!(ray.distance_squared(), 25.0);
        assert_relative_eq!(ray.dir().norm(), 1.0);
        assert_relative_eq!(ray.target(), Point3::new(4.0, 4.0, 0.0), epsilon = 1.0e-9);
    }

    #[test]
    fn zero_components_have_infinite_reciprocals() {
        let ray = Ray2::from_points(Point2::origin(), Point2::new(0.0, 3.0));
        assert!(ray.inv_dir().x.is_infinite());
        assert_relative_eq!(ray.inv_dir().y, 1.0 / 3.0);
    }

    #[test]
    fn projection_keeps_the_plan_view_segment() {
        let ray = Ray3::from_points_normalized(Point3::new(0.0, 0.0, 2.0), Point3::new(3.0, 4.0, 8.0));
        let plan = ray.project2d();
        assert_eq!(plan.origin(), &Point2::origin());
        assert_relative_eq!(plan.target(), Point2::new(3.0, 4.0), epsilon = 1.0e-9);
        assert_eq!(plan.max_toi(), 1.0);
    }
}
