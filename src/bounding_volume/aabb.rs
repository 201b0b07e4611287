//! Axis Aligned Bounding Box.

use crate::bounding_volume::BoundingVolume;
use crate::math::{Point, Real, Vector};

/// An Axis-Aligned Bounding Box (AABB) with `D` dimensions.
///
/// An AABB is defined by its minimum and maximum corners. Once computed from at least one
/// point, `mins[i] <= maxs[i]` holds on every axis. A box built with [`Aabb::new_invalid`] has
/// both corners at their respective infinities and acts as the neutral element of
/// [`BoundingVolume::merge`].
///
/// # Example
///
/// ```rust
/// use sightline::bounding_volume::Aabb3;
/// use sightline::math::Point3;
///
/// let aabb = Aabb3::from_points([
///     Point3::new(1.0, 2.0, 3.0),
///     Point3::new(-1.0, 4.0, 2.0),
/// ]);
///
/// assert_eq!(aabb.mins, Point3::new(-1.0, 2.0, 2.0));
/// assert_eq!(aabb.maxs, Point3::new(1.0, 4.0, 3.0));
/// ```
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Aabb<const D: usize> {
    /// The point with minimum coordinates.
    pub mins: Point<D>,
    /// The point with maximum coordinates.
    pub maxs: Point<D>,
}

/// A 2D axis-aligned bounding box, used for plan-view indexes.
pub type Aabb2 = Aabb<2>;
/// A 3D axis-aligned bounding box, the third axis being the elevation.
pub type Aabb3 = Aabb<3>;

impl<const D: usize> Aabb<D> {
    /// Creates a new AABB.
    #[inline]
    pub fn new(mins: Point<D>, maxs: Point<D>) -> Self {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` at `+∞` and `maxs` at `-∞`.
    ///
    /// Merging any valid AABB or point into it yields that AABB or point.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::<D>::repeat(Real::INFINITY).into(),
            Vector::<D>::repeat(Real::NEG_INFINITY).into(),
        )
    }

    /// Creates a new AABB from its center and its half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<D>, half_extents: Vector<D>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Computes the smallest AABB enclosing a set of points.
    ///
    /// Returns an invalid AABB if the set is empty.
    pub fn from_points<I>(pts: I) -> Self
    where
        I: IntoIterator<Item = Point<D>>,
    {
        let mut result = Self::new_invalid();
        for pt in pts {
            result.take_point(pt);
        }
        result
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<D> {
        na::center(&self.mins, &self.maxs)
    }

    /// The extents of this AABB, i.e., `maxs - mins`.
    #[inline]
    pub fn extents(&self) -> Vector<D> {
        self.maxs - self.mins
    }

    /// The half-extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<D> {
        self.extents() * 0.5
    }

    /// The squared length of the diagonal joining both corners.
    ///
    /// Returns zero for an invalid AABB.
    #[inline]
    pub fn diagonal_squared(&self) -> Real {
        if self.is_valid() {
            self.extents().norm_squared()
        } else {
            0.0
        }
    }

    /// The split cost of a node bounded by this AABB and containing `count` objects.
    ///
    /// This is `count² × diagonal²`, a variance-like proxy for the surface area heuristic.
    #[inline]
    pub fn split_cost(&self, count: usize) -> Real {
        let count = count as Real;
        count * count * self.diagonal_squared()
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    #[inline]
    pub fn take_point(&mut self, pt: Point<D>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Does this AABB satisfy `mins[i] <= maxs[i]` on every axis?
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..D).all(|i| self.mins[i] <= self.maxs[i])
    }

    /// Does this AABB contain the given point (boundary included)?
    #[inline]
    pub fn contains_point(&self, point: &Point<D>) -> bool {
        (0..D).all(|i| point[i] >= self.mins[i] && point[i] <= self.maxs[i])
    }

    /// Translates this AABB.
    #[inline]
    #[must_use]
    pub fn translated(mut self, translation: &Vector<D>) -> Self {
        self.mins += translation;
        self.maxs += translation;
        self
    }
}

impl Aabb<3> {
    /// The plan-view projection of this AABB (elevation dropped).
    #[inline]
    pub fn xy(&self) -> Aabb<2> {
        Aabb::new(self.mins.xy(), self.maxs.xy())
    }

    /// The elevation range `[mins.z, maxs.z]` of this AABB.
    #[inline]
    pub fn elevation_range(&self) -> (Real, Real) {
        (self.mins.z, self.maxs.z)
    }
}

impl Aabb<2> {
    /// Lifts this plan-view AABB into 3D, spanning the elevation range `[bottom, top]`.
    #[inline]
    pub fn with_elevation(&self, bottom: Real, top: Real) -> Aabb<3> {
        Aabb::new(
            crate::math::Point3::new(self.mins.x, self.mins.y, bottom.min(top)),
            crate::math::Point3::new(self.maxs.x, self.maxs.y, bottom.max(top)),
        )
    }
}

impl<const D: usize> BoundingVolume<D> for Aabb<D> {
    #[inline]
    fn center(&self) -> Point<D> {
        self.center()
    }

    #[inline]
    fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|i| self.mins[i] <= other.maxs[i] && self.maxs[i] >= other.mins[i])
    }

    #[inline]
    fn contains(&self, other: &Self) -> bool {
        (0..D).all(|i| self.mins[i] <= other.mins[i] && self.maxs[i] >= other.maxs[i])
    }

    #[inline]
    fn merge(&mut self, other: &Self) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    #[inline]
    fn merged(&self, other: &Self) -> Self {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }

    #[inline]
    fn loosen(&mut self, amount: Real) {
        assert!(amount >= 0.0, "The loosening margin must be positive.");
        self.mins += Vector::<D>::repeat(-amount);
        self.maxs += Vector::<D>::repeat(amount);
    }

    #[inline]
    fn loosened(&self, amount: Real) -> Self {
        assert!(amount >= 0.0, "The loosening margin must be positive.");
        Aabb {
            mins: self.mins + Vector::<D>::repeat(-amount),
            maxs: self.maxs + Vector::<D>::repeat(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point2, Point3};

    #[test]
    fn invalid_aabb_is_merge_identity() {
        let aabb = Aabb3::new(Point3::new(-1.0, 0.0, 2.0), Point3::new(1.0, 3.0, 4.0));
        let invalid = Aabb3::new_invalid();
        assert!(!invalid.is_valid());
        assert_eq!(invalid.merged(&aabb), aabb);
        assert_eq!(invalid.diagonal_squared(), 0.0);
    }

    #[test]
    fn split_cost_is_count_squared_times_diagonal_squared() {
        let aabb = Aabb2::new(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0));
        assert_relative_eq!(aabb.diagonal_squared(), 25.0);
        assert_relative_eq!(aabb.split_cost(3), 225.0);
    }

    #[test]
    fn projection_and_lift() {
        let aabb = Aabb3::new(Point3::new(-1.0, -2.0, -3.0), Point3::new(1.0, 2.0, 3.0));
        let plan = aabb.xy();
        assert_eq!(plan.mins, Point2::new(-1.0, -2.0));
        assert_eq!(plan.with_elevation(3.0, -3.0), aabb);
    }

    #[test]
    fn contains_and_intersects() {
        let big = Aabb2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        let small = Aabb2::new(Point2::new(2.0, 2.0), Point2::new(3.0, 3.0));
        let far = Aabb2::new(Point2::new(20.0, 2.0), Point2::new(23.0, 3.0));
        assert!(big.contains(&small));
        assert!(!small.contains(&big));
        assert!(big.intersects(&small));
        assert!(!big.intersects(&far));
        assert!(big.contains_point(&Point2::new(10.0, 0.0)));
    }
}
