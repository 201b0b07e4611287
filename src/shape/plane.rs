use crate::math::{Point2, Point3, Real, Vector3, DEFAULT_EPSILON};
use crate::query::Ray3;
use na::Unit;

/// An infinite plane with an orthonormal local frame.
///
/// The frame `(u, v, normal)` is right-handed. It is used to flatten points
/// lying on the plane into 2D coordinates, e.g., to run point-in-polygon tests
/// on flat 3D polygons. A plane with a `+z` normal maps `x` to `u` and `y` to `v`.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    point: Point3,
    normal: Unit<Vector3>,
    u: Vector3,
    v: Vector3,
}

impl Plane {
    /// Creates the plane going through `point` and orthogonal to `normal`.
    ///
    /// Returns `None` if `normal` is too close to zero.
    pub fn new(point: Point3, normal: Vector3) -> Option<Self> {
        Unit::try_new(normal, DEFAULT_EPSILON).map(|n| Self::from_unit_normal(point, n))
    }

    /// Creates the plane going through `point` and orthogonal to the unit `normal`.
    pub fn from_unit_normal(point: Point3, normal: Unit<Vector3>) -> Self {
        let axis = if normal.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let u = (axis - normal.into_inner() * normal.dot(&axis)).normalize();
        let v = normal.cross(&u);

        Plane {
            point,
            normal,
            u,
            v,
        }
    }

    /// The plane containing the triangle `a, b, c`, oriented by its
    /// counter-clockwise winding.
    ///
    /// Returns `None` if the points are collinear.
    pub fn from_points(a: &Point3, b: &Point3, c: &Point3) -> Option<Self> {
        Self::new(*a, (b - a).cross(&(c - a)))
    }

    /// The vertical plane containing the plan-view segment `a, b`.
    ///
    /// Its normal points to the left of `a → b`. Returns `None` if both points
    /// coincide.
    pub fn vertical(a: &Point2, b: &Point2) -> Option<Self> {
        let dir = b - a;
        Self::new(Point3::new(a.x, a.y, 0.0), Vector3::new(-dir.y, dir.x, 0.0))
    }

    /// The horizontal plane at elevation `z`, facing up.
    pub fn horizontal(z: Real) -> Self {
        Self::from_unit_normal(Point3::new(0.0, 0.0, z), Vector3::z_axis())
    }

    /// A point of this plane.
    #[inline]
    pub fn point(&self) -> &Point3 {
        &self.point
    }

    /// The unit normal of this plane.
    #[inline]
    pub fn normal(&self) -> &Unit<Vector3> {
        &self.normal
    }

    /// Signed distance from `pt` to this plane, positive on the normal side.
    #[inline]
    pub fn signed_distance(&self, pt: &Point3) -> Real {
        self.normal.dot(&(pt - self.point))
    }

    /// Orthogonal projection of `pt` on this plane.
    #[inline]
    pub fn project(&self, pt: &Point3) -> Point3 {
        pt - self.normal.into_inner() * self.signed_distance(pt)
    }

    /// Coordinates of the projection of `pt` in the local frame of this plane.
    #[inline]
    pub fn to_local(&self, pt: &Point3) -> Point2 {
        let d = pt - self.point;
        Point2::new(d.dot(&self.u), d.dot(&self.v))
    }

    /// Maps local plane coordinates back to 3D.
    #[inline]
    pub fn from_local(&self, pt: &Point2) -> Point3 {
        self.point + self.u * pt.x + self.v * pt.y
    }

    /// Signed parameter at which the line supporting `ray` crosses this plane.
    ///
    /// Returns `None` if the ray is parallel to the plane.
    pub fn intersect_ray(&self, ray: &Ray3) -> Option<Real> {
        let denom = self.normal.dot(ray.dir());

        if denom.abs() < DEFAULT_EPSILON {
            None
        } else {
            Some(self.normal.dot(&(self.point - ray.origin())) / denom)
        }
    }
}
