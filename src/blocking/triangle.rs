use crate::blocking::BlockingObject;
use crate::bounding_volume::Aabb;
use crate::math::{Point, Point2, Point3, Real, Vector3};
use crate::query::details::ray_triangle_toi;
use crate::query::{QueryOptions, Ray};
use crate::shape::Plane;
use crate::utils::{point_in_triangle, segment_intersection_toi};

/// An arbitrary triangle, e.g., a piece of a triangulated polygon.
///
/// The front face is the one from which `a, b, c` appear counter-clockwise.
/// Back faces block as well unless culling is enabled.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleBlocker {
    /// The first vertex.
    pub a: Point3,
    /// The second vertex.
    pub b: Point3,
    /// The third vertex.
    pub c: Point3,
    /// Whether rays reaching the back face pass through.
    pub cull_back_faces: bool,
}

impl TriangleBlocker {
    /// A triangle blocking from both faces.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        TriangleBlocker {
            a,
            b,
            c,
            cull_back_faces: false,
        }
    }

    /// Enables or disables back-face culling.
    #[must_use]
    pub fn with_back_face_culling(mut self, cull: bool) -> Self {
        self.cull_back_faces = cull;
        self
    }

    /// The non-normalized normal of the front face.
    pub fn scaled_normal(&self) -> Vector3 {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    /// The plane of this triangle, `None` if it is degenerate.
    pub fn plane(&self) -> Option<Plane> {
        Plane::from_points(&self.a, &self.b, &self.c)
    }

    /// Is the front face of this triangle turned towards a ray going along `dir`?
    pub fn is_front_facing(&self, dir: &Vector3) -> bool {
        self.scaled_normal().dot(dir) < 0.0
    }

    fn footprint(&self) -> [Point2; 3] {
        [self.a.xy(), self.b.xy(), self.c.xy()]
    }
}

impl BlockingObject<3> for TriangleBlocker {
    fn aabb(&self) -> Aabb<3> {
        Aabb::from_points([self.a, self.b, self.c])
    }

    fn centroid(&self) -> Point<3> {
        Point3::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    fn object_intersection(&self, ray: &Ray<3>, _: &QueryOptions) -> Option<Real> {
        if self.cull_back_faces && !self.is_front_facing(ray.dir()) {
            return None;
        }

        let t = ray_triangle_toi(&self.a, &self.b, &self.c, ray.origin(), ray.dir())?;
        ray.contains_toi(t).then_some(t)
    }

    fn elevation_range(&self) -> (Real, Real) {
        let aabb = BlockingObject::<3>::aabb(self);
        (aabb.mins.z, aabb.maxs.z)
    }
}

impl BlockingObject<2> for TriangleBlocker {
    fn aabb(&self) -> Aabb<2> {
        Aabb::from_points(self.footprint())
    }

    fn object_intersection(&self, ray: &Ray<2>, _: &QueryOptions) -> Option<Real> {
        let [a, b, c] = self.footprint();

        // A viewer standing on the footprint is blocked right away, as with tokens.
        if point_in_triangle(ray.origin(), &a, &b, &c) {
            return Some(0.0);
        }

        let target = ray.target();
        [(a, b), (b, c), (c, a)]
            .iter()
            .filter_map(|(p, q)| segment_intersection_toi(ray.origin(), &target, p, q))
            .map(|t| t * ray.max_toi())
            .filter(|t| ray.contains_toi(*t))
            .min_by(|t1, t2| t1.total_cmp(t2))
    }

    fn elevation_range(&self) -> (Real, Real) {
        BlockingObject::<3>::elevation_range(self)
    }
}
