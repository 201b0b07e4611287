//! Flat polygons in 3D space.

use std::cell::OnceCell;

use crate::blocking::TriangleBlocker;
use crate::bounding_volume::{Aabb3, BoundingVolume};
use crate::math::{Point2, Point3, Real, Vector3, DEFAULT_EPSILON};
use crate::query::{details::clip_polygon_z, Ray3};
use crate::shape::Plane;
use crate::transformation::{convex_hull2, triangulate_ear_clipping};
use crate::utils::{orientation, point_in_poly2d, Orientation};

/// Distance under which a vertex is considered to lie on the line joining its neighbors.
const COLLINEAR_EPSILON: Real = 1.0e-6;

/// A closed, flat, not necessarily convex polygon in 3D space.
///
/// The bounds, the best-fit plane and the centroid are computed on first use and
/// cached. Every method mutating the vertices clears the cache.
///
/// # Example
///
/// ```rust
/// use sightline::math::{Point2, Point3, Vector3};
/// use sightline::query::Ray3;
/// use sightline::shape::Polygon3d;
///
/// let square = Polygon3d::from_polygon2d(
///     &[
///         Point2::new(0.0, 0.0),
///         Point2::new(2.0, 0.0),
///         Point2::new(2.0, 2.0),
///         Point2::new(0.0, 2.0),
///     ],
///     3.0,
/// );
/// assert_eq!(square.centroid(), Point3::new(1.0, 1.0, 3.0));
///
/// let ray = Ray3::new(Point3::new(1.0, 1.0, 10.0), -Vector3::z());
/// assert_eq!(square.intersection(&ray), Some(7.0));
/// ```
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct Polygon3d {
    points: Vec<Point3>,
    is_hole: bool,
    #[cfg_attr(feature = "serde-serialize", serde(skip))]
    bounds: OnceCell<Aabb3>,
    #[cfg_attr(feature = "serde-serialize", serde(skip))]
    plane: OnceCell<Option<Plane>>,
    #[cfg_attr(feature = "serde-serialize", serde(skip))]
    centroid: OnceCell<Point3>,
}

impl PartialEq for Polygon3d {
    fn eq(&self, other: &Self) -> bool {
        self.is_hole == other.is_hole && self.points == other.points
    }
}

impl Polygon3d {
    /// Creates a polygon from its vertices.
    pub fn new(points: Vec<Point3>) -> Self {
        Polygon3d {
            points,
            ..Default::default()
        }
    }

    /// Lifts a plan-view polygon to the elevation `z`.
    pub fn from_polygon2d(points: &[Point2], z: Real) -> Self {
        Self::new(points.iter().map(|pt| Point3::new(pt.x, pt.y, z)).collect())
    }

    /// The vertical rectangle extruded from the segment `a → b` between `bottom` and `top`.
    pub fn from_vertical_segment(a: &Point2, b: &Point2, top: Real, bottom: Real) -> Self {
        Self::new(vec![
            Point3::new(a.x, a.y, bottom),
            Point3::new(b.x, b.y, bottom),
            Point3::new(b.x, b.y, top),
            Point3::new(a.x, a.y, top),
        ])
    }

    /// Marks this polygon as a hole, or as an outer boundary.
    #[must_use]
    pub fn with_hole(mut self, is_hole: bool) -> Self {
        self.is_hole = is_hole;
        self
    }

    /// Marks this polygon as a hole, or as an outer boundary.
    pub fn set_hole(&mut self, is_hole: bool) {
        self.is_hole = is_hole;
    }

    /// Is this polygon a hole?
    #[inline]
    pub fn is_hole(&self) -> bool {
        self.is_hole
    }

    /// The vertices of this polygon.
    #[inline]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// The number of vertices of this polygon.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Does this polygon have no vertex at all?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drops the cached bounds, plane and centroid.
    pub fn clear_cache(&mut self) {
        let _ = self.bounds.take();
        let _ = self.plane.take();
        let _ = self.centroid.take();
    }

    /// The AABB of the vertices of this polygon.
    pub fn bounds(&self) -> Aabb3 {
        *self
            .bounds
            .get_or_init(|| Aabb3::from_points(self.points.iter().copied()))
    }

    /// The best-fit plane of this polygon.
    ///
    /// Its normal is computed with Newell's method, so the polygon appears
    /// counter-clockwise when seen from the normal side. Returns `None` for
    /// polygons with no area.
    pub fn plane(&self) -> Option<Plane> {
        *self.plane.get_or_init(|| {
            let n = self.points.len();
            let mut normal = Vector3::zeros();

            for i in 0..n {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                normal.x += (p.y - q.y) * (p.z + q.z);
                normal.y += (p.z - q.z) * (p.x + q.x);
                normal.z += (p.x - q.x) * (p.y + q.y);
            }

            Plane::new(self.vertex_average(), normal)
        })
    }

    /// The area-weighted centroid of this polygon.
    ///
    /// Falls back to the average of the vertices for polygons with no area.
    pub fn centroid(&self) -> Point3 {
        *self.centroid.get_or_init(|| {
            let Some(plane) = self.plane() else {
                return self.vertex_average();
            };

            let local = self.local_points(&plane);
            let mut area = 0.0;
            let mut weighted = Point2::origin().coords;

            for i in 0..local.len() {
                let p = local[i];
                let q = local[(i + 1) % local.len()];
                let cross = p.coords.perp(&q.coords);
                area += cross;
                weighted += (p.coords + q.coords) * cross;
            }

            if area.abs() < DEFAULT_EPSILON {
                self.vertex_average()
            } else {
                plane.from_local(&Point2::from(weighted / (3.0 * area)))
            }
        })
    }

    /// The area of this polygon.
    pub fn area(&self) -> Real {
        self.plane()
            .map(|plane| signed_area(&self.local_points(&plane)).abs())
            .unwrap_or(0.0)
    }

    fn vertex_average(&self) -> Point3 {
        if self.points.is_empty() {
            return Point3::origin();
        }

        let sum = self
            .points
            .iter()
            .fold(Vector3::zeros(), |acc, pt| acc + pt.coords);
        Point3::from(sum / self.points.len() as Real)
    }

    fn local_points(&self, plane: &Plane) -> Vec<Point2> {
        self.points.iter().map(|pt| plane.to_local(pt)).collect()
    }

    /// Moves every vertex to the elevation `z`.
    pub fn set_z(&mut self, z: Real) {
        self.points.iter_mut().for_each(|pt| pt.z = z);
        self.clear_cache();
    }

    /// Translates every vertex.
    pub fn translate(&mut self, shift: &Vector3) {
        self.points.iter_mut().for_each(|pt| *pt += shift);
        self.clear_cache();
    }

    /// Reverses the winding of this polygon.
    pub fn reverse_orientation(&mut self) {
        self.points.reverse();
        self.clear_cache();
    }

    /// Removes duplicate vertices and vertices nearly aligned with their neighbors.
    pub fn clean(&mut self) {
        let mut changed = true;

        while changed && self.points.len() > 2 {
            changed = false;
            let n = self.points.len();

            for i in 0..n {
                let prev = self.points[(i + n - 1) % n];
                let next = self.points[(i + 1) % n];

                if is_redundant(&prev, &self.points[i], &next) {
                    let _ = self.points.remove(i);
                    changed = true;
                    break;
                }
            }
        }

        self.clear_cache();
    }

    /// Is this polygon convex?
    ///
    /// Collinear vertices are tolerated. Polygons with no area are not convex.
    pub fn is_convex(&self) -> bool {
        let Some(plane) = self.plane() else {
            return false;
        };

        let local = self.local_points(&plane);
        let n = local.len();

        // The Newell normal makes the local frame counter-clockwise.
        (0..n).all(|i| {
            orientation(&local[i], &local[(i + 1) % n], &local[(i + 2) % n], DEFAULT_EPSILON)
                != Orientation::Cw
        })
    }

    /// The part of this polygon below (`keep_less_than`) or above the elevation `z`.
    ///
    /// Each edge crossing the cutoff is cut instead of dropped. The result may
    /// have fewer than three vertices if the polygon lies on the discarded side.
    pub fn clip_z(&self, z: Real, keep_less_than: bool) -> Polygon3d {
        let mut result = Vec::with_capacity(self.points.len() + 2);
        clip_polygon_z(&self.points, z, keep_less_than, &mut result);
        Polygon3d::new(result).with_hole(self.is_hole)
    }

    /// Parameter along `ray` at which it crosses this polygon, if any.
    ///
    /// Negative parameters are ignored; the caller decides whether hits past the
    /// end of the ray matter.
    pub fn intersection(&self, ray: &Ray3) -> Option<Real> {
        let plane = self.plane()?;
        let t = plane.intersect_ray(ray)?;

        if t < 0.0 {
            return None;
        }

        let hit = ray.point_at(t);

        if !self.bounds().loosened(COLLINEAR_EPSILON).contains_point(&hit) {
            return None;
        }

        point_in_poly2d(&plane.to_local(&hit), &self.local_points(&plane)).then_some(t)
    }

    /// The convex hull of this polygon.
    pub fn convex_hull(&self) -> Option<Polygon3d> {
        self.hull_of(&self.points)
    }

    /// The convex hull of `points` projected on the plane of this polygon.
    ///
    /// Returns `None` if this polygon has no plane.
    pub fn hull_of(&self, points: &[Point3]) -> Option<Polygon3d> {
        let plane = self.plane()?;
        let local: Vec<_> = points.iter().map(|pt| plane.to_local(pt)).collect();
        let hull = convex_hull2(&local)
            .iter()
            .map(|pt| plane.from_local(pt))
            .collect();
        Some(Polygon3d::new(hull).with_hole(self.is_hole))
    }

    /// Triangulates this polygon by ear clipping in its own plane.
    ///
    /// Returns triples of vertex indices. Fails on self-intersecting polygons and
    /// polygons with repeated vertices; [`Polygon3d::clean`] removes the latter.
    pub fn triangulate(&self) -> Option<Vec<[u32; 3]>> {
        let plane = self.plane()?;
        let local = self.local_points(&plane);
        triangulate_ear_clipping(&local)
    }

    /// Triangulates this polygon into triangle obstacles.
    ///
    /// Returns an empty set if the polygon cannot be triangulated.
    pub fn to_triangle_blockers(&self) -> Vec<TriangleBlocker> {
        let Some(triangles) = self.triangulate() else {
            log::warn!(
                "polygon with {} vertices could not be triangulated",
                self.points.len()
            );
            return Vec::new();
        };

        triangles
            .iter()
            .map(|[a, b, c]| {
                TriangleBlocker::new(
                    self.points[*a as usize],
                    self.points[*b as usize],
                    self.points[*c as usize],
                )
            })
            .collect()
    }
}

fn signed_area(points: &[Point2]) -> Real {
    let n = points.len();
    (0..n)
        .map(|i| points[i].coords.perp(&points[(i + 1) % n].coords))
        .sum::<Real>()
        * 0.5
}

fn is_redundant(prev: &Point3, pt: &Point3, next: &Point3) -> bool {
    let to_next = next - prev;
    let len = to_next.norm();

    if na::distance(prev, pt) < COLLINEAR_EPSILON || len < COLLINEAR_EPSILON {
        return true;
    }

    (pt - prev).cross(&to_next).norm() / len < COLLINEAR_EPSILON
}
