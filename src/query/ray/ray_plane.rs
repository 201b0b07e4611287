use crate::math::{Point3, Real, DEFAULT_EPSILON};
use crate::query::Ray3;
use crate::shape::Plane;

/// Intersects a ray with a vertical rectangle, e.g., a wall.
///
/// The rectangle lies on the vertical `plane` and is spanned by two opposite
/// corners: `top_point` sits above one end of the wall and `bottom_point` below
/// the other. The hit point must fall within the elevation band of both corners
/// and be no farther from either end than the ends are from each other, which
/// bounds it to the segment without normalizing anything.
///
/// Returns the signed parameter of the hit along `ray`. Callers decide which
/// range of parameters they accept.
pub fn intersect_vertical_rectangle(
    plane: &Plane,
    ray: &Ray3,
    top_point: &Point3,
    bottom_point: &Point3,
) -> Option<Real> {
    let t = plane.intersect_ray(ray)?;
    let hit = ray.point_at(t);

    if hit.z > top_point.z + DEFAULT_EPSILON || hit.z < bottom_point.z - DEFAULT_EPSILON {
        return None;
    }

    let a = top_point.xy();
    let b = bottom_point.xy();
    let p = hit.xy();
    let length_squared = na::distance_squared(&a, &b) + DEFAULT_EPSILON;

    if na::distance_squared(&p, &a) > length_squared || na::distance_squared(&p, &b) > length_squared {
        return None;
    }

    Some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn wall() -> (Plane, Point3, Point3) {
        let a = Point2::new(5.0, -1.0);
        let b = Point2::new(5.0, 1.0);
        (
            Plane::vertical(&a, &b).unwrap(),
            Point3::new(a.x, a.y, 2.0),
            Point3::new(b.x, b.y, 0.0),
        )
    }

    #[test]
    fn ray_through_the_wall() {
        let (plane, top, bottom) = wall();
        let ray = Ray3::from_points(Point3::new(0.0, 0.0, 1.0), Point3::new(10.0, 0.0, 1.0));
        assert_relative_eq!(intersect_vertical_rectangle(&plane, &ray, &top, &bottom).unwrap(), 0.5);
    }

    #[test]
    fn ray_above_or_beside_the_wall() {
        let (plane, top, bottom) = wall();
        let above = Ray3::from_points(Point3::new(0.0, 0.0, 3.0), Point3::new(10.0, 0.0, 3.0));
        assert_eq!(intersect_vertical_rectangle(&plane, &above, &top, &bottom), None);

        let beside = Ray3::from_points(Point3::new(0.0, 2.0, 1.0), Point3::new(10.0, 2.0, 1.0));
        assert_eq!(intersect_vertical_rectangle(&plane, &beside, &top, &bottom), None);
    }

    #[test]
    fn ray_along_the_wall_is_parallel() {
        let (plane, top, bottom) = wall();
        let along = Ray3::from_points(Point3::new(5.0, -3.0, 1.0), Point3::new(5.0, 3.0, 1.0));
        assert_eq!(intersect_vertical_rectangle(&plane, &along, &top, &bottom), None);
    }
}
