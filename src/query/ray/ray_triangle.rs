use crate::math::{Point3, Real, Vector3, DEFAULT_EPSILON};

/// Computes the intersection between a triangle and a ray (Möller–Trumbore).
///
/// Returns the parameter `t` of the hit along `dir`, or `None` if the ray is
/// (nearly) parallel to the triangle, misses it, or hits it at a parameter not
/// greater than [`DEFAULT_EPSILON`]. The last rule rejects origins lying on the
/// triangle itself. Both faces are hit; culling is up to the caller.
pub fn ray_triangle_toi(
    a: &Point3,
    b: &Point3,
    c: &Point3,
    origin: &Point3,
    dir: &Vector3,
) -> Option<Real> {
    let ab = b - a;
    let ac = c - a;
    let p = dir.cross(&ac);
    let det = ab.dot(&p);

    if det.abs() < DEFAULT_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let ao = origin - a;
    let u = ao.dot(&p) * inv_det;

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = ao.cross(&ab);
    let v = dir.dot(&q) * inv_det;

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = ac.dot(&q) * inv_det;
    (t > DEFAULT_EPSILON).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> [Point3; 3] {
        [
            Point3::origin(),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ]
    }

    #[test]
    fn vertical_ray_hits_at_height() {
        let [a, b, c] = triangle();
        let toi = ray_triangle_toi(&a, &b, &c, &Point3::new(0.5, 0.5, 5.0), &-Vector3::z());
        assert_relative_eq!(toi.unwrap(), 5.0);
    }

    #[test]
    fn back_face_is_hit_too() {
        let [a, b, c] = triangle();
        let toi = ray_triangle_toi(&a, &b, &c, &Point3::new(0.5, 0.5, -2.0), &Vector3::z());
        assert_relative_eq!(toi.unwrap(), 2.0);
    }

    #[test]
    fn misses_outside_and_behind() {
        let [a, b, c] = triangle();
        assert_eq!(
            ray_triangle_toi(&a, &b, &c, &Point3::new(1.5, 1.5, 5.0), &-Vector3::z()),
            None
        );
        assert_eq!(
            ray_triangle_toi(&a, &b, &c, &Point3::new(0.5, 0.5, 5.0), &Vector3::z()),
            None
        );
    }

    #[test]
    fn parallel_and_touching_rays_miss() {
        let [a, b, c] = triangle();
        assert_eq!(
            ray_triangle_toi(&a, &b, &c, &Point3::new(-1.0, 0.5, 0.0), &Vector3::x()),
            None
        );
        assert_eq!(
            ray_triangle_toi(&a, &b, &c, &Point3::new(0.5, 0.5, 0.0), &-Vector3::z()),
            None
        );
    }
}
