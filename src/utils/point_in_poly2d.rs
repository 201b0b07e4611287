use crate::math::Point2;

/// Tests if the given point is inside an arbitrary closed polygon with arbitrary orientation,
/// using the even-odd rule.
///
/// The polygon is assumed to be closed, i.e., first and last point of the polygon are implicitly
/// assumed to be connected by an edge.
pub fn point_in_poly2d(pt: &Point2, poly: &[Point2]) -> bool {
    if poly.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = poly.len() - 1;

    for i in 0..poly.len() {
        let (pi, pj) = (poly[i], poly[j]);

        if (pi.y > pt.y) != (pj.y > pt.y) {
            let x_cross = (pj.x - pi.x) * (pt.y - pi.y) / (pj.y - pi.y) + pi.x;
            if pt.x < x_cross {
                inside = !inside;
            }
        }

        j = i;
    }

    inside
}
