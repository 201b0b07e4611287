use crate::math::{Point2, DEFAULT_EPSILON};
use crate::utils::orient2d;

/// Computes the convex hull of a set of 2D points (Andrew's monotone chain).
///
/// The hull is returned in counter-clockwise order, starting with the point of
/// smallest `x` (then smallest `y`). Collinear points along the hull edges are
/// dropped. Fewer than three distinct input points yield those points as-is.
pub fn convex_hull2(points: &[Point2]) -> Vec<Point2> {
    convex_hull2_idx(points)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Computes the convex hull of a set of 2D points and returns the indices of
/// its vertices, in counter-clockwise order.
pub fn convex_hull2_idx(points: &[Point2]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        points[a]
            .x
            .total_cmp(&points[b].x)
            .then(points[a].y.total_cmp(&points[b].y))
    });
    order.dedup_by(|a, b| na::distance_squared(&points[*a], &points[*b]) <= DEFAULT_EPSILON);

    if order.len() < 3 {
        return order;
    }

    let mut hull: Vec<usize> = Vec::with_capacity(order.len() + 1);
    let push_chain = |hull: &mut Vec<usize>, chain: &mut dyn Iterator<Item = usize>| {
        let start = hull.len();

        for i in chain {
            while hull.len() >= start + 2
                && orient2d(
                    &points[hull[hull.len() - 2]],
                    &points[hull[hull.len() - 1]],
                    &points[i],
                ) <= DEFAULT_EPSILON
            {
                let _ = hull.pop();
            }
            hull.push(i);
        }

        // The last point of each chain is the first of the other one.
        let _ = hull.pop();
    };

    push_chain(&mut hull, &mut order.iter().copied());
    push_chain(&mut hull, &mut order.iter().rev().copied());

    hull
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_with_interior_and_collinear_points() {
        let points = [
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(0.5, 1.5),
        ];
        let hull = convex_hull2(&points);
        assert_eq!(
            hull,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(2.0, 2.0),
                Point2::new(0.0, 2.0),
            ]
        );
    }

    #[test]
    fn degenerate_inputs() {
        assert!(convex_hull2(&[]).is_empty());
        let pair = [Point2::new(1.0, 0.0), Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert_eq!(convex_hull2(&pair).len(), 2);
    }
}
