//! Ear-clipping triangulation of simple polygons.
//!
//! The sharpest remaining ear is clipped first.

use crate::math::{Point2, Real, DEFAULT_EPSILON};
use crate::utils::{barycentric, orientation, Orientation};

/// The kind of a polygon corner with respect to its current neighbors.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Corner {
    /// The corner cannot be clipped yet.
    Blocked,
    /// The corner can be clipped. The value grows as the angle gets sharper.
    Ear(Real),
}

/// The polygon outline as a circular doubly-linked list over its vertex indices.
struct Outline<'a> {
    points: &'a [Point2],
    prev: Vec<usize>,
    next: Vec<usize>,
    corners: Vec<Option<Corner>>,
}

impl<'a> Outline<'a> {
    fn new(points: &'a [Point2]) -> Self {
        let n = points.len();
        Outline {
            points,
            prev: (0..n).map(|i| (i + n - 1) % n).collect(),
            next: (0..n).map(|i| (i + 1) % n).collect(),
            corners: vec![Some(Corner::Blocked); n],
        }
    }

    /// Classifies the corner at `i`. Returns `None` on repeated vertices or
    /// degenerate triangles.
    fn classify(&mut self, i: usize) -> Option<()> {
        let (prev, next) = (self.prev[i], self.next[i]);
        let (a, b, c) = (self.points[prev], self.points[i], self.points[next]);

        let sharpness = (a - b).normalize().dot(&(c - b).normalize());
        if sharpness.is_nan() {
            return None;
        }

        let mut corner = Corner::Blocked;

        if orientation(&a, &b, &c, DEFAULT_EPSILON) == Orientation::Ccw {
            corner = Corner::Ear(sharpness);

            for (j, pt) in self.points.iter().enumerate() {
                if j == prev || j == i || j == next {
                    continue;
                }

                if barycentric(pt, &a, &b, &c)?.is_inside() {
                    corner = Corner::Blocked;
                    break;
                }
            }
        }

        self.corners[i] = Some(corner);
        Some(())
    }

    /// The remaining ear with the sharpest angle.
    fn sharpest_ear(&self) -> Option<usize> {
        self.corners
            .iter()
            .enumerate()
            .filter_map(|(i, corner)| match corner {
                Some(Corner::Ear(sharpness)) => Some((i, *sharpness)),
                _ => None,
            })
            .max_by(|(_, s1), (_, s2)| s1.total_cmp(s2))
            .map(|(i, _)| i)
    }

    /// Removes the corner `i` from the outline and returns the clipped triangle.
    fn clip(&mut self, i: usize) -> [u32; 3] {
        let (prev, next) = (self.prev[i], self.next[i]);
        self.corners[i] = None;
        self.next[prev] = next;
        self.prev[next] = prev;
        [prev as u32, i as u32, next as u32]
    }
}

/// Ear clipping triangulation of a simple counter-clockwise polygon.
///
/// Returns triples of indices into `vertices`, or `None` for polygons with fewer
/// than three vertices, clockwise polygons, and polygons with repeated vertices.
pub fn triangulate_ear_clipping(vertices: &[Point2]) -> Option<Vec<[u32; 3]>> {
    let n = vertices.len();

    if n < 3 {
        return None;
    }

    let mut outline = Outline::new(vertices);
    for i in 0..n {
        outline.classify(i)?;
    }

    let mut triangles = Vec::with_capacity(n - 2);
    let mut remaining = n;

    while remaining > 3 {
        let ear = outline.sharpest_ear()?;
        let [prev, _, next] = outline.clip(ear);
        triangles.push([prev, ear as u32, next]);
        remaining -= 1;

        if remaining > 3 {
            outline.classify(prev as usize)?;
            outline.classify(next as usize)?;
        }
    }

    let last = outline.corners.iter().position(Option::is_some)?;
    triangles.push([outline.prev[last] as u32, last as u32, outline.next[last] as u32]);

    Some(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_ccw() {
        let vertices = vec![Point2::new(0., 0.), Point2::new(1., 0.), Point2::new(1., 1.)];
        let triangles = triangulate_ear_clipping(&vertices);
        assert_eq!(triangles.unwrap(), vec![[2, 0, 1]]);
    }

    #[test]
    fn clockwise_square_is_rejected() {
        let vertices = vec![
            Point2::new(0., 1.),
            Point2::new(1., 1.),
            Point2::new(1., 0.),
            Point2::new(0., 0.),
        ];
        assert!(triangulate_ear_clipping(&vertices).is_none());
        assert!(triangulate_ear_clipping(&vertices[..2]).is_none());
    }

    #[test]
    fn square_with_dent() {
        let vertices = vec![
            Point2::new(0., 0.),   // 0
            Point2::new(1., 0.),   // 1
            Point2::new(0.5, 0.5), // 2
            Point2::new(1., 1.),   // 3
            Point2::new(0., 1.),   // 4
        ];
        let triangles = triangulate_ear_clipping(&vertices);
        assert_eq!(triangles.unwrap(), vec![[2, 3, 4], [2, 4, 0], [2, 0, 1]]);
    }

    #[test]
    /// 4-----------------------3
    /// |                       |
    /// |       7-------0       |
    /// |       |       |       |
    /// 5-------6       1-------2
    fn u_shaped_room() {
        let vertices = vec![
            Point2::new(2.0, 2.0),
            Point2::new(2.0, -2.0),
            Point2::new(4.0, -2.0),
            Point2::new(4.0, 4.0),
            Point2::new(-4.0, 4.0),
            Point2::new(-4.0, -2.0),
            Point2::new(-2.0, -2.0),
            Point2::new(-2.0, 2.0),
        ];
        let triangles = triangulate_ear_clipping(&vertices).unwrap();
        assert_eq!(triangles.len(), 6);

        let area: Real = triangles
            .iter()
            .map(|[a, b, c]| {
                let (a, b, c) = (vertices[*a as usize], vertices[*b as usize], vertices[*c as usize]);
                (b - a).perp(&(c - a)) * 0.5
            })
            .sum();
        assert_relative_eq!(area, 32.0);
    }
}
