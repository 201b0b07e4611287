use crate::bounding_volume::Aabb2;
use crate::math::{Point2, Real};
use crate::query::Ray2;
use crate::utils::{self, orient2d};

/// A coarse plan-view frustum from a viewer's eye to a target's silhouette.
///
/// The triangle is bounded by the segments `apex → left`, `apex → right` and
/// `left → right`, and spans the elevation band `[bottom, top]`. It is only used
/// to prune obstacles that cannot lie between the viewer and the target; it is
/// never the final collision test.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VisionTriangle {
    /// The viewer's eye.
    pub apex: Point2,
    /// The left end of the target's silhouette, as seen from the apex.
    pub left: Point2,
    /// The right end of the target's silhouette, as seen from the apex.
    pub right: Point2,
    /// The lowest elevation covered by the frustum.
    pub bottom: Real,
    /// The highest elevation covered by the frustum.
    pub top: Real,
}

impl VisionTriangle {
    /// Creates a new vision triangle.
    pub fn new(apex: Point2, left: Point2, right: Point2, bottom: Real, top: Real) -> Self {
        VisionTriangle {
            apex,
            left,
            right,
            bottom: bottom.min(top),
            top: bottom.max(top),
        }
    }

    /// The vision triangle from `apex` to the silhouette of a target box.
    ///
    /// The silhouette ends are the corners of `target` with the extreme angles
    /// as seen from `apex`. If `apex` lies inside `target`, the whole box is
    /// visible and the triangle degenerates to the box diagonal.
    pub fn from_viewer_and_target(apex: Point2, target: &Aabb2, bottom: Real, top: Real) -> Self {
        let corners = [
            target.mins,
            Point2::new(target.maxs.x, target.mins.y),
            target.maxs,
            Point2::new(target.mins.x, target.maxs.y),
        ];

        if target.contains_point(&apex) {
            return Self::new(apex, target.mins, target.maxs, bottom, top);
        }

        let mut left = corners[0];
        let mut right = corners[0];

        for corner in &corners[1..] {
            if orient2d(&apex, &left, corner) > 0.0 {
                left = *corner;
            }
            if orient2d(&apex, &right, corner) < 0.0 {
                right = *corner;
            }
        }

        Self::new(apex, left, right, bottom, top)
    }

    /// The boundary segment from the apex to the left end.
    #[inline]
    pub fn left_ray(&self) -> Ray2 {
        Ray2::from_points(self.apex, self.left)
    }

    /// The boundary segment from the apex to the right end.
    #[inline]
    pub fn right_ray(&self) -> Ray2 {
        Ray2::from_points(self.apex, self.right)
    }

    /// The far boundary segment, from the left end to the right end.
    #[inline]
    pub fn far_edge(&self) -> Ray2 {
        Ray2::from_points(self.left, self.right)
    }

    /// Does the triangle contain the given point (boundary included)?
    pub fn contains_point(&self, pt: &Point2) -> bool {
        utils::point_in_triangle(pt, &self.apex, &self.left, &self.right)
    }

    /// Does the elevation band `[bottom, top]` overlap the one of this triangle?
    #[inline]
    pub fn overlaps_elevation(&self, bottom: Real, top: Real) -> bool {
        bottom <= self.top && top >= self.bottom
    }

    /// Conservative test between this triangle and a plan-view AABB.
    ///
    /// The box is touched if any boundary segment crosses it or if its center
    /// lies inside the triangle. This never misses a box overlapping the triangle
    /// but may report boxes only near it.
    pub fn intersects_aabb(&self, aabb: &Aabb2) -> bool {
        self.left_ray().intersects_aabb(aabb)
            || self.right_ray().intersects_aabb(aabb)
            || self.far_edge().intersects_aabb(aabb)
            || self.contains_point(&aabb.center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> VisionTriangle {
        VisionTriangle::new(
            Point2::origin(),
            Point2::new(10.0, 5.0),
            Point2::new(10.0, -5.0),
            0.0,
            2.0,
        )
    }

    #[test]
    fn boxes_inside_crossing_and_outside() {
        let tri = triangle();
        let inside = Aabb2::new(Point2::new(5.0, -0.5), Point2::new(6.0, 0.5));
        let crossing = Aabb2::new(Point2::new(4.0, 1.0), Point2::new(5.0, 4.0));
        let outside = Aabb2::new(Point2::new(-5.0, 1.0), Point2::new(-4.0, 2.0));
        let beyond = Aabb2::new(Point2::new(12.0, -1.0), Point2::new(13.0, 1.0));

        assert!(tri.intersects_aabb(&inside));
        assert!(tri.intersects_aabb(&crossing));
        assert!(!tri.intersects_aabb(&outside));
        assert!(!tri.intersects_aabb(&beyond));
    }

    #[test]
    fn box_containing_the_whole_triangle() {
        let tri = triangle();
        let huge = Aabb2::new(Point2::new(-50.0, -50.0), Point2::new(50.0, 50.0));
        assert!(tri.intersects_aabb(&huge));
    }

    #[test]
    fn elevation_overlap() {
        let tri = triangle();
        assert!(tri.overlaps_elevation(1.0, 5.0));
        assert!(tri.overlaps_elevation(2.0, 2.0));
        assert!(!tri.overlaps_elevation(3.0, 5.0));
    }

    #[test]
    fn silhouette_of_a_target_box() {
        let target = Aabb2::new(Point2::new(9.0, -1.0), Point2::new(11.0, 1.0));
        let tri = VisionTriangle::from_viewer_and_target(Point2::origin(), &target, 0.0, 1.0);
        assert_eq!(tri.left, Point2::new(9.0, 1.0));
        assert_eq!(tri.right, Point2::new(9.0, -1.0));
        assert!(tri.contains_point(&Point2::new(5.0, 0.0)));
    }
}
