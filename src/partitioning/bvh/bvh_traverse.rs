use super::Bvh;
use crate::blocking::BlockingObject;
use crate::math::{Point2, Real};
use crate::query::{QueryOptions, Ray, VisionTriangle};
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

const TRAVERSAL_STACK_SIZE: usize = 32;

impl<O: BlockingObject<D>, const D: usize> Bvh<O, D> {
    /// Does any object of this tree block `ray`?
    ///
    /// Stops at the first blocking object found, which is not necessarily the
    /// nearest one. See [`Bvh::closest_intersection`] for nearest-hit queries.
    pub fn has_intersection(&self, ray: &Ray<D>, opts: &QueryOptions) -> bool {
        !self.is_empty() && self.has_intersection_from(0, ray, opts)
    }

    /// Does any object below the node `node_id` block `ray`?
    pub fn has_intersection_from(&self, node_id: usize, ray: &Ray<D>, opts: &QueryOptions) -> bool {
        let Some(node) = self.nodes[..self.nodes_used].get(node_id) else {
            return false;
        };

        if !ray.intersects_aabb(&node.aabb) {
            return false;
        }

        if node.is_leaf() {
            self.leaf_objects(node)
                .any(|(_, obj)| obj.has_bounds_intersection(ray) && obj.has_object_intersection(ray, opts))
        } else {
            self.has_intersection_from(node.left(), ray, opts)
                || self.has_intersection_from(node.right(), ray, opts)
        }
    }

    /// Same as [`Bvh::has_intersection`] but with an explicit stack instead of recursion.
    pub fn has_intersection_non_recursive(&self, ray: &Ray<D>, opts: &QueryOptions) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut stack: SmallVec<[usize; TRAVERSAL_STACK_SIZE]> =
            SmallVec::with_capacity(self.nodes.len().div_ceil(2) + 2);
        let mut next = Some(0);

        loop {
            if next.is_none() {
                next = stack.pop();
            }

            let Some(node_id) = next.take() else {
                return false;
            };

            let node = &self.nodes[node_id];

            if !ray.intersects_aabb(&node.aabb) {
                continue;
            }

            if node.is_leaf() {
                if self
                    .leaf_objects(node)
                    .any(|(_, obj)| obj.has_bounds_intersection(ray) && obj.has_object_intersection(ray, opts))
                {
                    return true;
                }
            } else {
                // Descend left, remember the right sibling for later.
                next = Some(node.left());
                stack.push(node.right());
            }
        }
    }

    /// The nearest object blocking `ray`, with the parameter along `ray` at which it does.
    ///
    /// Children are visited nearest-first and subtrees entered past the best hit
    /// found so far are skipped.
    pub fn closest_intersection(&self, ray: &Ray<D>, opts: &QueryOptions) -> Option<(usize, Real)> {
        if self.is_empty() {
            return None;
        }

        let mut best: Option<(usize, Real)> = None;
        let mut stack: SmallVec<[(usize, Real); TRAVERSAL_STACK_SIZE]> = SmallVec::new();

        if let Some(entry) = ray.aabb_entry(&self.nodes[0].aabb) {
            stack.push((0, entry));
        }

        while let Some((node_id, entry)) = stack.pop() {
            if best.is_some_and(|(_, best_toi)| entry >= best_toi) {
                continue;
            }

            let node = &self.nodes[node_id];

            if node.is_leaf() {
                for (i, obj) in self.leaf_objects(node) {
                    if let Some(toi) = obj.object_intersection(ray, opts) {
                        if best.map_or(true, |(_, best_toi)| toi < best_toi) {
                            best = Some((i, toi));
                        }
                    }
                }
            } else {
                let left = ray
                    .aabb_entry(&self.nodes[node.left()].aabb)
                    .map(|t| (node.left(), t));
                let right = ray
                    .aabb_entry(&self.nodes[node.right()].aabb)
                    .map(|t| (node.right(), t));

                // Push the farthest child first so the nearest is popped next.
                match (left, right) {
                    (Some(l), Some(r)) if l.1 <= r.1 => stack.extend([r, l]),
                    (Some(l), Some(r)) => stack.extend([l, r]),
                    (Some(child), None) | (None, Some(child)) => stack.push(child),
                    (None, None) => {}
                }
            }
        }

        best
    }

    /// Indices of every object blocking `ray`, sorted by increasing parameter along `ray`.
    pub fn intersecting_objects(&self, ray: &Ray<D>, opts: &QueryOptions) -> Vec<usize> {
        let mut hits: Vec<(OrderedFloat<Real>, usize)> = Vec::new();

        if self.is_empty() {
            return Vec::new();
        }

        let mut stack: SmallVec<[usize; TRAVERSAL_STACK_SIZE]> = SmallVec::new();
        stack.push(0);

        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];

            if !ray.intersects_aabb(&node.aabb) {
                continue;
            }

            if node.is_leaf() {
                hits.extend(self.leaf_objects(node).filter_map(|(i, obj)| {
                    obj.object_intersection(ray, opts)
                        .map(|toi| (OrderedFloat(toi), i))
                }));
            } else {
                stack.push(node.right());
                stack.push(node.left());
            }
        }

        hits.sort_unstable();
        hits.into_iter().map(|(_, i)| i).collect()
    }
}

impl<O: BlockingObject<2>> Bvh<O, 2> {
    /// Indices of the objects whose bounds may touch the given vision triangle.
    ///
    /// Both children of every touched internal node are visited with the same
    /// triangle, and leaf objects are kept if their elevation range overlaps the
    /// triangle's. This is a conservative prune: the result may contain objects
    /// that do not actually block anything inside the triangle.
    pub fn vision_triangle_candidate_indices(&self, triangle: &VisionTriangle) -> Vec<usize> {
        let mut result = Vec::new();

        if self.is_empty() {
            return result;
        }

        let mut stack: SmallVec<[usize; TRAVERSAL_STACK_SIZE]> = SmallVec::new();
        stack.push(0);

        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];

            if !triangle.intersects_aabb(&node.aabb) {
                continue;
            }

            if node.is_leaf() {
                result.extend(
                    self.leaf_objects(node)
                        .filter(|(_, obj)| {
                            let (bottom, top) = obj.elevation_range();
                            triangle.overlaps_elevation(bottom, top)
                        })
                        .map(|(i, _)| i),
                );
            } else {
                stack.push(node.right());
                stack.push(node.left());
            }
        }

        result
    }

    /// The objects whose bounds may touch the given vision triangle.
    pub fn vision_triangle_candidates(&self, triangle: &VisionTriangle) -> Vec<&O> {
        self.vision_triangle_candidate_indices(triangle)
            .into_iter()
            .map(|i| &self.objects[i])
            .collect()
    }

    /// The objects whose bounds may touch the triangle `apex, left, right` within
    /// the elevation band `[bottom, top]`.
    pub fn has_vision_triangle_intersection(
        &self,
        apex: Point2,
        left: Point2,
        right: Point2,
        top: Real,
        bottom: Real,
    ) -> Vec<&O> {
        self.vision_triangle_candidates(&VisionTriangle::new(apex, left, right, bottom, top))
    }
}
