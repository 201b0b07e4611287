use super::bvh_tree::BvhWorkspace;
use super::{Bvh, BvhNode};
use crate::blocking::BlockingObject;
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::Real;
use crate::BvhError;
use ordered_float::OrderedFloat;

/// The axes considered by the split heuristic: the plan-view ones.
const SPLIT_AXES: [usize; 2] = [0, 1];

/// A split candidate: objects whose `(centroid, index)` key along `axis` is at
/// most `key` go to the left child, which then holds `left_count` objects.
#[derive(Copy, Clone, Debug)]
struct Split {
    axis: usize,
    key: (OrderedFloat<Real>, u32),
    left_count: usize,
    cost: Real,
}

impl<O: BlockingObject<D>, const D: usize> Bvh<O, D> {
    /// Recursively splits the leaf at `node_id` until every leaf holds one object.
    pub(super) fn subdivide(
        &mut self,
        node_id: usize,
        workspace: &mut BvhWorkspace<D>,
    ) -> Result<(), BvhError> {
        let node = self.nodes[node_id];
        let count = node.obj_count as usize;
        let first = node.left_first as usize;

        let left_count = match count {
            0 | 1 => return Ok(()),
            // Three objects: one on the left, two on the right split again.
            2 | 3 => 1,
            _ if count % 2 == 1 => {
                if node_id != 0 {
                    let err = BvhError::OddObjectCount {
                        node: node_id,
                        count,
                    };
                    log::error!("{}", err);
                    return Err(err);
                }

                // Only the root may hold an odd count: the largest object becomes a
                // leaf of its own so the remainder can be split evenly.
                let largest = (first..first + count)
                    .max_by_key(|i| {
                        OrderedFloat(workspace.aabbs[self.obj_idx[*i] as usize].diagonal_squared())
                    })
                    .unwrap_or(first);
                self.obj_idx.swap(first, largest);
                1
            }
            _ => self.partition(first, count, workspace),
        };

        let left_id = self.nodes_used;
        self.nodes_used += 2;

        self.nodes[left_id] = BvhNode {
            aabb: Aabb::new_invalid(),
            left_first: first as u32,
            obj_count: left_count as u32,
        };
        self.nodes[left_id + 1] = BvhNode {
            aabb: Aabb::new_invalid(),
            left_first: (first + left_count) as u32,
            obj_count: (count - left_count) as u32,
        };
        self.nodes[node_id].left_first = left_id as u32;
        self.nodes[node_id].obj_count = 0;

        self.update_node_bounds(left_id, &workspace.aabbs);
        self.update_node_bounds(left_id + 1, &workspace.aabbs);

        self.subdivide(left_id, workspace)?;
        self.subdivide(left_id + 1, workspace)
    }

    /// Partitions an even-sized range of the permutation in place around the
    /// cheapest split, and returns the (even) number of objects sent to the left.
    fn partition(&mut self, first: usize, count: usize, workspace: &mut BvhWorkspace<D>) -> usize {
        let Some(split) = self.best_split(first, count, workspace) else {
            // Degenerate costs: split in the middle, keeping both halves even.
            return (count / 2) & !1;
        };

        let key = |i: u32| {
            (
                OrderedFloat(workspace.centroids[i as usize][split.axis]),
                i,
            )
        };

        // Hoare-style two-pointer partition.
        let mut left = first;
        let mut right = first + count;

        while left < right {
            if key(self.obj_idx[left]) <= split.key {
                left += 1;
            } else {
                right -= 1;
                self.obj_idx.swap(left, right);
            }
        }

        debug_assert_eq!(left - first, split.left_count);
        left - first
    }

    /// Evaluates every even split along each plan-view axis.
    ///
    /// The cost of a child is `count² × diagonal²` of its AABB.
    fn best_split(
        &self,
        first: usize,
        count: usize,
        workspace: &mut BvhWorkspace<D>,
    ) -> Option<Split> {
        let mut best: Option<Split> = None;

        for axis in SPLIT_AXES {
            if axis >= D {
                continue;
            }

            workspace.sorted.clear();
            workspace.sorted.extend(
                self.obj_idx[first..first + count]
                    .iter()
                    .map(|i| (OrderedFloat(workspace.centroids[*i as usize][axis]), *i)),
            );
            workspace.sorted.sort_unstable();

            // suffix_aabbs[k] encloses the sorted objects k..count.
            workspace.suffix_aabbs.clear();
            workspace.suffix_aabbs.resize(count + 1, Aabb::new_invalid());
            for k in (0..count).rev() {
                let aabb = workspace.aabbs[workspace.sorted[k].1 as usize];
                workspace.suffix_aabbs[k] = workspace.suffix_aabbs[k + 1].merged(&aabb);
            }

            let mut left_aabb = Aabb::new_invalid();
            for k in 0..count - 2 {
                left_aabb.merge(&workspace.aabbs[workspace.sorted[k].1 as usize]);
                let left_count = k + 1;

                if left_count < 2 || left_count % 2 == 1 {
                    continue;
                }

                let cost = left_aabb.split_cost(left_count)
                    + workspace.suffix_aabbs[left_count].split_cost(count - left_count);

                if cost.is_finite() && best.map_or(true, |b| cost < b.cost) {
                    best = Some(Split {
                        axis,
                        key: workspace.sorted[k],
                        left_count,
                        cost,
                    });
                }
            }
        }

        best
    }
}
