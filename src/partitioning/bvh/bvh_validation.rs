use super::Bvh;
use crate::blocking::BlockingObject;
use crate::bounding_volume::{Aabb, BoundingVolume};

impl<O: BlockingObject<D>, const D: usize> Bvh<O, D> {
    /// Counts the number of leaves that can be reached from the node at index `id`.
    ///
    /// This is mostly a utility for debugging.
    pub fn reachable_leaf_count(&self, id: usize) -> usize {
        let node = &self.nodes[id];

        if node.is_leaf() {
            1
        } else if self.is_empty() {
            0
        } else {
            self.reachable_leaf_count(node.left()) + self.reachable_leaf_count(node.right())
        }
    }

    /// Panics if the tree isn’t well-formed.
    ///
    /// The tree is well-formed if:
    /// - it has exactly `max(1, 2N - 1)` nodes, all of them reachable from the root,
    /// - the object permutation is a permutation of `0..N`,
    /// - the leaves partition the permutation, each of them holding a single object,
    /// - every leaf AABB is the union of its objects' AABBs, and every internal AABB
    ///   the union of its children's.
    pub fn assert_well_formed(&self) {
        let num_objects = self.objects.len();
        let expected_nodes = (2 * num_objects).saturating_sub(1).max(1);

        assert_eq!(self.nodes.len(), expected_nodes);
        assert_eq!(self.nodes_used, expected_nodes);
        assert_eq!(self.obj_idx.len(), num_objects);

        let mut seen = vec![false; num_objects];
        for i in &self.obj_idx {
            let i = *i as usize;
            assert!(i < num_objects, "invalid object index {}", i);
            assert!(!seen[i], "object {} appears twice in the permutation", i);
            seen[i] = true;
        }

        if num_objects == 0 {
            assert!(!self.nodes[0].aabb.is_valid());
            return;
        }

        let mut visited = vec![false; self.nodes_used];
        let mut covered = vec![false; num_objects];
        let leaf_objects = self.assert_node_well_formed(0, &mut visited, &mut covered);

        assert_eq!(leaf_objects, num_objects);
        assert!(visited.iter().all(|v| *v), "unreachable node");
        assert!(covered.iter().all(|c| *c), "permutation slot not covered by a leaf");
        assert_eq!(self.leaf_count(), num_objects);
        assert_eq!(self.reachable_leaf_count(0), num_objects);
    }

    fn assert_node_well_formed(&self, id: usize, visited: &mut [bool], covered: &mut [bool]) -> usize {
        assert!(id < self.nodes_used, "node {} is out of bounds", id);
        assert!(!visited[id], "node {} is reachable twice", id);
        visited[id] = true;

        let node = &self.nodes[id];

        if node.is_leaf() {
            assert_eq!(node.obj_count, 1, "leaf {} holds several objects", id);

            let range = node.objects_range();
            for slot in range.clone() {
                assert!(!covered[slot], "permutation slot {} is shared by two leaves", slot);
                covered[slot] = true;
            }

            let union = self.obj_idx[range]
                .iter()
                .fold(Aabb::new_invalid(), |acc, i| {
                    acc.merged(&self.objects[*i as usize].aabb())
                });
            assert_eq!(node.aabb, union, "leaf {} has stale bounds", id);

            node.obj_count as usize
        } else {
            let left = self.assert_node_well_formed(node.left(), visited, covered);
            let right = self.assert_node_well_formed(node.right(), visited, covered);
            let union = self.nodes[node.left()]
                .aabb
                .merged(&self.nodes[node.right()].aabb);
            assert_eq!(node.aabb, union, "internal node {} has stale bounds", id);

            left + right
        }
    }
}
