use super::Bvh;
use crate::blocking::BlockingObject;
use crate::bounding_volume::{Aabb, BoundingVolume};

impl<O: BlockingObject<D>, const D: usize> Bvh<O, D> {
    /// Updates the bounds of the tree after some of its objects moved.
    ///
    /// With `Some(dirty)`, only the leaves holding one of the `dirty` object indices
    /// recompute their AABB from their objects. With `None`, every leaf does. Every
    /// internal node then becomes the union of its two children.
    ///
    /// Neither the topology nor the object permutation are modified. Out-of-range
    /// indices are logged and ignored; see [`Bvh::update_objects`] for a checked
    /// version.
    pub fn refit(&mut self, dirty: Option<&[usize]>) {
        log::trace!(
            "refitting {} nodes ({} dirty objects)",
            self.nodes_used,
            dirty.map_or(self.objects.len(), |d| d.len())
        );

        if self.objects.is_empty() {
            return;
        }

        let dirty_flags = dirty.map(|indices| {
            let mut flags = vec![false; self.objects.len()];
            for i in indices {
                match flags.get_mut(*i) {
                    Some(flag) => *flag = true,
                    None => log::error!(
                        "ignoring out-of-range object {} during refit ({} objects)",
                        i,
                        self.objects.len()
                    ),
                }
            }
            flags
        });

        // Children are always allocated after their parent.
        for node_id in (0..self.nodes_used).rev() {
            let node = self.nodes[node_id];

            if node.is_leaf() {
                let range = node.objects_range();
                let is_dirty = dirty_flags
                    .as_ref()
                    .map_or(true, |flags| {
                        self.obj_idx[range.clone()].iter().any(|i| flags[*i as usize])
                    });

                if is_dirty {
                    self.nodes[node_id].aabb = self.obj_idx[range]
                        .iter()
                        .fold(Aabb::new_invalid(), |acc, i| {
                            acc.merged(&self.objects[*i as usize].aabb())
                        });
                }
            } else {
                let left = self.nodes[node.left()].aabb;
                let right = self.nodes[node.right()].aabb;
                self.nodes[node_id].aabb = left.merged(&right);
            }
        }
    }
}
