use super::Bvh;
use core::fmt::Write;

impl<O, const D: usize> Bvh<O, D> {
    /// A textual dump of the node hierarchy, one node per line, indented by depth.
    ///
    /// Leaves list the objects they hold. This is meant for debugging only and its
    /// format may change at any time.
    pub fn hierarchy_dump(&self) -> String {
        let mut out = String::new();

        if self.is_empty() {
            out.push_str("(empty)\n");
            return out;
        }

        let mut stack = vec![(0usize, 0usize)];

        while let Some((node_id, depth)) = stack.pop() {
            let node = &self.nodes[node_id];
            let indent = "  ".repeat(depth);
            let mins: Vec<_> = node.aabb.mins.iter().collect();
            let maxs: Vec<_> = node.aabb.maxs.iter().collect();

            if node.is_leaf() {
                let objects = &self.obj_idx[node.objects_range()];
                let _ = writeln!(
                    out,
                    "{}leaf #{} {:?} -> {:?} objects {:?}",
                    indent, node_id, mins, maxs, objects
                );
            } else {
                let _ = writeln!(
                    out,
                    "{}node #{} {:?} -> {:?}",
                    indent, node_id, mins, maxs
                );
                stack.push((node.right(), depth + 1));
                stack.push((node.left(), depth + 1));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use crate::bounding_volume::Aabb;
    use crate::math::Point2;
    use crate::partitioning::Bvh2;

    #[test]
    fn dump_lists_every_node() {
        let bvh = Bvh2::new(vec![
            Aabb::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)),
            Aabb::new(Point2::new(4.0, 0.0), Point2::new(5.0, 1.0)),
        ]);
        let dump = bvh.hierarchy_dump();
        let lines: Vec<_> = dump.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("node #0"));
        assert!(lines[1].starts_with("  leaf #1"));
        assert!(lines[2].starts_with("  leaf #2"));
    }

    #[test]
    fn dump_of_an_empty_tree() {
        let bvh = Bvh2::<Aabb<2>>::default();
        assert_eq!(bvh.hierarchy_dump(), "(empty)\n");
    }
}
