use crate::blocking::BlockingObject;
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real};
use crate::BvhError;
use core::ops::Range;
use ordered_float::OrderedFloat;

/// A node of a [`Bvh`].
///
/// The same two fields describe both kinds of nodes:
///
/// - A **leaf** has `obj_count > 0`. Its objects are the `obj_count` entries of the
///   object permutation starting at `left_first`.
/// - An **internal** node has `obj_count == 0`. Its left child is at index `left_first`
///   and its right child at `left_first + 1`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BvhNode<const D: usize> {
    /// The AABB enclosing every object below this node.
    pub aabb: Aabb<D>,
    /// Index of the left child (internal node) or of the first object (leaf).
    pub left_first: u32,
    /// Number of objects of a leaf, zero for internal nodes.
    pub obj_count: u32,
}

impl<const D: usize> Default for BvhNode<D> {
    fn default() -> Self {
        BvhNode {
            aabb: Aabb::new_invalid(),
            left_first: 0,
            obj_count: 0,
        }
    }
}

impl<const D: usize> BvhNode<D> {
    /// Is this node a leaf?
    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.obj_count > 0
    }

    /// Index of the left child of this internal node.
    #[inline(always)]
    pub fn left(&self) -> usize {
        self.left_first as usize
    }

    /// Index of the right child of this internal node.
    #[inline(always)]
    pub fn right(&self) -> usize {
        self.left_first as usize + 1
    }

    /// The range of the object permutation covered by this leaf.
    #[inline(always)]
    pub fn objects_range(&self) -> Range<usize> {
        self.left_first as usize..(self.left_first + self.obj_count) as usize
    }
}

/// Temporary data used while building a tree.
///
/// The bounds and centroids of every object are computed once per build instead
/// of once per subdivision.
#[derive(Clone, Default)]
pub(super) struct BvhWorkspace<const D: usize> {
    pub(super) aabbs: Vec<Aabb<D>>,
    pub(super) centroids: Vec<Point<D>>,
    pub(super) sorted: Vec<(OrderedFloat<Real>, u32)>,
    pub(super) suffix_aabbs: Vec<Aabb<D>>,
}

/// A bounding volume hierarchy over a set of [`BlockingObject`]s.
///
/// The tree is stored as a flat array of [`BvhNode`]s, rooted at index `0`. Objects
/// are owned by the tree and never move: building only reorders a permutation of
/// their indices, which every leaf addresses by offset and length.
///
/// Every leaf holds a single object, so a tree over `N ≥ 1` objects has exactly
/// `2N - 1` nodes.
///
/// # Example
///
/// ```rust
/// use sightline::bounding_volume::Aabb3;
/// use sightline::math::{Point3, MAX_ELEVATION};
/// use sightline::partitioning::Bvh;
/// use sightline::query::{QueryOptions, Ray3};
///
/// let walls = vec![
///     Aabb3::new(Point3::new(4.0, -1.0, -MAX_ELEVATION), Point3::new(6.0, 1.0, MAX_ELEVATION)),
///     Aabb3::new(Point3::new(20.0, -1.0, -MAX_ELEVATION), Point3::new(22.0, 1.0, MAX_ELEVATION)),
/// ];
/// let bvh = Bvh::new(walls);
/// let ray = Ray3::from_points(Point3::origin(), Point3::new(10.0, 0.0, 0.0));
///
/// assert_eq!(bvh.nodes().len(), 3);
/// assert!(bvh.has_intersection(&ray, &QueryOptions::default()));
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Bvh<O, const D: usize> {
    pub(super) objects: Vec<O>,
    pub(super) obj_idx: Vec<u32>,
    pub(super) nodes: Vec<BvhNode<D>>,
    pub(super) nodes_used: usize,
}

/// A hierarchy over plan-view bounding boxes.
pub type Bvh2<O> = Bvh<O, 2>;
/// A hierarchy over bounding boxes with elevation.
pub type Bvh3<O> = Bvh<O, 3>;

impl<O, const D: usize> Default for Bvh<O, D> {
    fn default() -> Self {
        Bvh {
            objects: Vec::new(),
            obj_idx: Vec::new(),
            nodes: vec![BvhNode::default()],
            nodes_used: 1,
        }
    }
}

impl<O: BlockingObject<D>, const D: usize> Bvh<O, D> {
    /// Builds a tree over the given objects.
    pub fn new(objects: Vec<O>) -> Self {
        let mut result = Bvh {
            objects,
            ..Default::default()
        };
        result.build();
        result
    }

    /// Builds the tree from scratch.
    ///
    /// The object permutation is reset to the identity before being partitioned.
    pub fn build(&mut self) {
        let num_objects = self.objects.len();
        let mut workspace = BvhWorkspace::default();

        self.obj_idx = (0..num_objects as u32).collect();
        self.nodes = vec![BvhNode::default(); (2 * num_objects).saturating_sub(1).max(1)];
        self.nodes_used = 1;

        workspace.aabbs = self.objects.iter().map(|obj| obj.aabb()).collect();
        workspace.centroids = self.objects.iter().map(|obj| obj.centroid()).collect();

        let num_invalid = workspace.aabbs.iter().filter(|aabb| !aabb.is_valid()).count();
        if num_invalid > 0 {
            log::warn!(
                "building a hierarchy over {} objects with an inverted bounding box",
                num_invalid
            );
        }

        if num_objects == 0 {
            return;
        }

        self.nodes[0] = BvhNode {
            aabb: Aabb::new_invalid(),
            left_first: 0,
            obj_count: num_objects as u32,
        };
        self.update_node_bounds(0, &workspace.aabbs);

        if let Err(err) = self.subdivide(0, &mut workspace) {
            log::error!("hierarchy build aborted: {}", err);
        }

        log::debug!(
            "built a hierarchy over {} objects using {} nodes",
            num_objects,
            self.nodes_used
        );
    }

    /// Rebuilds the tree from scratch, e.g., after the set of objects changed.
    pub fn rebuild(&mut self) {
        log::debug!("rebuilding a hierarchy over {} objects", self.objects.len());
        self.build();
    }

    /// Adds objects to this tree and rebuilds it.
    ///
    /// Returns the index of the first added object; the others follow contiguously.
    pub fn add_objects(&mut self, objects: impl IntoIterator<Item = O>) -> usize {
        let first = self.objects.len();
        self.objects.extend(objects);
        self.rebuild();
        first
    }

    /// Removes the objects with the given indices and rebuilds the tree.
    ///
    /// The removed objects are returned in increasing index order. The remaining
    /// objects keep their relative order, so indices past a removed one shift down.
    /// Nothing is removed if any index is out of range.
    pub fn remove_objects(&mut self, indices: &[usize]) -> Result<Vec<O>, BvhError> {
        self.check_indices(indices)?;

        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut removed: Vec<O> = sorted
            .iter()
            .rev()
            .map(|i| self.objects.remove(*i))
            .collect();
        removed.reverse();

        self.rebuild();
        Ok(removed)
    }

    /// Recomputes the bounds of the given objects after they moved, then refits the tree.
    ///
    /// The tree topology and the object permutation are left untouched.
    pub fn update_objects(&mut self, indices: &[usize]) -> Result<(), BvhError> {
        self.check_indices(indices)?;
        self.refit(Some(indices));
        Ok(())
    }

    pub(super) fn check_indices(&self, indices: &[usize]) -> Result<(), BvhError> {
        match indices.iter().find(|i| **i >= self.objects.len()) {
            Some(index) => {
                let err = BvhError::IndexOutOfRange {
                    index: *index,
                    len: self.objects.len(),
                };
                log::error!("{}", err);
                Err(err)
            }
            None => Ok(()),
        }
    }

    pub(super) fn update_node_bounds(&mut self, node_id: usize, aabbs: &[Aabb<D>]) {
        let node = &mut self.nodes[node_id];
        node.aabb = self.obj_idx[node.objects_range()]
            .iter()
            .fold(Aabb::new_invalid(), |acc, i| acc.merged(&aabbs[*i as usize]));
    }
}

impl<O, const D: usize> Bvh<O, D> {
    /// The object with the given index.
    #[inline]
    pub fn object(&self, index: usize) -> Option<&O> {
        self.objects.get(index)
    }

    /// A mutable reference to the object with the given index.
    ///
    /// Call [`Bvh::update_objects`] once done moving it.
    #[inline]
    pub fn object_mut(&mut self, index: usize) -> Option<&mut O> {
        self.objects.get_mut(index)
    }

    /// All the objects of this tree, in index order.
    #[inline]
    pub fn objects(&self) -> &[O] {
        &self.objects
    }

    /// The number of objects of this tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Does this tree contain no object?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The node array, rooted at index `0`.
    #[inline]
    pub fn nodes(&self) -> &[BvhNode<D>] {
        &self.nodes
    }

    /// The number of node slots actually used by the tree.
    #[inline]
    pub fn nodes_used(&self) -> usize {
        self.nodes_used
    }

    /// The permutation of object indices partitioned by the leaves.
    #[inline]
    pub fn object_indices(&self) -> &[u32] {
        &self.obj_idx
    }

    /// The number of leaves of this tree.
    pub fn leaf_count(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.nodes[..self.nodes_used]
                .iter()
                .filter(|node| node.is_leaf())
                .count()
        }
    }

    /// The AABB enclosing every object, invalid if the tree is empty.
    #[inline]
    pub fn root_aabb(&self) -> Aabb<D> {
        self.nodes[0].aabb
    }

    /// The objects of the given leaf.
    pub(super) fn leaf_objects<'a>(
        &'a self,
        node: &BvhNode<D>,
    ) -> impl Iterator<Item = (usize, &'a O)> + 'a {
        self.obj_idx[node.objects_range()]
            .iter()
            .map(move |i| (*i as usize, &self.objects[*i as usize]))
    }
}
