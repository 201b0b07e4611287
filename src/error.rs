use crate::scene::ObstacleId;

/// Errors raised by mutations of a [`Bvh`](crate::partitioning::Bvh) or a
/// [`SceneIndex`](crate::scene::SceneIndex).
///
/// Queries never return these: a degenerate query simply reports no intersection.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum BvhError {
    /// An object index does not refer to an object of the hierarchy.
    #[error("object index {index} is out of range (the hierarchy contains {len} objects)")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The number of objects in the hierarchy.
        len: usize,
    },
    /// A node below the root was asked to split an odd number of objects.
    ///
    /// Only the root pulls out a single object to restore an even count, so this
    /// indicates a corrupted tree.
    #[error("node {node} received an odd object count ({count}); only the root may be odd")]
    OddObjectCount {
        /// Index of the node being subdivided.
        node: usize,
        /// The number of objects it holds.
        count: usize,
    },
    /// An obstacle was added twice to the same scene index.
    #[error("obstacle {0:?} is already indexed")]
    DuplicateObstacle(ObstacleId),
    /// An obstacle id is not known to the scene index.
    #[error("obstacle {0:?} is not indexed")]
    UnknownObstacle(ObstacleId),
}
