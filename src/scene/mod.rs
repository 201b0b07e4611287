//! A host-facing index keeping the hierarchies in sync with a scene.
//!
//! The host describes its obstacles through an [`ObjectSource`] and then forwards
//! its change notifications to [`SceneIndex::added`], [`SceneIndex::removed`] and
//! [`SceneIndex::moved`]. Batching several changes into one call triggers a single
//! rebuild or refit.

use crate::blocking::{Blocker, BlockingObject};
use crate::bounding_volume::Aabb;
use crate::math::{Point, Point2, Point3, Real};
use crate::partitioning::{Bvh2, Bvh3};
use crate::query::{QueryOptions, Ray, Ray2, Ray3, VisionTriangle};
use crate::BvhError;
use hashbrown::HashMap;

/// The stable identifier the host assigns to an obstacle.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub u64);

/// An obstacle of the scene, tagged with its identifier.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// The identifier of this obstacle.
    pub id: ObstacleId,
    /// Its geometry and blocking rules.
    pub blocker: Blocker,
}

impl Obstacle {
    /// Tags a blocker with an identifier.
    pub fn new(id: ObstacleId, blocker: impl Into<Blocker>) -> Self {
        Obstacle {
            id,
            blocker: blocker.into(),
        }
    }
}

impl BlockingObject<3> for Obstacle {
    fn aabb(&self) -> Aabb<3> {
        BlockingObject::<3>::aabb(&self.blocker)
    }

    fn centroid(&self) -> Point<3> {
        BlockingObject::<3>::centroid(&self.blocker)
    }

    fn object_intersection(&self, ray: &Ray<3>, opts: &QueryOptions) -> Option<Real> {
        if opts.is_excluded(self.id) {
            return None;
        }

        BlockingObject::<3>::object_intersection(&self.blocker, ray, opts)
    }

    fn elevation_range(&self) -> (Real, Real) {
        BlockingObject::<3>::elevation_range(&self.blocker)
    }
}

impl BlockingObject<2> for Obstacle {
    fn aabb(&self) -> Aabb<2> {
        BlockingObject::<2>::aabb(&self.blocker)
    }

    fn centroid(&self) -> Point<2> {
        BlockingObject::<2>::centroid(&self.blocker)
    }

    fn object_intersection(&self, ray: &Ray<2>, opts: &QueryOptions) -> Option<Real> {
        if opts.is_excluded(self.id) {
            return None;
        }

        BlockingObject::<2>::object_intersection(&self.blocker, ray, opts)
    }

    fn elevation_range(&self) -> (Real, Real) {
        BlockingObject::<2>::elevation_range(&self.blocker)
    }
}

/// The host scene model, as seen by the index.
pub trait ObjectSource {
    /// Every obstacle of the scene.
    fn obstacles(&self) -> Vec<Obstacle>;
}

impl ObjectSource for [Obstacle] {
    fn obstacles(&self) -> Vec<Obstacle> {
        self.to_vec()
    }
}

impl ObjectSource for Vec<Obstacle> {
    fn obstacles(&self) -> Vec<Obstacle> {
        self.clone()
    }
}

/// Line-of-sight queries over the obstacles of a scene.
///
/// Obstacles are indexed twice: by a 3D hierarchy answering segment queries
/// with elevation, and by a plan-view hierarchy answering vision-triangle and
/// plan-view queries. Both share the same object order, so an obstacle has the
/// same slot in each of them.
#[derive(Clone, Debug, Default)]
pub struct SceneIndex {
    bvh3: Bvh3<Obstacle>,
    bvh2: Bvh2<Obstacle>,
    slots: HashMap<ObstacleId, usize>,
}

impl SceneIndex {
    /// An index without any obstacle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every obstacle of `source`.
    pub fn from_source<S: ObjectSource + ?Sized>(source: &S) -> Result<Self, BvhError> {
        let mut result = Self::new();
        result.added(source.obstacles())?;
        Ok(result)
    }

    /// The number of indexed obstacles.
    pub fn len(&self) -> usize {
        self.bvh3.len()
    }

    /// Is this index empty?
    pub fn is_empty(&self) -> bool {
        self.bvh3.is_empty()
    }

    /// Is the given obstacle indexed?
    pub fn contains(&self, id: ObstacleId) -> bool {
        self.slots.contains_key(&id)
    }

    /// The indexed obstacle with the given id.
    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.slots.get(&id).and_then(|slot| self.bvh3.object(*slot))
    }

    /// The hierarchy used for segment queries with elevation.
    pub fn bvh3(&self) -> &Bvh3<Obstacle> {
        &self.bvh3
    }

    /// The hierarchy used for plan-view queries.
    pub fn bvh2(&self) -> &Bvh2<Obstacle> {
        &self.bvh2
    }

    /// Indexes new obstacles, then rebuilds both hierarchies once.
    ///
    /// Nothing is added if any id is already indexed or appears twice in `obstacles`.
    pub fn added(&mut self, obstacles: Vec<Obstacle>) -> Result<(), BvhError> {
        let first = self.len();
        let mut new_slots = HashMap::with_capacity(obstacles.len());

        for (i, obstacle) in obstacles.iter().enumerate() {
            if self.slots.contains_key(&obstacle.id)
                || new_slots.insert(obstacle.id, first + i).is_some()
            {
                let err = BvhError::DuplicateObstacle(obstacle.id);
                log::error!("{}", err);
                return Err(err);
            }
        }

        log::debug!("indexing {} new obstacles", obstacles.len());
        self.slots.extend(new_slots);
        let _ = self.bvh2.add_objects(obstacles.iter().cloned());
        let _ = self.bvh3.add_objects(obstacles);
        Ok(())
    }

    /// Removes obstacles from the index, then rebuilds both hierarchies once.
    ///
    /// The removed obstacles are returned in their former slot order. Nothing is
    /// removed if any id is unknown.
    pub fn removed(&mut self, ids: &[ObstacleId]) -> Result<Vec<Obstacle>, BvhError> {
        let slots = self.slots_of(ids)?;

        log::debug!("removing {} obstacles", slots.len());
        let _ = self.bvh2.remove_objects(&slots)?;
        let removed = self.bvh3.remove_objects(&slots)?;

        // Slots past a removed obstacle shifted down.
        self.slots = self
            .bvh3
            .objects()
            .iter()
            .enumerate()
            .map(|(slot, obstacle)| (obstacle.id, slot))
            .collect();

        Ok(removed)
    }

    /// Replaces the geometry of already indexed obstacles, then refits both hierarchies.
    ///
    /// The tree topologies are kept, so many small moves stay cheap. Nothing is
    /// modified if any id is unknown.
    pub fn moved(&mut self, updates: Vec<(ObstacleId, Blocker)>) -> Result<(), BvhError> {
        let ids: Vec<_> = updates.iter().map(|(id, _)| *id).collect();
        let slots = self.slots_of(&ids)?;

        for (slot, (_, blocker)) in slots.iter().zip(updates) {
            if let Some(obstacle) = self.bvh2.object_mut(*slot) {
                obstacle.blocker = blocker.clone();
            }
            if let Some(obstacle) = self.bvh3.object_mut(*slot) {
                obstacle.blocker = blocker;
            }
        }

        self.bvh2.update_objects(&slots)?;
        self.bvh3.update_objects(&slots)
    }

    /// Can `viewer` see `target`, i.e., does no obstacle block the segment between them?
    pub fn has_line_of_sight(&self, viewer: &Point3, target: &Point3, opts: &QueryOptions) -> bool {
        let ray = Ray3::from_points(*viewer, *target);
        !self.bvh3.has_intersection(&ray, opts)
    }

    /// Same as [`SceneIndex::has_line_of_sight`], ignoring elevations.
    pub fn has_plan_view_line_of_sight(
        &self,
        viewer: &Point2,
        target: &Point2,
        opts: &QueryOptions,
    ) -> bool {
        let ray = Ray2::from_points(*viewer, *target);
        !self.bvh2.has_intersection(&ray, opts)
    }

    /// The nearest obstacle between `viewer` and `target`, with the fraction of the
    /// way to `target` at which it blocks the line of sight.
    pub fn first_obstruction(
        &self,
        viewer: &Point3,
        target: &Point3,
        opts: &QueryOptions,
    ) -> Option<(ObstacleId, Real)> {
        let ray = Ray3::from_points(*viewer, *target);
        self.bvh3
            .closest_intersection(&ray, opts)
            .map(|(slot, toi)| (self.bvh3.objects()[slot].id, toi))
    }

    /// The obstacles that may block part of the given vision triangle.
    pub fn vision_candidates(&self, triangle: &VisionTriangle) -> Vec<ObstacleId> {
        self.bvh2
            .vision_triangle_candidates(triangle)
            .into_iter()
            .map(|obstacle| obstacle.id)
            .collect()
    }

    fn slots_of(&self, ids: &[ObstacleId]) -> Result<Vec<usize>, BvhError> {
        ids.iter()
            .map(|id| {
                self.slots.get(id).copied().ok_or_else(|| {
                    let err = BvhError::UnknownObstacle(*id);
                    log::error!("{}", err);
                    err
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocking::{TokenBlocker, WallBlocker};

    fn wall(id: u64, x: Real) -> Obstacle {
        Obstacle::new(
            ObstacleId(id),
            WallBlocker::new(Point2::new(x, -1.0), Point2::new(x, 1.0)),
        )
    }

    fn scene() -> SceneIndex {
        SceneIndex::from_source(&vec![wall(1, 5.0), wall(2, 8.0), wall(3, 30.0)]).unwrap()
    }

    #[test]
    fn duplicate_and_unknown_ids_are_rejected() {
        let mut index = scene();

        assert_eq!(
            index.added(vec![wall(4, 40.0), wall(2, 50.0)]),
            Err(BvhError::DuplicateObstacle(ObstacleId(2)))
        );
        assert_eq!(
            index.added(vec![wall(5, 40.0), wall(5, 50.0)]),
            Err(BvhError::DuplicateObstacle(ObstacleId(5)))
        );
        assert_eq!(
            index.removed(&[ObstacleId(1), ObstacleId(9)]),
            Err(BvhError::UnknownObstacle(ObstacleId(9)))
        );
        assert_eq!(index.len(), 3);
        assert!(!index.contains(ObstacleId(4)));
    }

    #[test]
    fn removal_keeps_slots_consistent() {
        let mut index = scene();
        let removed = index.removed(&[ObstacleId(1)]).unwrap();

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, ObstacleId(1));
        assert_eq!(index.obstacle(ObstacleId(3)).map(|o| o.id), Some(ObstacleId(3)));
        index.bvh3().assert_well_formed();
        index.bvh2().assert_well_formed();

        let viewer = Point3::new(0.0, 0.0, 0.0);
        let target = Point3::new(10.0, 0.0, 0.0);
        assert_eq!(
            index
                .first_obstruction(&viewer, &target, &QueryOptions::default())
                .map(|hit| hit.0),
            Some(ObstacleId(2))
        );
    }

    #[test]
    fn moved_obstacles_follow_their_new_geometry() {
        let mut index = scene();
        let viewer = Point3::new(0.0, 0.0, 0.0);
        let target = Point3::new(10.0, 0.0, 0.0);
        let opts = QueryOptions::default();

        let aside = |x: Real| {
            Blocker::from(WallBlocker::new(Point2::new(x, 10.0), Point2::new(x, 12.0)))
        };
        index
            .moved(vec![(ObstacleId(1), aside(5.0)), (ObstacleId(2), aside(8.0))])
            .unwrap();

        assert!(index.has_line_of_sight(&viewer, &target, &opts));
        assert!(index.has_plan_view_line_of_sight(&viewer.xy(), &target.xy(), &opts));
        index.bvh3().assert_well_formed();
        index.bvh2().assert_well_formed();
    }

    #[test]
    fn excluded_obstacles_never_block() {
        let index = SceneIndex::from_source(
            &[Obstacle::new(
                ObstacleId(1),
                TokenBlocker::new(Point2::new(5.0, 0.0), 1.0, 1.0, 0.0, 2.0),
            )][..],
        )
        .unwrap();
        let viewer = Point3::new(0.0, 0.0, 1.0);
        let target = Point3::new(10.0, 0.0, 1.0);

        assert!(!index.has_line_of_sight(&viewer, &target, &QueryOptions::default()));
        assert!(index.has_line_of_sight(
            &viewer,
            &target,
            &QueryOptions::default().excluding([ObstacleId(1)])
        ));
    }
}
