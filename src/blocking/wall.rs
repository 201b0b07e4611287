use crate::blocking::BlockingObject;
use crate::bounding_volume::Aabb;
use crate::math::{Point, Point2, Point3, Real, DEFAULT_EPSILON, MAX_ELEVATION};
use crate::query::details::intersect_vertical_rectangle;
use crate::query::{QueryOptions, Ray, SenseType};
use crate::shape::Plane;
use crate::utils::{orient2d, segment_intersection_toi};

/// How a wall restricts one sense.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum SenseLevel {
    /// The wall never blocks this sense.
    None,
    /// The wall always blocks this sense.
    #[default]
    Normal,
    /// The wall only blocks when [`QueryOptions::limited_walls_block`] is set.
    Limited,
    /// The wall blocks only viewers farther than the given distance from it.
    Proximity(Real),
    /// The wall blocks only viewers within the given distance from it.
    Distance(Real),
}

/// The sense levels of a wall, one per [`SenseType`].
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WallSenses {
    /// Restriction of [`SenseType::Sight`].
    pub sight: SenseLevel,
    /// Restriction of [`SenseType::Light`].
    pub light: SenseLevel,
    /// Restriction of [`SenseType::Sound`].
    pub sound: SenseLevel,
    /// Restriction of [`SenseType::Move`].
    pub movement: SenseLevel,
}

impl WallSenses {
    /// The same level for every sense.
    pub fn uniform(level: SenseLevel) -> Self {
        WallSenses {
            sight: level,
            light: level,
            sound: level,
            movement: level,
        }
    }

    /// The level of the given sense.
    pub fn get(&self, sense: SenseType) -> SenseLevel {
        match sense {
            SenseType::Sight => self.sight,
            SenseType::Light => self.light,
            SenseType::Sound => self.sound,
            SenseType::Move => self.movement,
        }
    }

    /// Sets the level of the given sense.
    pub fn set(&mut self, sense: SenseType, level: SenseLevel) {
        match sense {
            SenseType::Sight => self.sight = level,
            SenseType::Light => self.light = level,
            SenseType::Sound => self.sound = level,
            SenseType::Move => self.movement = level,
        }
    }
}

/// Whether a wall is a door, and its state.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DoorState {
    /// A plain wall.
    #[default]
    NotADoor,
    /// A closed door.
    Closed,
    /// An open door, which never blocks.
    Open,
    /// A locked door.
    Locked,
}

/// The side from which a wall blocks.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WallDirection {
    /// The wall blocks from both sides.
    #[default]
    Both,
    /// The wall only blocks viewers standing to the left of `a → b`.
    Left,
    /// The wall only blocks viewers standing to the right of `a → b`.
    Right,
}

/// A wall segment extruded vertically between two elevations.
///
/// # Example
///
/// ```rust
/// use sightline::blocking::{BlockingObject, WallBlocker};
/// use sightline::math::{Point2, Point3};
/// use sightline::query::{QueryOptions, Ray3};
///
/// let wall = WallBlocker::new(Point2::new(5.0, -1.0), Point2::new(5.0, 1.0));
/// let ray = Ray3::from_points(Point3::origin(), Point3::new(10.0, 0.0, 0.0));
/// assert!(wall.has_object_intersection(&ray, &QueryOptions::default()));
/// ```
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct WallBlocker {
    a: Point2,
    b: Point2,
    bottom: Real,
    top: Real,
    plane: Option<Plane>,
    /// The restriction of every sense.
    pub senses: WallSenses,
    /// The door state.
    pub door: DoorState,
    /// The side from which this wall blocks.
    pub direction: WallDirection,
}

impl WallBlocker {
    /// A wall from `a` to `b`, spanning every elevation and blocking every sense.
    pub fn new(a: Point2, b: Point2) -> Self {
        WallBlocker {
            a,
            b,
            bottom: -MAX_ELEVATION,
            top: MAX_ELEVATION,
            plane: Plane::vertical(&a, &b),
            senses: WallSenses::default(),
            door: DoorState::NotADoor,
            direction: WallDirection::Both,
        }
    }

    /// Restricts this wall to the elevation band `[bottom, top]`.
    #[must_use]
    pub fn with_elevation(mut self, bottom: Real, top: Real) -> Self {
        self.bottom = bottom.min(top);
        self.top = bottom.max(top);
        self
    }

    /// Sets the restriction of one sense.
    #[must_use]
    pub fn with_sense(mut self, sense: SenseType, level: SenseLevel) -> Self {
        self.senses.set(sense, level);
        self
    }

    /// Sets the restriction of every sense.
    #[must_use]
    pub fn with_senses(mut self, senses: WallSenses) -> Self {
        self.senses = senses;
        self
    }

    /// Sets the door state.
    #[must_use]
    pub fn with_door(mut self, door: DoorState) -> Self {
        self.door = door;
        self
    }

    /// Sets the side from which this wall blocks.
    #[must_use]
    pub fn with_direction(mut self, direction: WallDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Moves the endpoints of this wall.
    pub fn set_endpoints(&mut self, a: Point2, b: Point2) {
        self.a = a;
        self.b = b;
        self.plane = Plane::vertical(&a, &b);
    }

    /// The endpoints of this wall.
    pub fn endpoints(&self) -> [Point2; 2] {
        [self.a, self.b]
    }

    /// The vertical plane of this wall, `None` if both endpoints coincide.
    pub fn plane(&self) -> Option<&Plane> {
        self.plane.as_ref()
    }

    /// The corner above `a`.
    pub fn top_point(&self) -> Point3 {
        Point3::new(self.a.x, self.a.y, self.top)
    }

    /// The corner below `b`.
    pub fn bottom_point(&self) -> Point3 {
        Point3::new(self.b.x, self.b.y, self.bottom)
    }

    /// Does this wall block a query issued from `viewer`, regardless of geometry?
    pub fn blocks_from(&self, viewer: &Point2, opts: &QueryOptions) -> bool {
        if self.door == DoorState::Open {
            return false;
        }

        let side_ok = match self.direction {
            WallDirection::Both => true,
            WallDirection::Left => orient2d(&self.a, &self.b, viewer) > 0.0,
            WallDirection::Right => orient2d(&self.a, &self.b, viewer) < 0.0,
        };

        if !side_ok {
            return false;
        }

        match self.senses.get(opts.source_type) {
            SenseLevel::None => false,
            SenseLevel::Normal => true,
            SenseLevel::Limited => opts.limited_walls_block,
            SenseLevel::Proximity(d) => self.distance_to(viewer) > d,
            SenseLevel::Distance(d) => self.distance_to(viewer) <= d,
        }
    }

    /// Plan-view distance from `pt` to this wall.
    pub fn distance_to(&self, pt: &Point2) -> Real {
        let ab = self.b - self.a;
        let len2 = ab.norm_squared();

        if len2 < DEFAULT_EPSILON {
            return na::distance(pt, &self.a);
        }

        let t = ((pt - self.a).dot(&ab) / len2).clamp(0.0, 1.0);
        na::distance(pt, &(self.a + ab * t))
    }
}

impl BlockingObject<3> for WallBlocker {
    fn aabb(&self) -> Aabb<3> {
        Aabb::from_points([self.a, self.b]).with_elevation(self.bottom, self.top)
    }

    fn object_intersection(&self, ray: &Ray<3>, opts: &QueryOptions) -> Option<Real> {
        if !self.blocks_from(&ray.origin().xy(), opts) {
            return None;
        }

        let plane = self.plane.as_ref()?;
        let t = intersect_vertical_rectangle(plane, ray, &self.top_point(), &self.bottom_point())?;
        ray.contains_toi(t).then_some(t)
    }

    fn elevation_range(&self) -> (Real, Real) {
        (self.bottom, self.top)
    }
}

impl BlockingObject<2> for WallBlocker {
    fn aabb(&self) -> Aabb<2> {
        Aabb::from_points([self.a, self.b])
    }

    fn centroid(&self) -> Point<2> {
        na::center(&self.a, &self.b)
    }

    fn object_intersection(&self, ray: &Ray<2>, opts: &QueryOptions) -> Option<Real> {
        if !self.blocks_from(ray.origin(), opts) {
            return None;
        }

        let t = segment_intersection_toi(ray.origin(), &ray.target(), &self.a, &self.b)? * ray.max_toi();
        ray.contains_toi(t).then_some(t)
    }

    fn elevation_range(&self) -> (Real, Real) {
        (self.bottom, self.top)
    }
}
