use crate::math::Real;
use crate::scene::ObstacleId;
use smallvec::SmallVec;

/// The kind of perception a query stands for.
///
/// Obstacles may block some senses but not others, e.g., a window blocks
/// movement and sound but not sight.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SenseType {
    /// Vision.
    #[default]
    Sight,
    /// Light emitted by a source.
    Light,
    /// Sound propagation.
    Sound,
    /// Physical movement.
    Move,
}

/// Options tuning how obstacles respond to a query.
///
/// # Example
///
/// ```rust
/// use sightline::query::{QueryOptions, SenseType};
/// use sightline::scene::ObstacleId;
///
/// let opts = QueryOptions::default()
///     .with_source_type(SenseType::Sound)
///     .excluding([ObstacleId(7)]);
/// assert_eq!(opts.source_type, SenseType::Sound);
/// assert!(opts.is_excluded(ObstacleId(7)));
/// ```
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct QueryOptions {
    /// The sense being tested.
    pub source_type: SenseType,
    /// Tile pixels with an alpha (in `[0, 1]`) below this value let the query through.
    pub alpha_threshold: Real,
    /// Whether walls with a limited sense level block on their own.
    pub limited_walls_block: bool,
    /// Obstacles ignored by this query, typically the viewer and the target themselves.
    pub excluded: SmallVec<[ObstacleId; 4]>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            source_type: SenseType::Sight,
            alpha_threshold: 0.75,
            limited_walls_block: false,
            excluded: SmallVec::new(),
        }
    }
}

impl QueryOptions {
    /// Sets the sense being tested.
    #[must_use]
    pub fn with_source_type(mut self, source_type: SenseType) -> Self {
        self.source_type = source_type;
        self
    }

    /// Sets the alpha below which tile pixels are considered transparent.
    #[must_use]
    pub fn with_alpha_threshold(mut self, alpha_threshold: Real) -> Self {
        self.alpha_threshold = alpha_threshold;
        self
    }

    /// Sets whether limited walls block on their own.
    #[must_use]
    pub fn with_limited_walls_block(mut self, limited_walls_block: bool) -> Self {
        self.limited_walls_block = limited_walls_block;
        self
    }

    /// Adds obstacles that never block this query.
    #[must_use]
    pub fn excluding(mut self, ids: impl IntoIterator<Item = ObstacleId>) -> Self {
        self.excluded.extend(ids);
        self
    }

    /// Is the given obstacle ignored by this query?
    #[inline]
    pub fn is_excluded(&self, id: ObstacleId) -> bool {
        self.excluded.contains(&id)
    }
}
