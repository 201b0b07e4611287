use crate::blocking::BlockingObject;
use crate::bounding_volume::{Aabb, Aabb2};
use crate::math::{Point2, Real};
use crate::query::{QueryOptions, Ray, SenseType};
use crate::shape::Plane;

bitflags::bitflags! {
    /// Senses a tile lets through regardless of its opacity.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
    pub struct TileFlags: u8 {
        /// The tile never blocks sight.
        const IGNORE_SIGHT = 1 << 0;
        /// The tile never blocks light.
        const IGNORE_LIGHT = 1 << 1;
        /// The tile never blocks sound.
        const IGNORE_SOUND = 1 << 2;
        /// The tile never blocks movement.
        const IGNORE_MOVE = 1 << 3;
    }
}

impl TileFlags {
    /// The flag ignoring the given sense.
    pub fn ignoring(sense: SenseType) -> Self {
        match sense {
            SenseType::Sight => TileFlags::IGNORE_SIGHT,
            SenseType::Light => TileFlags::IGNORE_LIGHT,
            SenseType::Sound => TileFlags::IGNORE_SOUND,
            SenseType::Move => TileFlags::IGNORE_MOVE,
        }
    }
}

/// The rendered alpha of a tile, sampled on a regular grid.
///
/// Pixels are stored row-major, one byte each. Row `0` lies along the minimum `y`
/// of the tile and column `0` along its minimum `x`.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl AlphaMask {
    /// Creates a mask from row-major alpha bytes.
    ///
    /// Returns `None` if a dimension is zero or if `data` does not hold exactly
    /// `width * height` bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            log::warn!(
                "rejecting a {}x{} alpha mask backed by {} bytes",
                width,
                height,
                data.len()
            );
            return None;
        }

        Some(AlphaMask {
            width,
            height,
            data,
        })
    }

    /// The number of columns and rows of this mask.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// The alpha, in `[0, 1]`, at the normalized coordinates `(u, v)` in `[0, 1]²`.
    pub fn alpha_at(&self, u: Real, v: Real) -> Real {
        let col = ((u.clamp(0.0, 1.0) * self.width as Real) as usize).min(self.width - 1);
        let row = ((v.clamp(0.0, 1.0) * self.height as Real) as usize).min(self.height - 1);
        self.data[row * self.width + col] as Real / 255.0
    }
}

/// A horizontal tile at a single elevation.
///
/// Pixels of the tile whose alpha falls below [`QueryOptions::alpha_threshold`]
/// do not block. A tile without alpha mask is fully opaque.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct TileBlocker {
    /// The plan-view rectangle covered by the tile.
    pub rect: Aabb2,
    /// The elevation of the tile.
    pub elevation: Real,
    /// Senses this tile never blocks.
    pub flags: TileFlags,
    /// The rendered alpha of the tile.
    pub alpha: Option<AlphaMask>,
}

impl TileBlocker {
    /// An opaque tile blocking every sense.
    pub fn new(rect: Aabb2, elevation: Real) -> Self {
        TileBlocker {
            rect,
            elevation,
            flags: TileFlags::empty(),
            alpha: None,
        }
    }

    /// Sets the senses this tile never blocks.
    #[must_use]
    pub fn with_flags(mut self, flags: TileFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the alpha mask of this tile.
    #[must_use]
    pub fn with_alpha(mut self, alpha: AlphaMask) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// The horizontal plane of this tile.
    pub fn plane(&self) -> Plane {
        Plane::horizontal(self.elevation)
    }

    /// The alpha of the tile at the given plan-view point, `0` outside of it.
    pub fn alpha_at(&self, pt: &Point2) -> Real {
        if !self.rect.contains_point(pt) {
            return 0.0;
        }

        match &self.alpha {
            None => 1.0,
            Some(mask) => {
                let extents = self.rect.extents();
                let u = if extents.x > 0.0 {
                    (pt.x - self.rect.mins.x) / extents.x
                } else {
                    0.0
                };
                let v = if extents.y > 0.0 {
                    (pt.y - self.rect.mins.y) / extents.y
                } else {
                    0.0
                };
                mask.alpha_at(u, v)
            }
        }
    }
}

impl BlockingObject<3> for TileBlocker {
    fn aabb(&self) -> Aabb<3> {
        self.rect.with_elevation(self.elevation, self.elevation)
    }

    fn object_intersection(&self, ray: &Ray<3>, opts: &QueryOptions) -> Option<Real> {
        if self.flags.contains(TileFlags::ignoring(opts.source_type)) {
            return None;
        }

        let t = self.plane().intersect_ray(ray)?;

        if !ray.contains_toi(t) {
            return None;
        }

        let hit = ray.point_at(t).xy();
        (self.alpha_at(&hit) >= opts.alpha_threshold).then_some(t)
    }

    fn elevation_range(&self) -> (Real, Real) {
        (self.elevation, self.elevation)
    }
}

impl BlockingObject<2> for TileBlocker {
    fn aabb(&self) -> Aabb<2> {
        self.rect
    }

    fn object_intersection(&self, _: &Ray<2>, _: &QueryOptions) -> Option<Real> {
        None
    }

    fn elevation_range(&self) -> (Real, Real) {
        (self.elevation, self.elevation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::query::Ray3;

    fn tile() -> TileBlocker {
        TileBlocker::new(Aabb2::new(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0)), 5.0)
    }

    fn ray_through(x: Real, y: Real) -> Ray3 {
        Ray3::from_points(Point3::new(x, y, 10.0), Point3::new(x, y, 0.0))
    }

    #[test]
    fn opaque_tile_blocks_vertical_rays() {
        let opts = QueryOptions::default();
        assert_relative_eq!(tile().object_intersection(&ray_through(1.0, 1.0), &opts).unwrap(), 0.5);
        assert!(!tile().has_object_intersection(&ray_through(5.0, 1.0), &opts));

        let below = Ray3::from_points(Point3::new(1.0, 1.0, 4.0), Point3::new(1.0, 1.0, 0.0));
        assert!(!tile().has_object_intersection(&below, &opts));
    }

    #[test]
    fn alpha_holes_let_rays_through() {
        // Left half transparent, right half opaque.
        let mask = AlphaMask::new(2, 1, vec![0, 255]).unwrap();
        let tile = tile().with_alpha(mask);
        let opts = QueryOptions::default();
        assert!(!tile.has_object_intersection(&ray_through(1.0, 1.0), &opts));
        assert!(tile.has_object_intersection(&ray_through(3.0, 1.0), &opts));
        assert!(!tile.has_object_intersection(
            &ray_through(3.0, 1.0),
            &opts.with_alpha_threshold(1.1)
        ));
    }

    #[test]
    fn ignore_flags() {
        let tile = tile().with_flags(TileFlags::IGNORE_SIGHT | TileFlags::IGNORE_LIGHT);
        let opts = QueryOptions::default();
        assert!(!tile.has_object_intersection(&ray_through(1.0, 1.0), &opts));
        assert!(tile.has_object_intersection(
            &ray_through(1.0, 1.0),
            &opts.with_source_type(SenseType::Sound)
        ));
    }

    #[test]
    fn malformed_masks_are_rejected() {
        assert!(AlphaMask::new(2, 2, vec![0; 3]).is_none());
        assert!(AlphaMask::new(0, 0, vec![]).is_none());
    }
}
