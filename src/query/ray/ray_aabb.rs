use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::query::Ray;

impl<const D: usize> Ray<D> {
    /// Slab test between this ray and an AABB.
    ///
    /// Returns the parameter at which the ray enters the box, clamped to `0` when
    /// the origin is already inside, or `None` if the box lies entirely before the
    /// origin, after the target, or beside the ray. Invalid boxes are never hit.
    pub fn aabb_entry(&self, aabb: &Aabb<D>) -> Option<Real> {
        if !aabb.is_valid() {
            return None;
        }

        let mut tmin = Real::NEG_INFINITY;
        let mut tmax = Real::INFINITY;

        for i in 0..D {
            let t0 = (aabb.mins[i] - self.origin()[i]) * self.inv_dir()[i];
            let t1 = (aabb.maxs[i] - self.origin()[i]) * self.inv_dir()[i];
            // `max`/`min` discard the NaN produced by `0 * ∞` on a slab boundary.
            tmin = tmin.max(t0.min(t1));
            tmax = tmax.min(t0.max(t1));
        }

        if tmax > 0.0 && tmax >= tmin && tmin < self.max_toi() {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }

    /// Does this ray cross the given AABB between its origin and its target?
    #[inline]
    pub fn intersects_aabb(&self, aabb: &Aabb<D>) -> bool {
        self.aabb_entry(aabb).is_some()
    }
}
