use crate::bounding_volume::{Aabb3, BoundingVolume};
use crate::math::{Real, Vector3};
use crate::query::Ray3;
use crate::shape::Polygon3d;

/// A set of flat polygons forming one region, e.g., an outer boundary and its holes.
///
/// A ray crosses the region where it crosses more outer boundaries than holes.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygons3d {
    polygons: Vec<Polygon3d>,
}

impl Polygons3d {
    /// An empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// A region made of the given polygons.
    pub fn from_polygons(polygons: Vec<Polygon3d>) -> Self {
        Polygons3d { polygons }
    }

    /// Adds a polygon to this region.
    pub fn push(&mut self, polygon: Polygon3d) {
        self.polygons.push(polygon);
    }

    /// The polygons of this region.
    pub fn polygons(&self) -> &[Polygon3d] {
        &self.polygons
    }

    /// The number of polygons of this region.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Does this region contain no polygon?
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// The AABB of every polygon of this region.
    pub fn bounds(&self) -> Aabb3 {
        self.polygons
            .iter()
            .fold(Aabb3::new_invalid(), |acc, poly| acc.merged(&poly.bounds()))
    }

    /// Moves every polygon to the elevation `z`.
    pub fn set_z(&mut self, z: Real) {
        self.polygons.iter_mut().for_each(|poly| poly.set_z(z));
    }

    /// Translates every polygon.
    pub fn translate(&mut self, shift: &Vector3) {
        self.polygons.iter_mut().for_each(|poly| poly.translate(shift));
    }

    /// Clips every polygon against the elevation `z`, dropping those left without area.
    pub fn clip_z(&self, z: Real, keep_less_than: bool) -> Polygons3d {
        Polygons3d {
            polygons: self
                .polygons
                .iter()
                .map(|poly| poly.clip_z(z, keep_less_than))
                .filter(|poly| poly.len() > 2)
                .collect(),
        }
    }

    /// Parameter along `ray` at which it crosses this region, if any.
    ///
    /// Each outer boundary hit counts `+1` and each hole hit `-1`. If the net
    /// count is positive, the nearest outer boundary hit is returned.
    pub fn intersection(&self, ray: &Ray3) -> Option<Real> {
        let mut count = 0i32;
        let mut nearest: Option<Real> = None;

        for poly in &self.polygons {
            let Some(t) = poly.intersection(ray) else {
                continue;
            };

            if poly.is_hole() {
                count -= 1;
            } else {
                count += 1;
                nearest = Some(nearest.map_or(t, |best| best.min(t)));
            }
        }

        if count > 0 {
            nearest
        } else {
            None
        }
    }
}
