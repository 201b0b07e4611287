//! Flat geometric shapes used to describe obstacles.

pub use self::plane::Plane;
pub use self::polygon3d::Polygon3d;
pub use self::polygons3d::Polygons3d;

mod plane;
mod polygon3d;
mod polygons3d;
