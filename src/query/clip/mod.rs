pub use self::clip_polygon_z::clip_polygon_z;

mod clip_polygon_z;
