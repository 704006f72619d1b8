//! The tile pyramid renderer: streams the photo store into a 2D point
//! index, then descends the slippy-map pyramid from `(0,0,0)`, choosing
//! per-tile between vector, raster and overview encodings by density.

pub mod descend;
pub mod mbtiles;
pub mod prestage;
pub mod raster;
pub mod symbol;
pub mod tile_math;
pub mod vector;

pub use descend::make_tiles;
pub use mbtiles::MbtilesWriter;
pub use prestage::build_point_index;
