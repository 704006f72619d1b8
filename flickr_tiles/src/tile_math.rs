//! Tile-space / Mercator-space conversions shared by the descent loop and
//! the rasterizer.

use flickr_core::constants::MAX_MERC;
use flickr_store::Box2;

/// The extent of tile `(x, y, z)` in Mercator meters: `(min_x, min_y,
/// tile_size)`. The full tile spans `[min_x, min_x + tile_size) x [min_y,
/// min_y + tile_size)`.
#[must_use]
pub fn tile_extents(x: i64, y: i64, z: u8) -> (f64, f64, f64) {
	let tile_size = 2.0 * MAX_MERC / (1u64 << z) as f64;
	(x as f64 * tile_size - MAX_MERC, y as f64 * tile_size - MAX_MERC, tile_size)
}

/// The tile's Mercator extent widened by `symbol_radius` pixels on every
/// side, converted to the integer point-index coordinate space.
#[must_use]
pub fn tile_query_box(x: i64, y: i64, z: u8, symbol_radius: u32) -> Box2 {
	let (tile_min_x, tile_min_y, tile_size) = tile_extents(x, y, z);
	let pixel_meters = tile_size / 256.0;
	let margin = f64::from(symbol_radius) * pixel_meters;

	Box2 {
		min_x: (tile_min_x - margin).floor() as i32,
		max_x: (tile_min_x + tile_size + margin).ceil() as i32,
		min_y: (tile_min_y - margin).floor() as i32,
		max_y: (tile_min_y + tile_size + margin).ceil() as i32,
	}
}

/// Converts a `(tile_x, tile_y, tile_z)` index addressed top-origin (the
/// scanning order used by the descent loop) into the bottom-origin TMS row
/// MBTiles expects.
#[must_use]
pub fn tile_index_from_tms(x: i64, y: i64, z: u8) -> (i64, i64, u8) {
	(x, (1i64 << z) - 1 - y, z)
}

/// Projects a Mercator point into pixel coordinates within tile
/// `(tile_min_x, tile_min_y, tile_size)`, inverting the y axis (top-origin
/// pixel space).
#[must_use]
pub fn project_to_tile_pixels(x: f64, y: f64, tile_min_x: f64, tile_min_y: f64, tile_size: f64) -> (i64, i64) {
	let pix_x = (x - tile_min_x) / tile_size * 256.0;
	let pix_y = 256.0 - (y - tile_min_y) / tile_size * 256.0;
	(pix_x as i64, pix_y as i64)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn root_tile_spans_the_whole_mercator_square() {
		let (min_x, min_y, size) = tile_extents(0, 0, 0);
		assert!((min_x - -MAX_MERC).abs() < 1e-6);
		assert!((min_y - -MAX_MERC).abs() < 1e-6);
		assert!((size - 2.0 * MAX_MERC).abs() < 1e-6);
	}

	#[test]
	fn tms_flip_is_involutive_at_fixed_z() {
		let (x, y, z) = (3, 5, 4);
		let (fx, fy, fz) = tile_index_from_tms(x, y, z);
		let (fx2, fy2, fz2) = tile_index_from_tms(fx, fy, fz);
		assert_eq!((x, y, z), (fx2, fy2, fz2));
		assert_ne!(y, fy);
	}

	#[test]
	fn query_box_is_wider_than_the_raw_tile() {
		let raw = tile_extents(0, 0, 1);
		let padded = tile_query_box(0, 0, 1, 5);
		assert!(f64::from(padded.min_x) < raw.0);
	}
}
