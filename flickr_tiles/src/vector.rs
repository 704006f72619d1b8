//! Vector tile encoding: a tiny custom format ("VPTT") carrying raw point
//! coordinates rather than a general-purpose vector tile schema, since
//! every feature in this pipeline is a bare point.

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

const MAGIC: &[u8; 4] = b"VPTT";

/// Points are quantized into this many local tile units per axis.
const EXTENT: i32 = 1 << 20;

/// Tiles smaller than this are never worth gzipping.
const GZIP_MIN_SIZE: usize = 500;

/// Encodes `points` (already projected into this tile's pixel space,
/// `0..256` on each axis) as a VPTT blob, gzip-compressing it when that
/// comes out smaller.
///
/// # Errors
/// Returns an error only if the in-memory encoder fails, which does not
/// happen in practice.
pub fn encode_vector_tile(tile_x: i64, tile_y: i64, tile_z: u8, points: &[(i64, i64)]) -> anyhow::Result<Vec<u8>> {
	let mut raw = Vec::with_capacity(16 + points.len() * 8);
	raw.write_all(MAGIC)?;
	raw.write_i32::<LittleEndian>(tile_x as i32)?;
	raw.write_i32::<LittleEndian>(tile_y as i32)?;
	raw.write_i32::<LittleEndian>(i32::from(tile_z))?;

	for &(px, py) in points {
		// `px`/`py` are already top-origin pixel coordinates (see
		// `tile_math::project_to_tile_pixels`); no further inversion here.
		let qx = (px * i64::from(EXTENT) / 256) as i32;
		let qy = (py * i64::from(EXTENT) / 256) as i32;
		raw.write_i32::<LittleEndian>(qx)?;
		raw.write_i32::<LittleEndian>(qy)?;
	}

	if raw.len() < GZIP_MIN_SIZE {
		return Ok(raw);
	}

	let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
	encoder.write_all(&raw)?;
	let gzipped = encoder.finish()?;

	if gzipped.len() < raw.len() {
		Ok(gzipped)
	} else {
		Ok(raw)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn small_tiles_are_not_gzipped() {
		let blob = encode_vector_tile(1, 2, 3, &[(10, 20)]).unwrap();
		assert_eq!(&blob[0..4], MAGIC);
	}

	#[test]
	fn large_repetitive_tiles_end_up_smaller_gzipped() {
		let points: Vec<(i64, i64)> = (0..2000).map(|i| (i % 256, i % 256)).collect();
		let raw = encode_vector_tile(0, 0, 0, &[]).unwrap();
		let blob = encode_vector_tile(0, 0, 0, &points).unwrap();
		assert!(blob.len() < points.len() * 8);
		assert!(!raw.is_empty());
	}

	#[test]
	fn header_carries_the_tile_coordinates() {
		let blob = encode_vector_tile(5, 9, 12, &[]).unwrap();
		assert_eq!(&blob[0..4], MAGIC);
		assert_eq!(i32::from_le_bytes(blob[4..8].try_into().unwrap()), 5);
		assert_eq!(i32::from_le_bytes(blob[8..12].try_into().unwrap()), 9);
		assert_eq!(i32::from_le_bytes(blob[12..16].try_into().unwrap()), 12);
	}

	#[test]
	fn y_is_not_re_inverted_on_top_of_the_caller_s_projection() {
		// a point near the top of the tile (small py) must stay near the
		// top of the quantized extent, not get flipped to the bottom.
		let blob = encode_vector_tile(0, 0, 0, &[(0, 10)]).unwrap();
		let qy = i32::from_le_bytes(blob[20..24].try_into().unwrap());
		assert!(qy < EXTENT / 10, "expected qy near the top of the extent, got {qy}");
	}
}
