//! Descends the slippy-map tile pyramid from `(0, 0, 0)`, choosing per
//! tile between vector, raster and overview encodings by the number of
//! points it covers, and recursing into children only while the tile is
//! still too dense to stop at.

use crate::mbtiles::{MbtilesWriter, TileFormat};
use crate::raster::{draw_overview_tile, draw_raster_tile};
use crate::symbol::Symbol;
use crate::tile_math::{project_to_tile_pixels, tile_extents, tile_index_from_tms, tile_query_box};
use crate::vector::encode_vector_tile;
use anyhow::Result;
use flickr_core::config::PipelineConfig;
use flickr_store::PointIndex;
use log::info;

/// The grid step, in pixels, used by the overview sampler.
const OVERVIEW_STEP_PIXELS: i64 = 2;

/// Renders every tile in `point_index` into `writer`, descending from the
/// root tile and recursing into children only for populated raster/overview
/// tiles at zoom levels at or below `config.max_level`.
///
/// # Errors
/// Returns an error if a tile cannot be written to the archive.
pub fn make_tiles(point_index: &PointIndex, config: &PipelineConfig, writer: &mut MbtilesWriter) -> Result<()> {
	writer.write_standard_metadata("photos", TileFormat::Vptt, 0, config.max_level)?;

	if point_index.is_empty() {
		return Ok(());
	}

	let symbol = Symbol::build(config.symbol_radius);
	let mut stack = vec![(0i64, 0i64, 0u8)];
	let mut tiles_written = 0u64;

	while let Some((x, y, z)) = stack.pop() {
		let query_box = tile_query_box(x, y, z, config.symbol_radius);
		let points = point_index.scan_box_with_limit(query_box, config.max_points_in_normal_tile);

		if points.is_empty() {
			continue;
		}

		let (tms_x, tms_y, tms_z) = tile_index_from_tms(x, y, z);

		if points.len() <= config.max_points_in_vector_tile {
			let (tile_min_x, tile_min_y, tile_size) = tile_extents(x, y, z);
			let projected: Vec<(i64, i64)> = points
				.iter()
				.map(|p| project_to_tile_pixels(f64::from(p.x), f64::from(p.y), tile_min_x, tile_min_y, tile_size))
				.collect();
			let blob = encode_vector_tile(x, y, z, &projected)?;
			writer.add_tile(tms_z, tms_x, tms_y, &blob)?;
			tiles_written += 1;
			continue;
		}

		let is_overview = points.len() > config.max_points_in_normal_tile || z <= config.max_overviews_level;

		let (tile_min_x, tile_min_y, tile_size) = tile_extents(x, y, z);

		if is_overview {
			let png = draw_overview_tile(point_index, query_box, tile_min_x, tile_min_y, tile_size, OVERVIEW_STEP_PIXELS, &symbol);

			match png {
				Some(data) => {
					writer.add_tile(tms_z, tms_x, tms_y, &data)?;
					tiles_written += 1;
				}
				None => {
					// No cell in the overview grid was occupied: emit an
					// empty vector tile instead so the client can tell
					// sparse apart from missing, and stop descending here.
					let blob = encode_vector_tile(x, y, z, &[])?;
					writer.add_tile(tms_z, tms_x, tms_y, &blob)?;
					tiles_written += 1;
					continue;
				}
			}
		} else {
			let projected: Vec<(i64, i64)> = points
				.iter()
				.map(|p| project_to_tile_pixels(f64::from(p.x), f64::from(p.y), tile_min_x, tile_min_y, tile_size))
				.collect();
			if let Some(data) = draw_raster_tile(&projected, &symbol) {
				writer.add_tile(tms_z, tms_x, tms_y, &data)?;
				tiles_written += 1;
			}
		}

		// Vector tiles and empty overviews are leaves (handled by the
		// `continue` above); only a populated raster/overview tile
		// recurses, and only while there's still depth left to descend
		// into.
		if z <= config.max_level {
			stack.push((x * 2, y * 2, z + 1));
			stack.push((x * 2 + 1, y * 2, z + 1));
			stack.push((x * 2, y * 2 + 1, z + 1));
			stack.push((x * 2 + 1, y * 2 + 1, z + 1));
		}
	}

	info!("wrote {tiles_written} tiles");
	Ok(())
}
