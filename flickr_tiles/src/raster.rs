//! Raster encodings for dense tiles: a full per-point stamp for "normal"
//! tiles, and a coarse occupancy-grid sampling for "overview" tiles at
//! low zoom levels, where stamping every point would be wasteful.

use crate::symbol::Symbol;
use crate::tile_math::project_to_tile_pixels;
use flickr_store::{Box2, PointIndex};
use image::{ImageBuffer, LumaA};

const TILE_SIDE: u32 = 256;

type GrayAlphaImage = ImageBuffer<LumaA<u8>, Vec<u8>>;

/// Stamps `symbol` at every point in `points` (already in tile pixel
/// space) onto a 256x256 canvas, returning PNG bytes. Returns `None` if
/// `points` is empty, matching the "no raster for an empty tile" rule.
#[must_use]
pub fn draw_raster_tile(points: &[(i64, i64)], symbol: &Symbol) -> Option<Vec<u8>> {
	if points.is_empty() {
		return None;
	}

	let mut canvas: GrayAlphaImage = ImageBuffer::new(TILE_SIDE, TILE_SIDE);
	let radius = symbol.radius as i64;

	for &(px, py) in points {
		stamp(&mut canvas, px, py, radius, symbol);
	}

	Some(encode_png(&canvas))
}

fn stamp(canvas: &mut GrayAlphaImage, px: i64, py: i64, radius: i64, symbol: &Symbol) {
	for dy in -radius..=radius {
		for dx in -radius..=radius {
			let x = px + dx;
			let y = py + dy;
			if x < 0 || y < 0 || x >= i64::from(TILE_SIDE) || y >= i64::from(TILE_SIDE) {
				continue;
			}
			let alpha = symbol.alpha_at((dx + radius) as u32, (dy + radius) as u32);
			if alpha == 0 {
				continue;
			}
			let pixel = canvas.get_pixel_mut(x as u32, y as u32);
			// overlapping markers blend by taking the brighter coverage,
			// rather than compositing alpha-over-alpha.
			pixel.0[1] = pixel.0[1].max(alpha);
			pixel.0[0] = 0;
		}
	}
}

/// Builds a coarse occupancy overview for a tile too dense to stamp
/// individually: the tile's Mercator-meter extent is scanned on a grid
/// of `step_pixels`, and any occupied cell gets a single synthetic point
/// at its center. Returns `None` if no cell is occupied.
#[must_use]
pub fn draw_overview_tile(
	point_index: &PointIndex,
	tile_query_box: Box2,
	tile_min_x: f64,
	tile_min_y: f64,
	tile_size: f64,
	step_pixels: i64,
	symbol: &Symbol,
) -> Option<Vec<u8>> {
	let margin_steps = (i64::from(symbol.radius).saturating_sub(1)) / step_pixels + 2;
	let cell_meters = tile_size / f64::from(TILE_SIDE) * step_pixels as f64;

	let mut centers = Vec::new();
	let steps = TILE_SIDE as i64 / step_pixels;

	for gy in -margin_steps..steps + margin_steps {
		for gx in -margin_steps..steps + margin_steps {
			let cell_min_x = tile_min_x + gx as f64 * cell_meters;
			let cell_min_y = tile_min_y + gy as f64 * cell_meters;
			let cell = Box2 {
				min_x: cell_min_x as i32,
				max_x: (cell_min_x + cell_meters) as i32,
				min_y: cell_min_y as i32,
				max_y: (cell_min_y + cell_meters) as i32,
			};
			if !within(cell, tile_query_box) {
				continue;
			}
			if point_index.any_in_box(cell) {
				let (px, py) = project_to_tile_pixels(
					cell_min_x + cell_meters / 2.0,
					cell_min_y + cell_meters / 2.0,
					tile_min_x,
					tile_min_y,
					tile_size,
				);
				centers.push((px, py));
			}
		}
	}

	draw_raster_tile(&centers, symbol)
}

fn within(cell: Box2, bounds: Box2) -> bool {
	cell.max_x >= bounds.min_x && cell.min_x <= bounds.max_x && cell.max_y >= bounds.min_y && cell.min_y <= bounds.max_y
}

fn encode_png(canvas: &GrayAlphaImage) -> Vec<u8> {
	let mut bytes = Vec::new();
	let mut cursor = std::io::Cursor::new(&mut bytes);
	canvas
		.write_to(&mut cursor, image::ImageFormat::Png)
		.expect("encoding an in-memory PNG never fails");
	bytes
}
