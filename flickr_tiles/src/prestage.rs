//! Streams the photo store into the ephemeral 2D point index: skip banned
//! owners, project to Web Mercator, drop anomalous coordinates, and
//! bulk-load in Morton-sorted chunks for locality.

use anyhow::Result;
use flickr_core::morton::to_morton_2d;
use flickr_core::progress::get_progress_bar;
use flickr_core::projection::transform_point;
use flickr_store::{PhotoStore, PointIndex, TilePoint};

/// Points are staged in chunks of this size before each chunk is sorted
/// by Morton code, matching the "temporary KV stage" bulk-load strategy.
const CHUNK_SIZE: usize = 10_000;

/// Shifts a Mercator-meter coordinate into the non-negative domain the
/// Morton encoder expects. Mercator meters range roughly
/// `+-20_037_509`, comfortably inside a `u32` once shifted.
fn shift_for_morton(meters: f64) -> u32 {
	(meters + 2.1e7).max(0.0) as u32
}

/// Builds the 2D point index from every non-banned, non-anomalous photo
/// in `store`.
///
/// # Errors
/// Returns an error if the photo store cannot be read.
pub fn build_point_index(store: &PhotoStore, banned_owners: &[String]) -> Result<PointIndex> {
	let mut staged: Vec<TilePoint> = Vec::new();
	let mut sorted_points: Vec<TilePoint> = Vec::new();
	let progress = get_progress_bar("staging points", store.len()?);

	store.for_each(|photo, owner| {
		progress.inc(1);

		if banned_owners.iter().any(|banned| banned == owner) {
			return Ok(());
		}

		let lat = photo.lat_e7 as f64 / 1e7;
		let lon = photo.lon_e7 as f64 / 1e7;

		// Drop anomalies the upstream API occasionally returns for
		// photos without real geotags.
		if (lat == 0.0 && lon == 0.0) || lat == lon {
			return Ok(());
		}

		let (x, y) = transform_point(lon, lat);
		staged.push(TilePoint { x: x.round() as i32, y: y.round() as i32 });

		if staged.len() >= CHUNK_SIZE {
			flush_chunk(&mut staged, &mut sorted_points);
		}
		Ok(())
	})?;

	flush_chunk(&mut staged, &mut sorted_points);
	progress.finish();

	Ok(PointIndex::build_from_sorted_stream(sorted_points))
}

fn flush_chunk(staged: &mut Vec<TilePoint>, sorted_points: &mut Vec<TilePoint>) {
	staged.sort_by_key(|p| to_morton_2d(shift_for_morton(f64::from(p.x)), shift_for_morton(f64::from(p.y))));
	sorted_points.extend(staged.drain(..));
}
