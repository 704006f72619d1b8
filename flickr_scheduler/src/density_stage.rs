//! Stages the photo store into the ephemeral 3D density index used by the
//! full-scan scheduler: stream, chunk, Morton-sort each chunk, bulk-load.

use anyhow::Result;
use flickr_core::morton::to_morton_3d_approx;
use flickr_core::progress::get_progress_bar;
use flickr_store::{DensityIndex, DensityPoint, PhotoStore};

/// Points are staged in chunks of this size before each chunk is sorted by
/// Morton code, matching the bulk-load strategy used when staging the
/// tile maker's 2D point index.
const CHUNK_SIZE: usize = 10_000;

/// Shifts signed degrees into the non-negative domain the Morton encoder
/// expects; `upload_date` is shifted the same way from a Unix timestamp.
fn shift_lat(lat: f64) -> u32 {
	((lat + 90.0) * 1e5).max(0.0) as u32
}

fn shift_lon(lon: f64) -> u32 {
	((lon + 180.0) * 1e5).max(0.0) as u32
}

fn shift_date(date: f64) -> u32 {
	date.max(0.0) as u32
}

/// Builds the 3D density index from every photo in `store`.
///
/// # Errors
/// Returns an error if the photo store cannot be read.
pub fn build_density_index(store: &PhotoStore) -> Result<DensityIndex> {
	let mut staged: Vec<DensityPoint> = Vec::new();
	let mut sorted_points: Vec<DensityPoint> = Vec::new();
	let progress = get_progress_bar("staging density index", store.len()?);

	store.for_each(|photo, _owner| {
		progress.inc(1);
		staged.push(DensityPoint {
			lat: f64::from(photo.lat_e7) / 1e7,
			lon: f64::from(photo.lon_e7) / 1e7,
			upload_date: photo.upload_date as f64,
		});

		if staged.len() >= CHUNK_SIZE {
			flush_chunk(&mut staged, &mut sorted_points);
		}
		Ok(())
	})?;

	flush_chunk(&mut staged, &mut sorted_points);
	progress.finish();

	Ok(DensityIndex::build_from_sorted_stream(sorted_points))
}

fn flush_chunk(staged: &mut Vec<DensityPoint>, sorted_points: &mut Vec<DensityPoint>) {
	staged.sort_by_key(|p| to_morton_3d_approx(shift_lat(p.lat), shift_lon(p.lon), shift_date(p.upload_date)));
	sorted_points.extend(staged.drain(..));
}

#[cfg(test)]
mod tests {
	use super::*;
	use flickr_store::PhotoRecord;

	#[test]
	fn builds_an_index_with_one_point_per_photo() {
		let store = PhotoStore::open_in_memory().unwrap();
		store
			.put_batch(&[
				(PhotoRecord { id: 1, lat_e7: 500_000_000, lon_e7: 100_000_000, accuracy: 16, fetch_ts: 0, upload_date: 10 }, "a".to_string()),
				(PhotoRecord { id: 2, lat_e7: 510_000_000, lon_e7: 110_000_000, accuracy: 16, fetch_ts: 0, upload_date: 20 }, "b".to_string()),
			])
			.unwrap();

		let index = build_density_index(&store).unwrap();
		assert_eq!(index.len(), 2);
	}
}
