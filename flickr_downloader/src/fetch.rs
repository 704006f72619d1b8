//! Fetch semantics for one job: preflight overflow probe, parallel page
//! fetches and coalescing into flat photo records.

use crate::api::ApiClient;
use anyhow::{Context, Result};
use flickr_core::constants::{API_RESULT_CAP, MAX_PAGES_WHEN_IGNORING_OVERFLOW, MAX_PHOTOS_PER_PAGE};
use flickr_store::{PhotoRecord, SpatialBounds};
use futures::stream::{self, StreamExt};

/// One photo as returned by the API, parsed into its typed fields but not
/// yet written to the store (the store wants `(PhotoRecord, owner)` pairs).
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPhoto {
	pub record: PhotoRecord,
	pub owner: String,
}

/// Outcome of fetching one job: either its photos, or a signal that the
/// API reports more results than fit under the cap and the job must be
/// split instead.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
	Photos(Vec<FetchedPhoto>),
	Overflow,
}

fn parse_photo(raw: &crate::api::RawPhoto, fetch_ts: i64) -> Result<FetchedPhoto> {
	let lat: f64 = raw.latitude.parse().context("parsing photo latitude")?;
	let lon: f64 = raw.longitude.parse().context("parsing photo longitude")?;
	let accuracy: i32 = raw.accuracy.parse().unwrap_or(0);
	let upload_date: i64 = raw.dateupload.parse().context("parsing photo dateupload")?;
	let id: u64 = raw.id.parse().context("parsing photo id")?;

	Ok(FetchedPhoto {
		record: PhotoRecord {
			id,
			lat_e7: (lat * 1e7).round() as i32,
			lon_e7: (lon * 1e7).round() as i32,
			accuracy,
			fetch_ts,
			upload_date,
		},
		owner: raw.owner.clone(),
	})
}

/// Fetches one job's photos. `overflow_expected` mirrors the job's hint;
/// `ignore_overflow` is set by the downloader loop for jobs too small to
/// ever be worth splitting further.
///
/// # Errors
/// Returns an error if a request fails after exhausting its retries, or
/// if the API returns a photo entry missing a required field.
pub async fn fetch_job(
	api: &ApiClient,
	bounds: SpatialBounds,
	overflow_expected: bool,
	ignore_overflow: bool,
	worker_pool_size: usize,
	fetch_ts: i64,
) -> Result<FetchOutcome> {
	let result_cap = u64::from(API_RESULT_CAP);

	if overflow_expected && !ignore_overflow {
		let probe = api.search_page(bounds, 1, 1).await?;
		if probe.total > result_cap {
			return Ok(FetchOutcome::Overflow);
		}
	}

	let (page1, page2) =
		tokio::try_join!(api.search_page(bounds, MAX_PHOTOS_PER_PAGE, 1), api.search_page(bounds, MAX_PHOTOS_PER_PAGE, 2))?;

	let total = page1.total;
	if total > result_cap && !ignore_overflow {
		return Ok(FetchOutcome::Overflow);
	}

	let pages_n = if total > result_cap { page1.pages.min(u64::from(MAX_PAGES_WHEN_IGNORING_OVERFLOW)) } else { page1.pages };

	if total == 0 {
		return Ok(FetchOutcome::Photos(Vec::new()));
	}

	let mut pages = vec![page1, page2];
	if pages_n >= 3 {
		let remaining: Vec<u32> = (3..=pages_n as u32).collect();
		// `buffered` (not `buffer_unordered`) keeps results in page-number
		// order while still running up to `worker_pool_size` requests
		// concurrently — pages within a job must be concatenated in order.
		let fetched: Vec<_> =
			stream::iter(remaining.into_iter().map(|page| api.search_page(bounds, MAX_PHOTOS_PER_PAGE, page)))
				.buffered(worker_pool_size)
				.collect()
				.await;
		for page in fetched {
			pages.push(page?);
		}
	}

	let mut photos = Vec::new();
	for page in &pages {
		for raw in &page.photos {
			photos.push(parse_photo(raw, fetch_ts)?);
		}
	}

	Ok(FetchOutcome::Photos(photos))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::RawPhoto;

	fn raw(id: &str, lat: &str, lon: &str) -> RawPhoto {
		RawPhoto {
			id: id.to_string(),
			latitude: lat.to_string(),
			longitude: lon.to_string(),
			accuracy: "16".to_string(),
			dateupload: "1700000000".to_string(),
			owner: "alice".to_string(),
		}
	}

	#[test]
	fn parse_photo_converts_degrees_to_e7_integers() {
		let photo = parse_photo(&raw("123", "10.5", "-20.25"), 1_800_000_000).unwrap();
		assert_eq!(photo.record.id, 123);
		assert_eq!(photo.record.lat_e7, 105_000_000);
		assert_eq!(photo.record.lon_e7, -202_500_000);
		assert_eq!(photo.record.fetch_ts, 1_800_000_000);
		assert_eq!(photo.owner, "alice");
	}

	#[test]
	fn parse_photo_rejects_unparseable_coordinates() {
		assert!(parse_photo(&raw("123", "not-a-number", "0"), 0).is_err());
	}
}
