//! The recent-only entry point: skips scanning the density index entirely
//! and lets the downloader's overflow-splitting partition the result on
//! the fly.

use anyhow::Result;
use flickr_store::{JobId, JobQueue, NewJob, SpatialBounds};
use std::time::{SystemTime, UNIX_EPOCH};

const RECENT_PRIORITY: i32 = 10;
const ONE_DAY_SECS: i64 = 86_400;

/// Enqueues a single high-priority global job spanning the last `days`
/// days, flagged `overflow_expected` so the downloader's preflight probe
/// fires before it spends sixteen page requests discovering the region is
/// oversize.
///
/// # Errors
/// Returns an error if the queue insert fails.
pub fn build_queue_recent(queue: &JobQueue, days: i64) -> Result<JobId> {
	let now = SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_secs() as i64;
	let bounds = SpatialBounds {
		min_lat: -90.0,
		max_lat: 90.0,
		min_lon: -180.0,
		max_lon: 180.0,
		min_date: now - days * ONE_DAY_SECS,
		max_date: now + ONE_DAY_SECS,
	};
	queue.insert(&NewJob::Spatial { priority: RECENT_PRIORITY, overflow_expected: true, bounds })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn recent_job_has_expected_priority_and_flags() {
		let queue = JobQueue::open_in_memory().unwrap();
		let before = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;

		build_queue_recent(&queue, 1).unwrap();

		let job = queue.peek_next().unwrap().unwrap();
		match job {
			flickr_store::Job::Spatial { priority, overflow_expected, bounds, .. } => {
				assert_eq!(priority, RECENT_PRIORITY);
				assert!(overflow_expected);
				assert!((bounds.min_date - (before - ONE_DAY_SECS)).abs() <= 2);
				assert!((bounds.max_date - (before + ONE_DAY_SECS)).abs() <= 2);
			}
			flickr_store::Job::Sentinel { .. } => panic!("expected a spatial job"),
		}
	}
}
