//! The full-scan entry point: recursively partitions the entire known
//! photo population against the density index.

use crate::global_bounds::GlobalBounds;
use crate::split::{pad_with_margin, select_split_axis, split_job, too_small};
use anyhow::Result;
use flickr_core::PipelineConfig;
use flickr_store::{Box3, DensityIndex, JobQueue, NewJob, SpatialBounds};

const SEED_PRIORITY: i32 = 1;

fn to_box3(bounds: SpatialBounds) -> Box3 {
	Box3 {
		min_lat: bounds.min_lat,
		max_lat: bounds.max_lat,
		min_lon: bounds.min_lon,
		max_lon: bounds.max_lon,
		min_date: bounds.min_date as f64,
		max_date: bounds.max_date as f64,
	}
}

/// Runs the adaptive partition scheduler over the whole world and all
/// time, seeding `queue` with the resulting leaf jobs.
///
/// If `with_flag` is set, a sentinel barrier job is inserted immediately
/// before the first leaf — since the queue is drained in
/// `(priority DESC, id DESC)` order, that sentinel fires last among jobs
/// of the same priority.
///
/// # Errors
/// Returns an error if a queue insert fails.
pub fn build_queue_full(queue: &JobQueue, density: &DensityIndex, config: &PipelineConfig, with_flag: bool) -> Result<()> {
	let global = GlobalBounds::now();
	let mut stack = vec![global.as_spatial_bounds()];
	let mut sentinel_pending = with_flag;
	let mut jobs_emitted = 0u64;

	while let Some(bounds) = stack.pop() {
		let padded = pad_with_margin(bounds, config, global);
		let count = density.count_in_box_with_limit(to_box3(padded), config.max_results_in_request as usize);
		let small = too_small(bounds, config);

		if count > config.max_results_in_request as usize && !small {
			let axis = select_split_axis(bounds, config);
			let (low, high) = split_job(bounds, axis);
			log::debug!("splitting job on {axis:?}: count={count} bounds={bounds:?}");
			stack.push(high);
			stack.push(low);
			continue;
		}

		if sentinel_pending {
			queue.insert(&NewJob::Sentinel { priority: SEED_PRIORITY })?;
			sentinel_pending = false;
		}
		queue.insert(&NewJob::Spatial { priority: SEED_PRIORITY, overflow_expected: false, bounds })?;
		jobs_emitted += 1;
	}

	log::info!("build_queue_full: emitted {jobs_emitted} jobs");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use flickr_store::DensityPoint;

	#[test]
	fn empty_density_yields_single_global_job() {
		let queue = JobQueue::open_in_memory().unwrap();
		let density = DensityIndex::build_from_sorted_stream(vec![]);
		let config = PipelineConfig::default();

		build_queue_full(&queue, &density, &config, false).unwrap();

		assert_eq!(queue.len().unwrap(), 1);
		let job = queue.peek_next().unwrap().unwrap();
		match job {
			flickr_store::Job::Spatial { bounds, .. } => {
				assert_eq!(bounds.min_lat, -90.0);
				assert_eq!(bounds.max_lat, 90.0);
				assert_eq!(bounds.min_lon, -180.0);
				assert_eq!(bounds.max_lon, 180.0);
				assert_eq!(bounds.min_date, 0);
			}
			flickr_store::Job::Sentinel { .. } => panic!("expected a spatial job"),
		}
	}

	#[test]
	fn sentinel_is_inserted_before_the_first_leaf_when_requested() {
		let queue = JobQueue::open_in_memory().unwrap();
		let density = DensityIndex::build_from_sorted_stream(vec![]);
		let config = PipelineConfig::default();

		build_queue_full(&queue, &density, &config, true).unwrap();

		assert_eq!(queue.len().unwrap(), 2);
		let first = queue.peek_next().unwrap().unwrap();
		assert!(!first.is_sentinel(), "the substantive leaf must be served before the sentinel");
		queue.delete(first.id()).unwrap();
		let second = queue.peek_next().unwrap().unwrap();
		assert!(second.is_sentinel());
	}

	#[test]
	fn dense_population_under_cap_still_yields_one_job() {
		let queue = JobQueue::open_in_memory().unwrap();
		let mut config = PipelineConfig::default();
		config.max_results_in_request = 3500;
		let points: Vec<_> = (0..3500).map(|i| DensityPoint { lat: 1.0, lon: 1.0, upload_date: f64::from(i) }).collect();
		let density = DensityIndex::build_from_sorted_stream(points);

		build_queue_full(&queue, &density, &config, false).unwrap();
		assert_eq!(queue.len().unwrap(), 1);
	}

	#[test]
	fn over_cap_population_forces_at_least_one_split() {
		let queue = JobQueue::open_in_memory().unwrap();
		let mut config = PipelineConfig::default();
		config.max_results_in_request = 10;
		let points: Vec<_> = (0..50).map(|i| DensityPoint { lat: f64::from(i % 5), lon: f64::from(i % 7), upload_date: f64::from(i) }).collect();
		let density = DensityIndex::build_from_sorted_stream(points);

		build_queue_full(&queue, &density, &config, false).unwrap();
		assert!(queue.len().unwrap() > 1);
	}
}
