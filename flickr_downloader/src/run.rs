//! The downloader's coordinator loop: single-threaded orchestration of
//! queue mutation around a per-job worker-pool fetch.

use crate::api::ApiClient;
use crate::fetch::{FetchOutcome, fetch_job};
use crate::stats::StatsWindow;
use anyhow::Result;
use flickr_core::PipelineConfig;
use flickr_scheduler::{GlobalBounds, pad_with_margin, select_split_axis, split_job, too_small};
use flickr_store::{Job, JobQueue, NewJob, PhotoStore};
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Writes the zero-byte barrier sentinel artifact into `dir`, named with
/// the current millisecond timestamp.
///
/// # Errors
/// Returns an error if the file cannot be created.
fn signal_flag(dir: &Path) -> Result<()> {
	let ms = SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_millis();
	let path = dir.join(format!("flickr_queue_flag_{ms}"));
	std::fs::File::create(path)?;
	Ok(())
}

/// Drains `queue` until empty, fetching each job's photos and persisting
/// them to `photo_store`, or splitting the job if the API reports
/// overflow. Emits a stats line roughly every `config.stats_interval`.
///
/// # Errors
/// Returns an error if a storage operation fails, or if a fetch fails
/// after exhausting its retries.
pub async fn run_downloader(
	queue: &JobQueue,
	photo_store: &PhotoStore,
	api: &ApiClient,
	config: &PipelineConfig,
	flags_dir: Option<&Path>,
) -> Result<()> {
	let mut stats = StatsWindow::new(config.stats_interval);

	loop {
		let Some(job) = queue.peek_next()? else {
			break;
		};

		if let Job::Sentinel { id, .. } = job {
			if let Some(dir) = flags_dir {
				signal_flag(dir)?;
			}
			queue.delete(id)?;
			continue;
		}

		let Job::Spatial { id, priority, overflow_expected, bounds } = job else { unreachable!() };

		let is_small = too_small(bounds, config);
		let padded = pad_with_margin(bounds, config, GlobalBounds::now());
		let fetch_ts = SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_secs() as i64;

		let fetch_start = Instant::now();
		let outcome =
			fetch_job(api, padded, overflow_expected, is_small, config.worker_pool_size, fetch_ts).await?;
		let fetch_elapsed = fetch_start.elapsed();

		let db_start = Instant::now();
		let produced_photos = match outcome {
			FetchOutcome::Overflow => {
				log::debug!("job {id} overflowed, splitting");
				let axis = select_split_axis(bounds, config);
				let (low, high) = split_job(bounds, axis);
				queue.insert(&NewJob::Spatial { priority, overflow_expected, bounds: low })?;
				queue.insert(&NewJob::Spatial { priority, overflow_expected, bounds: high })?;
				false
			}
			FetchOutcome::Photos(photos) => {
				let produced = !photos.is_empty();
				let batch: Vec<_> = photos.into_iter().map(|p| (p.record, p.owner)).collect();
				photo_store.put_batch(&batch)?;
				produced
			}
		};
		queue.delete(id)?;
		let db_elapsed = db_start.elapsed();

		let requests = if overflow_expected && !is_small { 3 } else { 2 };
		stats.record_job(fetch_elapsed, db_elapsed, requests, produced_photos);
		if let Some(line) = stats.maybe_report(queue.len()?) {
			log::info!("{line}");
		}
	}

	log::info!("download queue drained");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::TempDir;
	use flickr_store::NewJob;
	use std::fs;

	#[test]
	fn sentinel_job_writes_a_barrier_file_and_is_removed() {
		let queue = JobQueue::open_in_memory().unwrap();
		queue.insert(&NewJob::Sentinel { priority: 1 }).unwrap();
		let dir = TempDir::new().unwrap();

		let job = queue.peek_next().unwrap().unwrap();
		let Job::Sentinel { id, .. } = job else { panic!("expected sentinel") };
		signal_flag(dir.path()).unwrap();
		queue.delete(id).unwrap();

		assert!(queue.is_empty().unwrap());
		let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
		assert_eq!(entries.len(), 1);
		let name = entries[0].as_ref().unwrap().file_name();
		assert!(name.to_string_lossy().starts_with("flickr_queue_flag_"));
	}
}
