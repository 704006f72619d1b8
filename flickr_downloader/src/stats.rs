//! Periodic stats line: queue depth, fetch/DB time share, throughput and
//! hit rate, reported roughly every `config.stats_interval`.

use std::time::{Duration, Instant};

/// Accumulates counters between two stats reports and resets on emit.
pub struct StatsWindow {
	interval: Duration,
	window_start: Instant,
	fetch_time: Duration,
	db_time: Duration,
	requests: u64,
	processed_jobs: u64,
	jobs_with_data: u64,
}

impl StatsWindow {
	#[must_use]
	pub fn new(interval: Duration) -> Self {
		StatsWindow {
			interval,
			window_start: Instant::now(),
			fetch_time: Duration::ZERO,
			db_time: Duration::ZERO,
			requests: 0,
			processed_jobs: 0,
			jobs_with_data: 0,
		}
	}

	pub fn record_job(&mut self, fetch_time: Duration, db_time: Duration, requests: u64, produced_photos: bool) {
		self.fetch_time += fetch_time;
		self.db_time += db_time;
		self.requests += requests;
		self.processed_jobs += 1;
		if produced_photos {
			self.jobs_with_data += 1;
		}
	}

	/// Returns a formatted stats line and resets the window, if `interval`
	/// has elapsed since the last report; otherwise `None`.
	pub fn maybe_report(&mut self, queue_len: u64) -> Option<String> {
		let elapsed = self.window_start.elapsed();
		if elapsed < self.interval {
			return None;
		}

		let total_secs = elapsed.as_secs_f64().max(f64::EPSILON);
		let rps = self.requests as f64 / self.fetch_time.as_secs_f64().max(f64::EPSILON);
		let db_time_share = self.db_time.as_secs_f64() / total_secs * 100.0;
		let jobs_per_second = self.processed_jobs as f64 / total_secs;
		let hit_rate =
			if self.processed_jobs > 0 { 100.0 * self.jobs_with_data as f64 / self.processed_jobs as f64 } else { 0.0 };

		let line = format!(
			"queue={queue_len} db={db_time_share:.1}% reqs/s={rps:.1} jobs/s={jobs_per_second:.1} hit_rate={hit_rate:.1}%"
		);

		*self = StatsWindow::new(self.interval);
		Some(line)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn no_report_before_interval_elapses() {
		let mut window = StatsWindow::new(Duration::from_secs(3600));
		window.record_job(Duration::from_millis(10), Duration::from_millis(1), 1, true);
		assert!(window.maybe_report(0).is_none());
	}

	#[test]
	fn report_fires_once_interval_has_elapsed() {
		let mut window = StatsWindow::new(Duration::from_millis(0));
		window.record_job(Duration::from_millis(10), Duration::from_millis(1), 2, true);
		let line = window.maybe_report(5).unwrap();
		assert!(line.contains("queue=5"));
	}
}
