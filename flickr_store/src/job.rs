//! The job row stored in the durable queue, modeled as a tagged variant
//! rather than the opaque dict shape used upstream: a job either carries a
//! spatial payload or is a sentinel barrier, never both.

/// Primary key of a row in the job queue.
pub type JobId = i64;

/// The axis-aligned query rectangle a spatial job queries against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialBounds {
	pub min_lat: f64,
	pub max_lat: f64,
	pub min_lon: f64,
	pub max_lon: f64,
	pub min_date: i64,
	pub max_date: i64,
}

/// A row read back from the queue, with its assigned id.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
	Spatial { id: JobId, priority: i32, overflow_expected: bool, bounds: SpatialBounds },
	Sentinel { id: JobId, priority: i32 },
}

impl Job {
	#[must_use]
	pub fn id(&self) -> JobId {
		match self {
			Job::Spatial { id, .. } | Job::Sentinel { id, .. } => *id,
		}
	}

	#[must_use]
	pub fn priority(&self) -> i32 {
		match self {
			Job::Spatial { priority, .. } | Job::Sentinel { priority, .. } => *priority,
		}
	}

	#[must_use]
	pub fn is_sentinel(&self) -> bool {
		matches!(self, Job::Sentinel { .. })
	}
}

/// A job to be inserted; the queue assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub enum NewJob {
	Spatial { priority: i32, overflow_expected: bool, bounds: SpatialBounds },
	Sentinel { priority: i32 },
}
