//! The fixed global rectangle every scheduling run must cover.

use flickr_store::SpatialBounds;
use std::time::{SystemTime, UNIX_EPOCH};

/// The whole-world, all-time rectangle, extended `600` seconds past "now"
/// so in-flight uploads land inside the coverage guarantee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalBounds {
	pub min_lat: f64,
	pub max_lat: f64,
	pub min_lon: f64,
	pub max_lon: f64,
	pub min_date: i64,
	pub max_date: i64,
}

impl GlobalBounds {
	/// Computes the global bounds relative to the current wall clock.
	///
	/// # Panics
	/// Panics if the system clock is set before the Unix epoch.
	#[must_use]
	pub fn now() -> Self {
		let now = SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_secs() as i64;
		GlobalBounds { min_lat: -90.0, max_lat: 90.0, min_lon: -180.0, max_lon: 180.0, min_date: 0, max_date: now + 600 }
	}

	#[must_use]
	pub fn as_spatial_bounds(self) -> SpatialBounds {
		SpatialBounds {
			min_lat: self.min_lat,
			max_lat: self.max_lat,
			min_lon: self.min_lon,
			max_lon: self.max_lon,
			min_date: self.min_date,
			max_date: self.max_date,
		}
	}

	#[must_use]
	pub fn clamp(self, bounds: SpatialBounds) -> SpatialBounds {
		SpatialBounds {
			min_lat: bounds.min_lat.max(self.min_lat),
			max_lat: bounds.max_lat.min(self.max_lat),
			min_lon: bounds.min_lon.max(self.min_lon),
			max_lon: bounds.max_lon.min(self.max_lon),
			min_date: bounds.min_date.max(self.min_date),
			max_date: bounds.max_date.min(self.max_date),
		}
	}
}
