//! The single immutable configuration struct threaded through every
//! pipeline stage. No process-wide globals are used; each stage receives a
//! `&PipelineConfig` (or a cheap `Arc<PipelineConfig>` clone) explicitly.

use std::time::Duration;

/// Tunables for the adaptive partition scheduler, the downloader and the
/// tile pyramid renderer. Defaults match the values observed in the
/// original implementation.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
	// --- scheduler / downloader: margins and caps ---
	/// Upper bound on the expected photo count of a non-"too small" job.
	pub max_results_in_request: u32,
	/// Latitude margin, in degrees, used for padding and for the
	/// too-small / split-axis computations.
	pub margin_lat: f64,
	/// Longitude margin, in degrees.
	pub margin_lon: f64,
	/// Upload-time margin, in seconds.
	pub margin_time: i64,

	// --- downloader: upstream API ---
	/// Upstream photo-search API key.
	pub api_key: String,
	/// Base URL of the upstream REST endpoint.
	pub api_base_url: String,
	/// Number of retry attempts per HTTP request before giving up.
	pub retry_count: u32,
	/// Fixed backoff between retry attempts.
	pub retry_backoff: Duration,
	/// TCP connect timeout per request.
	pub connect_timeout: Duration,
	/// Read timeout per request.
	pub read_timeout: Duration,
	/// Maximum number of page fetches in flight at once, per job.
	pub worker_pool_size: usize,
	/// How often (wall clock) the downloader emits a stats line.
	pub stats_interval: Duration,

	// --- tile maker ---
	/// Marker radius, in pixels, stamped at each photo location.
	pub symbol_radius: u32,
	/// Tiles with at most this many points are encoded as vector tiles.
	pub max_points_in_vector_tile: usize,
	/// Tiles with more than this many points are rendered as overviews.
	pub max_points_in_normal_tile: usize,
	/// Deepest zoom level the raster descent will recurse to.
	pub max_level: u8,
	/// Zoom levels at or below this are always rendered as overviews.
	pub max_overviews_level: u8,
	/// Owner identifiers excluded from the tile point index.
	pub banned_owners: Vec<String>,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		PipelineConfig {
			max_results_in_request: 3500,
			margin_lat: 4e-4,
			margin_lon: 4e-4,
			margin_time: 1000,

			api_key: String::new(),
			api_base_url: "https://api.flickr.com/services/rest/".to_string(),
			retry_count: 1000,
			retry_backoff: Duration::from_secs(1),
			connect_timeout: Duration::from_millis(3050),
			read_timeout: Duration::from_secs(30),
			worker_pool_size: 20,
			stats_interval: Duration::from_secs(60),

			symbol_radius: 5,
			max_points_in_vector_tile: 2000,
			max_points_in_normal_tile: 100_000,
			max_level: 18,
			max_overviews_level: 5,
			banned_owners: vec!["100597270@N04".to_string()],
		}
	}
}

impl PipelineConfig {
	/// Builder-style override of the API key, used by the CLI and by tests
	/// that point at a mock server.
	#[must_use]
	pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
		self.api_key = api_key.into();
		self
	}

	/// Builder-style override of the API base URL.
	#[must_use]
	pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
		self.api_base_url = url.into();
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_matches_documented_values() {
		let config = PipelineConfig::default();
		assert_eq!(config.max_results_in_request, 3500);
		assert_eq!(config.margin_lat, 4e-4);
		assert_eq!(config.margin_lon, 4e-4);
		assert_eq!(config.margin_time, 1000);
		assert_eq!(config.max_points_in_vector_tile, 2000);
		assert_eq!(config.max_points_in_normal_tile, 100_000);
		assert_eq!(config.max_level, 18);
		assert_eq!(config.max_overviews_level, 5);
	}

	#[test]
	fn builder_overrides_are_applied() {
		let config = PipelineConfig::default().with_api_key("abc").with_api_base_url("http://x/");
		assert_eq!(config.api_key, "abc");
		assert_eq!(config.api_base_url, "http://x/");
	}
}
