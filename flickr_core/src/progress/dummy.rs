//! Silent progress indicator used during tests and non-interactive runs.

use super::ProgressTrait;

/// A `ProgressTrait` implementation that does nothing. Keeps test output
/// clean and avoids racing on stderr when tests run in parallel.
pub struct ProgressDummy {}

impl ProgressDummy {
	#[must_use]
	pub fn new() -> Self {
		ProgressDummy {}
	}
}

impl Default for ProgressDummy {
	fn default() -> Self {
		Self::new()
	}
}

impl ProgressTrait for ProgressDummy {
	fn set_position(&self, _value: u64) {}
	fn inc(&self, _value: u64) {}
	fn finish(&self) {}
}
