//! Terminal progress reporting, shared by the tile maker's pyramid descent
//! and the downloader's periodic stats line.
//!
//! No external progress-bar crate is used: the pipeline only ever needs a
//! single-line counter, so a small dependency-free bar (below) covers it.
//! Tests and non-interactive runs get a silent no-op implementation instead.

mod bar;
mod dummy;

pub use bar::ProgressBar;
pub use dummy::ProgressDummy;

/// Common interface for progress indicators.
pub trait ProgressTrait: Send + Sync {
	/// Sets the absolute position.
	fn set_position(&self, value: u64);
	/// Increments the position by `value`.
	fn inc(&self, value: u64);
	/// Marks the task finished and prints a trailing newline.
	fn finish(&self);
}

/// Creates a real terminal bar outside of tests, a silent drain inside them.
#[must_use]
pub fn get_progress_bar(message: &str, max_value: u64) -> Box<dyn ProgressTrait> {
	if cfg!(feature = "test") {
		Box::new(ProgressDummy::new())
	} else {
		Box::new(ProgressBar::new(message, max_value))
	}
}
