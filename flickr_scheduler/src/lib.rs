//! The adaptive spatio-temporal partition scheduler.
//!
//! Turns the existing photo population into a set of bounded-cardinality
//! query jobs by recursively splitting the global `(lat, lon, upload_date)`
//! rectangle against a density index, seeding the durable job queue that
//! the downloader then drains.

pub mod density_stage;
pub mod full;
pub mod global_bounds;
pub mod recent;
pub mod split;

pub use density_stage::build_density_index;
pub use full::build_queue_full;
pub use global_bounds::GlobalBounds;
pub use recent::build_queue_recent;
pub use split::{Axis, pad_with_margin, select_split_axis, split_job, too_small};
