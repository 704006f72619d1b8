//! Shared primitives used by every stage of the flickr archive pipeline:
//! spatial constants, Morton encoding, WGS84 <-> Web Mercator projection,
//! the immutable pipeline configuration and a terminal progress bar.

pub mod config;
pub use config::PipelineConfig;
pub mod constants;
pub mod morton;
pub mod progress;
pub mod projection;
