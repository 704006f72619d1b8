//! The downloader: drains the durable job queue against the upstream
//! photo-search API, splitting jobs the API reports as oversize and
//! persisting everything else into the photo store.

pub mod api;
pub mod fetch;
pub mod run;
pub mod stats;

pub use api::ApiClient;
pub use fetch::{FetchOutcome, FetchedPhoto, fetch_job};
pub use run::run_downloader;
