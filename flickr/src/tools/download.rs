//! `flickr download` — drains the job queue against the upstream API,
//! persisting fetched photos and splitting jobs the API reports as
//! oversize.

use anyhow::Result;
use flickr_core::PipelineConfig;
use flickr_downloader::{ApiClient, run_downloader};
use flickr_store::{JobQueue, PhotoStore};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct Subcommand {
	/// Path to the job queue's SQLite database.
	#[arg(long)]
	queue: PathBuf,

	/// Path to the photo store's SQLite database.
	#[arg(long)]
	photo_store: PathBuf,

	/// Upstream photo-search API key.
	#[arg(long, env = "FLICKR_API_KEY")]
	api_key: String,

	/// Directory to drop sentinel barrier files into when the scheduler's
	/// flag job is reached. Defaults to not signaling at all.
	#[arg(long)]
	flags_dir: Option<PathBuf>,
}

pub async fn run(args: &Subcommand) -> Result<()> {
	let queue = JobQueue::open(&args.queue)?;
	let photo_store = PhotoStore::open(&args.photo_store)?;
	let config = PipelineConfig::default().with_api_key(args.api_key.clone());
	let api = ApiClient::new(config.clone())?;

	run_downloader(&queue, &photo_store, &api, &config, args.flags_dir.as_deref()).await
}
