//! `flickr build-queue` — seeds the durable job queue, either by scanning
//! the whole known photo population (`full`) or by enqueueing a single
//! high-priority job over the last few days (`recent`).

use anyhow::Result;
use flickr_core::PipelineConfig;
use flickr_scheduler::{build_density_index, build_queue_full, build_queue_recent};
use flickr_store::{JobQueue, PhotoStore};
use std::path::PathBuf;

#[derive(clap::Subcommand, Debug)]
pub enum Mode {
	/// Recursively partition the entire known photo population.
	Full {
		/// Insert a sentinel barrier job after the last leaf of this run.
		#[arg(long)]
		flag: bool,
	},
	/// Enqueue a single high-priority job covering the last `days` days.
	Recent {
		/// How many days back the job's date range should cover.
		#[arg(long, default_value_t = 1)]
		days: i64,
	},
}

#[derive(clap::Args, Debug)]
pub struct Subcommand {
	/// Path to the job queue's SQLite database.
	#[arg(long)]
	queue: PathBuf,

	/// Path to the photo store's SQLite database. Required for `full`,
	/// since the density index is staged from it.
	#[arg(long)]
	photo_store: Option<PathBuf>,

	#[command(subcommand)]
	mode: Mode,
}

pub fn run(args: &Subcommand) -> Result<()> {
	let queue = JobQueue::open(&args.queue)?;
	let config = PipelineConfig::default();

	match &args.mode {
		Mode::Full { flag } => {
			let photo_store_path = args.photo_store.as_ref().expect("--photo-store is required for `full`");
			let photo_store = PhotoStore::open(photo_store_path)?;
			let density = build_density_index(&photo_store)?;
			build_queue_full(&queue, &density, &config, *flag)?;
		}
		Mode::Recent { days } => {
			build_queue_recent(&queue, *days)?;
		}
	}

	Ok(())
}
