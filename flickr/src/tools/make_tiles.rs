//! `flickr make-tiles` — stages the photo store into the 2D point index
//! and renders the tile pyramid into an MBTiles archive.

use anyhow::Result;
use flickr_core::PipelineConfig;
use flickr_store::PhotoStore;
use flickr_tiles::{build_point_index, make_tiles, MbtilesWriter};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct Subcommand {
	/// Path to the photo store's SQLite database.
	#[arg(long)]
	photo_store: PathBuf,

	/// Path the MBTiles archive is written to; any existing file at this
	/// path is overwritten.
	#[arg(long)]
	output: PathBuf,

	/// Owner identifiers to exclude, in addition to the built-in list.
	#[arg(long = "banned-owner")]
	banned_owners: Vec<String>,
}

pub fn run(args: &Subcommand) -> Result<()> {
	let photo_store = PhotoStore::open(&args.photo_store)?;

	let mut config = PipelineConfig::default();
	config.banned_owners.extend(args.banned_owners.iter().cloned());

	let point_index = build_point_index(&photo_store, &config.banned_owners)?;
	let mut writer = MbtilesWriter::create(&args.output)?;
	make_tiles(&point_index, &config, &mut writer)
}
