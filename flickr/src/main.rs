mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Seed the durable job queue
	BuildQueue(tools::build_queue::Subcommand),

	/// Drain the job queue against the upstream API
	Download(tools::download::Subcommand),

	/// Render the tile pyramid into an MBTiles archive
	MakeTiles(tools::make_tiles::Subcommand),
}

fn main() -> Result<()> {
	env_logger::Builder::new().filter_level(log::LevelFilter::Info).parse_default_env().format_timestamp(None).init();

	let cli = Cli::parse();

	match &cli.command {
		Commands::BuildQueue(args) => tools::build_queue::run(args),
		Commands::Download(args) => {
			let runtime = tokio::runtime::Runtime::new()?;
			runtime.block_on(tools::download::run(args))
		}
		Commands::MakeTiles(args) => tools::make_tiles::run(args),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = Cli::try_parse_from(arg_vec)?;
		Ok(format!("{cli:?}"))
	}

	#[test]
	fn help() {
		let err = run_command(vec!["flickr"]).unwrap_err().to_string();
		assert!(err.contains("Usage: flickr"));
	}

	#[test]
	fn build_queue_full_requires_queue_path() {
		let err = run_command(vec!["flickr", "build-queue", "full"]).unwrap_err().to_string();
		assert!(err.contains("--queue"));
	}

	#[test]
	fn build_queue_recent_parses() {
		let debug = run_command(vec!["flickr", "build-queue", "--queue", "q.db", "recent", "--days", "3"]).unwrap();
		assert!(debug.contains("Recent"));
	}

	#[test]
	fn make_tiles_parses_banned_owners() {
		let debug =
			run_command(vec!["flickr", "make-tiles", "--photo-store", "p.db", "--output", "t.mbtiles", "--banned-owner", "x@N01"])
				.unwrap();
		assert!(debug.contains("x@N01"));
	}
}
