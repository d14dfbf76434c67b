use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "portico")]
#[command(about = "Replay overlay scenarios through a portal host")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Replay a scenario file and print the final layer stack
	Run {
		/// Scenario file (TOML)
		scenario: PathBuf,

		/// Host options file (TOML)
		#[arg(long, short = 'c', value_name = "PATH")]
		config: Option<PathBuf>,
	},
}
