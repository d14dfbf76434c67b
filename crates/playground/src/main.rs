//! Portico playground.
//!
//! Replays a scenario of portal and surface lifecycle steps through a single
//! host and prints the resulting layer stack.

mod cli;
mod scenario;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use portico_portal::HostOptions;
use scenario::Scenario;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	match cli.command {
		Command::Run { scenario: path, config } => {
			let options = match config {
				Some(path) => load_options(&path)?,
				None => HostOptions::default(),
			};
			let text =
				std::fs::read_to_string(&path).with_context(|| format!("reading scenario {}", path.display()))?;
			let parsed = Scenario::parse(&text)?;
			tracing::info!(steps = parsed.steps.len(), host = %options.label, "replaying scenario");
			let report = scenario::replay(&parsed, options)?;
			print!("{report}");
		}
	}
	Ok(())
}

fn load_options(path: &Path) -> anyhow::Result<HostOptions> {
	let text = std::fs::read_to_string(path).with_context(|| format!("reading host options {}", path.display()))?;
	toml::from_str(&text).with_context(|| format!("parsing host options {}", path.display()))
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("portico=debug,portico_portal=trace,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}
