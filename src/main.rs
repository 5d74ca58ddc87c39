mod types;
mod config;
mod comments;
mod validate;
mod minifier;
mod report;
mod pipeline;
mod check;

use clap::Parser;
use color_print::*;

#[derive(clap::Parser)]
#[command(version, about, long_about = None, args_conflicts_with_subcommands = true, disable_help_subcommand = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Command>,

	#[clap(flatten)]
	args: pipeline::Args,
}

#[derive(clap::Subcommand, Clone)]
enum Command {
	/// Minify the input file (default)
	#[command(hide = true)]
	Build(pipeline::Args),
	/// Validate an already minified file
	Check(check::Args),
	/// Print the effective configuration as TOML
	Config(config::Args),
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	let command = cli.command.unwrap_or_else(|| Command::Build(cli.args));

	let result = match command {
		Command::Build(args) => pipeline::run(args).await,
		Command::Check(args) => check::run(args).await,
		Command::Config(args) => config::run(args).await,
	};

	if let Err(err) = result {
		ceprintln!("<r!><s>Error:</></> {:#}", err);
		std::process::exit(1); // read, minify, write or validation failure
	}
}
