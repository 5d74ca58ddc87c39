use crate::comments::CommentFilter;
use crate::config::{self, Config};
use crate::report::ReportFormat;
use crate::validate::Validation;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use color_print::*;
use colored_json::to_colored_json_auto;
use serde::Serialize;

#[derive(clap::Args, Clone, Debug)]
pub struct Args {
	/// Minified file to check [default: the configured output file]
	file: Option<PathBuf>,

	#[clap(flatten)]
	location: config::Location,

	/// Report format
	#[arg(short, long, value_enum, default_value_t = ReportFormat::default())]
	format: ReportFormat,
}

#[derive(Serialize)]
struct CheckRow<'a> {
	file: &'a str,
	validation: &'static str,
	preamble: bool,
	found: String,
}

pub async fn run(args: Args) -> Result<()> {
	let config = Config::locate(&args.location).await?;
	let path = args.file.unwrap_or_else(|| config.output_path());

	let validation = check(&config, &path).await?;

	print!("{}", render(&path, &validation, args.format)?);

	if !validation.passed() {
		validation.warn();
		bail!("Comment validation failed for {}", path.display());
	}

	Ok(())
}

/// Validate an already minified file without touching it.
pub async fn check(config: &Config, path: &Path) -> Result<Validation> {
	let filter = CommentFilter::new(&config.filter.patterns)?;

	let text = tokio::fs::read_to_string(path).await
		.with_context(|| format!("Error reading {}", path.display()))?;

	Validation::check(&text, &config.minify.format.preamble, &filter)
		.with_context(|| format!("Cannot check {}", path.display()))
}

fn render(path: &Path, validation: &Validation, format: ReportFormat) -> Result<String> {
	match format {
		ReportFormat::Flat => {
			Ok(match validation.passed() {
				true => cformat!("<b!>Comment validation of</> <w><s>{}</></>: <g!><s>PASSED ✓\n", path.display()),
				false => cformat!("<b!>Comment validation of</> <w><s>{}</></>: <y!><s>WARNING\n", path.display()),
			})
		}
		ReportFormat::JSON => {
			serde_json::to_value(validation)
				.map(|v| to_colored_json_auto(&v).unwrap_or_default() + "\n")
				.map_err(|e| e.into())
		}
		ReportFormat::TOML => {
			toml::to_string(validation).map_err(|e| e.into())
		}
		ReportFormat::CSV => {
			let mut wtr = csv::Writer::from_writer(vec![]);
			let file = path.display().to_string();

			wtr.serialize(CheckRow {
				file: &file,
				validation: validation.outcome(),
				preamble: validation.preamble,
				found: validation.found.join("; "),
			})?;

			String::from_utf8(wtr.into_inner()?).map_err(|e| e.into())
		}
	}
}
