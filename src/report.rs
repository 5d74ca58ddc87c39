use crate::validate::Validation;
use std::path::Path;
use anyhow::Result;
use color_print::*;
use colored_json::to_colored_json_auto;
use serde::Serialize;

#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
	#[default]
	Flat,
	JSON,
	TOML,
	CSV,
}

impl ReportFormat {
	/// Progress lines go to stdout only when the report itself is human-readable.
	pub fn status(self, message: &str) {
		match self {
			Self::Flat => println!("{}", message),
			_ => eprintln!("{}", message),
		}
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
	pub input: String,
	pub output: String,
	pub original_size: usize,
	pub minified_size: usize,
	pub reduction_percent: f64,
	pub saved_bytes: i64,
	pub validation: Validation,
}

#[derive(Serialize)]
struct CsvRow<'a> {
	input: &'a str,
	output: &'a str,
	original_size: usize,
	minified_size: usize,
	reduction_percent: f64,
	saved_bytes: i64,
	validation: &'static str,
	found: String,
}

impl Report {
	pub fn new(input: &Path, output: &Path, original_size: usize, minified_size: usize, validation: Validation) -> Self {
		Self {
			input: input.display().to_string(),
			output: output.display().to_string(),
			original_size,
			minified_size,
			reduction_percent: round2(reduction(original_size, minified_size)),
			saved_bytes: original_size as i64 - minified_size as i64,
			validation,
		}
	}

	pub fn render(&self, format: ReportFormat) -> Result<String> {
		match format {
			ReportFormat::Flat => {
				Ok([
					cformat!("<g!>Minified <w><s>{}</> ({})", self.output, kilobytes(self.minified_size as i64)),
					cformat!("<b!>Size reduction:</> {:.2}%", self.reduction_percent),
					cformat!("<b!>Saved</> {}", kilobytes(self.saved_bytes)),
					match self.validation.passed() {
						true => cformat!("<b!>Comment validation:</> <g!><s>PASSED ✓"),
						false => cformat!("<b!>Comment validation:</> <y!><s>WARNING"),
					},
				].join("\n") + "\n")
			}
			ReportFormat::JSON => {
				serde_json::to_value(self)
					.map(|v| to_colored_json_auto(&v).unwrap_or_default() + "\n")
					.map_err(|e| e.into())
			}
			ReportFormat::TOML => {
				toml::to_string(self).map_err(|e| e.into())
			}
			ReportFormat::CSV => {
				let mut wtr = csv::Writer::from_writer(vec![]);

				wtr.serialize(CsvRow {
					input: &self.input,
					output: &self.output,
					original_size: self.original_size,
					minified_size: self.minified_size,
					reduction_percent: self.reduction_percent,
					saved_bytes: self.saved_bytes,
					validation: self.validation.outcome(),
					found: self.validation.found.join("; "),
				})?;

				String::from_utf8(wtr.into_inner()?).map_err(|e| e.into())
			}
		}
	}
}

/// Percentage by which `minified` is smaller than `original`.
pub fn reduction(original: usize, minified: usize) -> f64 {
	if original == 0 {
		return 0.0;
	}

	(1.0 - minified as f64 / original as f64) * 100.0
}

fn round2(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

pub fn kilobytes(bytes: i64) -> String {
	format!("{:.2} KB", bytes as f64 / 1024.0)
}
