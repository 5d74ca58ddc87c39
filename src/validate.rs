use crate::comments::CommentFilter;
use anyhow::Result;
use color_print::*;
use serde::Serialize;

/// Outcome of checking minified output for the preamble and leftover comments.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Validation {
	pub preamble: bool,
	pub found: Vec<String>,
}

impl Validation {
	/// An empty `preamble` means no first line is required.
	pub fn check(text: &str, preamble: &str, filter: &CommentFilter) -> Result<Self> {
		let first_line = text.split('\n').next().unwrap_or_default();

		Ok(Self {
			preamble: preamble.is_empty() || first_line == preamble,
			found: filter.scan(text)?,
		})
	}

	pub fn passed(&self) -> bool {
		self.preamble && self.found.is_empty()
	}

	pub fn outcome(&self) -> &'static str {
		if self.passed() { "PASSED" } else { "WARNING" }
	}

	/// Print what failed to stderr. Prints nothing when validation passed.
	pub fn warn(&self) {
		if !self.preamble {
			ceprintln!("<y!><s>Warning:</> first line is not the expected preamble");
		}

		if !self.found.is_empty() {
			ceprintln!("<y!><s>Warning:</> External service comments detected!");

			for label in &self.found {
				ceprintln!("<y>   - {} found", label);
			}
		}
	}
}
