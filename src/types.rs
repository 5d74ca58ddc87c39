use serde::{Deserialize, Serialize};

pub const DEFAULT_PREAMBLE: &str = "/* StudioForm Custom Fork - Minified */";

/// Options handed to the minifier for a single run.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MinifyOptions {
	pub source_map: bool,
	pub compress: CompressOptions,
	pub mangle: MangleOptions,
	pub format: FormatOptions,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompressOptions {
	pub dead_code: bool,
	pub drop_console: bool,
	pub drop_debugger: bool,
	pub keep_classnames: bool,
	pub keep_fnames: bool,
	pub passes: u32,
}

impl Default for CompressOptions {
	fn default() -> Self {
		Self {
			dead_code: true,
			drop_console: false,
			drop_debugger: true,
			keep_classnames: false,
			keep_fnames: false,
			passes: 2,
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MangleOptions {
	pub toplevel: bool,
	pub safari10: bool,
}

impl Default for MangleOptions {
	fn default() -> Self {
		Self {
			toplevel: false,
			safari10: true,
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormatOptions {
	pub comments: bool,
	pub preamble: String,
}

impl Default for FormatOptions {
	fn default() -> Self {
		Self {
			comments: false,
			preamble: DEFAULT_PREAMBLE.into(),
		}
	}
}

/// A named pattern that must not survive in any comment block of the output.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct UnwantedPattern {
	pub label: String,
	pub pattern: String,
}

impl UnwantedPattern {
	pub fn new(label: &str, pattern: &str) -> Self {
		Self {
			label: label.into(),
			pattern: pattern.into(),
		}
	}

	pub fn defaults() -> Vec<Self> {
		vec![
			Self::new("jsDelivr comment", "jsDelivr"),
			Self::new("Original file reference", "Original file:"),
			Self::new("SRI warning", "Do NOT use SRI"),
			Self::new("unpkg reference", "unpkg"),
			Self::new("cdnjs reference", "cdnjs"),
		]
	}
}
