use crate::comments::CommentFilter;
use crate::types::*;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "jsbuild.toml";

/// Where to find the project and its config file.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct Location {
	/// Directory the input, output and config file are resolved against
	#[arg(short, long)]
	dir: Option<PathBuf>,

	/// Config file [default: <DIR>/jsbuild.toml, if present]
	#[arg(short, long)]
	config: Option<PathBuf>,
}

#[derive(clap::Args, Clone, Debug, Default)]
#[group(id = "ConfigArgs")]
pub struct Args {
	#[clap(flatten)]
	location: Location,

	/// JavaScript file to minify [default: index.js]
	#[arg(short, long)]
	input: Option<PathBuf>,

	/// Where to write the minified file [default: index.min.js]
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Skip removing unwanted comment blocks
	#[arg(long)]
	no_filter: bool,

	/// Fail the build when comment validation fails
	#[arg(long)]
	strict: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
	#[serde(skip)]
	pub dir: PathBuf,
	pub input: PathBuf,
	pub output: PathBuf,
	pub strict: bool,
	pub filter: FilterConfig,
	pub minify: MinifyOptions,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
	pub enabled: bool,
	pub patterns: Vec<UnwantedPattern>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			dir: PathBuf::new(),
			input: "index.js".into(),
			output: "index.min.js".into(),
			strict: false,
			filter: FilterConfig::default(),
			minify: MinifyOptions::default(),
		}
	}
}

impl Default for FilterConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			patterns: UnwantedPattern::defaults(),
		}
	}
}

impl Config {
	/// Built-in defaults, overlaid with the config file, overlaid with CLI flags.
	pub async fn load(args: &Args) -> Result<Self> {
		let mut config = Self::locate(&args.location).await?;
		config.apply(args);

		Ok(config)
	}

	/// Built-in defaults overlaid with the config file only.
	pub async fn locate(location: &Location) -> Result<Self> {
		let dir = location.dir.clone().unwrap_or_default();

		let path = match &location.config {
			Some(path) => Some(path.clone()),
			None => {
				let path = dir.join(CONFIG_FILE);
				tokio::fs::try_exists(&path).await?.then_some(path)
			}
		};

		let mut config = match path {
			Some(path) => Self::from_file(&path).await?,
			None => Self::default(),
		};

		config.dir = dir;
		config.validate()?;

		Ok(config)
	}

	async fn from_file(path: &Path) -> Result<Self> {
		let text = tokio::fs::read_to_string(path).await
			.with_context(|| format!("Error reading {}", path.display()))?;

		Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
	}

	pub fn parse(text: &str) -> Result<Self> {
		toml::from_str(text).map_err(|e| e.into())
	}

	fn apply(&mut self, args: &Args) {
		if let Some(input) = &args.input {
			self.input = input.clone();
		}
		if let Some(output) = &args.output {
			self.output = output.clone();
		}
		if args.no_filter {
			self.filter.enabled = false;
		}
		if args.strict {
			self.strict = true;
		}
	}

	/// The preamble has to survive filtering and pass validation.
	fn validate(&self) -> Result<()> {
		let filter = CommentFilter::new(&self.filter.patterns)?;
		let preamble = &self.minify.format.preamble;

		if preamble.contains('\n') {
			bail!("The preamble must be a single line");
		}

		if let Some(label) = filter.matching(preamble).next() {
			bail!("The preamble matches the unwanted pattern `{}`", label);
		}

		Ok(())
	}

	pub fn input_path(&self) -> PathBuf {
		self.dir.join(&self.input)
	}

	pub fn output_path(&self) -> PathBuf {
		self.dir.join(&self.output)
	}
}

pub async fn run(args: Args) -> Result<()> {
	let config = Config::load(&args).await?;
	print!("{}", toml::to_string(&config)?);

	Ok(())
}
