use crate::comments::CommentFilter;
use crate::config::{self, Config};
use crate::minifier::{Engine, Minifier};
use crate::report::{kilobytes, Report, ReportFormat};
use crate::validate::Validation;
use anyhow::{bail, Context, Result};
use color_print::*;

#[derive(clap::Args, Clone, Debug, Default)]
pub struct Args {
	#[clap(flatten)]
	config: config::Args,

	/// Report format
	#[arg(short, long, value_enum, default_value_t = ReportFormat::default())]
	format: ReportFormat,
}

pub async fn run(args: Args) -> Result<()> {
	let config = Config::load(&args.config).await?;
	let report = build(&config, &Engine, args.format).await?;

	print!("{}", report.render(args.format)?);

	if args.format == ReportFormat::Flat {
		cprintln!("\n<g!><s>Build complete!");
	}

	Ok(())
}

/// Read, minify, scrub and write a single file. Nothing is written unless
/// every step before the write succeeds.
pub async fn build<M: Minifier>(config: &Config, minifier: &M, format: ReportFormat) -> Result<Report> {
	let filter = CommentFilter::new(&config.filter.patterns)?;
	let input = config.input_path();
	let output = config.output_path();

	format.status(&cformat!("<b!>Building <w><s>{}</>...", input.display()));

	let source = tokio::fs::read_to_string(&input).await
		.with_context(|| format!("Error reading {}", input.display()))?;

	format.status(&cformat!("<b!>Read <w><s>{}</> ({})", input.display(), kilobytes(source.len() as i64)));

	let minified = minifier.minify(&source, &config.minify).await
		.context("Minification error")?;

	let code = if config.filter.enabled {
		filter.strip(&minified)?
	} else {
		minified
	};

	let validation = Validation::check(&code, &config.minify.format.preamble, &filter)?;

	if !validation.passed() {
		validation.warn();

		if config.strict {
			bail!("Comment validation failed, {} was not written", output.display());
		}
	}

	tokio::fs::write(&output, &code).await
		.with_context(|| format!("Error writing {}", output.display()))?;

	Ok(Report::new(&input, &output, source.len(), code.len(), validation))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::minifier::with_preamble;
	use crate::types::{MinifyOptions, DEFAULT_PREAMBLE};
	use anyhow::anyhow;
	use std::path::Path;

	/// Keeps the source as-is, comments included.
	struct Passthrough;

	impl Minifier for Passthrough {
		async fn minify(&self, source: &str, options: &MinifyOptions) -> Result<String> {
			Ok(with_preamble(&options.format.preamble, source))
		}
	}

	struct Failing;

	impl Minifier for Failing {
		async fn minify(&self, _source: &str, _options: &MinifyOptions) -> Result<String> {
			Err(anyhow!("Unexpected token (1:9)"))
		}
	}

	async fn setup(source: &str) -> (tempfile::TempDir, Config) {
		let tmp = tempfile::tempdir().unwrap();
		tokio::fs::write(tmp.path().join("index.js"), source).await.unwrap();

		let config = Config {
			dir: tmp.path().into(),
			..Default::default()
		};

		(tmp, config)
	}

	async fn written(dir: &Path) -> String {
		tokio::fs::read_to_string(dir.join("index.min.js")).await.unwrap()
	}

	#[tokio::test]
	async fn removes_unwanted_comment_blocks() {
		let (tmp, config) = setup("/*! jsDelivr build */var url=\"unpkg.com\";/* keep me */").await;
		let report = build(&config, &Passthrough, ReportFormat::Flat).await.unwrap();

		assert_eq!(written(tmp.path()).await, format!("{}\nvar url=\"unpkg.com\";/* keep me */", DEFAULT_PREAMBLE));
		assert!(report.validation.passed());
	}

	#[tokio::test]
	async fn disabled_filter_reports_leftovers_but_still_writes() {
		let (tmp, mut config) = setup("/* Original file: /npm/pkg@1/index.js */a();").await;
		config.filter.enabled = false;

		let report = build(&config, &Passthrough, ReportFormat::Flat).await.unwrap();

		assert!(written(tmp.path()).await.contains("Original file:"));
		assert_eq!(report.validation.found, vec!["Original file reference"]);
		assert!(!report.validation.passed());
	}

	#[tokio::test]
	async fn strict_mode_refuses_to_write() {
		let (tmp, mut config) = setup("/* cdnjs */a();").await;
		config.filter.enabled = false;
		config.strict = true;

		assert!(build(&config, &Passthrough, ReportFormat::Flat).await.is_err());
		assert!(!tmp.path().join("index.min.js").exists());
	}

	#[tokio::test]
	async fn missing_input_writes_nothing() {
		let tmp = tempfile::tempdir().unwrap();
		let config = Config {
			dir: tmp.path().into(),
			..Default::default()
		};

		let err = build(&config, &Passthrough, ReportFormat::Flat).await.unwrap_err();

		assert!(err.to_string().starts_with("Error reading"));
		assert!(!tmp.path().join("index.min.js").exists());
	}

	#[tokio::test]
	async fn minifier_error_writes_nothing() {
		let (tmp, config) = setup("function (").await;
		let err = build(&config, &Failing, ReportFormat::Flat).await.unwrap_err();

		assert_eq!(err.to_string(), "Minification error");
		assert!(format!("{:#}", err).contains("Unexpected token"));
		assert!(!tmp.path().join("index.min.js").exists());
	}

	#[tokio::test]
	async fn overwrites_existing_output() {
		let (tmp, config) = setup("a();").await;
		tokio::fs::write(tmp.path().join("index.min.js"), "stale").await.unwrap();

		build(&config, &Passthrough, ReportFormat::Flat).await.unwrap();

		assert_eq!(written(tmp.path()).await, format!("{}\na();", DEFAULT_PREAMBLE));
	}

	#[tokio::test]
	async fn report_matches_written_sizes() {
		let source = format!("/* jsDelivr */{}", "x();".repeat(100));
		let (tmp, config) = setup(&source).await;

		let report = build(&config, &Passthrough, ReportFormat::Flat).await.unwrap();
		let output = written(tmp.path()).await;

		assert_eq!(report.original_size, source.len());
		assert_eq!(report.minified_size, output.len());
		assert_eq!(report.saved_bytes, source.len() as i64 - output.len() as i64);

		let expected = (1.0 - output.len() as f64 / source.len() as f64) * 100.0;
		assert!((report.reduction_percent - expected).abs() < 0.005);
	}

	#[tokio::test]
	async fn invalid_pattern_fails_before_reading() {
		let (tmp, mut config) = setup("a();").await;
		config.filter.patterns = vec![crate::types::UnwantedPattern::new("bad", "[")];

		assert!(build(&config, &Passthrough, ReportFormat::Flat).await.is_err());
		assert!(!tmp.path().join("index.min.js").exists());
	}

	#[tokio::test]
	async fn comment_delimiters_in_strings_survive() {
		let (tmp, config) = setup("var a=\"lib/*\",b=\"cdnjs\",c=\"*/x\";/* cdnjs */console.log(a,b,c);").await;
		build(&config, &Passthrough, ReportFormat::Flat).await.unwrap();

		assert_eq!(
			written(tmp.path()).await,
			format!("{}\nvar a=\"lib/*\",b=\"cdnjs\",c=\"*/x\";console.log(a,b,c);", DEFAULT_PREAMBLE),
		);
	}

	#[tokio::test]
	async fn empty_preamble_passes_validation() {
		let (tmp, mut config) = setup("a();").await;
		config.minify.format.preamble = String::new();

		let report = build(&config, &Passthrough, ReportFormat::Flat).await.unwrap();

		assert!(report.validation.passed());
		assert_eq!(written(tmp.path()).await, "a();");
	}

	#[tokio::test]
	async fn engine_drops_dead_code_and_debugger() {
		let (tmp, config) = setup("if (false) { console.log('dead') }\ndebugger;\nstart();\n").await;
		let report = build(&config, &Engine, ReportFormat::Flat).await.unwrap();
		let output = written(tmp.path()).await;

		assert!(output.starts_with(&format!("{}\n", DEFAULT_PREAMBLE)));
		assert!(!output.contains("dead"));
		assert!(!output.contains("debugger"));
		assert!(output.contains("start()"));
		assert!(report.validation.passed());
	}
}
