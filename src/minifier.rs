use crate::types::MinifyOptions;
use anyhow::{anyhow, bail, Result};
use color_print::*;
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc_minifier::{CompressOptions, MangleOptions, MangleOptionsKeepNames, Minifier as OxcMinifier, MinifierOptions};
use oxc_parser::{Parser, ParserReturn};
use oxc_span::SourceType;

/// Something that turns JavaScript source into minified JavaScript.
///
/// Implementations must emit `options.format.preamble` (when non-empty) as the
/// first line of the returned text.
#[allow(async_fn_in_trait)]
pub trait Minifier {
	async fn minify(&self, source: &str, options: &MinifyOptions) -> Result<String>;
}

/// Minifier backed by the oxc parser, minifier and code generator.
pub struct Engine;

impl Engine {
	/// Options set to a value the engine has no way of honoring.
	pub fn unsupported(options: &MinifyOptions) -> Vec<&'static str> {
		let mut unsupported = Vec::new();

		if options.source_map {
			unsupported.push("source_map");
		}
		// dead code is always removed when compressing
		if !options.compress.dead_code {
			unsupported.push("compress.dead_code");
		}

		unsupported
	}

	fn compress_options(options: &MinifyOptions) -> Result<CompressOptions> {
		let mut compress = CompressOptions::smallest();
		compress.drop_debugger = options.compress.drop_debugger;
		compress.drop_console = options.compress.drop_console;

		if options.mangle.safari10 {
			// no syntax newer than Safari 10 can parse
			compress.target = "es2015".parse().map_err(|e| anyhow!("{:?}", e))?;
		}

		Ok(compress)
	}

	fn mangle_options(options: &MinifyOptions) -> MangleOptions {
		MangleOptions {
			top_level: options.mangle.toplevel,
			keep_names: MangleOptionsKeepNames {
				function: options.compress.keep_fnames,
				class: options.compress.keep_classnames,
			},
			..MangleOptions::default()
		}
	}

	fn run(source: &str, options: &MinifyOptions) -> Result<String> {
		let allocator = Allocator::default();
		let mut parsed = parse(&allocator, source)?;

		let minifier = OxcMinifier::new(MinifierOptions {
			mangle: Some(Self::mangle_options(options)),
			compress: Some(Self::compress_options(options)?),
			..MinifierOptions::default()
		});

		let minified = minifier.build(&allocator, &mut parsed.program);

		let comments = match options.format.comments {
			true => CommentOptions::default(),
			false => CommentOptions::disabled(),
		};

		let codegen = Codegen::new()
			.with_options(CodegenOptions {
				source_map_path: None,
				minify: true,
				comments,
				..CodegenOptions::default()
			})
			.with_scoping(minified.scoping)
			.build(&parsed.program);

		Ok(codegen.code)
	}
}

impl Minifier for Engine {
	async fn minify(&self, source: &str, options: &MinifyOptions) -> Result<String> {
		for option in Self::unsupported(options) {
			ceprintln!("<y!><s>Warning:</> <s>{}</> is not supported by the minifier and will be ignored", option);
		}

		let source = source.to_owned();
		let opts = options.clone();

		// the engine is synchronous and CPU bound
		let code = tokio::task::spawn_blocking(move || Self::run(&source, &opts))
			.await
			.map_err(|e| anyhow!("minifier crashed: {}", e))??;

		Ok(with_preamble(&options.format.preamble, &code))
	}
}

/// Parse `text` as a classic script, falling back to an ES module.
pub fn parse<'a>(allocator: &'a Allocator, text: &'a str) -> Result<ParserReturn<'a>> {
	let mut message = String::new();

	for source_type in [SourceType::cjs(), SourceType::mjs()] {
		let parsed = Parser::new(allocator, text, source_type).parse();

		if parsed.errors.is_empty() && !parsed.panicked {
			return Ok(parsed);
		}

		if message.is_empty() {
			message = parsed.errors.first()
				.map(|e| e.to_string())
				.unwrap_or_else(|| "unexpected end of input".into());
		}
	}

	bail!("{}", message)
}

pub fn with_preamble(preamble: &str, code: &str) -> String {
	if preamble.is_empty() {
		code.to_string()
	} else {
		format!("{}\n{}", preamble, code)
	}
}
