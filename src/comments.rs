use crate::minifier::parse;
use crate::types::UnwantedPattern;
use std::ops::Range;
use anyhow::{Context, Result};
use oxc_allocator::Allocator;
use regex::{Regex, RegexBuilder};

/// Drops block comments mentioning an unwanted pattern.
///
/// Comments are located by parsing the text, so comment delimiters inside
/// string, template or regex literals are left alone, as is every byte outside
/// the removed comments.
pub struct CommentFilter {
	patterns: Vec<(String, Regex)>,
}

impl CommentFilter {
	pub fn new(patterns: &[UnwantedPattern]) -> Result<Self> {
		let patterns = patterns
			.iter()
			.map(|p| {
				RegexBuilder::new(&p.pattern)
					.case_insensitive(true)
					.build()
					.map(|re| (p.label.clone(), re))
					.with_context(|| format!("Invalid pattern for `{}`", p.label))
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(Self { patterns })
	}

	/// All block comments in `text`, delimiters included.
	pub fn blocks<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
		Ok(block_spans(text)?.into_iter().map(|span| &text[span]).collect())
	}

	/// Labels of the patterns matching the body of a `/* ... */` comment.
	pub fn matching<'a>(&'a self, comment: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		let text = body(comment);

		self.patterns
			.iter()
			.filter(move |(_, re)| re.is_match(text))
			.map(|(label, _)| label.as_str())
	}

	/// Remove every block comment that matches an unwanted pattern.
	pub fn strip(&self, text: &str) -> Result<String> {
		let mut output = String::with_capacity(text.len());
		let mut last = 0;

		for span in block_spans(text)? {
			if self.matching(&text[span.clone()]).next().is_some() {
				output.push_str(&text[last..span.start]);
				last = span.end;
			}
		}

		output.push_str(&text[last..]);

		Ok(output)
	}

	/// Labels of every pattern found in any block comment, in pattern order.
	pub fn scan(&self, text: &str) -> Result<Vec<String>> {
		let blocks = self.blocks(text)?;

		Ok(self.patterns
			.iter()
			.filter(|(_, re)| blocks.iter().any(|b| re.is_match(body(b))))
			.map(|(label, _)| label.clone())
			.collect())
	}
}

fn block_spans(text: &str) -> Result<Vec<Range<usize>>> {
	let allocator = Allocator::default();
	let parsed = parse(&allocator, text).context("Cannot locate comments")?;

	Ok(parsed.program.comments
		.iter()
		.map(|c| c.span.start as usize..c.span.end as usize)
		.filter(|span| {
			text.get(span.clone())
				.is_some_and(|c| c.len() >= 4 && c.starts_with("/*") && c.ends_with("*/"))
		})
		.collect())
}

fn body(block: &str) -> &str {
	block
		.strip_prefix("/*")
		.and_then(|b| b.strip_suffix("*/"))
		.unwrap_or(block)
}
