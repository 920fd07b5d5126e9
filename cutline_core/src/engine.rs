use std::ops::Range;

use tracing::debug;
use tracing::trace;

use crate::CommentKind;
use crate::CutlineError;
use crate::CutlineResult;
use crate::Directive;
use crate::DocLineFormatter;
use crate::HtmlDirective;
use crate::KeyExpr;
use crate::LineFormatter;
use crate::TokenKind;
use crate::Tokens;
use crate::TransformOptions;
use crate::classify;
use crate::classify_html;
use crate::find_close;
use crate::find_html_close;
use crate::match_html_span;
use crate::match_span;
use crate::resolve_license;
use crate::tokenize;

/// The deepest directive nesting, counting both nested spans and inline
/// bodies, that a document may use.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Why processing stopped before the end of the document.
#[derive(Debug)]
#[allow(variant_size_differences)]
enum Interrupt {
	/// A `@file-exclude-if` matched. The whole document becomes empty.
	FileExcluded,
	Failed(CutlineError),
}

impl From<CutlineError> for Interrupt {
	fn from(error: CutlineError) -> Self {
		Self::Failed(error)
	}
}

type Flow<T = ()> = Result<T, Interrupt>;

/// Produce the variant of `source` selected by `options`.
///
/// Text outside of directives is copied byte for byte, line breaks included.
/// A matching `@file-exclude-if` makes the result empty.
///
/// ```rust
/// use cutline_core::TransformOptions;
/// use cutline_core::transform;
///
/// let source = "a/* @include-if PRO */b/* @end */c";
///
/// assert_eq!(transform(source, &TransformOptions::new())?, "ac");
/// assert_eq!(
/// 	transform(source, &TransformOptions::new().with_key("PRO"))?,
/// 	"abc"
/// );
/// # Ok::<(), cutline_core::CutlineError>(())
/// ```
#[tracing::instrument(
	level = "debug",
	skip_all,
	fields(language = ?options.language(), keys = options.keys().len())
)]
pub fn transform(source: &str, options: &TransformOptions) -> CutlineResult<String> {
	options.validate()?;

	match run(source, options, 0) {
		Ok(output) => Ok(output),
		Err(Interrupt::FileExcluded) => {
			debug!("document excluded");
			Ok(String::new())
		}
		Err(Interrupt::Failed(error)) => Err(error),
	}
}

/// Transform one document, which is either the input itself or the body of
/// an inline directive at `depth`.
fn run(source: &str, options: &TransformOptions, depth: usize) -> Flow<String> {
	check_depth(depth)?;

	let tokens = tokenize(options.language().profile(), source);
	let mut out = LineFormatter::new();

	if options.auto_license_header() {
		out.push_fragment(resolve_license(options.licenses(), options.keys())?);
	}

	let interpreter = Interpreter {
		tokens: &tokens,
		options,
	};
	interpreter.process_range(0..tokens.len(), &mut out, true, depth)?;

	Ok(out.finish())
}

fn check_depth(depth: usize) -> CutlineResult<()> {
	if depth > MAX_NESTING_DEPTH {
		return Err(CutlineError::NestingTooDeep {
			limit: MAX_NESTING_DEPTH,
		});
	}

	Ok(())
}

/// Remove exactly one space from each end of an inline directive body.
fn strip_one_space(text: &str) -> &str {
	let text = text.strip_prefix(' ').unwrap_or(text);
	text.strip_suffix(' ').unwrap_or(text)
}

struct Interpreter<'a> {
	tokens: &'a Tokens,
	options: &'a TransformOptions,
}

impl Interpreter<'_> {
	fn process_range(
		&self,
		range: Range<usize>,
		out: &mut LineFormatter,
		top_level: bool,
		depth: usize,
	) -> Flow {
		check_depth(depth)?;

		let mut index = range.start;

		while index < range.end {
			let token = &self.tokens[index];

			index = match token.kind {
				TokenKind::Text => {
					out.push_text(&token.lexeme);
					index + 1
				}
				TokenKind::Eol => {
					out.push_eol(&token.lexeme);
					index + 1
				}
				TokenKind::Eof => index + 1,
				TokenKind::DocOpen => self.process_doc(index, out, depth)?,
				TokenKind::BlockOpen => self.process_block(index, range.end, out, top_level, depth)?,
				_ => {
					out.push_text(&token.lexeme);
					index + 1
				}
			};
		}

		Ok(())
	}

	/// Handle the block comment opened at `open`. Returns the index to resume
	/// from.
	fn process_block(
		&self,
		open: usize,
		end: usize,
		out: &mut LineFormatter,
		top_level: bool,
		depth: usize,
	) -> Flow<usize> {
		let close = find_close(self.tokens, open, CommentKind::Block)?;
		let keys = self.options.keys();

		match classify(self.tokens, open, close)? {
			Directive::IncludeIf(key) => self.process_span(open, close, &key, true, end, out, top_level, depth),
			Directive::ExcludeIf(key) => self.process_span(open, close, &key, false, end, out, top_level, depth),
			Directive::IncludeInline { key, body } => {
				self.process_inline(key.matches(keys), body, out, depth)?;
				Ok(close + 1)
			}
			Directive::ExcludeInline { key, body } => {
				self.process_inline(!key.matches(keys), body, out, depth)?;
				Ok(close + 1)
			}
			Directive::FileExcludeIf(key) => {
				out.mark_directive_line();

				if key.matches_or_default(keys) {
					debug!(key = %key, line = self.tokens[open].line(), "file exclusion matched");
					return Err(Interrupt::FileExcluded);
				}

				Ok(self.collapse_directive_line(close + 1, end, out, top_level))
			}
			Directive::License(key) => {
				out.mark_directive_line();
				trace!(key = ?key, "emitting license");
				out.push_fragment(resolve_license(self.options.licenses(), keys)?);
				out.mark_directive_line();

				let next = close + 1;

				if top_level && next < end && self.tokens[next].is(TokenKind::Eol) {
					out.discard_blank_line();
					return Ok(next + 1);
				}

				Ok(next)
			}
			Directive::Else | Directive::End => {
				out.mark_directive_line();
				out.push_text(&self.tokens.text(open..close + 1));
				Ok(close + 1)
			}
			Directive::Plain => {
				out.push_text(&self.tokens.text(open..close + 1));
				Ok(close + 1)
			}
		}
	}

	/// Handle a spanning `@include-if` / `@exclude-if` whose opening comment
	/// runs from `open` to `close`, keeping the selected branch.
	#[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
	fn process_span(
		&self,
		open: usize,
		close: usize,
		key: &KeyExpr,
		include: bool,
		end: usize,
		out: &mut LineFormatter,
		top_level: bool,
		depth: usize,
	) -> Flow<usize> {
		out.mark_directive_line();

		let start = close + 1;
		let Some(span) = match_span(self.tokens, start)? else {
			let token = &self.tokens[open];
			return Err(unclosed(include, key, token.line(), token.column()).into());
		};

		let active = key.matches(self.options.keys()) == include;
		let branch = if active {
			Some(span.then_range(start))
		} else {
			span.else_range()
		};

		debug!(
			key = %key,
			include,
			active,
			has_else = span.r#else.is_some(),
			line = self.tokens[open].line(),
			"resolved directive span"
		);

		if let Some(branch) = branch {
			self.process_range(self.tokens.trim_range(branch), out, false, depth + 1)?;
		}

		out.mark_directive_line();

		Ok(self.collapse_directive_line(span.end.after, end, out, top_level))
	}

	/// Reprocess the body of an inline directive as a document of its own and
	/// splice the result in.
	fn process_inline(&self, active: bool, body: Range<usize>, out: &mut LineFormatter, depth: usize) -> Flow {
		out.mark_directive_line();

		if active {
			let text = self.tokens.text(body);
			let body = strip_one_space(&text);
			trace!(body, "reprocessing inline body");

			let processed = run(body, &self.options.for_inline_body(), depth + 1)?;
			out.push_fragment(&processed);
		}

		out.mark_directive_line();

		Ok(())
	}

	/// At the top level, swallow the line break after a directive when nothing
	/// but whitespace shares its line.
	fn collapse_directive_line(&self, next: usize, end: usize, out: &mut LineFormatter, top_level: bool) -> usize {
		if top_level && next < end && self.tokens[next].is(TokenKind::Eol) && !out.line_has_content() {
			out.discard_blank_line();
			return next + 1;
		}

		next
	}

	/// Copy the doc comment opened at `open`, resolving the html directives in
	/// its body.
	fn process_doc(&self, open: usize, out: &mut LineFormatter, depth: usize) -> Flow<usize> {
		let close = find_close(self.tokens, open, CommentKind::Doc)?;

		out.push_text(&self.tokens[open].lexeme);

		let mut doc = DocLineFormatter::new(out);
		self.process_doc_body(open + 1..close, close, &mut doc, depth)?;
		doc.finish();

		out.push_text(&self.tokens[close].lexeme);

		Ok(close + 1)
	}

	/// `limit` is the end of the whole doc comment body. Html comments and
	/// their matching `@end` must close before it.
	fn process_doc_body(
		&self,
		range: Range<usize>,
		limit: usize,
		doc: &mut DocLineFormatter<'_>,
		depth: usize,
	) -> Flow {
		check_depth(depth)?;

		let mut index = range.start;

		while index < range.end {
			let token = &self.tokens[index];

			if token.is(TokenKind::Eol) {
				doc.push_eol(&token.lexeme);
				index += 1;
				continue;
			}

			if !token.is(TokenKind::HtmlOpen) {
				doc.push_text(&token.lexeme);
				index += 1;
				continue;
			}

			let close = find_html_close(self.tokens, index, limit)?;

			let (key, include) = match classify_html(self.tokens, index, close)? {
				HtmlDirective::IncludeIf(key) => (key, true),
				HtmlDirective::ExcludeIf(key) => (key, false),
				HtmlDirective::Plain | HtmlDirective::Else | HtmlDirective::End => {
					doc.push_text(&self.tokens.text(index..close + 1));
					index = close + 1;
					continue;
				}
			};

			let start = close + 1;
			let Some(span) = match_html_span(self.tokens, start, limit)? else {
				return Err(unclosed(include, &key, token.line(), token.column()).into());
			};

			let active = key.matches(self.options.keys()) == include;
			let branch = if active {
				Some(span.then_range(start))
			} else {
				span.else_range()
			};

			debug!(key = %key, include, active, line = token.line(), "resolved html directive span");

			if let Some(branch) = branch {
				self.process_doc_body(branch, limit, doc, depth + 1)?;
			}

			index = span.end.after;
		}

		Ok(())
	}
}

fn unclosed(include: bool, key: &KeyExpr, line: usize, column: usize) -> CutlineError {
	let directive = if include { "@include-if" } else { "@exclude-if" };

	CutlineError::UnclosedDirective {
		directive: directive.to_string(),
		key: key.to_string(),
		line,
		column,
	}
}
