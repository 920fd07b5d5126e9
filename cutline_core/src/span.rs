use std::ops::Range;

use crate::CommentKind;
use crate::CutlineError;
use crate::CutlineResult;
use crate::Directive;
use crate::HtmlDirective;
use crate::TokenKind;
use crate::Tokens;
use crate::classify;
use crate::classify_html;

/// The token indices around a terminating comment. `before` is its opening
/// delimiter, `after` is one past its closing delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
	pub before: usize,
	pub after: usize,
}

/// Where a spanning directive ends, and where its `@else` sits if it has one
/// at the same depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanMatch {
	pub end: Boundary,
	pub r#else: Option<Boundary>,
}

impl SpanMatch {
	/// The tokens selected when the directive is active. `start` is the index
	/// just past the opening comment.
	pub fn then_range(&self, start: usize) -> Range<usize> {
		let end = self.r#else.map_or(self.end.before, |boundary| boundary.before);
		start..end
	}

	/// The tokens between `@else` and `@end`, if there is an `@else`.
	pub fn else_range(&self) -> Option<Range<usize>> {
		self.r#else.map(|boundary| boundary.after..self.end.before)
	}
}

/// Tracks nesting depth while scanning for a terminating `@end`.
#[derive(Debug)]
struct DepthCounter {
	depth: usize,
	r#else: Option<Boundary>,
}

impl DepthCounter {
	fn new() -> Self {
		Self {
			depth: 1,
			r#else: None,
		}
	}

	fn open(&mut self) {
		self.depth += 1;
	}

	/// Returns the match once the depth drops to zero.
	fn end(&mut self, boundary: Boundary) -> Option<SpanMatch> {
		self.depth -= 1;

		(self.depth == 0).then_some(SpanMatch {
			end: boundary,
			r#else: self.r#else,
		})
	}

	/// The first `@else` at the outermost depth wins.
	fn r#else(&mut self, boundary: Boundary) {
		if self.depth == 1 && self.r#else.is_none() {
			self.r#else = Some(boundary);
		}
	}
}

/// Find the closing token of the comment opened at `open`.
pub fn find_close(tokens: &Tokens, open: usize, kind: CommentKind) -> CutlineResult<usize> {
	let close_kind = match kind {
		CommentKind::Block | CommentKind::Doc => TokenKind::BlockClose,
		CommentKind::Html => TokenKind::HtmlClose,
	};

	tokens
		.find(close_kind, open + 1, tokens.len())
		.ok_or_else(|| {
			let token = &tokens[open];
			CutlineError::UnterminatedComment {
				kind,
				line: token.line(),
				column: token.column(),
			}
		})
}

/// Scan forward from `start`, just past a spanning `@include-if` or
/// `@exclude-if` comment, for its matching `@end`.
///
/// Nested spanning directives raise the depth and each `@end` lowers it. Doc
/// comments are skipped whole, their html directives are matched on their
/// own. Returns `None` when the input ends first.
pub fn match_span(tokens: &Tokens, start: usize) -> CutlineResult<Option<SpanMatch>> {
	let mut counter = DepthCounter::new();
	let mut index = start;

	while index < tokens.len() {
		match tokens[index].kind {
			TokenKind::BlockOpen => {
				let close = find_close(tokens, index, CommentKind::Block)?;
				let boundary = Boundary {
					before: index,
					after: close + 1,
				};

				match classify(tokens, index, close)? {
					Directive::IncludeIf(_) | Directive::ExcludeIf(_) => counter.open(),
					Directive::End => {
						if let Some(found) = counter.end(boundary) {
							return Ok(Some(found));
						}
					}
					Directive::Else => counter.r#else(boundary),
					_ => {}
				}

				index = close + 1;
			}
			TokenKind::DocOpen => {
				index = find_close(tokens, index, CommentKind::Doc)? + 1;
			}
			_ => index += 1,
		}
	}

	Ok(None)
}

/// The html comment version of [`match_span`], scanning from `start` up to
/// `limit` (the end of the enclosing doc comment body).
///
/// A comment counts as `@end` or `@else` when that is its first atom,
/// whatever follows it.
pub fn match_html_span(tokens: &Tokens, start: usize, limit: usize) -> CutlineResult<Option<SpanMatch>> {
	let mut counter = DepthCounter::new();
	let mut index = start;

	while index < limit {
		if !tokens[index].is(TokenKind::HtmlOpen) {
			index += 1;
			continue;
		}

		let close = find_html_close(tokens, index, limit)?;
		let boundary = Boundary {
			before: index,
			after: close + 1,
		};

		match classify_html(tokens, index, close)? {
			HtmlDirective::IncludeIf(_) | HtmlDirective::ExcludeIf(_) => counter.open(),
			HtmlDirective::End => {
				if let Some(found) = counter.end(boundary) {
					return Ok(Some(found));
				}
			}
			HtmlDirective::Else => counter.r#else(boundary),
			HtmlDirective::Plain => {}
		}

		index = close + 1;
	}

	Ok(None)
}

/// Find the `-->` closing the html comment at `open` without leaving the doc
/// comment body that ends at `limit`.
pub fn find_html_close(tokens: &Tokens, open: usize, limit: usize) -> CutlineResult<usize> {
	tokens
		.find(TokenKind::HtmlClose, open + 1, limit)
		.ok_or_else(|| {
			let token = &tokens[open];
			CutlineError::UnterminatedComment {
				kind: CommentKind::Html,
				line: token.line(),
				column: token.column(),
			}
		})
}
