use std::collections::BTreeSet;
use std::ops::Range;

use derive_more::Deref;

use crate::CutlineError;
use crate::CutlineResult;
use crate::Token;
use crate::TokenKind;
use crate::Tokens;

/// The reserved key. Supplying it as an active key is an error. In
/// `@file-exclude-if DEFAULT` and license lookups it stands for "no key is
/// active".
pub const DEFAULT_KEY: &str = "DEFAULT";

/// The set of feature keys active for one run. Keys are case sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct ActiveKeys(BTreeSet<String>);

impl ActiveKeys {
	pub fn new<I, S>(keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(keys.into_iter().map(Into::into).collect())
	}

	pub(crate) fn insert(&mut self, key: impl Into<String>) {
		self.0.insert(key.into());
	}

	/// The single active key, when exactly one is active.
	pub fn single(&self) -> Option<&str> {
		match self.0.len() {
			1 => self.0.iter().next().map(String::as_str),
			_ => None,
		}
	}
}

impl<S: Into<String>> FromIterator<S> for ActiveKeys {
	fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
		Self::new(iter)
	}
}

/// A directive key expression: one key, or several joined by `|` meaning
/// any of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyExpr(String);

impl KeyExpr {
	pub fn new(expr: impl Into<String>) -> Self {
		Self(expr.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The individual keys, skipping empty parts.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.split('|').map(str::trim).filter(|part| !part.is_empty())
	}

	/// True when any key of the expression is active.
	pub fn matches(&self, active: &ActiveKeys) -> bool {
		self.keys().any(|key| active.contains(key))
	}

	/// Like [`KeyExpr::matches`], except that a bare `DEFAULT` matches when no
	/// key is active.
	pub fn matches_or_default(&self, active: &ActiveKeys) -> bool {
		if self.0.trim() == DEFAULT_KEY {
			return active.is_empty();
		}

		self.matches(active)
	}
}

impl std::fmt::Display for KeyExpr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// What a single block comment (or `#` / `--` line comment) encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
	/// Not a directive. The comment is copied through unchanged.
	Plain,
	/// `/* @include-if KEY */`, closed by a later `/* @end */`.
	IncludeIf(KeyExpr),
	/// `/* @exclude-if KEY */`, closed by a later `/* @end */`.
	ExcludeIf(KeyExpr),
	/// `/* @include-if KEY body @end */`. `body` indexes the tokens between
	/// the key and `@end`.
	IncludeInline { key: KeyExpr, body: Range<usize> },
	/// `/* @exclude-if KEY body @end */`.
	ExcludeInline { key: KeyExpr, body: Range<usize> },
	/// `/* @file-exclude-if KEY */`
	FileExcludeIf(KeyExpr),
	Else,
	End,
	/// `/* @license [KEY] */`. The key is informational only.
	License(Option<String>),
}

/// What an html comment inside a doc comment encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlDirective {
	Plain,
	IncludeIf(KeyExpr),
	ExcludeIf(KeyExpr),
	Else,
	End,
}

/// Whitespace inside a comment body: blank text or a line break.
fn is_blank(token: &Token) -> bool {
	token.is_blank_text() || token.is(TokenKind::Eol)
}

fn skip_blank(tokens: &Tokens, from: usize, to: usize) -> usize {
	(from..to).find(|&index| !is_blank(&tokens[index])).unwrap_or(to)
}

fn only_blank(tokens: &Tokens, from: usize, to: usize) -> bool {
	skip_blank(tokens, from, to) >= to
}

fn atom_name(kind: TokenKind) -> &'static str {
	match kind {
		TokenKind::IncludeIf => "@include-if",
		TokenKind::ExcludeIf => "@exclude-if",
		TokenKind::FileExcludeIf => "@file-exclude-if",
		TokenKind::Else => "@else",
		TokenKind::End => "@end",
		TokenKind::License => "@license",
		_ => "",
	}
}

/// Read the key following the atom at `atom`. Returns the key and the index
/// just past it.
fn read_key(tokens: &Tokens, atom: usize, close: usize) -> CutlineResult<(KeyExpr, usize)> {
	let index = skip_blank(tokens, atom + 1, close);

	match tokens.get(index) {
		Some(token) if index < close && token.is(TokenKind::Key) => {
			Ok((KeyExpr::new(token.lexeme.as_str()), index + 1))
		}
		_ => {
			let token = &tokens[atom];
			Err(CutlineError::MissingKey {
				directive: atom_name(token.kind).to_string(),
				line: token.line(),
				column: token.column(),
			})
		}
	}
}

/// Classify the comment whose opening delimiter is at `open` and closing
/// delimiter at `close`.
///
/// An `@include-if` or `@exclude-if` followed by its key and then `@end`
/// inside the same comment is the inline form. Followed by nothing but
/// whitespace it is the spanning form. Anything else after the key is an
/// error, as is a missing key for any of the `-if` directives.
pub fn classify(tokens: &Tokens, open: usize, close: usize) -> CutlineResult<Directive> {
	let first = skip_blank(tokens, open + 1, close);

	if first >= close {
		return Ok(Directive::Plain);
	}

	let atom = &tokens[first];

	let directive = match atom.kind {
		TokenKind::IncludeIf | TokenKind::ExcludeIf => {
			let include = atom.is(TokenKind::IncludeIf);
			let (key, after_key) = read_key(tokens, first, close)?;

			if let Some(end) = tokens.find(TokenKind::End, after_key, close) {
				let body = after_key..end;

				if include {
					Directive::IncludeInline { key, body }
				} else {
					Directive::ExcludeInline { key, body }
				}
			} else if only_blank(tokens, after_key, close) {
				if include {
					Directive::IncludeIf(key)
				} else {
					Directive::ExcludeIf(key)
				}
			} else {
				return Err(CutlineError::MissingEnd {
					directive: atom_name(atom.kind).to_string(),
					key: key.to_string(),
					line: atom.line(),
					column: atom.column(),
				});
			}
		}
		TokenKind::FileExcludeIf => {
			let (key, after_key) = read_key(tokens, first, close)?;

			if only_blank(tokens, after_key, close) {
				Directive::FileExcludeIf(key)
			} else {
				Directive::Plain
			}
		}
		TokenKind::Else if only_blank(tokens, first + 1, close) => Directive::Else,
		TokenKind::End if only_blank(tokens, first + 1, close) => Directive::End,
		TokenKind::License => {
			let index = skip_blank(tokens, first + 1, close);
			let key = tokens
				.get(index)
				.filter(|token| index < close && token.is(TokenKind::Key))
				.map(|token| token.lexeme.clone());

			Directive::License(key)
		}
		_ => Directive::Plain,
	};

	Ok(directive)
}

/// Classify the html comment between `open` (`<!--`) and `close` (`-->`).
/// Only the first atom matters, trailing content is ignored.
pub fn classify_html(tokens: &Tokens, open: usize, close: usize) -> CutlineResult<HtmlDirective> {
	let first = skip_blank(tokens, open + 1, close);

	if first >= close {
		return Ok(HtmlDirective::Plain);
	}

	let directive = match tokens[first].kind {
		TokenKind::IncludeIf => HtmlDirective::IncludeIf(read_key(tokens, first, close)?.0),
		TokenKind::ExcludeIf => HtmlDirective::ExcludeIf(read_key(tokens, first, close)?.0),
		TokenKind::Else => HtmlDirective::Else,
		TokenKind::End => HtmlDirective::End,
		_ => HtmlDirective::Plain,
	};

	Ok(directive)
}
