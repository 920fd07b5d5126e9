use std::fmt;
use std::fmt::Display;
use std::ops::Range;

use derive_more::Deref;

use crate::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	/// Any run of text that carries no structure.
	Text,
	/// `/*`, or the `#` / `--` marker of a line comment directive.
	BlockOpen,
	/// `*/`, or the empty close synthesized at the end of a line comment
	/// directive.
	BlockClose,
	/// `/**`
	DocOpen,
	/// `<!--`
	HtmlOpen,
	/// `-->`
	HtmlClose,
	/// `@include-if`
	IncludeIf,
	/// `@exclude-if`
	ExcludeIf,
	/// `@file-exclude-if`
	FileExcludeIf,
	/// `@else`
	Else,
	/// `@end`
	End,
	/// `@license`
	License,
	/// The key expression following a directive atom, e.g. `FOO|BAR`.
	Key,
	/// `\n`, `\r`, `\r\n` or `\n\r`.
	Eol,
	/// Always the final token.
	Eof,
}

impl TokenKind {
	/// Whether this kind is one of the `@...` directive atoms.
	pub const fn is_atom(self) -> bool {
		matches!(
			self,
			Self::IncludeIf
				| Self::ExcludeIf
				| Self::FileExcludeIf
				| Self::Else
				| Self::End
				| Self::License
		)
	}
}

/// The lexer state a token was emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LexerState {
	#[default]
	Default,
	InBlockComment,
	InHtmlComment,
}

/// The flavour of comment reported in unterminated comment errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
	Block,
	Doc,
	Html,
}

impl Display for CommentKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CommentKind::Block => write!(f, "block comment"),
			CommentKind::Doc => write!(f, "doc comment"),
			CommentKind::Html => write!(f, "html comment"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	pub kind: TokenKind,
	/// The exact source text of the token.
	pub lexeme: String,
	pub position: Position,
	pub state: LexerState,
}

impl Token {
	pub fn new(
		kind: TokenKind,
		lexeme: impl Into<String>,
		position: Position,
		state: LexerState,
	) -> Self {
		Self {
			kind,
			lexeme: lexeme.into(),
			position,
			state,
		}
	}

	pub fn is(&self, kind: TokenKind) -> bool {
		self.kind == kind
	}

	/// A text token made only of spaces and tabs (or nothing at all).
	pub fn is_blank_text(&self) -> bool {
		self.kind == TokenKind::Text && self.lexeme.trim().is_empty()
	}

	pub fn line(&self) -> usize {
		self.position.start.line
	}

	pub fn column(&self) -> usize {
		self.position.start.column
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.lexeme)
	}
}

/// The flat token arena for one document. Every range handed around by the
/// engine indexes into this list.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct Tokens(Vec<Token>);

impl Tokens {
	pub(crate) fn new(tokens: Vec<Token>) -> Self {
		Self(tokens)
	}

	/// Concatenate the lexemes of a range of tokens.
	pub fn text(&self, range: Range<usize>) -> String {
		self.0[range].iter().map(|token| token.lexeme.as_str()).collect()
	}

	/// Reassemble the source the tokens were produced from.
	pub fn source(&self) -> String {
		self.text(0..self.0.len())
	}

	/// Index of the first `kind` token at or after `from`, stopping at
	/// `limit`.
	pub fn find(&self, kind: TokenKind, from: usize, limit: usize) -> Option<usize> {
		let limit = limit.min(self.0.len());
		(from..limit).find(|&index| self.0[index].kind == kind)
	}

	/// Shrink `range` past whitespace-only text tokens at both ends.
	pub fn trim_range(&self, range: Range<usize>) -> Range<usize> {
		let Range { mut start, mut end } = range;

		while start < end && self.0[start].is_blank_text() {
			start += 1;
		}

		while end > start && self.0[end - 1].is_blank_text() {
			end -= 1;
		}

		start..end
	}
}

impl IntoIterator for Tokens {
	type IntoIter = std::vec::IntoIter<Token>;
	type Item = Token;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
