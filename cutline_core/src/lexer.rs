use logos::Lexer;
use logos::Logos;

use crate::DialectProfile;
use crate::LexerState;
use crate::Point;
use crate::Position;
use crate::Token;
use crate::TokenKind;
use crate::Tokens;
use crate::position::line_break_len;

/// Raw tokens for text outside of any comment.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum CodeToken {
	#[token("/**/")]
	EmptyDoc,
	#[token("/**")]
	DocOpen,
	#[token("/*")]
	BlockOpen,
	#[token("#")]
	Hash,
	#[token("--")]
	DoubleHyphen,
	#[token("\"\"\"")]
	#[token("'''")]
	TripleQuote,
	#[token("\"")]
	#[token("'")]
	Quote,
	#[regex(r"\r\n|\n\r|\n|\r")]
	Newline,
	#[regex(r"[ \t]+")]
	Whitespace,
	#[regex(r#"[^/"'#\-\r\n \t]+"#)]
	Word,
	#[token("/")]
	Slash,
	#[token("-")]
	Hyphen,
}

/// Raw tokens for the body of a block, doc, html or line comment.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum CommentToken {
	#[token("*/")]
	BlockClose,
	#[token("<!--")]
	HtmlOpen,
	#[token("-->")]
	HtmlClose,
	#[regex(r"@([a-zA-Z]-?)*")]
	Atom,
	#[regex(r"\r\n|\n\r|\n|\r")]
	Newline,
	#[regex(r"[ \t]+")]
	Whitespace,
	#[regex(r"[^ \t\r\n*/<!\->@]+")]
	Word,
	#[regex(r"[*/<!\->]")]
	Punct,
}

/// Map a lexed `@...` atom to its directive kind.
fn atom_kind(atom: &str) -> Option<TokenKind> {
	let kind = match atom {
		"@include-if" => TokenKind::IncludeIf,
		"@exclude-if" => TokenKind::ExcludeIf,
		"@file-exclude-if" => TokenKind::FileExcludeIf,
		"@else" => TokenKind::Else,
		"@end" => TokenKind::End,
		"@license" => TokenKind::License,
		_ => return None,
	};

	Some(kind)
}

const fn takes_key(kind: TokenKind) -> bool {
	matches!(
		kind,
		TokenKind::IncludeIf | TokenKind::ExcludeIf | TokenKind::FileExcludeIf | TokenKind::License
	)
}

/// Whether a line comment body begins with a directive atom.
fn starts_with_directive(body: &str) -> bool {
	let body = body.trim_start_matches([' ', '\t']);
	let mut lexer = CommentToken::lexer(body);

	matches!(lexer.next(), Some(Ok(CommentToken::Atom))) && atom_kind(lexer.slice()).is_some()
}

fn has_content(slice: &str) -> bool {
	slice.chars().any(|ch| !matches!(ch, ' ' | '\t' | '\r' | '\n'))
}

/// Byte length of a quoted literal's body, up to and including the closing
/// `quote`. A backslash escapes the next character, a line break included. An
/// unescaped line break ends an unterminated literal before the break.
fn quoted_length(body: &str, quote: char) -> usize {
	let mut chars = body.char_indices();

	while let Some((index, ch)) = chars.next() {
		match ch {
			'\\' => {
				if let Some((next, '\r' | '\n')) = chars.next() {
					if line_break_len(&body[next..]) == 2 {
						chars.next();
					}
				}
			}
			'\r' | '\n' => return index,
			_ if ch == quote => return index + 1,
			_ => {}
		}
	}

	body.len()
}

/// Byte length of a triple-quoted literal's body, up to and including the
/// closing delimiter. A run of more than three quotes closes on its last
/// three. An unterminated literal runs to the end of the source.
fn triple_quoted_length(body: &str, quote: char) -> usize {
	let mut chars = body.char_indices();

	while let Some((index, ch)) = chars.next() {
		if ch == '\\' {
			chars.next();
		} else if ch == quote {
			let run = body[index..].bytes().take_while(|&byte| char::from(byte) == quote).count();

			if run >= 3 {
				return index + run;
			}
		}
	}

	body.len()
}

/// Progress of reading the key that follows a directive atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum KeyScan {
	#[default]
	Idle,
	/// Directly after the atom.
	AfterAtom,
	/// After the atom and the whitespace separating it from the key.
	AfterWhitespace,
}

/// Where the comment body being walked comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentContext {
	/// A `/* */` or `/** */` comment. Closes on `*/` and may contain html
	/// comments.
	Delimited,
	/// The rest of a line after a leading `#` or `--`. Only the line break
	/// ends it.
	Line,
}

/// Walks the logos token streams, tracking the lexer state, the line and
/// column, and whether the current line has content yet.
struct TokenWalker<'s> {
	source: &'s str,
	profile: DialectProfile,
	/// The position of the next character to consume.
	point: Point,
	state: LexerState,
	/// Pending plain text, merged into one token on flush.
	text: String,
	text_start: Point,
	text_state: LexerState,
	/// Set once the current line holds anything besides spaces and tabs.
	line_has_content: bool,
	key_scan: KeyScan,
	tokens: Vec<Token>,
}

impl<'s> TokenWalker<'s> {
	fn new(source: &'s str, profile: DialectProfile) -> Self {
		Self {
			source,
			profile,
			point: Point::start(),
			state: LexerState::Default,
			text: String::new(),
			text_start: Point::start(),
			text_state: LexerState::Default,
			line_has_content: false,
			key_scan: KeyScan::Idle,
			tokens: vec![],
		}
	}

	fn walk(mut self) -> Tokens {
		let mut code = CodeToken::lexer(self.source);

		while let Some(mut comment) = self.walk_code(code) {
			if !self.walk_comment(&mut comment, CommentContext::Delimited) {
				break;
			}

			code = comment.morph();
		}

		self.flush_text();
		self.tokens.push(Token::new(
			TokenKind::Eof,
			"",
			Position::from_point(self.point),
			self.state,
		));

		Tokens::new(self.tokens)
	}

	/// Consume code until a block or doc comment opens, handing back the lexer
	/// for the comment body. Returns `None` at the end of the source.
	fn walk_code(&mut self, mut lexer: Lexer<'s, CodeToken>) -> Option<Lexer<'s, CommentToken>> {
		while let Some(result) = lexer.next() {
			let slice = lexer.slice();

			match result {
				Ok(CodeToken::Newline) => self.push_eol(slice),
				Ok(CodeToken::DocOpen) if self.profile.block_comments => {
					self.push(TokenKind::DocOpen, slice);
					self.state = LexerState::InBlockComment;
					return Some(lexer.morph());
				}
				Ok(CodeToken::BlockOpen) if self.profile.block_comments => {
					self.push(TokenKind::BlockOpen, slice);
					self.state = LexerState::InBlockComment;
					return Some(lexer.morph());
				}
				Ok(CodeToken::Hash) if self.profile.hash_comments && !self.line_has_content => {
					self.line_comment(&mut lexer, slice);
				}
				Ok(CodeToken::DoubleHyphen)
					if self.profile.double_hyphen_comments && !self.line_has_content =>
				{
					self.line_comment(&mut lexer, slice);
				}
				Ok(CodeToken::TripleQuote) if self.profile.triple_quoted_strings => {
					self.triple_quoted(&mut lexer, slice);
				}
				Ok(CodeToken::TripleQuote) => {
					// An empty literal followed by the opening quote of another.
					self.push_text(&slice[..2]);
					self.quoted(&mut lexer, &slice[2..]);
				}
				Ok(CodeToken::Quote) => self.quoted(&mut lexer, slice),
				_ => self.push_text(slice),
			}
		}

		None
	}

	/// Consume a comment body. Returns `true` when a `*/` closed the comment.
	fn walk_comment(&mut self, lexer: &mut Lexer<'s, CommentToken>, context: CommentContext) -> bool {
		let delimited = context == CommentContext::Delimited;

		while let Some(result) = lexer.next() {
			let slice = lexer.slice();
			let key_scan = std::mem::take(&mut self.key_scan);

			match result {
				Ok(CommentToken::Newline) => self.push_eol(slice),
				Ok(CommentToken::BlockClose)
					if delimited && self.state == LexerState::InBlockComment =>
				{
					self.push(TokenKind::BlockClose, slice);
					self.state = LexerState::Default;
					return true;
				}
				Ok(CommentToken::HtmlOpen)
					if delimited
						&& self.profile.html_comments
						&& self.state == LexerState::InBlockComment =>
				{
					self.push(TokenKind::HtmlOpen, slice);
					self.state = LexerState::InHtmlComment;
				}
				Ok(CommentToken::HtmlClose)
					if delimited && self.state == LexerState::InHtmlComment =>
				{
					self.push(TokenKind::HtmlClose, slice);
					self.state = LexerState::InBlockComment;
				}
				Ok(CommentToken::Atom) => {
					match atom_kind(slice) {
						Some(kind) => {
							self.push(kind, slice);

							if takes_key(kind) {
								self.key_scan = KeyScan::AfterAtom;
							}
						}
						None => self.push_text(slice),
					}
				}
				Ok(CommentToken::Whitespace) => {
					self.push_text(slice);

					if key_scan == KeyScan::AfterAtom {
						self.key_scan = KeyScan::AfterWhitespace;
					}
				}
				Ok(CommentToken::Word) if key_scan != KeyScan::Idle => {
					self.push(TokenKind::Key, slice);
				}
				_ => self.push_text(slice),
			}
		}

		false
	}

	/// Handle a `#` or `--` that starts a line. When the rest of the line opens
	/// with a directive it is lexed like a comment body, wrapped in a
	/// `BlockOpen` carrying the marker and an empty `BlockClose`. Otherwise the
	/// whole line comment is text.
	fn line_comment(&mut self, lexer: &mut Lexer<'s, CodeToken>, marker: &'s str) {
		let remainder = lexer.remainder();
		let length = remainder.find(['\r', '\n']).unwrap_or(remainder.len());
		let body = &remainder[..length];

		if starts_with_directive(body) {
			self.push(TokenKind::BlockOpen, marker);
			self.state = LexerState::InBlockComment;

			let mut comment = CommentToken::lexer(body);
			self.walk_comment(&mut comment, CommentContext::Line);
			self.key_scan = KeyScan::Idle;

			self.push(TokenKind::BlockClose, "");
			self.state = LexerState::Default;
		} else {
			self.push_text(marker);
			self.push_text(body);
		}

		lexer.bump(length);
	}

	/// Consume a `"` or `'` literal opened by `opener`.
	fn quoted(&mut self, lexer: &mut Lexer<'s, CodeToken>, opener: &'s str) {
		let quote = if opener == "'" { '\'' } else { '"' };
		let remainder = lexer.remainder();
		let length = quoted_length(remainder, quote);

		self.push_text(opener);
		self.push_literal(&remainder[..length]);
		lexer.bump(length);
	}

	/// Consume a `"""` or `'''` literal opened by `opener`.
	fn triple_quoted(&mut self, lexer: &mut Lexer<'s, CodeToken>, opener: &'s str) {
		let quote = if opener.starts_with('\'') { '\'' } else { '"' };
		let remainder = lexer.remainder();
		let length = triple_quoted_length(remainder, quote);

		self.push_text(opener);
		self.push_literal(&remainder[..length]);
		lexer.bump(length);
	}

	/// Push literal text that may span lines. Each line break inside it is
	/// still its own `Eol` token.
	fn push_literal(&mut self, literal: &str) {
		let mut rest = literal;

		while let Some(index) = rest.find(['\r', '\n']) {
			self.push_text(&rest[..index]);

			let tail = &rest[index..];
			let length = line_break_len(tail);
			self.push_eol(&tail[..length]);
			rest = &tail[length..];
		}

		self.push_text(rest);
	}

	fn push_text(&mut self, slice: &str) {
		if slice.is_empty() {
			return;
		}

		if self.text.is_empty() {
			self.text_start = self.point;
			self.text_state = self.state;
		}

		self.text.push_str(slice);
		self.point.advance_str(slice);
		self.line_has_content |= has_content(slice);
	}

	fn flush_text(&mut self) {
		if self.text.is_empty() {
			return;
		}

		let text = std::mem::take(&mut self.text);
		self.tokens.push(Token::new(
			TokenKind::Text,
			text,
			Position::from_points(self.text_start, self.point),
			self.text_state,
		));
	}

	fn push(&mut self, kind: TokenKind, slice: &str) {
		self.flush_text();

		let start = self.point;
		self.point.advance_str(slice);
		self.line_has_content |= has_content(slice);
		self.tokens.push(Token::new(
			kind,
			slice,
			Position::from_points(start, self.point),
			self.state,
		));
	}

	fn push_eol(&mut self, slice: &str) {
		self.flush_text();

		let start = self.point;
		self.point.advance_line(slice);
		self.tokens.push(Token::new(
			TokenKind::Eol,
			slice,
			Position::from_points(start, self.point),
			self.state,
		));
		self.line_has_content = false;
		self.key_scan = KeyScan::Idle;
	}
}

/// Split `source` into the flat token list the engine works on. Never fails:
/// structural problems such as an unterminated comment surface later when the
/// engine looks for a closing token.
///
/// Concatenating every token's lexeme gives back `source`.
pub fn tokenize(profile: DialectProfile, source: &str) -> Tokens {
	TokenWalker::new(source, profile).walk()
}
