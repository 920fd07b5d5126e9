use std::fmt;

/// A single location in the source text. `line` and `column` are 1-based and
/// count characters, `offset` is the 0-based byte offset.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
	pub line: usize,
	pub column: usize,
	pub offset: usize,
}

impl Point {
	pub const fn new(line: usize, column: usize, offset: usize) -> Self {
		Self {
			line,
			column,
			offset,
		}
	}

	/// The first character of a document.
	pub const fn start() -> Self {
		Self::new(1, 1, 0)
	}

	/// Advance over text that contains no line break.
	pub fn advance_str(&mut self, text: &str) {
		self.column += text.chars().count();
		self.offset += text.len();
	}

	/// Advance over a single line break (`\n`, `\r`, `\r\n` or `\n\r`).
	pub fn advance_line(&mut self, line_break: &str) {
		self.line += 1;
		self.column = 1;
		self.offset += line_break.len();
	}
}

impl fmt::Debug for Point {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{} ({})", self.line, self.column, self.offset)
	}
}

/// The span of a token, from its first character up to (not including) the
/// character after it.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
	pub start: Point,
	pub end: Point,
}

impl Position {
	pub const fn from_points(start: Point, end: Point) -> Self {
		Self { start, end }
	}

	/// An empty span at a single point.
	pub const fn from_point(point: Point) -> Self {
		Self::from_points(point, point)
	}
}

impl fmt::Debug for Position {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}:{}-{}:{} ({}-{})",
			self.start.line,
			self.start.column,
			self.end.line,
			self.end.column,
			self.start.offset,
			self.end.offset
		)
	}
}

/// Byte length of the line break `text` starts with. `\r\n` and `\n\r` count
/// as one break.
pub(crate) fn line_break_len(text: &str) -> usize {
	if text.starts_with("\r\n") || text.starts_with("\n\r") {
		2
	} else {
		1
	}
}
