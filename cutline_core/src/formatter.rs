use crate::position::line_break_len;

/// Builds the output one line at a time so that lines left holding nothing
/// but a directive can be dropped along with their line break.
#[derive(Debug, Default)]
pub struct LineFormatter {
	output: String,
	line: String,
	/// Set when anything other than spaces and tabs lands on the line.
	has_content: bool,
	/// Set when a directive was handled on the line.
	directive_line: bool,
}

fn is_content(text: &str) -> bool {
	text.chars().any(|ch| ch != ' ' && ch != '\t')
}

impl LineFormatter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push_text(&mut self, text: &str) {
		if text.is_empty() {
			return;
		}

		self.has_content |= is_content(text);
		self.line.push_str(text);
	}

	/// End the current line with `line_break`.
	pub fn push_eol(&mut self, line_break: &str) {
		if self.keeps_line() {
			self.output.push_str(&self.line);
			self.output.push_str(line_break);
		}

		self.reset_line();
	}

	/// Append processed text that may contain line breaks of any style. Each
	/// `\r\n`, `\n\r`, `\n` or `\r` is a single line break.
	pub fn push_fragment(&mut self, fragment: &str) {
		let mut rest = fragment;

		while let Some(index) = rest.find(['\r', '\n']) {
			self.push_text(&rest[..index]);

			let tail = &rest[index..];
			let length = line_break_len(tail);

			self.push_eol(&tail[..length]);
			rest = &tail[length..];
		}

		self.push_text(rest);
	}

	/// Mark the current line as carrying a directive.
	pub fn mark_directive_line(&mut self) {
		self.directive_line = true;
	}

	pub fn line_has_content(&self) -> bool {
		self.has_content
	}

	/// Forget the current line if it holds only spaces and tabs.
	pub fn discard_blank_line(&mut self) {
		if !self.has_content {
			self.reset_line();
		}
	}

	/// Flush the final line, which has no line break, and return the output.
	pub fn finish(mut self) -> String {
		if self.keeps_line() {
			self.output.push_str(&self.line);
		}

		self.output
	}

	fn keeps_line(&self) -> bool {
		!self.directive_line || self.has_content
	}

	fn reset_line(&mut self) {
		self.line.clear();
		self.has_content = false;
		self.directive_line = false;
	}
}

/// Wraps a [`LineFormatter`] for the body of a doc comment, dropping lines
/// that are left with only the `* ` continuation marker.
#[derive(Debug)]
pub struct DocLineFormatter<'a> {
	parent: &'a mut LineFormatter,
	line: String,
}

impl<'a> DocLineFormatter<'a> {
	pub fn new(parent: &'a mut LineFormatter) -> Self {
		Self {
			parent,
			line: String::new(),
		}
	}

	pub fn push_text(&mut self, text: &str) {
		self.line.push_str(text);
	}

	pub fn push_eol(&mut self, line_break: &str) {
		if !is_star_only(&self.line) {
			self.parent.push_text(&self.line);
			self.parent.push_eol(line_break);
		}

		self.line.clear();
	}

	/// Hand the last partial line to the parent.
	pub fn finish(self) {
		if !self.line.is_empty() && !is_star_only(&self.line) {
			self.parent.push_text(&self.line);
		}
	}
}

/// Optional spaces or tabs, then `* `, then nothing but spaces or tabs.
pub fn is_star_only(line: &str) -> bool {
	line.trim_start_matches([' ', '\t'])
		.strip_prefix("* ")
		.is_some_and(|rest| rest.chars().all(|ch| ch == ' ' || ch == '\t'))
}
