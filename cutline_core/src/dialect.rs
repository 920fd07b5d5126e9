use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

/// The host language of the document being transformed. Each mode selects
/// which comment syntaxes can carry directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageMode {
	#[default]
	Default,
	Java,
	#[serde(alias = "c++")]
	Cpp,
	#[serde(alias = "c#")]
	CSharp,
	Python,
	Sql,
}

impl LanguageMode {
	pub const fn profile(self) -> DialectProfile {
		match self {
			Self::Default | Self::Java | Self::CSharp => {
				DialectProfile {
					block_comments: true,
					html_comments: true,
					hash_comments: false,
					double_hyphen_comments: false,
					triple_quoted_strings: true,
				}
			}
			Self::Cpp => {
				DialectProfile {
					block_comments: true,
					html_comments: true,
					hash_comments: false,
					double_hyphen_comments: false,
					triple_quoted_strings: false,
				}
			}
			Self::Python => {
				DialectProfile {
					block_comments: false,
					html_comments: false,
					hash_comments: true,
					double_hyphen_comments: false,
					triple_quoted_strings: true,
				}
			}
			Self::Sql => {
				DialectProfile {
					block_comments: true,
					html_comments: false,
					hash_comments: false,
					double_hyphen_comments: true,
					triple_quoted_strings: false,
				}
			}
		}
	}

	/// Guess the mode from a file extension, without the leading dot.
	pub fn from_extension(extension: &str) -> Option<Self> {
		let mode = match extension.to_ascii_lowercase().as_str() {
			"java" => Self::Java,
			"c" | "h" | "cc" | "cpp" | "cxx" | "hpp" | "hh" => Self::Cpp,
			"cs" => Self::CSharp,
			"py" | "pyi" => Self::Python,
			"sql" => Self::Sql,
			_ => return None,
		};

		Some(mode)
	}

	/// Guess the mode from a path's extension.
	pub fn for_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|extension| extension.to_str())
			.and_then(Self::from_extension)
	}
}

/// Which comment delimiters the lexer treats as directive carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct DialectProfile {
	/// `/* ... */` and `/** ... */`.
	pub block_comments: bool,
	/// `<!-- ... -->` inside block and doc comments.
	pub html_comments: bool,
	/// `#` as the first non-whitespace character of a line.
	pub hash_comments: bool,
	/// `--` as the first non-whitespace characters of a line.
	pub double_hyphen_comments: bool,
	/// `"""` and `'''` open literals that may span lines. Otherwise they are an
	/// empty literal followed by a one-line literal, as in SQL and C.
	pub triple_quoted_strings: bool,
}

impl Default for DialectProfile {
	fn default() -> Self {
		LanguageMode::Default.profile()
	}
}
