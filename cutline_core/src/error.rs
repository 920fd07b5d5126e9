use miette::Diagnostic;
use thiserror::Error;

use crate::CommentKind;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum CutlineError {
	#[error(transparent)]
	#[diagnostic(code(cutline::io_error))]
	Io(#[from] std::io::Error),

	#[error("unterminated {kind} starting at {line}:{column}")]
	#[diagnostic(
		code(cutline::unterminated_comment),
		help("add the missing closing delimiter for this comment")
	)]
	UnterminatedComment {
		kind: CommentKind,
		line: usize,
		column: usize,
	},

	#[error("`{directive} {key}` at {line}:{column} has no matching `@end`")]
	#[diagnostic(
		code(cutline::unclosed_directive),
		help("close the block with a later `@end` comment at the same nesting depth")
	)]
	UnclosedDirective {
		directive: String,
		key: String,
		line: usize,
		column: usize,
	},

	#[error("`{directive}` at {line}:{column} is missing a key")]
	#[diagnostic(
		code(cutline::missing_key),
		help("write the key directly after the directive, e.g. `{directive} FEATURE`")
	)]
	MissingKey {
		directive: String,
		line: usize,
		column: usize,
	},

	#[error("`{directive} {key}` at {line}:{column} is followed by content but no `@end`")]
	#[diagnostic(
		code(cutline::missing_end),
		help("end an inline directive with `@end` inside the same comment")
	)]
	MissingEnd {
		directive: String,
		key: String,
		line: usize,
		column: usize,
	},

	#[error("directives are nested more than {limit} levels deep")]
	#[diagnostic(code(cutline::nesting_too_deep))]
	NestingTooDeep { limit: usize },

	#[error("`@license` requires a license map but none was provided")]
	#[diagnostic(
		code(cutline::missing_license_map),
		help("add a `[licenses]` table to cutline.toml or call `TransformOptions::with_license`")
	)]
	MissingLicenseMap,

	#[error("license resolution needs at most one active key, got {count}")]
	#[diagnostic(
		code(cutline::ambiguous_license_keys),
		help("activate a single key when licenses or the automatic license header are in use")
	)]
	AmbiguousLicenseKeys { count: usize },

	#[error("no license text found for key `{0}`")]
	#[diagnostic(
		code(cutline::license_not_found),
		help("add an entry for `{0}` to the license map")
	)]
	LicenseNotFound(String),

	#[error("`{0}` is reserved and cannot be used as an active key")]
	#[diagnostic(
		code(cutline::reserved_key),
		help("`DEFAULT` stands for the absence of other keys")
	)]
	ReservedKey(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(cutline::config_parse),
		help("check that cutline.toml is valid TOML with optional `keys`, `language` and `[licenses]` entries")
	)]
	ConfigParse(String),

	#[error("failed to load license file `{path}`: {reason}")]
	#[diagnostic(code(cutline::license_file))]
	LicenseFile { path: String, reason: String },
}

pub type CutlineResult<T> = Result<T, CutlineError>;
