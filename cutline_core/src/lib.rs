//! `cutline_core` cuts a source file down to one variant of itself. Feature
//! keys select which regions survive, and the regions are marked with
//! directives written inside ordinary comments, so the annotated file still
//! compiles as it is.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source text
//!   → Lexer (comment-aware tokens: text, comment delimiters, directive atoms, keys, line breaks)
//!   → Classifier (what directive, if any, each comment holds)
//!   → Span matcher (depth-aware `@end` / `@else` lookup)
//!   → Engine (keeps or drops ranges, reprocesses inline bodies, substitutes licenses)
//!   → Line formatter (drops lines that only held a directive)
//! ```
//!
//! ## Directives
//!
//! - `/* @include-if KEY */ ... /* @else */ ... /* @end */` keeps the first
//!   branch when `KEY` is active, otherwise the `@else` branch if there is one.
//! - `/* @exclude-if KEY */ ... /* @end */` is the inverse.
//! - `/* @include-if KEY text @end */` and `/* @exclude-if KEY text @end */`
//!   are the inline forms. Exactly one space is trimmed from each side of
//!   `text`.
//! - `/* @file-exclude-if KEY */` empties the whole document when `KEY` is
//!   active. `DEFAULT` matches when no key is active.
//! - `/* @license */` is replaced with the license text for the active key.
//! - Inside doc comments, `<!-- @include-if KEY -->` and friends work the same
//!   way on html comments.
//!
//! Keys may be combined with `|`, meaning any of them. Python sources use
//! leading `#` comments and SQL sources also accept leading `--` comments, see
//! [`LanguageMode`].
//!
//! ## Quick Start
//!
//! ```rust
//! use cutline_core::TransformOptions;
//! use cutline_core::transform;
//!
//! let source = "\
//! class Greeter {
//! 	/* @include-if PREMIUM */
//! 	void premium() {}
//! 	/* @end */
//! }
//! ";
//!
//! let free = transform(source, &TransformOptions::new())?;
//! assert_eq!(free, "class Greeter {\n}\n");
//!
//! let premium = transform(source, &TransformOptions::new().with_key("PREMIUM"))?;
//! assert_eq!(premium, "class Greeter {\n\tvoid premium() {}\n}\n");
//! # Ok::<(), cutline_core::CutlineError>(())
//! ```
//!
//! ## Configuration
//!
//! [`CutlineConfig`] reads `cutline.toml` and turns it into
//! [`TransformOptions`]:
//!
//! ```toml
//! language = "java"
//! keys = ["PREMIUM"]
//! auto_license_header = true
//!
//! [licenses]
//! PREMIUM = { path = "licenses/commercial.txt" }
//! ```

pub use config::*;
pub use dialect::*;
pub use directive::*;
pub use engine::*;
pub use error::*;
pub use formatter::*;
pub use lexer::*;
pub use license::*;
pub use position::*;
pub use span::*;
pub use tokens::*;

pub mod config;
mod dialect;
mod directive;
mod engine;
#[allow(unused_assignments)]
mod error;
mod formatter;
mod lexer;
mod license;
mod position;
mod span;
mod tokens;

#[cfg(test)]
mod __fixtures;
