use crate::LanguageMode;
use crate::LicenseMap;
use crate::TokenKind;
use crate::TransformOptions;
use crate::tokenize;

pub const JAVADOC_SNIPPET: &str = "\
/**
 * pre
 * <!-- @include-if FOO -->
 * keep
 * <!-- @exclude-if BAR -->
 * drop
 * <!-- @end -->
 * <!-- @end -->
 * post
 */";

pub const DEEP_NESTED_HTML: &str = "\
/**
 * a
 * <!-- @include-if K1 -->
 *   i1
 *   <!-- @exclude-if K2 -->
 *     gone-if-k2
 *     <!-- @include-if K3 -->
 *       i3
 *     <!-- @end -->
 *   <!-- @end -->
 *   tail
 * <!-- @end -->
 * z
 */";

pub const WHOLE_DOC_VARIANTS: &str = "\
/* @include-if OPENSOURCE */
/**
 * Only present with OPENSOURCE.
 *
 * Removed otherwise.
 */
/* @end */
/* @exclude-if OPENSOURCE */
/**
 * Only present without OPENSOURCE.
 *
 * Removed otherwise.
 */
/* @end */
";

pub const HELLO_CLASS: &str = "\
/* @file-exclude-if FOO|BAR */
public class Hello {
    void greet() {}
}
";

/// Options with the given keys active and nothing else set.
pub fn keyed(keys: &[&str]) -> TransformOptions {
	TransformOptions::new().with_keys(keys.iter().copied())
}

pub fn python(keys: &[&str]) -> TransformOptions {
	keyed(keys).with_language(LanguageMode::Python)
}

pub fn sql(keys: &[&str]) -> TransformOptions {
	keyed(keys).with_language(LanguageMode::Sql)
}

/// An open source license under `OPENSOURCE` and a commercial one under
/// `DEFAULT`.
pub fn license_map() -> LicenseMap {
	let mut licenses = LicenseMap::new();
	licenses.insert("OPENSOURCE".to_string(), "/* Apache V2 license */\n".to_string());
	licenses.insert("DEFAULT".to_string(), "/* Premium license */\n".to_string());

	licenses
}

pub fn licensed(keys: &[&str]) -> TransformOptions {
	keyed(keys).with_licenses(license_map())
}

/// Spanning `@include-if A` directives nested `depth` deep around a single
/// line.
pub fn nested_includes(depth: usize) -> String {
	let mut source = "/* @include-if A */\n".repeat(depth);
	source.push_str("x\n");
	source.push_str(&"/* @end */\n".repeat(depth));

	source
}

/// The token kinds of `source` lexed in `language`, in order.
pub fn kinds(language: LanguageMode, source: &str) -> Vec<TokenKind> {
	tokenize(language.profile(), source)
		.iter()
		.map(|token| token.kind)
		.collect()
}
