use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ActiveKeys;
use crate::CutlineError;
use crate::CutlineResult;
use crate::DEFAULT_KEY;
use crate::LanguageMode;
use crate::LicenseMap;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["cutline.toml", ".cutline.toml", ".config/cutline.toml"];

/// The inputs of one [`transform`](crate::transform) call.
///
/// Built once with the `with_*` methods and then only read.
///
/// ```rust
/// use cutline_core::LanguageMode;
/// use cutline_core::TransformOptions;
///
/// let options = TransformOptions::new()
/// 	.with_key("PREMIUM")
/// 	.with_language(LanguageMode::Java);
///
/// assert!(options.keys().contains("PREMIUM"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
	keys: ActiveKeys,
	language: LanguageMode,
	licenses: LicenseMap,
	auto_license_header: bool,
}

impl TransformOptions {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.keys.insert(key);
		self
	}

	#[must_use]
	pub fn with_keys<I, S>(mut self, keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		for key in keys {
			self.keys.insert(key);
		}

		self
	}

	#[must_use]
	pub fn with_language(mut self, language: LanguageMode) -> Self {
		self.language = language;
		self
	}

	#[must_use]
	pub fn with_license(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
		self.licenses.insert(key.into(), text.into());
		self
	}

	#[must_use]
	pub fn with_licenses(mut self, licenses: LicenseMap) -> Self {
		self.licenses.extend(licenses);
		self
	}

	/// Prepend the resolved license text to the output.
	#[must_use]
	pub fn with_auto_license_header(mut self, enabled: bool) -> Self {
		self.auto_license_header = enabled;
		self
	}

	pub fn keys(&self) -> &ActiveKeys {
		&self.keys
	}

	pub fn language(&self) -> LanguageMode {
		self.language
	}

	pub fn licenses(&self) -> &LicenseMap {
		&self.licenses
	}

	pub fn auto_license_header(&self) -> bool {
		self.auto_license_header
	}

	/// Licenses are in play when a license map was supplied or the automatic
	/// header was requested.
	pub fn license_mode(&self) -> bool {
		self.auto_license_header || !self.licenses.is_empty()
	}

	/// Reject option combinations that can never produce output: the reserved
	/// `DEFAULT` key, and several keys while licenses are in play.
	pub fn validate(&self) -> CutlineResult<()> {
		if self.keys.contains(DEFAULT_KEY) {
			return Err(CutlineError::ReservedKey(DEFAULT_KEY.to_string()));
		}

		if self.license_mode() && self.keys.len() > 1 {
			return Err(CutlineError::AmbiguousLicenseKeys {
				count: self.keys.len(),
			});
		}

		Ok(())
	}

	/// Options for reprocessing the body of an inline directive.
	pub(crate) fn for_inline_body(&self) -> Self {
		Self {
			auto_license_header: false,
			..self.clone()
		}
	}
}

/// Where a license text comes from.
///
/// ```toml
/// [licenses]
/// DEFAULT = "/* Proprietary */\n"
/// OSS = { path = "licenses/apache.txt" }
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum LicenseSource {
	Text(String),
	File(LicenseFileSource),
}

#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct LicenseFileSource {
	pub path: PathBuf,
}

/// Configuration loaded from a `cutline.toml` file.
///
/// ```toml
/// language = "java"
/// keys = ["PREMIUM"]
/// auto_license_header = true
///
/// [licenses]
/// PREMIUM = { path = "licenses/commercial.txt" }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct CutlineConfig {
	/// Language mode used for every file. When absent the mode is guessed from
	/// each file's extension.
	#[serde(default)]
	pub language: Option<LanguageMode>,
	/// Keys active for every run.
	#[serde(default)]
	pub keys: Vec<String>,
	#[serde(default)]
	pub auto_license_header: bool,
	/// License texts by key, inline or read from a file relative to the config
	/// root.
	#[serde(default)]
	pub licenses: BTreeMap<String, LicenseSource>,
}

impl CutlineConfig {
	/// Return the first config file that exists under `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> CutlineResult<Option<CutlineConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: CutlineConfig =
			toml::from_str(&content).map_err(|e| CutlineError::ConfigParse(e.to_string()))?;

		tracing::debug!(path = %config_path.display(), "loaded cutline config");

		Ok(Some(config))
	}

	/// The language mode for `path`: the configured one, else a guess from the
	/// extension, else the default mode.
	pub fn language_for(&self, path: &Path) -> LanguageMode {
		self.language
			.or_else(|| LanguageMode::for_path(path))
			.unwrap_or_default()
	}

	/// Read every license text, loading file-backed entries relative to `root`.
	pub fn load_licenses(&self, root: &Path) -> CutlineResult<LicenseMap> {
		let mut licenses = LicenseMap::new();

		for (key, source) in &self.licenses {
			let text = match source {
				LicenseSource::Text(text) => text.clone(),
				LicenseSource::File(file) => {
					std::fs::read_to_string(root.join(&file.path)).map_err(|e| {
						CutlineError::LicenseFile {
							path: file.path.display().to_string(),
							reason: e.to_string(),
						}
					})?
				}
			};

			licenses.insert(key.clone(), text);
		}

		Ok(licenses)
	}

	/// Build the options for transforming `path`.
	pub fn to_options(&self, root: &Path, path: &Path) -> CutlineResult<TransformOptions> {
		let options = TransformOptions::new()
			.with_keys(self.keys.iter().cloned())
			.with_language(self.language_for(path))
			.with_licenses(self.load_licenses(root)?)
			.with_auto_license_header(self.auto_license_header);

		Ok(options)
	}
}
