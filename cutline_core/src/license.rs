use std::collections::BTreeMap;

use crate::ActiveKeys;
use crate::CutlineError;
use crate::CutlineResult;
use crate::DEFAULT_KEY;

/// License texts keyed by feature key, with `DEFAULT` used when no key is
/// active.
pub type LicenseMap = BTreeMap<String, String>;

/// Look up the license text for the active key, or for `DEFAULT` when no key
/// is active.
pub fn resolve_license<'a>(licenses: &'a LicenseMap, keys: &ActiveKeys) -> CutlineResult<&'a str> {
	if licenses.is_empty() {
		return Err(CutlineError::MissingLicenseMap);
	}

	if keys.len() > 1 {
		return Err(CutlineError::AmbiguousLicenseKeys { count: keys.len() });
	}

	let key = keys.single().unwrap_or(DEFAULT_KEY);

	licenses
		.get(key)
		.map(String::as_str)
		.ok_or_else(|| CutlineError::LicenseNotFound(key.to_string()))
}
