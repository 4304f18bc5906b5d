use lazy_static::lazy_static;
use regex::Regex;
use semver::{Version, VersionReq};

use crate::utils::errors::{ResultTrait as _, ResultWithError};

lazy_static! {
    static ref VERSION_RE: Regex =
        Regex::new(r"\d+\.\d+\.\d+").expect("version pattern is a valid regex");
}

pub struct SemverUtils {}

impl SemverUtils {
    /// Checks the first `x.y.z` found in `input` against `>= min_version`.
    pub fn is_version_greater_or_equal(min_version: &str, input: &str) -> ResultWithError<bool> {
        let Some(found_version) = Self::extract_version(input) else {
            return Ok(false);
        };

        let required_version = VersionReq::parse(&format!(">={min_version}"))
            .auto_err(format!("Invalid min_version in config: {}", min_version))?;

        Ok(required_version.matches(&found_version))
    }

    pub fn is_valid_version(input: &str) -> bool {
        Self::extract_version(input).is_some()
    }

    pub fn extract_version(input: &str) -> Option<Version> {
        let capt = VERSION_RE.find(input)?;
        Version::parse(capt.as_str()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_versions_from_tool_output() {
        assert!(SemverUtils::is_valid_version("v14.17.0\n"));
        assert!(!SemverUtils::is_valid_version("command not found: node"));
        assert_eq!(
            SemverUtils::extract_version("npm 8.1.2 (node v16)"),
            Some(Version::new(8, 1, 2))
        );
    }

    #[test]
    fn compares_against_minimum() {
        assert!(SemverUtils::is_version_greater_or_equal("12.0.0", "v14.17.0").unwrap());
        assert!(SemverUtils::is_version_greater_or_equal("14.17.0", "v14.17.0").unwrap());
        assert!(!SemverUtils::is_version_greater_or_equal("16.0.0", "v14.17.0").unwrap());
        assert!(!SemverUtils::is_version_greater_or_equal("12.0.0", "garbage").unwrap());
        assert!(SemverUtils::is_version_greater_or_equal("not-a-version", "1.2.3").is_err());
    }
}
