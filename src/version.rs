//! Version values and comparison
//!
//! This module provides:
//! - VersionInfo: a published version with its release date
//! - SemVer-first version comparison with a numeric fallback
//! - Extraction of the base version from an npm version specification

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::LazyLock;

/// `^1.2.3`, `~1.2`, `=1.2.3`, `>=1.2.3`, `v1.2.3` or a bare version
static SIMPLE_SPEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\^|~|>=|=)?\s*v?(\d+(?:\.\d+){0,2}(?:-[0-9A-Za-z.\-]+)?(?:\+[0-9A-Za-z.\-]+)?)$")
        .unwrap()
});

/// Information about a package version from the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// The version string (e.g., "1.2.3")
    pub version: String,
    /// When this version was released, if the registry reports it
    pub released_at: Option<DateTime<Utc>>,
}

impl VersionInfo {
    /// Create a new VersionInfo
    pub fn new(version: impl Into<String>, released_at: Option<DateTime<Utc>>) -> Self {
        Self {
            version: version.into(),
            released_at,
        }
    }
}

/// Compare two version strings.
///
/// Partial versions (`1.2`, `2`) are padded to three components, so `1.2`
/// and `1.2.0` compare equal. Uses full SemVer precedence when both sides
/// parse, otherwise falls back to comparing numeric components.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a, b) = (normalize(a), normalize(b));

    if let (Ok(va), Ok(vb)) = (semver::Version::parse(&a), semver::Version::parse(&b)) {
        return va.cmp_precedence(&vb);
    }

    let parse_parts = |s: &str| -> Vec<u64> {
        s.split(['.', '-', '+'])
            .filter_map(|p| p.parse().ok())
            .collect()
    };

    let parts_a = parse_parts(&a);
    let parts_b = parse_parts(&b);

    // Missing trailing components count as zero
    let len = parts_a.len().max(parts_b.len());
    (0..len)
        .map(|i| {
            let pa = parts_a.get(i).copied().unwrap_or(0);
            let pb = parts_b.get(i).copied().unwrap_or(0);
            pa.cmp(&pb)
        })
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Strip a leading `v` and pad the `major[.minor]` core to `major.minor.patch`
fn normalize(version: &str) -> String {
    let version = version.trim().trim_start_matches('v');
    let core_end = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(core_end);

    let components = core.split('.').count();
    let numeric = core.split('.').all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    if !numeric || components >= 3 {
        return version.to_string();
    }

    let padding = ".0".repeat(3 - components);
    format!("{core}{padding}{suffix}")
}

/// Returns true when `latest` is strictly newer than `local`
pub fn is_newer(latest: &str, local: &str) -> bool {
    compare_versions(latest, local) == Ordering::Greater
}

/// Extract the base version from a simple npm version specification.
///
/// Ranges, wildcards, tags and non-registry sources (`workspace:*`,
/// `file:`, git URLs) yield `None`.
pub fn base_version(spec: &str) -> Option<String> {
    SIMPLE_SPEC_RE
        .captures(spec.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_version_info_new() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let info = VersionInfo::new("1.2.3", Some(date));
        assert_eq!(info.version, "1.2.3");
        assert_eq!(info.released_at, Some(date));
    }

    #[test]
    fn test_compare_versions_basic() {
        assert_eq!(compare_versions("1.0.0", "1.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.0.0", "2.0.0"), Ordering::Less);
        assert_eq!(compare_versions("2.0.0", "1.0.0"), Ordering::Greater);
    }

    #[test]
    fn test_compare_versions_multi_digit() {
        assert_eq!(compare_versions("1.9.0", "1.10.0"), Ordering::Less);
        assert_eq!(compare_versions("10.0.0", "9.0.0"), Ordering::Greater);
    }

    #[test]
    fn test_compare_versions_v_prefix() {
        assert_eq!(compare_versions("v1.0.0", "1.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("v1.0.0", "v2.0.0"), Ordering::Less);
    }

    #[test]
    fn test_compare_versions_prerelease_uses_semver() {
        assert_eq!(compare_versions("1.0.0-alpha", "1.0.0-beta"), Ordering::Less);
        assert_eq!(compare_versions("1.0.0-rc.1", "1.0.0"), Ordering::Less);
    }

    #[test]
    fn test_compare_versions_build_metadata_ignored() {
        assert_eq!(compare_versions("1.0.0+build.1", "1.0.0+build.2"), Ordering::Equal);
    }

    #[test]
    fn test_compare_versions_partial_equals_padded() {
        assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.2.0", "1.2"), Ordering::Equal);
        assert_eq!(compare_versions("2", "2.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("v1.2", "1.2.0"), Ordering::Equal);
    }

    #[test]
    fn test_compare_versions_partial_ordering() {
        assert_eq!(compare_versions("1.3", "1.2.9"), Ordering::Greater);
        assert_eq!(compare_versions("1.2", "1.2.1"), Ordering::Less);
        assert_eq!(compare_versions("1.2-beta.1", "1.2.0"), Ordering::Less);
    }

    #[test]
    fn test_compare_versions_numeric_fallback_pads() {
        // Four components never parse as SemVer
        assert_eq!(compare_versions("1.2.3.0", "1.2.3"), Ordering::Equal);
        assert_eq!(compare_versions("1.2.3.1", "1.2.3"), Ordering::Greater);
    }

    #[test]
    fn test_is_newer() {
        assert!(is_newer("1.1.0", "1.0.0"));
        assert!(!is_newer("1.0.0", "1.0.0"));
        assert!(!is_newer("1.0.0", "1.1.0-beta.1"));
        assert!(!is_newer("1.2.0", "1.2"));
        assert!(is_newer("1.2.1", "1.2"));
    }

    #[test]
    fn test_base_version_simple_specs() {
        assert_eq!(base_version("1.2.3").as_deref(), Some("1.2.3"));
        assert_eq!(base_version("^1.2.3").as_deref(), Some("1.2.3"));
        assert_eq!(base_version("~1.2.3").as_deref(), Some("1.2.3"));
        assert_eq!(base_version(">=1.2.3").as_deref(), Some("1.2.3"));
        assert_eq!(base_version("=1.2.3").as_deref(), Some("1.2.3"));
        assert_eq!(base_version("v1.2.3").as_deref(), Some("1.2.3"));
        assert_eq!(base_version("^2.0.0-beta.4").as_deref(), Some("2.0.0-beta.4"));
        assert_eq!(base_version("~1.2").as_deref(), Some("1.2"));
    }

    #[test]
    fn test_base_version_unsupported_specs() {
        assert_eq!(base_version("*"), None);
        assert_eq!(base_version("1.x"), None);
        assert_eq!(base_version(">=1.0.0 <2.0.0"), None);
        assert_eq!(base_version("latest"), None);
        assert_eq!(base_version("workspace:*"), None);
        assert_eq!(base_version("github:bdelab/roar-letter"), None);
    }
}
