//! Semantic version classification.
//!
//! Decides whether a version string denotes a prerelease. Anything carrying
//! a prerelease identifier (`1.2.0-beta.1`) or build metadata (`1.2.0+20240101`)
//! is not a fully stable release and is published with the prerelease flag.

use semver::Version;

/// Returns true when `version` carries a prerelease identifier or build
/// metadata suffix. Either alone is sufficient.
///
/// Malformed version strings are conservatively classified as stable
/// releases; the release host rejects them on its own terms if it cares.
/// Never fails and has no side effects.
pub fn is_prerelease(version: &str) -> bool {
    match Version::parse(version) {
        Ok(parsed) => !parsed.pre.is_empty() || !parsed.build.is_empty(),
        Err(_) => false,
    }
}
