//! Ownership lookup: which profile claims a managed path.

use std::path::Path;

use crate::config::Config;

/// Finds the profile other than `exclude` that claims `path`.
///
/// Profiles are scanned in name order, so when several profiles share a
/// path the lexicographically first claimant wins, deterministically.
pub fn owner_of<'a>(config: &'a Config, path: &Path, exclude: &str) -> Option<&'a str> {
    config
        .profiles
        .iter()
        .filter(|(name, _)| name.as_str() != exclude)
        .find(|(_, profile)| profile.files.iter().any(|f| f == path))
        .map(|(name, _)| name.as_str())
}

/// Whether `profile` lists `path` in its managed files.
pub fn claimed_by(config: &Config, profile: &str, path: &Path) -> bool {
    config
        .profiles
        .get(profile)
        .is_some_and(|p| p.files.iter().any(|f| f == path))
}
