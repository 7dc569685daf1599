//! The filesystem transition: park inactive profiles, restore the target.
//!
//! Renames are individual filesystem calls with no cross-file atomicity.
//! The first failure aborts with the offending path attached; files already
//! renamed stay renamed. These functions trust that validation ran first
//! and do not re-check what it checked. Every mutation is gated on `dry`.

use std::fs;
use std::path::Path;

use crate::config::Config;

use super::{Result, SwitchError, index, parked_path};

/// Parks every file of every profile except `active`.
///
/// A file is left alone when it is not live, when its parked copy already
/// exists, or when the active profile also claims it (shared files stay
/// live for the profile that needs them).
pub fn deactivate_all(config: &Config, active: &str, dry: bool) -> Result<()> {
    for (name, profile) in &config.profiles {
        if name == active {
            continue;
        }
        for file in &profile.files {
            let parked = parked_path(file, name);
            if !file.exists() || parked.exists() {
                continue;
            }
            if index::claimed_by(config, active, file) {
                continue;
            }
            if dry {
                continue;
            }
            fs::rename(file, &parked).map_err(|source| SwitchError::Rename {
                from: file.clone(),
                to: parked.clone(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Restores `name`'s parked files to their canonical paths.
///
/// A file that is already live with no parked copy is skipped — that covers
/// re-activating the current profile and paths shared with other profiles.
/// When both a live occupant and a parked copy exist, `force` removes the
/// occupant before the rename; without it the occupant is left alone
/// (validation already warned about it). A parked copy missing at rename
/// time surfaces as the rename's filesystem error.
pub fn activate(config: &Config, name: &str, force: bool, dry: bool) -> Result<()> {
    let Some(profile) = config.profiles.get(name) else {
        return Err(SwitchError::ProfileNotFound(name.to_string()));
    };

    for file in &profile.files {
        let parked = parked_path(file, name);
        let live = file.exists();
        if live && !parked.exists() {
            continue;
        }
        if live {
            if !force {
                continue;
            }
            if !dry {
                remove_existing(file)?;
            }
        }
        if !dry {
            fs::rename(&parked, file).map_err(|source| SwitchError::Rename {
                from: parked.clone(),
                to: file.clone(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Removes a live occupant, file or directory.
fn remove_existing(path: &Path) -> Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|source| SwitchError::Remove {
        path: path.to_path_buf(),
        source,
    })
}
