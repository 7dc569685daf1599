//! Profile switching: validate, deactivate, activate.
//!
//! A switch moves the filesystem from one profile's layout to another.
//! Every other profile's files are parked next to their canonical paths as
//! `<file>.<profile>.disabled`, and the target profile's parked files are
//! renamed back into place. Validation runs first and collects everything
//! it can find in one pass; the transition itself is fail-fast, with no
//! rollback — when a rename fails mid-switch, the files renamed so far stay
//! renamed, and re-running the switch after fixing the cause is the
//! recovery path. Dry-run exercises every check without touching a file.

mod activate;
mod index;
mod validate;

pub use activate::{activate, deactivate_all};
pub use validate::{
    Issue, Operation, Report, Severity, validate_activation, validate_deactivation,
    validate_switch,
};

use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Errors that can occur while switching profiles.
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    #[error("profile {0:?} does not exist")]
    ProfileNotFound(String),

    #[error(
        "validation reported {} error(s) and {} warning(s)",
        .0.error_count(),
        .0.warning_count()
    )]
    Blocked(Report),

    #[error("failed to rename {from:?} to {to:?}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove existing {path:?}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = core::result::Result<T, SwitchError>;

/// The parked sibling of `file` while `profile` is inactive:
/// `<file>.<profile>.disabled`.
///
/// This naming is shared with existing parked files on disk; it must not
/// change.
pub fn parked_path(file: &Path, profile: &str) -> PathBuf {
    let mut parked = file.as_os_str().to_os_string();
    parked.push(".");
    parked.push(profile);
    parked.push(".disabled");
    PathBuf::from(parked)
}

/// Switches the filesystem to `target`'s layout.
///
/// Validates first; errors block the switch, and warnings block it unless
/// `force` is set. Only then are the other profiles deactivated and the
/// target activated. The returned report carries any warnings that were
/// bypassed, so the caller can still show them.
pub fn switch(config: &Config, target: &str, force: bool, dry: bool) -> Result<Report> {
    let report = validate_switch(config, target, force)?;
    if report.has_errors() || (report.has_warnings() && !force) {
        return Err(SwitchError::Blocked(report));
    }

    deactivate_all(config, target, dry)?;
    activate(config, target, force, dry)?;

    Ok(report)
}
