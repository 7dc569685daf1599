//! Switch validation: collect every problem before any file is touched.
//!
//! Issues come in two severities. An error blocks the switch outright; a
//! warning blocks it unless the caller forces. Checks never stop at the
//! first finding — the whole profile set is scanned so the user sees the
//! complete list in one pass. The one exception is an unknown target
//! profile, which fails immediately with no per-file checks.

use std::fmt;
use std::path::PathBuf;

use crate::config::Config;

use super::{Result, SwitchError, index, parked_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Which half of the switch an issue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Activate,
    Deactivate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activate => write!(f, "activate"),
            Self::Deactivate => write!(f, "deactivate"),
        }
    }
}

/// A single problem found during validation.
#[derive(Debug, Clone)]
pub struct Issue {
    pub severity: Severity,
    pub operation: Operation,
    pub profile: String,
    pub file: Option<PathBuf>,
    pub message: String,
    pub suggestion: Option<String>,
}

impl fmt::Display for Issue {
    /// One line per issue: `[severity:operation:profile] message (file: "path")`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}:{}] {}",
            self.severity, self.operation, self.profile, self.message
        )?;
        if let Some(file) = &self.file {
            write!(f, " (file: {:?})", file.display().to_string())?;
        }
        Ok(())
    }
}

/// Everything validation found for one proposed switch.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }
}

/// Validates activating `target`.
///
/// Each of the target's files must have its parked copy on disk — unless
/// the path is already live and shared with another profile, in which case
/// no parked copy is expected. A live file nobody else claims is about to
/// be overwritten: a warning without `force`, accepted silently with it.
pub fn validate_activation(config: &Config, target: &str, force: bool) -> Result<Report> {
    let Some(profile) = config.profiles.get(target) else {
        return Err(SwitchError::ProfileNotFound(target.to_string()));
    };

    let mut report = Report::default();
    for file in &profile.files {
        let parked = parked_path(file, target);
        let live = file.exists();
        let shared = live && index::owner_of(config, file, target).is_some();

        if !parked.exists() {
            if !shared {
                report.issues.push(Issue {
                    severity: Severity::Error,
                    operation: Operation::Activate,
                    profile: target.to_string(),
                    file: Some(file.clone()),
                    message: "managed config file is missing".to_string(),
                    suggestion: Some(format!("expected {:?} to exist", parked.display().to_string())),
                });
            }
            continue;
        }

        if live && !shared && !force {
            report.issues.push(Issue {
                severity: Severity::Warning,
                operation: Operation::Activate,
                profile: target.to_string(),
                file: Some(file.clone()),
                message: "target path is occupied by an unmanaged file".to_string(),
                suggestion: Some("re-run with --force to overwrite it".to_string()),
            });
        }
    }
    Ok(report)
}

/// Validates deactivating every profile other than `active`.
///
/// A managed path that exists neither live nor parked is stale: a warning
/// suggesting its removal from the profile. Everything else — already
/// parked, live but shared with the active profile, or live and about to
/// be parked — raises no issue.
pub fn validate_deactivation(config: &Config, active: &str) -> Report {
    let mut report = Report::default();
    for (name, profile) in &config.profiles {
        if name == active {
            continue;
        }
        for file in &profile.files {
            let parked = parked_path(file, name);
            if !file.exists() && !parked.exists() {
                report.issues.push(Issue {
                    severity: Severity::Warning,
                    operation: Operation::Deactivate,
                    profile: name.clone(),
                    file: Some(file.clone()),
                    message: "path does not exist".to_string(),
                    suggestion: Some("consider removing it from the profile".to_string()),
                });
            }
        }
    }
    report
}

/// Validates a full switch to `target`: deactivation issues first, then
/// activation issues, in the order the engines will run.
pub fn validate_switch(config: &Config, target: &str, force: bool) -> Result<Report> {
    let activation = validate_activation(config, target, force)?;
    let mut report = validate_deactivation(config, target);
    report.issues.extend(activation.issues);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use crate::config::Profile;

    fn add_profile(config: &mut Config, name: &str, files: &[&Path]) {
        let profile = Profile {
            files: files.iter().map(PathBuf::from).collect(),
            ..Profile::default()
        };
        config.profiles.insert(name.to_string(), profile);
    }

    #[test]
    fn activation_of_unknown_profile_fails_immediately() {
        let config = Config::default();
        let err = validate_activation(&config, "nope", false).unwrap_err();

        assert!(matches!(err, SwitchError::ProfileNotFound(_)));
    }

    #[test]
    fn missing_parked_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("rc");

        let mut config = Config::default();
        add_profile(&mut config, "home", &[&file]);

        let report = validate_activation(&config, "home", false).unwrap();

        assert_eq!(report.error_count(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.operation, Operation::Activate);
        assert_eq!(issue.file.as_deref(), Some(file.as_path()));
    }

    #[test]
    fn parked_file_present_is_clean() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("rc");
        fs::write(parked_path(&file, "home"), "x").unwrap();

        let mut config = Config::default();
        add_profile(&mut config, "home", &[&file]);

        let report = validate_activation(&config, "home", false).unwrap();
        assert!(report.issues.is_empty());
    }

    #[test]
    fn unmanaged_occupant_is_a_warning() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("rc");
        fs::write(&file, "foreign").unwrap();
        fs::write(parked_path(&file, "home"), "x").unwrap();

        let mut config = Config::default();
        add_profile(&mut config, "home", &[&file]);

        let report = validate_activation(&config, "home", false).unwrap();

        assert!(!report.has_errors());
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn force_accepts_unmanaged_occupant_silently() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("rc");
        fs::write(&file, "foreign").unwrap();
        fs::write(parked_path(&file, "home"), "x").unwrap();

        let mut config = Config::default();
        add_profile(&mut config, "home", &[&file]);

        let report = validate_activation(&config, "home", true).unwrap();
        assert!(report.issues.is_empty());
    }

    #[test]
    fn live_file_shared_with_another_profile_is_clean() {
        // Shared path, live, no parked copy: the benign shared-file case.
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("gitconfig");
        fs::write(&file, "shared").unwrap();

        let mut config = Config::default();
        add_profile(&mut config, "work", &[&file]);
        add_profile(&mut config, "home", &[&file]);

        let report = validate_activation(&config, "home", false).unwrap();
        assert!(report.issues.is_empty());
    }

    #[test]
    fn deactivation_warns_about_vanished_paths() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone");

        let mut config = Config::default();
        add_profile(&mut config, "work", &[&gone]);
        add_profile(&mut config, "home", &[]);

        let report = validate_deactivation(&config, "home");

        assert_eq!(report.warning_count(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.operation, Operation::Deactivate);
        assert_eq!(issue.profile, "work");
    }

    #[test]
    fn deactivation_ignores_parked_and_live_files() {
        let dir = TempDir::new().unwrap();
        let parked_only = dir.path().join("parked");
        fs::write(parked_path(&parked_only, "work"), "x").unwrap();
        let live = dir.path().join("live");
        fs::write(&live, "x").unwrap();

        let mut config = Config::default();
        add_profile(&mut config, "work", &[&parked_only, &live]);
        add_profile(&mut config, "home", &[]);

        let report = validate_deactivation(&config, "home");
        assert!(report.issues.is_empty());
    }

    #[test]
    fn deactivation_skips_the_active_profile() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone");

        let mut config = Config::default();
        add_profile(&mut config, "work", &[&gone]);

        let report = validate_deactivation(&config, "work");
        assert!(report.issues.is_empty());
    }

    #[test]
    fn switch_report_is_the_union_of_both_halves() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone");
        let missing_parked = dir.path().join("rc");

        let mut config = Config::default();
        add_profile(&mut config, "work", &[&gone]);
        add_profile(&mut config, "home", &[&missing_parked]);

        let report = validate_switch(&config, "home", false).unwrap();

        assert!(report.has_errors());
        assert!(report.has_warnings());
        assert_eq!(report.issues.len(), 2);
        // Deactivation issues come first, matching execution order.
        assert_eq!(report.issues[0].operation, Operation::Deactivate);
        assert_eq!(report.issues[1].operation, Operation::Activate);
    }

    #[test]
    fn issue_renders_as_one_line() {
        let issue = Issue {
            severity: Severity::Error,
            operation: Operation::Activate,
            profile: "home".to_string(),
            file: Some(PathBuf::from("/tmp/rc")),
            message: "managed config file is missing".to_string(),
            suggestion: None,
        };

        assert_eq!(
            issue.to_string(),
            "[error:activate:home] managed config file is missing (file: \"/tmp/rc\")"
        );
    }
}
