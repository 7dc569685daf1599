//! Profile configuration: the model and its on-disk store.
//!
//! The whole configuration is one TOML file, by default at
//! `<config dir>/switchboard/config.toml`:
//!
//! ```text
//! active = "work"
//!
//! [profiles.work]
//! last-activated-at = "2026-08-05T09:12:44Z"
//! files = ["/home/me/.gitconfig"]
//! pre-activate = ["pkill", "-USR1", "some-daemon"]
//! ```
//!
//! `Config` is a plain in-memory value; every mutation here is pure.
//! Persistence goes through [`ConfigStore`], so the engines and tests can
//! work on configurations that never touch the real config directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Errors that can occur while loading, saving, or editing the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("profile {0:?} already exists")]
    ProfileAlreadyExists(String),

    #[error("profile {0:?} does not exist")]
    ProfileNotFound(String),

    #[error("no active profile; use \"switchboard activate <profile>\" to set one")]
    NoActiveProfile,

    #[error("path {path:?} is already managed in profile {profile:?}")]
    AlreadyManaged { path: PathBuf, profile: String },

    #[error("path {path:?} is not managed in profile {profile:?}")]
    NotManaged { path: PathBuf, profile: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = core::result::Result<T, ConfigError>;

/// The full configuration: which profile is active, and every profile.
///
/// Profiles are keyed by name in a `BTreeMap` so iteration order — and with
/// it ownership resolution during a switch — is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// The active profile's name. `None` when no profile is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,

    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

/// A named set of managed file paths plus activation hooks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Profile {
    /// When this profile was last activated. Unset until the first activation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activated_at: Option<Timestamp>,

    /// Absolute, already-expanded paths managed by this profile.
    #[serde(default)]
    pub files: Vec<PathBuf>,

    /// Argv to run before this profile's files are swapped in.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_activate: Vec<String>,

    /// Argv to run after this profile's files are swapped in.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_activate: Vec<String>,
}

impl Config {
    /// Adds an empty profile.
    ///
    /// The very first profile becomes active immediately, so a fresh install
    /// is usable without a separate activate step.
    pub fn add_profile(&mut self, name: &str) -> Result<()> {
        if self.profiles.contains_key(name) {
            return Err(ConfigError::ProfileAlreadyExists(name.to_string()));
        }
        let mut profile = Profile::default();
        if self.profiles.is_empty() {
            self.active = Some(name.to_string());
            profile.last_activated_at = Some(Timestamp::now());
        }
        self.profiles.insert(name.to_string(), profile);
        Ok(())
    }

    /// Removes a profile, clearing the active pointer if it was active.
    pub fn remove_profile(&mut self, name: &str) -> Result<()> {
        if self.profiles.remove(name).is_none() {
            return Err(ConfigError::ProfileNotFound(name.to_string()));
        }
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        Ok(())
    }

    /// Copies `source`'s files and hooks under a new name.
    ///
    /// Clones the active profile when `source` is `None`. The clone starts
    /// with an unset activation timestamp.
    pub fn clone_profile(&mut self, new_name: &str, source: Option<&str>) -> Result<()> {
        if self.profiles.contains_key(new_name) {
            return Err(ConfigError::ProfileAlreadyExists(new_name.to_string()));
        }
        let source = match source {
            Some(name) => name.to_string(),
            None => self.active.clone().ok_or(ConfigError::NoActiveProfile)?,
        };
        let original = self
            .profiles
            .get(&source)
            .ok_or_else(|| ConfigError::ProfileNotFound(source.clone()))?;
        let clone = Profile {
            last_activated_at: None,
            files: original.files.clone(),
            pre_activate: original.pre_activate.clone(),
            post_activate: original.post_activate.clone(),
        };
        self.profiles.insert(new_name.to_string(), clone);
        Ok(())
    }

    /// Repoints the active profile and stamps its activation time.
    pub fn set_active(&mut self, name: &str) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;
        profile.last_activated_at = Some(Timestamp::now());
        self.active = Some(name.to_string());
        Ok(())
    }

    /// The active profile's name and data, if one is active.
    pub fn active_profile(&self) -> Option<(&str, &Profile)> {
        let name = self.active.as_deref()?;
        let profile = self.profiles.get(name)?;
        Some((name, profile))
    }

    /// Adds a path to the active profile's file list.
    ///
    /// Expects an already-expanded absolute path; rejects duplicates within
    /// the profile. Sharing a path with *other* profiles is fine.
    pub fn add_file(&mut self, path: PathBuf) -> Result<()> {
        let name = self.active.clone().ok_or(ConfigError::NoActiveProfile)?;
        let profile = self
            .profiles
            .get_mut(&name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.clone()))?;
        if profile.files.contains(&path) {
            return Err(ConfigError::AlreadyManaged {
                path,
                profile: name,
            });
        }
        profile.files.push(path);
        Ok(())
    }

    /// Removes a path from the active profile's file list.
    pub fn remove_file(&mut self, path: &Path) -> Result<()> {
        let name = self.active.clone().ok_or(ConfigError::NoActiveProfile)?;
        let profile = self
            .profiles
            .get_mut(&name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.clone()))?;
        let before = profile.files.len();
        profile.files.retain(|f| f != path);
        if profile.files.len() == before {
            return Err(ConfigError::NotManaged {
                path: path.to_path_buf(),
                profile: name,
            });
        }
        Ok(())
    }

    /// Replaces the active profile's pre-activate hook. Empty argv clears it.
    pub fn set_pre_hook(&mut self, command: Vec<String>) -> Result<()> {
        let name = self.active.clone().ok_or(ConfigError::NoActiveProfile)?;
        let profile = self
            .profiles
            .get_mut(&name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.clone()))?;
        profile.pre_activate = command;
        Ok(())
    }

    /// Replaces the active profile's post-activate hook. Empty argv clears it.
    pub fn set_post_hook(&mut self, command: Vec<String>) -> Result<()> {
        let name = self.active.clone().ok_or(ConfigError::NoActiveProfile)?;
        let profile = self
            .profiles
            .get_mut(&name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.clone()))?;
        profile.post_activate = command;
        Ok(())
    }
}

/// Loads and saves the configuration at a fixed path.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The default config file path: `<config dir>/switchboard/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("switchboard").join("config.toml"))
    }

    /// Loads the configuration.
    ///
    /// A missing file is the empty configuration, so first runs need no
    /// setup step.
    pub fn load(&self) -> Result<Config> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(toml::from_str(&contents)?)
    }

    /// Saves the configuration, creating parent directories as needed.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}
