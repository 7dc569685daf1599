//! CLI interface for switchboard.
//!
//! Subcommands split into two groups:
//!
//! - `switchboard create|remove|clone|list` — profile lifecycle, no active
//!   profile needed.
//! - `switchboard activate|reload|file|hook` — operating on (or switching)
//!   the active profile.
//!
//! Engines return structured reports and errors; this module is the only
//! place they are rendered. Issues go to stderr, success lines to stdout.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use jiff::{Timestamp, tz::TimeZone};

use crate::config::{Config, ConfigStore};
use crate::{hooks, paths, switch};

/// switchboard — group config files into profiles and swap which one is live.
#[derive(Debug, Parser)]
#[command(name = "switchboard")]
pub struct Cli {
    /// Path to the config file (defaults to the user config directory).
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a profile. The first profile created becomes active.
    #[command(visible_alias = "c")]
    Create {
        /// Name of the profile to create.
        name: String,
    },

    /// Remove a profile. Its parked files are left on disk.
    #[command(visible_alias = "r")]
    Remove {
        /// Name of the profile to remove.
        name: String,
    },

    /// Activate a profile, swapping its files into place.
    ///
    /// Validates the whole switch first: errors block it, warnings block it
    /// unless --force is given. The previous profile's files are parked as
    /// `<file>.<profile>.disabled` next to their canonical paths.
    #[command(visible_alias = "a")]
    Activate {
        /// Name of the profile to activate.
        name: String,

        /// Overwrite unmanaged files occupying a target path. Destructive.
        #[arg(short, long)]
        force: bool,

        /// Run every check and report what would happen, touching nothing.
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Re-run the active profile's pre and post hooks.
    #[command(visible_alias = "re")]
    Reload {
        /// Report which hooks would run without running them.
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Clone a profile's file list and hooks under a new name.
    #[command(visible_alias = "cl")]
    Clone {
        /// Name of the new profile.
        new_name: String,

        /// Profile to clone (the active profile when omitted).
        source: Option<String>,
    },

    /// List all profiles.
    #[command(visible_alias = "l")]
    List,

    /// Manage the active profile's files.
    #[command(visible_alias = "f")]
    File {
        #[command(subcommand)]
        command: FileCommand,
    },

    /// Edit the active profile's activation hooks.
    #[command(visible_alias = "h")]
    Hook {
        #[command(subcommand)]
        command: HookCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Add a file to the active profile.
    ///
    /// The path is expanded (environment variables, `~`) and recorded as an
    /// absolute path. It must exist on disk.
    #[command(visible_alias = "a")]
    Add {
        /// Path to the file to add.
        path: String,
    },

    /// Remove a file from the active profile.
    #[command(visible_alias = "r")]
    Remove {
        /// Path to the file to remove.
        path: String,
    },

    /// List the active profile's files.
    #[command(visible_alias = "l")]
    List,
}

#[derive(Debug, Subcommand)]
pub enum HookCommand {
    /// Set the pre-activation command. No arguments clears it.
    Pre {
        /// Command and arguments to execute.
        #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
        command: Vec<String>,
    },

    /// Set the post-activation command. No arguments clears it.
    Post {
        /// Command and arguments to execute.
        #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
        command: Vec<String>,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();

    let store = match cli.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::new(
            ConfigStore::default_path().ok_or("could not determine config directory")?,
        ),
    };

    match cli.command {
        Command::Create { name } => cmd_create(&store, &name),
        Command::Remove { name } => cmd_remove(&store, &name),
        Command::Activate {
            name,
            force,
            dry_run,
        } => cmd_activate(&store, &name, force, dry_run),
        Command::Reload { dry_run } => cmd_reload(&store, dry_run),
        Command::Clone { new_name, source } => cmd_clone(&store, &new_name, source.as_deref()),
        Command::List => cmd_list(&store),
        Command::File { command } => match command {
            FileCommand::Add { path } => cmd_file_add(&store, &path),
            FileCommand::Remove { path } => cmd_file_remove(&store, &path),
            FileCommand::List => cmd_file_list(&store),
        },
        Command::Hook { command } => match command {
            HookCommand::Pre { command } => cmd_hook(&store, HookKind::Pre, command),
            HookCommand::Post { command } => cmd_hook(&store, HookKind::Post, command),
        },
    }
}

enum HookKind {
    Pre,
    Post,
}

fn cmd_create(store: &ConfigStore, name: &str) -> Result<(), String> {
    let mut config = load(store)?;
    config.add_profile(name).map_err(|e| e.to_string())?;
    save(store, &config)?;

    if config.active.as_deref() == Some(name) {
        println!("Profile {name:?} created and activated");
    } else {
        println!("Profile {name:?} created");
    }
    Ok(())
}

fn cmd_remove(store: &ConfigStore, name: &str) -> Result<(), String> {
    let mut config = load(store)?;
    config.remove_profile(name).map_err(|e| e.to_string())?;
    save(store, &config)?;

    println!("Profile {name:?} removed");
    Ok(())
}

fn cmd_activate(store: &ConfigStore, name: &str, force: bool, dry: bool) -> Result<(), String> {
    let started = Instant::now();
    let mut config = load(store)?;

    if config.active.as_deref() == Some(name) {
        return Err(format!("profile {name:?} is already active"));
    }

    // Repoint the active profile up front so hooks observe the new state;
    // any failure below restores it. Under dry-run nothing is persisted.
    let previous = config.active.clone();
    config.set_active(name).map_err(|e| e.to_string())?;
    if !dry {
        save(store, &config)?;
    }

    if let Err(err) = run_switch(&config, name, force, dry) {
        if !dry {
            config.active = previous;
            if let Err(save_err) = store.save(&config) {
                return Err(format!(
                    "{err} (and restoring the previous active profile failed: {save_err})"
                ));
            }
        }
        return Err(err);
    }

    if dry {
        println!("Dry run: would switch to profile {name:?} with no issues detected");
    } else {
        println!("Switched to profile {name:?} in {:?}", started.elapsed());
    }
    Ok(())
}

/// Pre hook → switch → post hook, rendering any validation issues.
fn run_switch(config: &Config, name: &str, force: bool, dry: bool) -> Result<(), String> {
    let profile = config
        .profiles
        .get(name)
        .ok_or_else(|| format!("profile {name:?} does not exist"))?;

    hooks::run(&profile.pre_activate, dry).map_err(|e| format!("pre-activate hook: {e}"))?;

    match switch::switch(config, name, force, dry) {
        Ok(report) => render_report(&report),
        Err(switch::SwitchError::Blocked(report)) => {
            render_report(&report);
            return Err(if report.has_errors() {
                "switch blocked by validation errors".to_string()
            } else {
                "switch blocked by warnings; re-run with --force to proceed anyway".to_string()
            });
        }
        Err(e) => return Err(e.to_string()),
    }

    hooks::run(&profile.post_activate, dry).map_err(|e| format!("post-activate hook: {e}"))?;
    Ok(())
}

fn cmd_reload(store: &ConfigStore, dry: bool) -> Result<(), String> {
    let config = load(store)?;
    let (name, profile) = config.active_profile().ok_or("no active profile")?;

    hooks::run(&profile.pre_activate, dry).map_err(|e| format!("pre-activate hook: {e}"))?;
    hooks::run(&profile.post_activate, dry).map_err(|e| format!("post-activate hook: {e}"))?;

    if dry {
        println!("Dry run: would reload hooks for profile {name:?}");
    } else {
        println!("Reloaded hooks for profile {name:?}");
    }
    Ok(())
}

fn cmd_clone(store: &ConfigStore, new_name: &str, source: Option<&str>) -> Result<(), String> {
    let mut config = load(store)?;
    config
        .clone_profile(new_name, source)
        .map_err(|e| e.to_string())?;
    save(store, &config)?;

    println!("Profile {new_name:?} created");
    Ok(())
}

fn cmd_list(store: &ConfigStore) -> Result<(), String> {
    let config = load(store)?;

    if config.profiles.is_empty() {
        println!("No profiles");
        return Ok(());
    }

    println!("Profiles:");
    for (name, profile) in &config.profiles {
        if config.active.as_deref() == Some(name.as_str()) {
            println!("  - {name:?} (active)");
        } else {
            let last = profile
                .last_activated_at
                .map_or_else(|| "never".to_string(), format_local);
            println!("  - {name:?} (last active: {last})");
        }
    }
    Ok(())
}

fn cmd_file_add(store: &ConfigStore, path: &str) -> Result<(), String> {
    let mut config = load(store)?;
    let path = paths::expand(path).map_err(|e| e.to_string())?;
    if !path.exists() {
        return Err(format!("path does not exist: {}", path.display()));
    }
    config.add_file(path.clone()).map_err(|e| e.to_string())?;
    let name = config.active.clone().unwrap_or_default();
    save(store, &config)?;

    println!(
        "Path {:?} added to profile {name:?}",
        path.display().to_string()
    );
    Ok(())
}

fn cmd_file_remove(store: &ConfigStore, path: &str) -> Result<(), String> {
    let mut config = load(store)?;
    let path = paths::expand(path).map_err(|e| e.to_string())?;
    config.remove_file(&path).map_err(|e| e.to_string())?;
    let name = config.active.clone().unwrap_or_default();
    save(store, &config)?;

    println!(
        "Path {:?} removed from profile {name:?}",
        path.display().to_string()
    );
    Ok(())
}

fn cmd_file_list(store: &ConfigStore) -> Result<(), String> {
    let config = load(store)?;
    let (name, profile) = config.active_profile().ok_or("no active profile")?;

    if profile.files.is_empty() {
        println!("Profile {name:?} manages no files");
        return Ok(());
    }

    println!("Paths in profile {name:?}:");
    for file in &profile.files {
        println!("  - {:?}", file.display().to_string());
    }
    Ok(())
}

fn cmd_hook(store: &ConfigStore, kind: HookKind, command: Vec<String>) -> Result<(), String> {
    let mut config = load(store)?;
    let (label, result) = match kind {
        HookKind::Pre => ("pre", config.set_pre_hook(command)),
        HookKind::Post => ("post", config.set_post_hook(command)),
    };
    result.map_err(|e| e.to_string())?;
    let name = config.active.clone().unwrap_or_default();
    save(store, &config)?;

    println!("{label}-activate hook updated for profile {name:?}");
    Ok(())
}

// ── Helpers ──

fn load(store: &ConfigStore) -> Result<Config, String> {
    store.load().map_err(|e| e.to_string())
}

fn save(store: &ConfigStore, config: &Config) -> Result<(), String> {
    store.save(config).map_err(|e| e.to_string())
}

fn render_report(report: &switch::Report) {
    for issue in &report.issues {
        eprintln!("{issue}");
        if let Some(suggestion) = &issue.suggestion {
            eprintln!("  suggestion: {suggestion}");
        }
    }
}

/// Renders a timestamp in the system time zone for listings.
fn format_local(ts: Timestamp) -> String {
    ts.to_zoned(TimeZone::system())
        .strftime("%Y-%m-%d %H:%M:%S")
        .to_string()
}
