//! Pre/post activation hooks.
//!
//! A hook is an argv list run with inherited standard streams, so its
//! output lands directly in the user's terminal. An empty argv is a no-op,
//! and hooks are skipped entirely during a dry run. A failing hook aborts
//! the activate flow; the caller reverts the active pointer but never the
//! file state.

use std::io;
use std::process::{Command, ExitStatus};

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("failed to run {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{command:?} exited unsuccessfully: {status}")]
    Failed { command: String, status: ExitStatus },
}

/// Runs a hook argv to completion.
pub fn run(argv: &[String], dry: bool) -> Result<(), HookError> {
    let Some((program, args)) = argv.split_first() else {
        return Ok(());
    };
    if dry {
        return Ok(());
    }

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| HookError::Spawn {
            command: program.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(HookError::Failed {
            command: program.clone(),
            status,
        })
    }
}
