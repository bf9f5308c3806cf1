//! Helpers intended for [`std::process::Command`].

use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};

/// A child process exited unsuccessfully.
///
/// This is kept as a distinct type so callers can recover the original
/// exit status from an [`anyhow::Error`] chain via `downcast_ref`.
#[derive(Debug, thiserror::Error)]
#[error("Subprocess failed: {command}: {status}")]
pub struct ExternalProcessError {
    /// The full commandline, shell quoted
    pub command: String,
    /// How the child exited
    pub status: ExitStatus,
}

/// Helpers intended for [`std::process::Command`].
pub trait CommandRunExt {
    /// Log (at debug level) the full child commandline.
    fn log_debug(&mut self) -> &mut Self;

    /// Execute the child process with inherited stdio; an unsuccessful exit
    /// is returned as an [`ExternalProcessError`].
    fn run_inherited_with_cmd_context(&mut self) -> Result<()>;

    /// The program followed by its arguments.
    fn to_argv(&self) -> Vec<String>;

    /// Render the commandline in a form suitable for pasting into a shell.
    fn to_string_pretty(&self) -> String;
}

impl CommandRunExt for Command {
    fn log_debug(&mut self) -> &mut Self {
        match self.get_current_dir() {
            Some(dir) => tracing::debug!("exec (in {}): {}", dir.display(), self.to_string_pretty()),
            None => tracing::debug!("exec: {}", self.to_string_pretty()),
        }
        self
    }

    fn run_inherited_with_cmd_context(&mut self) -> Result<()> {
        let status = self
            .status()
            .with_context(|| format!("Spawning {}", self.to_string_pretty()))?;
        if status.success() {
            return Ok(());
        }
        Err(ExternalProcessError {
            command: self.to_string_pretty(),
            status,
        }
        .into())
    }

    fn to_argv(&self) -> Vec<String> {
        std::iter::once(self.get_program())
            .chain(self.get_args())
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }

    fn to_string_pretty(&self) -> String {
        let argv = self.to_argv();
        // Only fails on embedded NUL, which can't be spawned anyways
        shlex::try_join(argv.iter().map(|s| s.as_str())).unwrap_or_else(|_| argv.join(" "))
    }
}
