//! Scoped change of the process working directory.
//!
//! The working directory is process global state; nothing here is safe to
//! use from more than one thread at a time. Where possible prefer
//! [`std::process::Command::current_dir`], which leaves the parent untouched;
//! the image managers all do, so this is only for callers that must run
//! in-process code from another directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use camino::Utf8Path;
use fn_error_context::context;

/// Guard which moves back to the original working directory when dropped.
#[derive(Debug)]
#[must_use = "the original directory is restored as soon as this is dropped"]
pub struct Pushd {
    original: PathBuf,
}

impl Pushd {
    /// Change the working directory to `path`, remembering where we were.
    #[context("Changing directory to {path}")]
    pub fn new(path: &Utf8Path) -> Result<Self> {
        let original = std::env::current_dir().context("Querying current directory")?;
        tracing::info!("Original dir: \"{}\". Moving to \"{path}\"", original.display());
        std::env::set_current_dir(path)?;
        Ok(Self { original })
    }
}

impl Drop for Pushd {
    fn drop(&mut self) {
        tracing::info!("Moving back to \"{}\"", self.original.display());
        if let Err(e) = std::env::set_current_dir(&self.original) {
            tracing::warn!("Failed to restore working directory: {e}");
        }
    }
}

/// Run `f` with `path` as the working directory; the previous directory is
/// restored on every exit path, including errors and panics.
pub fn with_working_directory<T, F>(path: &Utf8Path, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let _guard = Pushd::new(path)?;
    f()
}
