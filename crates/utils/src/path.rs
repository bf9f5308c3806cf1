//! Helpers for paths supplied by the user on the command line.

use std::io::ErrorKind;

use anyhow::{Context, Result};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use fn_error_context::context;

/// Replace a leading `~` component with the home directory of the invoking user.
fn expand_tilde(path: &Utf8Path) -> Result<Utf8PathBuf> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_owned());
    };
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Unable to find home directory"))?;
    let home = Utf8PathBuf::try_from(home).context("Home directory is not UTF-8")?;
    Ok(home.join(rest))
}

/// Expand `path` to a full path starting from the system root, with
/// `~` expanded and symbolic links resolved.
///
/// Like `realpath -m`, the path does not need to exist. Components are
/// applied one at a time: `..` drops the last resolved component, and each
/// prefix which exists is canonicalized before continuing.
pub fn resolve_path(path: &Utf8Path) -> Result<Utf8PathBuf> {
    let expanded = expand_tilde(path)?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = std::env::current_dir().context("Querying current directory")?;
        Utf8PathBuf::try_from(cwd)
            .context("Current directory is not UTF-8")?
            .join(expanded)
    };

    let mut resolved = Utf8PathBuf::new();
    for component in absolute.components() {
        match component {
            Utf8Component::ParentDir => {
                resolved.pop();
            }
            Utf8Component::CurDir => {}
            c => {
                resolved.push(c.as_str());
                if let Ok(real) = resolved.canonicalize_utf8() {
                    resolved = real;
                }
            }
        }
    }
    tracing::debug!("Expanded \"{path}\" to \"{resolved}\"");
    Ok(resolved)
}

/// Resolve `path` and create it as a directory if it is not already present.
///
/// Only the final component is created; a missing parent is an error.
#[context("Creating directory {path}")]
pub fn ensure_directory(path: &Utf8Path) -> Result<Utf8PathBuf> {
    let resolved = resolve_path(path)?;
    match std::fs::create_dir(&resolved) {
        Ok(()) => tracing::debug!("Created \"{resolved}\""),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            tracing::info!("The path \"{resolved}\" already exists. Using it.")
        }
        Err(e) => return Err(e.into()),
    }
    Ok(resolved)
}
