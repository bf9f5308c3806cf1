//! Helpers for writing generated files.

use anyhow::Result;
use camino::Utf8Path;
use fn_error_context::context;
use serde::Serialize;

/// Generated JSON files use an eight space indent.
const JSON_INDENT: &[u8] = b"        ";

/// Serialize `value` as indented JSON and write it to `path`.
#[context("Writing {path}")]
pub(crate) fn write_json_pretty<T: Serialize>(path: &Utf8Path, value: &T) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    std::fs::write(path, buf)?;
    Ok(())
}

/// Overwrite `path` with `contents`.
#[context("Writing {path}")]
pub(crate) fn write_file(path: &Utf8Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)?;
    tracing::debug!("Wrote {path}");
    Ok(())
}
