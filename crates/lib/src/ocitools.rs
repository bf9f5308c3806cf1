//! Generating the OCI runtime configuration via `ocitools generate`.

use std::process::Command;

use anyhow::{Context, Result};
use camino::Utf8Path;
use fn_error_context::context;
use serde_json::Value;

use crate::executor::CommandExecutor;
use crate::keyvalue::parse_flag_value;
use crate::utils::write_json_pretty;

const OCITOOLS: &str = "ocitools";

/// File name of the runtime config template inside the output directory.
pub(crate) const CONFIG_TEMPLATE: &str = "config.json.template";

/// Build the `ocitools generate` commandline.
///
/// `config` is a space separated list of `--flag=value` options, e.g.
/// `"--cwd=/tmp --os=linux"`. Each is split into a flag and a value;
/// anything without `=` is logged and skipped.
pub fn ocitools_generate_argv(config: Option<&str>) -> Vec<String> {
    let mut argv: Vec<String> = [OCITOOLS, "generate", "--read-only"]
        .map(String::from)
        .to_vec();
    for item in config.unwrap_or_default().split_whitespace() {
        match parse_flag_value(item) {
            Ok((flag, value)) => argv.extend([flag.to_string(), value.to_string()]),
            Err(e) => tracing::warn!("{e}"),
        }
    }
    argv
}

/// Recursively order object keys so the output is stable.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        v => v,
    }
}

/// Adjust a freshly generated runtime config for use as a system container template.
fn templatize(mut config: Value) -> Result<Value> {
    let process = config
        .get_mut("process")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| anyhow::anyhow!("Generated config.json has no process object"))?;
    // System containers run under systemd, never on a terminal
    process.insert("terminal".into(), Value::Bool(false));
    Ok(sort_keys(config))
}

/// Run `ocitools generate` in a scratch directory and write the adjusted
/// result to `dest`.
#[context("Generating {dest}")]
pub(crate) fn generate_config_template(
    executor: &mut dyn CommandExecutor,
    config: Option<&str>,
    dest: &Utf8Path,
) -> Result<()> {
    let tempdir = tempfile::tempdir().context("Creating temporary directory")?;
    let argv = ocitools_generate_argv(config);
    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..]).current_dir(tempdir.path());
    executor
        .execute(&mut cmd)
        .context("ocitools generate failed")?;

    let generated = tempdir.path().join("config.json");
    let buf = std::fs::read(&generated)
        .with_context(|| format!("Reading {}", generated.display()))?;
    let config: Value = serde_json::from_slice(&buf).context("Parsing generated config.json")?;
    write_json_pretty(dest, &templatize(config)?)
}
