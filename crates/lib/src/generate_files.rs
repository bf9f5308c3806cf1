//! The `generate-files` operation.

use std::os::unix::fs::PermissionsExt;

use anyhow::{Context, Result};
use camino::Utf8Path;
use fn_error_context::context;

use crate::cli::GenerateFilesOpts;
use crate::executor::CommandExecutor;
use crate::manifest::{ManifestDocument, MANIFEST_JSON};
use crate::ocitools::{generate_config_template, CONFIG_TEMPLATE};
use crate::templates::{self, INIT_SCRIPT, SERVICE_TEMPLATE};
use crate::utils::{write_file, write_json_pretty};

const SERVICE_FILE: &str = "service.template";
const INIT_FILE: &str = "init.sh";

fn write_init_script(path: &Utf8Path) -> Result<()> {
    write_file(path, &templates::render(INIT_SCRIPT, &tera::Context::new())?)?;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Setting permissions on {path}"))
}

/// Write `manifest.json`, `service.template`, `init.sh` and
/// `config.json.template` into the output directory, creating it if needed.
#[context("Generating files in {}", opts.output)]
pub(crate) fn generate_files(
    executor: &mut dyn CommandExecutor,
    opts: &GenerateFilesOpts,
) -> Result<()> {
    let output = sysbuildah_utils::ensure_directory(&opts.output)?;

    let manifest = ManifestDocument::from_defaults(opts.defaults.as_slice());
    write_json_pretty(&output.join(MANIFEST_JSON), &manifest)?;

    let mut ctx = tera::Context::new();
    ctx.insert("description", &opts.description);
    write_file(
        &output.join(SERVICE_FILE),
        &templates::render(SERVICE_TEMPLATE, &ctx)?,
    )?;

    write_init_script(&output.join(INIT_FILE))?;

    generate_config_template(
        executor,
        opts.config.as_deref(),
        &output.join(CONFIG_TEMPLATE),
    )?;
    tracing::info!("Generated system container files in {output}");
    Ok(())
}
