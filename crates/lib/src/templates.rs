//! Template bodies for the generated files, rendered with tera.

use std::sync::OnceLock;

use anyhow::{Context as _, Result};
use fn_error_context::context;
use tera::{Context, Tera};

/// The Dockerfile of a system container image.
pub(crate) const DOCKERFILE: &str = "Dockerfile.j2";
/// The systemd unit installed for the container.
pub(crate) const SERVICE_TEMPLATE: &str = "service.template.j2";
/// The init script run inside the container.
pub(crate) const INIT_SCRIPT: &str = "init.sh.j2";

const TEMPLATES: &[(&str, &str)] = &[
    (DOCKERFILE, include_str!("templates/Dockerfile.j2")),
    (SERVICE_TEMPLATE, include_str!("templates/service.template.j2")),
    (INIT_SCRIPT, include_str!("templates/init.sh.j2")),
];

fn build_engine() -> Result<Tera> {
    let mut tera = Tera::default();
    // Output is shell and unit files, not HTML
    tera.autoescape_on(vec![]);
    tera.add_raw_templates(TEMPLATES.iter().copied())
        .context("Parsing templates")?;
    Ok(tera)
}

/// The builtin templates, parsed on first use.
fn engine() -> Result<&'static Tera> {
    static ENGINE: OnceLock<Tera> = OnceLock::new();
    if let Some(tera) = ENGINE.get() {
        return Ok(tera);
    }
    let tera = build_engine()?;
    Ok(ENGINE.get_or_init(|| tera))
}

/// Render the named builtin template.
#[context("Rendering {name}")]
pub(crate) fn render(name: &str, context: &Context) -> Result<String> {
    Ok(engine()?.render(name, context)?)
}
