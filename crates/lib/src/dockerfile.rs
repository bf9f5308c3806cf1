//! The `generate-dockerfile` operation.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use camino::Utf8Path;
use fn_error_context::context;
use serde::Serialize;

use crate::cli::GenerateDockerfileOpts;
use crate::keyvalue::parse_key_value;
use crate::templates::{self, DOCKERFILE};
use crate::utils::write_file;

/// A file shipped in the image and installed on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct HostFile {
    /// Path in the build context
    local: String,
    /// Absolute destination on the host
    host: String,
}

/// Parsed `--add-file` entries.
#[derive(Debug, Default, PartialEq, Eq)]
struct HostFiles {
    files: Vec<HostFile>,
    dirs: BTreeSet<String>,
}

impl HostFiles {
    /// Parse `local=host` items. A repeated local file keeps its last host path.
    fn parse<S: AsRef<str>>(items: &[S]) -> Self {
        let mut by_local = BTreeMap::new();
        for item in items {
            match parse_key_value(item.as_ref()) {
                Ok((local, host)) => {
                    by_local.insert(local.to_string(), host.to_string());
                }
                Err(e) => tracing::warn!("{e}"),
            }
        }
        let dirs = by_local
            .values()
            .map(|host| {
                Utf8Path::new(host)
                    .parent()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default()
            })
            .collect();
        let files = by_local
            .into_iter()
            .map(|(local, host)| HostFile { local, host })
            .collect();
        Self { files, dirs }
    }
}

/// Render the Dockerfile for `opts`.
fn render(opts: &GenerateDockerfileOpts) -> Result<String> {
    let host_files = HostFiles::parse(opts.add_file.as_slice());
    let mut ctx = tera::Context::new();
    ctx.insert("from_base", &opts.from_base);
    ctx.insert("name", &opts.name);
    ctx.insert("maintainer", &opts.maintainer);
    ctx.insert("license_name", &opts.license);
    ctx.insert("summary", &opts.summary);
    ctx.insert("version", &opts.version);
    ctx.insert("help_text", &opts.help_text);
    ctx.insert("architecture", &opts.architecture);
    ctx.insert("scope", &opts.scope);
    ctx.insert("add_files", &host_files.files);
    ctx.insert("hostfs_dirs", &host_files.dirs);
    templates::render(DOCKERFILE, &ctx)
}

/// Write a `Dockerfile` for a system container image into the output
/// directory, creating it if needed.
#[context("Generating Dockerfile for {}", opts.name)]
pub(crate) fn generate_dockerfile(opts: &GenerateDockerfileOpts) -> Result<()> {
    let contents = render(opts)?;
    let output = sysbuildah_utils::ensure_directory(&opts.output)?;
    let path = output.join("Dockerfile");
    write_file(&path, &contents)?;
    tracing::info!("Wrote {path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use indoc::indoc;

    use super::*;
    use crate::cli::Scope;

    fn opts(output: Utf8PathBuf) -> GenerateDockerfileOpts {
        GenerateDockerfileOpts {
            output,
            from_base: "centos:latest".into(),
            maintainer: "UNKNOWN".into(),
            license: "UNKNOWN".into(),
            summary: "UNKNOWN".into(),
            version: "1".into(),
            help_text: "No help".into(),
            architecture: "x86_64".into(),
            scope: Scope::Private,
            add_file: Vec::new(),
            name: "myimage".into(),
        }
    }

    #[test]
    fn test_parse_host_files() {
        let parsed = HostFiles::parse(&[
            "b=/etc/b.conf",
            "bad",
            "a=/etc/a.conf",
            "c=/usr/lib/c",
            "x=y=z",
        ]);
        assert_eq!(
            parsed.files,
            [
                HostFile {
                    local: "a".into(),
                    host: "/etc/a.conf".into()
                },
                HostFile {
                    local: "b".into(),
                    host: "/etc/b.conf".into()
                },
                HostFile {
                    local: "c".into(),
                    host: "/usr/lib/c".into()
                },
            ]
        );
        assert_eq!(
            parsed.dirs.into_iter().collect::<Vec<_>>(),
            ["/etc", "/usr/lib"]
        );
    }

    #[test]
    fn test_render_defaults() {
        let r = render(&opts(".".into())).unwrap();
        similar_asserts::assert_eq!(
            r.trim_end(),
            indoc! {r#"
                FROM centos:latest

                LABEL name="myimage" \
                      maintainer="UNKNOWN" \
                      license="UNKNOWN" \
                      summary="UNKNOWN" \
                      version="1" \
                      help="No help" \
                      architecture="x86_64" \
                      atomic.type="system" \
                      distribution-scope="private"

                COPY manifest.json service.template config.json.template /exports/
                COPY init.sh /usr/bin/init.sh

                CMD ["/usr/bin/init.sh"]
            "#}
            .trim_end()
        );
    }

    #[test]
    fn test_render_host_files() {
        let mut o = opts(".".into());
        o.scope = Scope::AuthoritativeSourceOnly;
        o.from_base = "registry.example.com/base:42".into();
        o.add_file = vec!["a.conf=/etc/app/a.conf".into(), "b.conf=/etc/app/b.conf".into()];
        let r = render(&o).unwrap();
        assert!(r.starts_with("FROM registry.example.com/base:42\n"));
        assert!(r.contains("distribution-scope=\"authoritative-source-only\"\n"));
        assert!(r.contains(indoc! {"
            RUN mkdir -p /exports/hostfs/etc/app
            COPY a.conf /exports/hostfs/etc/app/a.conf
            COPY b.conf /exports/hostfs/etc/app/b.conf
            COPY manifest.json
        "}
        .trim_end()));
        assert_eq!(r.matches("RUN mkdir").count(), 1);
    }

    #[test]
    fn test_generate_dockerfile() {
        let td = tempfile::tempdir().unwrap();
        let output = Utf8PathBuf::try_from(td.path().join("out")).unwrap();
        generate_dockerfile(&opts(output.clone())).unwrap();
        let written = std::fs::read_to_string(output.join("Dockerfile")).unwrap();
        assert_eq!(written, render(&opts(output)).unwrap());
    }
}
