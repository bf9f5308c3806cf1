//! buildah specific manager.

use std::process::Command;

use anyhow::{Context, Result};
use camino::Utf8Path;

use super::{tar_name, ImageManager, InvocationOpts};
use crate::executor::CommandExecutor;

const BUILDAH: &str = "buildah";

/// Works with buildah.
#[derive(Debug, Default, Clone, Copy)]
pub struct Buildah;

impl Buildah {
    fn note_unsupported(opts: &InvocationOpts) {
        if opts.host.is_some() || opts.tlsverify {
            tracing::debug!("buildah does not support --host or --tlsverify; ignoring");
        }
    }
}

impl ImageManager for Buildah {
    fn build(
        &self,
        executor: &mut dyn CommandExecutor,
        opts: &InvocationOpts,
        path: &Utf8Path,
        tag: &str,
    ) -> Result<()> {
        tracing::debug!("buildah build will be used");
        Self::note_unsupported(opts);
        let mut cmd = Command::new(BUILDAH);
        cmd.args(["bud", "-t", tag, "."]).current_dir(path);
        executor
            .execute(&mut cmd)
            .with_context(|| format!("Can not build image {tag}"))
    }

    fn tar(
        &self,
        executor: &mut dyn CommandExecutor,
        opts: &InvocationOpts,
        image: &str,
        output_dir: Option<&Utf8Path>,
    ) -> Result<()> {
        tracing::debug!("buildah tar will be used");
        Self::note_unsupported(opts);
        let dir = output_dir.unwrap_or(Utf8Path::new("."));

        // Export the layers
        let archive = format!("docker-archive:{image}");
        let mut cmd = Command::new(BUILDAH);
        cmd.args(["push", image, archive.as_str()]).current_dir(dir);
        executor
            .execute(&mut cmd)
            .with_context(|| format!("Unable to export {image} to a tar"))?;

        // buildah writes the archive to the name portion of the reference
        let export_name = image.split_once(':').map_or(image, |(name, _)| name);
        let src = dir.join(export_name);
        let dest = dir.join(tar_name(image));
        std::fs::rename(&src, &dest).with_context(|| format!("Renaming {src} to {dest}"))?;
        tracing::debug!("Wrote {dest}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use super::*;
    use crate::executor::testutil::{exit_failure, RecordingExecutor};

    fn tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
        let td = tempfile::tempdir().unwrap();
        let p = Utf8PathBuf::try_from(td.path().to_path_buf()).unwrap();
        (td, p)
    }

    #[test]
    fn test_build() {
        let mut ex = RecordingExecutor::new();
        Buildah
            .build(&mut ex, &InvocationOpts::default(), Utf8Path::new("/srv/image"), "tag")
            .unwrap();
        assert_eq!(ex.only_argv(), ["buildah", "bud", "-t", "tag", "."]);
        assert_eq!(ex.calls[0].cwd.as_deref(), Some(Utf8Path::new("/srv/image")));
    }

    #[test]
    fn test_build_ignores_remote() {
        let mut ex = RecordingExecutor::new();
        let opts = InvocationOpts {
            host: Some("example.org".into()),
            tlsverify: true,
        };
        Buildah
            .build(&mut ex, &opts, Utf8Path::new("."), "tag")
            .unwrap();
        assert_eq!(ex.only_argv(), ["buildah", "bud", "-t", "tag", "."]);
    }

    #[test]
    fn test_tar() {
        let (_td, dir) = tempdir();
        // Fake what `buildah push` leaves behind
        let mut ex = RecordingExecutor::with_hook(|cmd| {
            let cwd = cmd.get_current_dir().unwrap();
            std::fs::write(cwd.join("output"), b"archive")?;
            Ok(())
        });
        Buildah
            .tar(&mut ex, &InvocationOpts::default(), "output:latest", Some(dir.as_path()))
            .unwrap();
        assert_eq!(
            ex.only_argv(),
            ["buildah", "push", "output:latest", "docker-archive:output:latest"]
        );
        assert_eq!(ex.calls[0].cwd.as_deref(), Some(dir.as_path()));
        assert!(!dir.join("output").exists());
        assert_eq!(
            std::fs::read(dir.join("output-latest.tar")).unwrap(),
            b"archive"
        );
    }

    #[test]
    fn test_tar_untagged() {
        let (_td, dir) = tempdir();
        let mut ex = RecordingExecutor::with_hook(|cmd| {
            let cwd = cmd.get_current_dir().unwrap();
            std::fs::write(cwd.join("plain"), b"archive")?;
            Ok(())
        });
        Buildah
            .tar(&mut ex, &InvocationOpts::default(), "plain", Some(dir.as_path()))
            .unwrap();
        assert_eq!(
            ex.only_argv(),
            ["buildah", "push", "plain", "docker-archive:plain"]
        );
        assert!(!dir.join("plain").exists());
        assert_eq!(std::fs::read(dir.join("plain.tar")).unwrap(), b"archive");
    }

    #[test]
    fn test_tar_missing_archive() {
        let (_td, dir) = tempdir();
        let mut ex = RecordingExecutor::new();
        let e = Buildah
            .tar(&mut ex, &InvocationOpts::default(), "output:latest", Some(dir.as_path()))
            .unwrap_err();
        assert!(format!("{e:#}").contains("Renaming"));
        assert!(!dir.join("output-latest.tar").exists());
    }

    #[test]
    fn test_tar_push_failure() {
        let (_td, dir) = tempdir();
        std::fs::write(dir.join("output"), b"stale").unwrap();
        let mut ex = RecordingExecutor::with_hook(|cmd| Err(exit_failure(cmd, 125)));
        let e = Buildah
            .tar(&mut ex, &InvocationOpts::default(), "output:latest", Some(dir.as_path()))
            .unwrap_err();
        let inner = e
            .downcast_ref::<sysbuildah_utils::ExternalProcessError>()
            .unwrap();
        assert_eq!(inner.status.code(), Some(125));
        // No rename is attempted after a failed push
        assert!(dir.join("output").exists());
        assert!(!dir.join("output-latest.tar").exists());
    }
}
