//! The system container `manifest.json`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::keyvalue::parse_key_value;

/// The manifest format version we generate.
pub const MANIFEST_VERSION: &str = "1.0";

/// File name of the manifest inside the output directory.
pub(crate) const MANIFEST_JSON: &str = "manifest.json";

/// Installable configuration defaults for a system container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    /// Always [`MANIFEST_VERSION`]
    pub version: String,
    /// Values used when the installer does not override them
    pub default_values: BTreeMap<String, String>,
}

impl Default for ManifestDocument {
    fn default() -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            default_values: BTreeMap::new(),
        }
    }
}

impl ManifestDocument {
    /// Build a manifest from `key=value` items.
    ///
    /// Malformed items are logged and skipped; when a key repeats the last
    /// value wins.
    pub fn from_defaults<S: AsRef<str>>(defaults: &[S]) -> Self {
        let mut manifest = Self::default();
        for item in defaults {
            match parse_key_value(item.as_ref()) {
                Ok((k, v)) => {
                    manifest.default_values.insert(k.to_string(), v.to_string());
                }
                Err(e) => tracing::warn!("{e}"),
            }
        }
        manifest
    }
}
