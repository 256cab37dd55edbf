use std::path::Path;
use std::sync::Arc;

use findrefs_resolver::Referent;

/// Container formats that can reference a script asset.
const SCRIPT_CONTAINER_EXTENSIONS: &[&str] = &["prefab", "unity", "asset"];

/// Broader container set scanned when any target is a non-script asset.
const ASSET_CONTAINER_EXTENSIONS: &[&str] = &[
    "asset",
    "controller",
    "mask",
    "mat",
    "overrideController",
    "prefab",
    "renderTexture",
    "unity",
    "xml",
];

const BINARY_EXTENSIONS: &[&str] = &["dll", "bin", "exe"];

/// The set of file extensions worth opening during a scan, derived once
/// per run from the shape of the target set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanExtensions {
    extensions: Vec<&'static str>,
}

impl ScanExtensions {
    /// Script references only ever appear in a few container formats;
    /// a target set that is all scripts gets the narrow set. Binary
    /// extensions are opt-in.
    pub fn for_targets(targets: &[Arc<Referent>], include_binary: bool) -> Self {
        let all_scripts = !targets.is_empty() && targets.iter().all(|t| t.is_script());
        let mut extensions: Vec<&'static str> = if all_scripts {
            SCRIPT_CONTAINER_EXTENSIONS.to_vec()
        } else {
            ASSET_CONTAINER_EXTENSIONS.to_vec()
        };
        if include_binary {
            extensions.extend_from_slice(BINARY_EXTENSIONS);
        }
        Self { extensions }
    }

    /// Whether a corpus file should be opened at all.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| *known == ext))
    }
}
