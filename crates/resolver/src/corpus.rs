use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ResolverError, Result};

/// Source of candidate file paths for resolution and scanning.
///
/// Abstracted so tests can supply a fixed file list instead of touching
/// the filesystem.
pub trait CorpusLister {
    fn list(&self, root: &Path) -> Vec<PathBuf>;
}

/// Plain recursive directory walk. Not gitignore-aware on purpose: the
/// corpus is an asset tree, not a source tree.
///
/// Enumeration errors are logged and non-fatal: an unreadable directory
/// entry never yields a scannable path in the first place. This is
/// distinct from scan-time reads, where a failure on an enumerated file
/// aborts the run.
pub struct WalkLister;

impl CorpusLister for WalkLister {
    fn list(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => log::warn!("failed to read directory entry: {e}"),
            }
        }
        files
    }
}

/// Where the asset corpus lives, discovered once and passed explicitly
/// into resolution instead of being read from ambient state.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Root of the asset tree (`<project>/Assets`).
    pub assets_dir: PathBuf,
    /// Optional shortcut directory searched first for code-like terms.
    pub scripts_dir: Option<PathBuf>,
}

impl ProjectLayout {
    /// Walk upward from `start` until a directory containing `Assets/`
    /// is found.
    pub fn discover(start: &Path) -> Result<Self> {
        let mut dir = start
            .canonicalize()
            .map_err(ResolverError::Io)?;
        loop {
            let assets = dir.join("Assets");
            if assets.is_dir() {
                let scripts = assets.join("Scripts");
                return Ok(Self {
                    scripts_dir: scripts.is_dir().then_some(scripts),
                    assets_dir: assets,
                });
            }
            if !dir.pop() {
                return Err(ResolverError::AssetsDirNotFound(start.to_path_buf()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn discovers_assets_dir_from_nested_directory() {
        let temp = tempdir().unwrap();
        let scripts = temp.path().join("Assets").join("Scripts");
        let nested = temp.path().join("Library").join("Cache");
        fs::create_dir_all(&scripts).unwrap();
        fs::create_dir_all(&nested).unwrap();

        let layout = ProjectLayout::discover(&nested).unwrap();
        assert!(layout.assets_dir.ends_with("Assets"));
        assert!(layout.scripts_dir.is_some());
    }

    #[test]
    fn scripts_dir_is_optional() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("Assets")).unwrap();

        let layout = ProjectLayout::discover(temp.path()).unwrap();
        assert_eq!(layout.scripts_dir, None);
    }

    #[test]
    fn missing_assets_dir_is_an_error() {
        let temp = tempdir().unwrap();

        let err = ProjectLayout::discover(temp.path()).unwrap_err();
        assert!(matches!(err, ResolverError::AssetsDirNotFound(_)));
    }

    #[test]
    fn walk_lister_returns_files_only() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("a.prefab"), b"").unwrap();
        fs::write(temp.path().join("sub").join("b.mat"), b"").unwrap();

        let mut files = WalkLister.list(temp.path());
        files.sort();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.prefab"));
        assert!(files[1].ends_with("sub/b.mat"));
    }
}
