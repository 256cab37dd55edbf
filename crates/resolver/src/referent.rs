use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::corpus::{CorpusLister, ProjectLayout};
use crate::error::{ResolverError, Result};
use crate::meta::{read_asset_meta, META_SUFFIX};

/// Bonus subtracted from a candidate's score when its file name starts
/// with the search term.
const PREFIX_BONUS: i32 = 4;

/// Candidate file names ending in these can never themselves be a
/// referent (meta files describe assets, scene files are containers).
const RESERVED_SUFFIXES: &[&str] = &[META_SUFFIX, ".unity"];

/// A fully resolved search target: the asset being referred *to*.
///
/// Immutable once constructed. Scan engines share it behind an `Arc`
/// and never touch its fields; the only run-time mutable state lives in
/// the scanner's per-descriptor activity flags.
#[derive(Debug)]
pub struct Referent {
    path: PathBuf,
    guid: String,
    is_script: bool,
    is_resource: bool,
    base_name: OnceLock<String>,
}

impl Referent {
    /// Construct a descriptor directly from known attributes.
    pub fn new(path: PathBuf, guid: String, is_script: bool, is_resource: bool) -> Self {
        Self {
            path,
            guid,
            is_script,
            is_resource,
            base_name: OnceLock::new(),
        }
    }

    /// Resolve a raw search term against the corpus.
    ///
    /// Code-like terms (`.cs`/`.js`, or no extension at all) try the
    /// scripts shortcut directory first, then fall back to the full
    /// asset tree.
    pub fn resolve(
        term: &str,
        layout: &ProjectLayout,
        lister: &dyn CorpusLister,
    ) -> Result<Self> {
        let lc_term = term.to_lowercase();
        let looks_like_code =
            lc_term.ends_with(".cs") || lc_term.ends_with(".js") || !term.contains('.');

        let mut found = None;
        if looks_like_code {
            if let Some(scripts_dir) = &layout.scripts_dir {
                found = find_matching_file(term, scripts_dir, lister);
            }
        }
        let path = match found.or_else(|| find_matching_file(term, &layout.assets_dir, lister)) {
            Some(path) => path,
            None => return Err(ResolverError::NotFound(term.to_string())),
        };

        // Normalize so that descriptors resolved through different routes
        // compare equal and self-exclusion during scanning holds.
        let path = path.canonicalize().map_err(ResolverError::Io)?;

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let is_script = extension == "cs" || extension == "js";

        let meta = read_asset_meta(&path)?;
        let in_resources_dir = path
            .components()
            .any(|c| c.as_os_str().to_string_lossy() == "Resources");

        Ok(Self::new(
            path,
            meta.guid,
            is_script,
            in_resources_dir || meta.bundle.is_some(),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Token whose literal occurrence in a container file marks a
    /// reference to this asset.
    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn is_script(&self) -> bool {
        self.is_script
    }

    /// Whether the asset is loaded by name at runtime (lives under a
    /// `Resources/` directory or belongs to an asset bundle) and so
    /// needs name-based matching in addition to guid matching.
    pub fn is_resource(&self) -> bool {
        self.is_resource
    }

    /// File name without extension, used only for name-based matching.
    pub fn base_name(&self) -> &str {
        self.base_name.get_or_init(|| {
            self.path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }

    /// File name with extension, for user-facing messages.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Fuzzy filename search: collect corpus files whose lowercased path
/// contains the lowercased term, then pick the best-scoring file name.
///
/// Candidates are keyed by file name, last write wins, so a file name
/// occurring in several directories contributes a single candidate at
/// its first-seen position. The score is the file name length, with a
/// bonus for starting with the term; the strictly lowest score wins,
/// which keeps the earliest candidate on ties.
fn find_matching_file(term: &str, dir: &Path, lister: &dyn CorpusLister) -> Option<PathBuf> {
    // A term that is already a real path is the match outright.
    let as_path = Path::new(term);
    if as_path.is_file() {
        return Some(as_path.to_path_buf());
    }

    let lc_term = term.to_lowercase();
    let mut candidates: Vec<(String, PathBuf)> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for path in lister.list(dir) {
        let lc_path = path.to_string_lossy().to_lowercase();
        if RESERVED_SUFFIXES.iter().any(|s| lc_path.ends_with(s)) {
            continue;
        }
        if !lc_path.contains(&lc_term) {
            continue;
        }
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        log::debug!("candidate: {file_name} -- {}", path.display());
        match by_name.get(&file_name) {
            Some(&slot) => candidates[slot].1 = path,
            None => {
                by_name.insert(file_name.clone(), candidates.len());
                candidates.push((file_name, path));
            }
        }
    }

    let mut best: Option<(PathBuf, i32)> = None;
    for (file_name, path) in candidates {
        let mut score = file_name.len() as i32;
        if file_name.starts_with(term) {
            score -= PREFIX_BONUS;
        }
        if best.as_ref().is_none_or(|(_, s)| score < *s) {
            best = Some((path, score));
        }
    }

    best.map(|(path, _)| path)
}
