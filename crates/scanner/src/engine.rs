use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use findrefs_resolver::Referent;
use regex::Regex;

use crate::error::{Result, ScanError};
use crate::extensions::ScanExtensions;
use crate::limits::acquire_scan_permit;
use crate::record::{MatchKind, MatchRecord};

/// Receives each match as it is found, before the run completes.
/// Implementations must tolerate calls from any scan task in any order.
pub trait MatchSink: Send + Sync {
    fn on_match(&self, record: &MatchRecord);
}

/// Discards notifications; callers then rely on [`Scanner::finish`].
impl MatchSink for () {
    fn on_match(&self, _record: &MatchRecord) {}
}

/// State shared by all scan tasks of a run. `targets` is read-only;
/// `active` and `records` are the only mutable pieces.
struct Shared {
    targets: Vec<Arc<Referent>>,
    active: Vec<AtomicBool>,
    records: Mutex<Vec<MatchRecord>>,
    first_match_only: bool,
    sink: Arc<dyn MatchSink>,
}

impl Shared {
    fn is_active(&self, idx: usize) -> bool {
        self.active[idx].load(Ordering::Acquire)
    }

    fn record(&self, idx: usize, record: MatchRecord) {
        if self.first_match_only && !self.active[idx].swap(false, Ordering::AcqRel) {
            // Another task claimed this target's first match meanwhile.
            return;
        }
        self.sink.on_match(&record);
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
    }
}

/// Word-boundary matcher for one resource target.
struct NameMatcher {
    idx: usize,
    word_re: Regex,
}

/// Runs the guid and resource-name scans over a corpus file set with a
/// bounded number of in-flight file reads.
///
/// Both scans run all scheduled tasks to completion; the only
/// short-circuit is per-target deactivation in first-match-only mode.
/// Any read failure aborts the run, so a clean report always means the
/// whole corpus was actually searched.
pub struct Scanner {
    shared: Arc<Shared>,
    extensions: ScanExtensions,
}

impl Scanner {
    pub fn new(
        targets: Vec<Arc<Referent>>,
        extensions: ScanExtensions,
        first_match_only: bool,
        sink: Arc<dyn MatchSink>,
    ) -> Self {
        let active = targets.iter().map(|_| AtomicBool::new(true)).collect();
        Self {
            shared: Arc::new(Shared {
                targets,
                active,
                records: Mutex::new(Vec::new()),
                first_match_only,
                sink,
            }),
            extensions,
        }
    }

    pub fn targets(&self) -> &[Arc<Referent>] {
        &self.shared.targets
    }

    /// Literal substring scan for every target's guid.
    pub async fn scan_for_guids(&self, files: &[PathBuf]) -> Result<()> {
        let mut tasks = Vec::new();
        for file in files {
            if !self.extensions.matches(file) {
                continue;
            }
            let shared = self.shared.clone();
            let file = file.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = acquire_scan_permit().await;
                scan_file_for_guids(&file, &shared).await
            }));
        }
        for task in tasks {
            task.await??;
        }
        Ok(())
    }

    /// Whole-word scan for the base names of resource targets. Assets
    /// loaded by name at runtime are referenced as text, so their guid
    /// never appears in the referring file.
    pub async fn scan_for_resource_names(&self, files: &[PathBuf]) -> Result<()> {
        let mut matchers = Vec::new();
        for (idx, target) in self.shared.targets.iter().enumerate() {
            if !target.is_resource() {
                continue;
            }
            let pattern = format!(r"\b{}\b", regex::escape(target.base_name()));
            let word_re = Regex::new(&pattern).map_err(|source| ScanError::NamePattern {
                name: target.base_name().to_string(),
                source,
            })?;
            matchers.push(NameMatcher { idx, word_re });
        }
        if matchers.is_empty() {
            return Ok(());
        }

        let matchers = Arc::new(matchers);
        let mut tasks = Vec::new();
        for file in files {
            if !self.extensions.matches(file) {
                continue;
            }
            let shared = self.shared.clone();
            let matchers = matchers.clone();
            let file = file.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = acquire_scan_permit().await;
                scan_file_for_names(&file, &shared, &matchers).await
            }));
        }
        for task in tasks {
            task.await??;
        }
        Ok(())
    }

    /// Take the accumulated match records. Call after both scans.
    pub fn finish(self) -> Vec<MatchRecord> {
        let mut records = self
            .shared
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *records)
    }
}

async fn scan_file_for_guids(file: &Path, shared: &Shared) -> Result<()> {
    if !(0..shared.targets.len()).any(|idx| shared.is_active(idx)) {
        // Every target already has its first match; nothing to read for.
        return Ok(());
    }
    let content = read_lossy(file).await?;
    let scanned = canonical_for_compare(file);

    for (idx, target) in shared.targets.iter().enumerate() {
        if !shared.is_active(idx) {
            continue;
        }
        // A file never counts as referencing itself.
        if scanned == target.path() {
            continue;
        }
        if !content.contains(target.guid()) {
            continue;
        }
        shared.record(
            idx,
            MatchRecord {
                file: file.to_path_buf(),
                target: target.clone(),
                kind: MatchKind::Guid,
            },
        );
    }
    Ok(())
}

async fn scan_file_for_names(
    file: &Path,
    shared: &Shared,
    matchers: &[NameMatcher],
) -> Result<()> {
    if !matchers.iter().any(|m| shared.is_active(m.idx)) {
        return Ok(());
    }
    let content = read_lossy(file).await?;
    let scanned = canonical_for_compare(file);

    for matcher in matchers {
        let target = &shared.targets[matcher.idx];
        if !shared.is_active(matcher.idx) {
            continue;
        }
        if scanned == target.path() {
            continue;
        }
        // Cheap substring probe first; the word-boundary pattern then
        // rejects names that only occur inside longer identifiers.
        if !content.contains(target.base_name()) {
            continue;
        }
        if !matcher.word_re.is_match(&content) {
            continue;
        }
        shared.record(
            matcher.idx,
            MatchRecord {
                file: file.to_path_buf(),
                target: target.clone(),
                kind: MatchKind::ResourceName,
            },
        );
    }
    Ok(())
}

/// Target paths are canonical, but explicitly listed scan files may be
/// relative or carry `..` components; normalize before the self check
/// so a target's own file is excluded however it was named.
fn canonical_for_compare(path: &Path) -> PathBuf {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Corpus files are treated as opaque text; binary containers are
/// lossily decoded rather than rejected.
async fn read_lossy(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ScanError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
