use std::path::{Path, PathBuf};
use std::sync::Arc;

use findrefs_resolver::Referent;
use findrefs_scanner::{MatchKind, MatchRecord, MatchSink};
use serde::Serialize;

/// How paths are rendered for the user: forward slashes always,
/// relative to the invocation directory unless absolute output was
/// requested.
#[derive(Debug, Clone)]
pub struct PathStyle {
    absolute: bool,
    invoke_dir: PathBuf,
}

impl PathStyle {
    pub fn new(absolute: bool, invoke_dir: PathBuf) -> Self {
        Self {
            absolute,
            invoke_dir,
        }
    }

    pub fn render(&self, path: &Path) -> String {
        let shown = if self.absolute {
            path.to_path_buf()
        } else {
            relative_to(path, &self.invoke_dir)
        };
        shown.to_string_lossy().replace('\\', "/")
    }
}

/// Relative path from `base` to `path`, climbing with `..` where the
/// two diverge.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    if !path.is_absolute() {
        return path.to_path_buf();
    }
    let path_parts: Vec<_> = path.components().collect();
    let base_parts: Vec<_> = base.components().collect();
    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| *a == *b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base_parts.len() {
        out.push("..");
    }
    for part in &path_parts[common..] {
        out.push(part);
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Prints each match as it is found. stdout locks per line, which is
/// all the serialization concurrent scan tasks need.
pub struct PrintSink {
    style: PathStyle,
    detail: bool,
}

impl PrintSink {
    pub fn new(style: PathStyle, detail: bool) -> Self {
        Self { style, detail }
    }
}

impl MatchSink for PrintSink {
    fn on_match(&self, record: &MatchRecord) {
        match record.kind {
            MatchKind::Guid => {
                if self.detail {
                    println!(
                        "{} -> {}",
                        self.style.render(&record.file),
                        self.style.render(record.target.path())
                    );
                } else {
                    println!("{}", self.style.render(&record.file));
                }
            }
            MatchKind::ResourceName => {
                println!(
                    "possible match for {}: {}",
                    record.target.file_name(),
                    self.style.render(&record.file)
                );
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TargetReport {
    pub path: String,
    pub guid: String,
    pub is_script: bool,
    pub is_resource: bool,
}

#[derive(Debug, Serialize)]
pub struct MatchReport {
    pub file: String,
    pub target: String,
    pub kind: &'static str,
}

/// Machine-readable run summary emitted by `--json`.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub targets: Vec<TargetReport>,
    pub matches: Vec<MatchReport>,
    pub unreferenced: Vec<String>,
}

impl JsonReport {
    pub fn build(
        targets: &[Arc<Referent>],
        records: &[MatchRecord],
        unreferenced: &[Arc<Referent>],
        style: &PathStyle,
    ) -> Self {
        let targets = targets
            .iter()
            .map(|t| TargetReport {
                path: style.render(t.path()),
                guid: t.guid().to_string(),
                is_script: t.is_script(),
                is_resource: t.is_resource(),
            })
            .collect();

        // Records arrive in scan-task order; sort for stable output.
        let mut matches: Vec<MatchReport> = records
            .iter()
            .map(|r| MatchReport {
                file: style.render(&r.file),
                target: style.render(r.target.path()),
                kind: match r.kind {
                    MatchKind::Guid => "guid",
                    MatchKind::ResourceName => "resource-name",
                },
            })
            .collect();
        matches.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.target.cmp(&b.target)));

        let unreferenced = unreferenced
            .iter()
            .map(|t| style.render(t.path()))
            .collect();

        Self {
            targets,
            matches,
            unreferenced,
        }
    }
}
