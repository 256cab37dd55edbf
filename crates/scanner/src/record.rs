use std::path::PathBuf;
use std::sync::Arc;

use findrefs_resolver::Referent;

/// Which matching strategy produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Literal occurrence of the target's guid.
    Guid,
    /// Whole-word occurrence of the target's base name.
    ResourceName,
}

/// One referring file paired with the target it references.
///
/// Produced by concurrent scan tasks in no particular order; a file
/// referencing several targets yields one record per target.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub file: PathBuf,
    pub target: Arc<Referent>,
    pub kind: MatchKind,
}
