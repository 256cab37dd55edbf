use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::corpus::{CorpusLister, ProjectLayout};
use crate::error::Result;
use crate::meta::META_SUFFIX;
use crate::referent::Referent;

/// Resolve raw search terms into a deduplicated target set.
///
/// Terms naming sidecar meta files are dropped up front (the asset, not
/// its meta, is the referent). Any unresolvable term fails the whole
/// run; a partial target set would silently understate references.
/// Distinct terms resolving to the same file collapse to one target.
pub fn build_target_set(
    terms: &[String],
    layout: &ProjectLayout,
    lister: &dyn CorpusLister,
) -> Result<Vec<Arc<Referent>>> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut targets = Vec::new();

    for term in terms {
        if term.ends_with(META_SUFFIX) {
            log::debug!("skipping meta term: {term}");
            continue;
        }
        let referent = Referent::resolve(term, layout, lister)?;
        if seen.insert(referent.path().to_path_buf()) {
            targets.push(Arc::new(referent));
        } else {
            log::debug!("term {term} resolved to an already-known target");
        }
    }

    Ok(targets)
}
