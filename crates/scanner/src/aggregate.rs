use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use findrefs_resolver::Referent;

use crate::record::MatchRecord;

/// Targets with no match record across both scan passes, sorted by
/// path so repeated runs report them in a stable order.
pub fn unreferenced_targets(
    targets: &[Arc<Referent>],
    records: &[MatchRecord],
) -> Vec<Arc<Referent>> {
    let referenced: HashSet<&Path> = records.iter().map(|r| r.target.path()).collect();
    let mut unreferenced: Vec<Arc<Referent>> = targets
        .iter()
        .filter(|t| !referenced.contains(t.path()))
        .cloned()
        .collect();
    unreferenced.sort_by(|a, b| a.path().cmp(b.path()));
    unreferenced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MatchKind;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn target(path: &str) -> Arc<Referent> {
        Arc::new(Referent::new(
            PathBuf::from(path),
            "0000".to_string(),
            false,
            false,
        ))
    }

    #[test]
    fn only_matchless_targets_are_unreferenced() {
        let hit = target("/p/Assets/Hit.prefab");
        let missed = target("/p/Assets/Missed.prefab");
        let records = vec![MatchRecord {
            file: PathBuf::from("/p/Assets/scene.unity"),
            target: hit.clone(),
            kind: MatchKind::Guid,
        }];

        let unreferenced = unreferenced_targets(&[hit, missed.clone()], &records);
        assert_eq!(unreferenced.len(), 1);
        assert_eq!(unreferenced[0].path(), missed.path());
    }

    #[test]
    fn unreferenced_targets_are_sorted_by_path() {
        let zeta = target("/p/Assets/Zeta.mat");
        let alpha = target("/p/Assets/Alpha.mat");

        let unreferenced = unreferenced_targets(&[zeta, alpha], &[]);
        let paths: Vec<_> = unreferenced.iter().map(|t| t.path().to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/p/Assets/Alpha.mat"),
                PathBuf::from("/p/Assets/Zeta.mat"),
            ]
        );
    }

    #[test]
    fn a_record_from_either_pass_counts() {
        let resource = target("/p/Assets/Resources/Explosion.prefab");
        let records = vec![MatchRecord {
            file: PathBuf::from("/p/Assets/scene.unity"),
            target: resource.clone(),
            kind: MatchKind::ResourceName,
        }];

        assert!(unreferenced_targets(&[resource], &records).is_empty());
    }
}
