use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ResolverError, Result};

/// Suffix appended to an asset path to form its sidecar meta path.
pub const META_SUFFIX: &str = ".meta";

const GUID_FIELD: &str = "guid: ";
const BUNDLE_FIELD: &str = "assetBundleName:";

/// Attributes extracted from an asset's sidecar meta file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMeta {
    /// Unique identifier other assets use to reference this one.
    pub guid: String,
    /// Asset bundle the file belongs to, when assigned one.
    pub bundle: Option<String>,
}

/// Read `<asset_path>.meta` line by line and extract the guid and
/// bundle-name fields. The first occurrence of each field wins, and
/// reading stops as soon as both have been seen.
///
/// A meta file without a guid makes the asset unscannable, so that is a
/// hard error rather than a default.
pub fn read_asset_meta(asset_path: &Path) -> Result<AssetMeta> {
    let mut meta_path = asset_path.as_os_str().to_owned();
    meta_path.push(META_SUFFIX);

    let file = File::open(&meta_path).map_err(|source| ResolverError::MetaRead {
        path: asset_path.to_path_buf(),
        source,
    })?;

    let mut guid = None;
    let mut bundle = None;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| ResolverError::MetaRead {
            path: asset_path.to_path_buf(),
            source,
        })?;

        if let Some(rest) = line.strip_prefix(GUID_FIELD) {
            if guid.is_none() {
                guid = Some(rest.trim().to_string());
            }
        } else if let Some(rest) = line.strip_prefix(BUNDLE_FIELD) {
            let rest = rest.trim();
            if bundle.is_none() && !rest.is_empty() {
                bundle = Some(rest.to_string());
            }
        }

        if guid.is_some() && bundle.is_some() {
            break;
        }
    }

    match guid {
        Some(guid) if !guid.is_empty() => Ok(AssetMeta { guid, bundle }),
        _ => Err(ResolverError::MissingGuid(asset_path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn extracts_guid() {
        let temp = tempdir().unwrap();
        let asset = temp.path().join("Hero.prefab");
        fs::write(&asset, b"yaml").unwrap();
        fs::write(
            temp.path().join("Hero.prefab.meta"),
            "fileFormatVersion: 2\nguid: abc123def456\n",
        )
        .unwrap();

        let meta = read_asset_meta(&asset).unwrap();
        assert_eq!(meta.guid, "abc123def456");
        assert_eq!(meta.bundle, None);
    }

    #[test]
    fn extracts_bundle_name_and_stops_after_both_fields() {
        let temp = tempdir().unwrap();
        let asset = temp.path().join("Music.ogg");
        fs::write(&asset, b"").unwrap();
        fs::write(
            temp.path().join("Music.ogg.meta"),
            "guid: 0011aabb\nassetBundleName: audio\nguid: should-not-overwrite\n",
        )
        .unwrap();

        let meta = read_asset_meta(&asset).unwrap();
        assert_eq!(meta.guid, "0011aabb");
        assert_eq!(meta.bundle, Some("audio".to_string()));
    }

    #[test]
    fn first_guid_line_wins() {
        let temp = tempdir().unwrap();
        let asset = temp.path().join("Doubled.prefab");
        fs::write(&asset, b"").unwrap();
        fs::write(
            temp.path().join("Doubled.prefab.meta"),
            "guid: first11\nguid: second2\n",
        )
        .unwrap();

        let meta = read_asset_meta(&asset).unwrap();
        assert_eq!(meta.guid, "first11");
    }

    #[test]
    fn empty_bundle_name_is_not_bundled() {
        let temp = tempdir().unwrap();
        let asset = temp.path().join("Icon.png");
        fs::write(&asset, b"").unwrap();
        fs::write(
            temp.path().join("Icon.png.meta"),
            "guid: ff00ff00\nassetBundleName: \n",
        )
        .unwrap();

        let meta = read_asset_meta(&asset).unwrap();
        assert_eq!(meta.bundle, None);
    }

    #[test]
    fn missing_guid_is_an_error() {
        let temp = tempdir().unwrap();
        let asset = temp.path().join("Broken.mat");
        fs::write(&asset, b"").unwrap();
        fs::write(temp.path().join("Broken.mat.meta"), "fileFormatVersion: 2\n").unwrap();

        let err = read_asset_meta(&asset).unwrap_err();
        assert!(matches!(err, ResolverError::MissingGuid(_)));
    }

    #[test]
    fn missing_meta_file_is_an_error() {
        let temp = tempdir().unwrap();
        let asset = temp.path().join("NoMeta.prefab");
        fs::write(&asset, b"").unwrap();

        let err = read_asset_meta(&asset).unwrap_err();
        assert!(matches!(err, ResolverError::MetaRead { .. }));
    }
}
