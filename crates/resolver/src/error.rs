use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolverError>;

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no asset matches search term: {0}")]
    NotFound(String),

    #[error("could not read sidecar meta for {}: {source}", .path.display())]
    MetaRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no guid field in sidecar meta for {}", .0.display())]
    MissingGuid(PathBuf),

    #[error("could not locate an Assets directory at or above {}", .0.display())]
    AssetsDirNotFound(PathBuf),
}
