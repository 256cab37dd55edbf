use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    /// A corpus file could not be read. Skipping it would make the
    /// final report claim "unreferenced" on incomplete evidence, so
    /// this fails the run.
    #[error("could not read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid name pattern for {name}: {source}")]
    NamePattern {
        name: String,
        source: regex::Error,
    },

    #[error("scan task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
