//! # findrefs Scanner
//!
//! Concurrent reference scanning over an asset corpus.
//!
//! ## Pipeline
//!
//! ```text
//! Target set + corpus files
//!     │
//!     ├──> Extension filter (narrow for script-only target sets)
//!     │
//!     ├──> Guid scan (literal substring, one bounded task per file)
//!     │      └─> Match records
//!     │
//!     ├──> Resource-name scan (whole-word, resource targets only)
//!     │      └─> Match records
//!     │
//!     └──> Aggregation (unreferenced targets, sorted by path)
//! ```
//!
//! The only state shared across scan tasks is the per-target activity
//! flags and the locked record list; targets themselves are immutable.

mod aggregate;
mod engine;
mod error;
mod extensions;
mod limits;
mod record;

pub use aggregate::unreferenced_targets;
pub use engine::{MatchSink, Scanner};
pub use error::{Result, ScanError};
pub use extensions::ScanExtensions;
pub use record::{MatchKind, MatchRecord};
