//! # findrefs Resolver
//!
//! Turns raw search terms into fully resolved asset targets.
//!
//! ## Pipeline
//!
//! ```text
//! Search terms
//!     │
//!     ├──> Referent Resolver (fuzzy filename match, scored)
//!     │      └─> Best-matching asset path
//!     │
//!     ├──> Meta Reader (sidecar .meta file)
//!     │      └─> guid + bundle membership
//!     │
//!     └──> Target Set Builder (dedupe by canonical path)
//!            └─> Referent set ready for scanning
//! ```

mod builder;
mod corpus;
mod error;
mod meta;
mod referent;

pub use builder::build_target_set;
pub use corpus::{CorpusLister, ProjectLayout, WalkLister};
pub use error::{ResolverError, Result};
pub use meta::{read_asset_meta, AssetMeta, META_SUFFIX};
pub use referent::Referent;
