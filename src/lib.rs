//! stfind - Find what Syncthing is ignoring
//!
//! stfind compares a Syncthing folder as it exists on disk with the folder
//! index Syncthing reports over its REST API, and lists every local path the
//! index does not contain. Those are the paths excluded by `.stignore`, found
//! without ever reading or interpreting the ignore rules.
//!
//! ## Modules
//!
//! - [`tree`]: Canonical path keys and the path-keyed tree
//! - [`local`]: Filesystem walk
//! - [`remote`]: Browse listing decoding and mirroring
//! - [`filter`]: Removal of `.stfolder`, `.stignore` and versions entries
//! - [`reconcile`]: Sorted set difference and entry-type filters
//! - [`report`]: Newline or NUL terminated output
//! - [`syncthing`]: REST API client
//! - [`compare`]: End-to-end comparison
//! - [`config`]: Configuration file loading

pub mod compare;
pub mod config;
pub mod error;
pub mod filter;
pub mod local;
pub mod reconcile;
pub mod remote;
pub mod report;
pub mod syncthing;
pub mod tree;

pub use compare::{compare, CompareRequest, ComparisonReport};
pub use config::Config;
pub use error::{ErrorKind, Result, StfindError};
pub use filter::AdminEntries;
pub use local::build_local_tree;
pub use reconcile::{missing_entries, EntryFilter};
pub use remote::{build_remote_tree, BrowseListing, BrowseNode};
pub use report::{Reporter, Terminator};
pub use syncthing::{FolderConfig, FolderIndex, SyncthingClient};
pub use tree::{EntryKind, PathKey, Tree};
