//! Removal of Syncthing's own bookkeeping entries from the local tree
//!
//! Syncthing never lists its folder marker, `.stignore` or the versions
//! directory in the browse listing, so they would always show up as missing.

use std::path::MAIN_SEPARATOR;

use tracing::debug;

use crate::error::{Result, StfindError};
use crate::tree::{PathKey, Tree};

/// Ignore-rule file at the root of every folder
pub const IGNORE_FILE: &str = ".stignore";

/// Versions directory used when versioning gives no explicit path
pub const DEFAULT_VERSIONS_DIR: &str = ".stversions";

/// Resolved absolute keys of the administrative entries of one folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminEntries {
    pub marker: PathKey,
    pub ignore_file: PathKey,
    pub versions_root: PathKey,
}

impl AdminEntries {
    /// Resolve the administrative entries for a folder rooted at `root`
    ///
    /// `versions_spec` may be empty (default name), a bare name (relative to
    /// the root) or an absolute path.
    pub fn resolve(root: &PathKey, marker_name: &str, versions_spec: &str) -> Result<Self> {
        let versions_spec = if versions_spec.is_empty() {
            DEFAULT_VERSIONS_DIR
        } else {
            versions_spec
        };

        // A bare name always resolves below the root, which is never too short
        let versions_root = if versions_spec.contains(MAIN_SEPARATOR) {
            let trimmed = versions_spec.trim_end_matches(MAIN_SEPARATOR);
            if trimmed.len() < 2 {
                return Err(StfindError::VersionsPathTooShort {
                    path: trimmed.to_string(),
                    configured: versions_spec.to_string(),
                });
            }
            PathKey::from_raw(trimmed)
        } else {
            root.join(versions_spec)
        };

        Ok(Self {
            marker: root.join(marker_name),
            ignore_file: root.join(IGNORE_FILE),
            versions_root,
        })
    }

    /// Strip the administrative entries from `tree` in place
    ///
    /// The folder marker must be present; the ignore file and the versions
    /// directory are optional.
    pub fn strip(&self, tree: &mut Tree) -> Result<()> {
        if tree.remove(&self.marker).is_none() {
            return Err(StfindError::MarkerNotFound {
                path: self.marker.to_string(),
            });
        }
        let marker_contents = tree.remove_descendants(&self.marker);

        let ignore_file = tree.remove(&self.ignore_file).is_some();

        let versions_root = tree.remove(&self.versions_root).is_some();
        let versions = tree.remove_descendants(&self.versions_root);

        debug!(
            "Removed marker {} (+{} inside), ignore file: {}, versions root: {} (+{} inside)",
            self.marker, marker_contents, ignore_file, versions_root, versions
        );
        Ok(())
    }
}
