//! Comparison engine - Orchestrates one local-vs-Syncthing comparison
//!
//! Fetches the folder configuration and browse listing from a [`FolderIndex`],
//! walks the folder on disk, strips Syncthing's administrative entries and
//! computes the ordered set of paths Syncthing does not know about.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::filter::AdminEntries;
use crate::local::build_local_tree;
use crate::reconcile::{missing_entries, EntryFilter};
use crate::remote::build_remote_tree;
use crate::syncthing::FolderIndex;
use crate::tree::PathKey;

/// What to compare and how to filter the result
#[derive(Debug, Clone, Default)]
pub struct CompareRequest {
    pub folder_id: String,
    pub filter: EntryFilter,
    /// Keep the folder marker, `.stignore` and versions directory in the local tree
    pub show_admin: bool,
    /// Report entries Syncthing knows about that are missing on disk instead
    pub reverse: bool,
}

/// Results from a complete comparison
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub root: PathKey,
    pub local_entries: usize,
    pub remote_entries: usize,
    /// Unmatched entries in sorted order
    pub missing: Vec<PathKey>,
}

/// Run a full comparison for one folder
pub async fn compare(index: &dyn FolderIndex, request: &CompareRequest) -> Result<ComparisonReport> {
    let folder = index.folder_config(&request.folder_id).await?;
    let root = PathKey::root(&folder.path)?;

    let listing = index.browse(&request.folder_id).await?;
    let remote = build_remote_tree(&root, &listing)?;
    info!("Syncthing knows {} entries under {}", remote.len(), root);

    let mut local = build_local_tree(&root)?;
    info!("Found {} entries on disk under {}", local.len(), root);

    if request.show_admin {
        debug!("Keeping administrative entries in the local tree");
    } else {
        let admin = AdminEntries::resolve(&root, &folder.marker_name, folder.versions_path())?;
        admin.strip(&mut local)?;
    }

    let missing: Vec<PathKey> = if request.reverse {
        warn!("Reverse mode: listing entries Syncthing has that are not on disk. For debugging only.");
        missing_entries(&remote, &local, request.filter)
    } else {
        missing_entries(&local, &remote, request.filter)
    }
    .into_iter()
    .cloned()
    .collect();

    info!("{} entries are not in the Syncthing index", missing.len());

    Ok(ComparisonReport {
        local_entries: local.len(),
        remote_entries: remote.len(),
        root,
        missing,
    })
}
