//! Local filesystem side of the comparison
//!
//! Walks the folder with `std::fs::read_dir`. Each directory is read in full
//! and closed before any child is visited, so only one directory handle is
//! open at a time however deep the tree goes. Symlinks are recorded as files
//! and never followed, matching how Syncthing treats them. Names are kept as
//! raw OS strings.

use std::fs;

use tracing::debug;

use crate::error::{Result, StfindError};
use crate::tree::{EntryKind, PathKey, Tree};

/// Build the tree of everything on disk under `root`, including `root` itself
///
/// A directory that cannot be read at any depth aborts the whole walk.
pub fn build_local_tree(root: &PathKey) -> Result<Tree> {
    let mut tree = Tree::new();
    let mut pending = vec![root.clone()];

    while let Some(dir) = pending.pop() {
        let children = read_children(&dir)?;
        tree.insert(dir, EntryKind::Directory)?;

        for (child, kind) in children {
            match kind {
                EntryKind::Directory => pending.push(child),
                EntryKind::File => tree.insert(child, EntryKind::File)?,
            }
        }
    }

    debug!("Local walk of {} found {} entries", root, tree.len());
    Ok(tree)
}

/// Every child of `dir` with its kind; the directory handle is closed on return
fn read_children(dir: &PathKey) -> Result<Vec<(PathKey, EntryKind)>> {
    let read_dir_error = |source: std::io::Error| StfindError::ReadDir {
        path: dir.as_path().to_path_buf(),
        source,
    };

    let mut children = Vec::new();
    for entry in fs::read_dir(dir.as_path()).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let kind = if entry.file_type().map_err(read_dir_error)?.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        children.push((dir.join(entry.file_name()), kind));
    }
    Ok(children)
}
