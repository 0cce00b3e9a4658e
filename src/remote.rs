//! Syncthing side of the comparison
//!
//! `/rest/db/browse` returns nested JSON objects for directories. Any other
//! value is a file; its contents (modification time and size on current
//! Syncthing versions) are carried but never inspected.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::tree::{EntryKind, PathKey, Tree};

/// Children of one directory in a browse listing, keyed by name
pub type BrowseListing = BTreeMap<String, BrowseNode>;

/// One entry of a browse listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BrowseNode {
    Directory(BrowseListing),
    File(serde_json::Value),
}

/// Build the tree of everything Syncthing knows under `root`, including `root` itself
pub fn build_remote_tree(root: &PathKey, listing: &BrowseListing) -> Result<Tree> {
    let mut tree = Tree::new();
    mirror_directory(root, listing, &mut tree)?;
    debug!("Browse listing for {} holds {} entries", root, tree.len());
    Ok(tree)
}

fn mirror_directory(dir: &PathKey, children: &BrowseListing, tree: &mut Tree) -> Result<()> {
    tree.insert(dir.clone(), EntryKind::Directory)?;

    for (name, node) in children {
        let child = dir.join(name);
        match node {
            BrowseNode::Directory(grandchildren) => mirror_directory(&child, grandchildren, tree)?,
            BrowseNode::File(_) => tree.insert(child, EntryKind::File)?,
        }
    }

    Ok(())
}
