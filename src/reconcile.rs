//! Set difference between the local tree and Syncthing's tree

use crate::error::{Result, StfindError};
use crate::tree::{EntryKind, PathKey, Tree};

/// Which kinds of entry make it into the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryFilter {
    #[default]
    All,
    DirectoriesOnly,
    FilesOnly,
}

impl EntryFilter {
    /// Combine the two command-line switches, rejecting the conflicting pair
    pub fn from_flags(dirs_only: bool, files_only: bool) -> Result<Self> {
        match (dirs_only, files_only) {
            (true, true) => Err(StfindError::ConflictingFilters),
            (true, false) => Ok(Self::DirectoriesOnly),
            (false, true) => Ok(Self::FilesOnly),
            (false, false) => Ok(Self::All),
        }
    }

    pub fn admits(self, kind: EntryKind) -> bool {
        match self {
            Self::All => true,
            Self::DirectoriesOnly => kind.is_dir(),
            Self::FilesOnly => !kind.is_dir(),
        }
    }
}

/// Keys of `local` that `remote` does not hold, in sorted order
pub fn missing_entries<'a>(local: &'a Tree, remote: &Tree, filter: EntryFilter) -> Vec<&'a PathKey> {
    local
        .iter()
        .filter(|(_, kind)| filter.admits(*kind))
        .filter(|(key, _)| !remote.contains(key))
        .map(|(key, _)| key)
        .collect()
}
