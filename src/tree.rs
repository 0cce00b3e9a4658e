//! Canonical path keys and the path-keyed tree shared by both sides of a comparison
//!
//! Every key is an absolute path built with the host separator only. Keys hold
//! the raw OS string, so names that are not valid UTF-8 survive unchanged.
//! The local walker and the Syncthing browse listing both produce keys through
//! [`PathKey::join`], so the two key spaces line up exactly.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

use crate::error::{Result, StfindError};

/// Absolute, separator-normalized path used as the comparison key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathKey(OsString);

impl PathKey {
    /// Build a root key from a configured folder path, dropping trailing separators
    pub fn root(raw: &str) -> Result<Self> {
        let trimmed = raw.trim_end_matches(MAIN_SEPARATOR);
        if trimmed.is_empty() {
            return Err(StfindError::RootFolder {
                path: raw.to_string(),
            });
        }
        Ok(Self(trimmed.into()))
    }

    /// Wrap a string that is already a canonical key
    pub fn from_raw(raw: impl Into<OsString>) -> Self {
        Self(raw.into())
    }

    /// Append exactly one separator and the child name
    pub fn join(&self, name: impl AsRef<OsStr>) -> Self {
        let name = name.as_ref();
        let mut key = OsString::with_capacity(self.0.len() + 1 + name.len());
        key.push(&self.0);
        key.push(MAIN_SEPARATOR_STR);
        key.push(name);
        Self(key)
    }

    /// Prefix that every descendant of this key starts with
    fn descendant_prefix(&self) -> OsString {
        let mut prefix = self.0.clone();
        prefix.push(MAIN_SEPARATOR_STR);
        prefix
    }

    /// Raw bytes of the key, exactly as the filesystem returned them on Unix
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_encoded_bytes()
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// Lossy rendering for logs and error messages; the report writes raw bytes
impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl Borrow<OsStr> for PathKey {
    fn borrow(&self) -> &OsStr {
        &self.0
    }
}

impl AsRef<OsStr> for PathKey {
    fn as_ref(&self) -> &OsStr {
        &self.0
    }
}

/// Whether a tree entry is a directory or anything else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

/// Materialized view of one side: every path under the root mapped to its kind
///
/// Keys iterate in raw byte order, which for UTF-8 names is code-point order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<PathKey, EntryKind>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. A key that is already present means the traversal is broken.
    pub fn insert(&mut self, key: PathKey, kind: EntryKind) -> Result<()> {
        if self.entries.contains_key(&key) {
            return Err(StfindError::DuplicateEntry {
                path: key.as_path().to_path_buf(),
            });
        }
        self.entries.insert(key, kind);
        Ok(())
    }

    pub fn contains(&self, key: impl AsRef<OsStr>) -> bool {
        self.entries.contains_key(key.as_ref())
    }

    pub fn kind(&self, key: impl AsRef<OsStr>) -> Option<EntryKind> {
        self.entries.get(key.as_ref()).copied()
    }

    pub fn remove(&mut self, key: impl AsRef<OsStr>) -> Option<EntryKind> {
        self.entries.remove(key.as_ref())
    }

    /// Remove every entry strictly below `key`, returning how many went
    pub fn remove_descendants(&mut self, key: &PathKey) -> usize {
        let prefix = key.descendant_prefix();
        let before = self.entries.len();
        self.entries
            .retain(|k, _| !k.as_bytes().starts_with(prefix.as_encoded_bytes()));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in sorted key order
    pub fn iter(&self) -> impl Iterator<Item = (&PathKey, EntryKind)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }
}
