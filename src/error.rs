//! Error types for stfind

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, StfindError>;

/// Broad classes of failure, used by the binary to pick an exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or conflicting arguments
    Usage,
    /// Syncthing's view and the local filesystem disagree about basic structure
    ConfigMismatch,
    /// Network, HTTP, decode or filesystem failure
    Io,
    /// A tree build produced the same path twice
    Invariant,
}

#[derive(Debug, thiserror::Error)]
pub enum StfindError {
    #[error("Both dirsonly and filesonly are set. Choose one.")]
    ConflictingFilters,

    #[error("No folder path found for folder '{folder_id}'. The ID is probably incorrect.")]
    FolderNotFound { folder_id: String },

    #[error("No folder marker name configured for folder '{folder_id}'")]
    MissingMarkerName { folder_id: String },

    #[error("Folder path '{path}' resolves to the filesystem root")]
    RootFolder { path: String },

    #[error("Folder marker {path} specified but not found on the local filesystem")]
    MarkerNotFound { path: String },

    #[error("Versions path '{path}' (configured as '{configured}') is too short. Did someone use / as the full versions path?")]
    VersionsPathTooShort { path: String, configured: String },

    #[error("Failed to read directory {path:?}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}:\n{body}")]
    Status { url: String, status: u16, body: String },

    #[error("Failed to decode response from {url}. Response body was:\n{body}")]
    Decode {
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Attempt to add entry to tree again: {}", .path.display())]
    DuplicateEntry { path: PathBuf },
}

impl StfindError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConflictingFilters => ErrorKind::Usage,
            Self::FolderNotFound { .. }
            | Self::MissingMarkerName { .. }
            | Self::RootFolder { .. }
            | Self::MarkerNotFound { .. }
            | Self::VersionsPathTooShort { .. } => ErrorKind::ConfigMismatch,
            Self::ReadDir { .. }
            | Self::Transport { .. }
            | Self::Status { .. }
            | Self::Decode { .. } => ErrorKind::Io,
            Self::DuplicateEntry { .. } => ErrorKind::Invariant,
        }
    }
}

impl ErrorKind {
    /// Process exit code for this class of failure
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage => 2,
            ErrorKind::ConfigMismatch => 3,
            ErrorKind::Io => 4,
            ErrorKind::Invariant => 70,
        }
    }
}
