//! FsTreeError is used to report failures while building, cloning or removing test trees.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures returned by the lifecycle manager and its collaborators.
#[derive(Debug, Error)]
pub enum FsTreeError {
    #[error("The configuration should not be empty.")]
    EmptyConfig,

    #[error("Links are not allowed. Set LINKS_ALLOWED=Y to enable them.")]
    NotAllowedSettings,

    #[error("Invalid permission mode {0:?}, expected octal bits within 0777.")]
    InvalidMode(String),

    #[error("Invalid entry name {0:?}, expected a single path component.")]
    InvalidName(String),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Cannot copy {} into {}, which lies inside it.", .src.display(), .dst.display())]
    DestinationInsideSource { src: PathBuf, dst: PathBuf },

    #[error("This thread already holds a working directory switch.")]
    ChdirBusy,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error("The configuration does not satisfy the yaml format: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("The configuration does not satisfy the json format: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to start the async runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl FsTreeError {
    pub fn is_empty_config(&self) -> bool {
        matches!(self, FsTreeError::EmptyConfig)
    }

    pub fn is_not_allowed_settings(&self) -> bool {
        matches!(self, FsTreeError::NotAllowedSettings)
    }

    pub fn is_chdir_busy(&self) -> bool {
        matches!(self, FsTreeError::ChdirBusy)
    }

    /// The underlying I/O error kind, looking through walk errors too.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            FsTreeError::Io(e) | FsTreeError::Runtime(e) => Some(e.kind()),
            FsTreeError::Walk(e) => e.io_error().map(io::Error::kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FsTreeError>;
