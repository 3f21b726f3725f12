//! Error and warning types for building a media tree.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors that prevent a tree from being built at all.
///
/// Only problems with the root directory end up here. Everything below the
/// root is reported as a [`BuildWarning`] instead.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Permission denied for the root.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Root path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error on the root.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl BuildError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors raised while compiling classification rules.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The glob pattern could not be parsed.
    #[error("Invalid file pattern \"{pattern}\": {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// A rule maps a pattern to an empty type tag.
    #[error("File pattern \"{pattern}\" has an empty type")]
    EmptyTag { pattern: String },
}

/// Kind of build warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Error listing a directory.
    ReadError,
    /// Error reading file metadata.
    MetadataError,
    /// A followed symbolic link points back to one of its ancestors.
    SymlinkLoop,
}

/// A subtree or file omitted from the tree because of a filesystem error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl BuildWarning {
    /// Create a new build warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning for a directory that could not be listed.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        let kind = if error.kind() == std::io::ErrorKind::PermissionDenied {
            WarningKind::PermissionDenied
        } else {
            WarningKind::ReadError
        };
        Self {
            message: format!("Read error: {error}"),
            path,
            kind,
        }
    }

    /// Create a warning for a file whose metadata could not be read.
    pub fn metadata_error(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self {
            path: path.into(),
            message: format!("Metadata error: {message}"),
            kind: WarningKind::MetadataError,
        }
    }

    /// Create a symlink loop warning.
    pub fn symlink_loop(path: impl Into<PathBuf>, ancestor: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ancestor = ancestor.into();
        Self {
            message: format!(
                "Symlink loop: {} points back to {}",
                path.display(),
                ancestor.display()
            ),
            path,
            kind: WarningKind::SymlinkLoop,
        }
    }
}
