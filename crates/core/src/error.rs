// ABOUTME: Error types for the class pruning pipeline.
// ABOUTME: Provides PruneError with I/O, configuration, decoding and protected-tag variants.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while pruning a document.
///
/// The pure pipeline stages never fail; everything here comes from the I/O
/// boundary, configuration, or the strict unterminated-tag policy.
#[derive(Debug, Error)]
pub enum PruneError {
    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration is incomplete or inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A configuration file is not valid JSON for `PruneConfig`.
    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A rename rule is not of the form `old=new`.
    #[error("invalid rename rule {0:?}: expected old=new")]
    InvalidRename(String),

    /// A protected tag was opened but never closed (strict policy only).
    #[error("unterminated <{tag}> at offset {offset}")]
    UnterminatedProtectedTag { tag: String, offset: usize },

    /// The requested text encoding label is not known to encoding_rs.
    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),
}

impl PruneError {
    /// Creates a Read error for the given path.
    pub fn read(path: impl AsRef<Path>, source: io::Error) -> Self {
        PruneError::Read {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a Write error for the given path.
    pub fn write(path: impl AsRef<Path>, source: io::Error) -> Self {
        PruneError::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a Config error with a custom message.
    pub fn config(msg: impl fmt::Display) -> Self {
        PruneError::Config(msg.to_string())
    }

    /// Returns true if this error came from reading an input.
    pub fn is_read(&self) -> bool {
        matches!(self, PruneError::Read { .. })
    }

    /// Returns true if this error came from writing the output.
    pub fn is_write(&self) -> bool {
        matches!(self, PruneError::Write { .. })
    }

    /// Returns true if this is a configuration problem (including bad rename rules).
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            PruneError::Config(_) | PruneError::ConfigParse { .. } | PruneError::InvalidRename(_)
        )
    }

    /// Returns true if a protected tag was left unterminated.
    pub fn is_unterminated(&self) -> bool {
        matches!(self, PruneError::UnterminatedProtectedTag { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PruneError>;
