//! Error types for loading a ninja log.
//!
//! Only whole-file failures surface here. Malformed individual records are
//! dropped by the parser and never become errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a log could not be turned into a [`crate::log::entry::LogFile`].
#[derive(Debug, Error)]
pub enum LogError {
    /// The source could not be opened, read, or its metadata was unavailable.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The log contained no lines at all.
    #[error("missing log header")]
    MissingHeader,

    /// The first line is not a `# ninja log vN` header.
    #[error("malformed log header: {0:?}")]
    MalformedHeader(String),

    /// The header names a version no registered parser handles.
    #[error("unsupported log version: {0}")]
    UnsupportedVersion(u32),
}

/// A [`LogError`] tagged with the file it came from.
#[derive(Debug, Error)]
#[error("{}: {source}", .path.display())]
pub struct LoadError {
    pub path: PathBuf,
    #[source]
    pub source: LogError,
}

impl LoadError {
    pub(crate) fn new(path: impl Into<PathBuf>, source: impl Into<LogError>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}
