//! Errors raised by a folder check

use crate::frontmatter::FrontmatterError;
use std::path::PathBuf;
use thiserror::Error;

/// The first problem found while checking a folder
///
/// Every variant that concerns a single document names it, so the message
/// alone is enough to locate the problem.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The folder does not exist or is not a directory
    #[error("folder not found: {0}")]
    FolderNotFound(PathBuf),

    /// The folder or a document could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document's front-matter could not be parsed
    #[error("{document}: {source}")]
    Parse {
        document: String,
        #[source]
        source: FrontmatterError,
    },

    /// A required field is absent
    #[error("{document}: missing required field '{field}'")]
    MissingField { document: String, field: String },

    /// A field's value was rejected by its rule
    #[error("{document}: {reason}")]
    InvalidValue {
        document: String,
        field: String,
        value: String,
        reason: String,
    },
}

impl CheckError {
    /// Name of the offending document, if the error concerns one
    pub fn document(&self) -> Option<&str> {
        match self {
            CheckError::FolderNotFound(_) | CheckError::Io { .. } => None,
            CheckError::Parse { document, .. }
            | CheckError::MissingField { document, .. }
            | CheckError::InvalidValue { document, .. } => Some(document.as_str()),
        }
    }
}

impl From<walkdir::Error> for CheckError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        CheckError::Io { path, source }
    }
}
