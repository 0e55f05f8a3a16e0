use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Setup errors that abort the whole batch before any row is run.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("the first line must be a field-header line starting with '#'")]
    MissingHeader,

    #[error("creating output directory {path:?} (parent directories are not created): {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Problems with a single manifest row. The row is skipped and the batch
/// carries on.
#[derive(Error, Debug)]
pub enum RowError {
    #[error("malformed manifest row at line {line}: expected 3 tab-delimited fields, found {found}")]
    TooFewFields { line: u64, found: usize },

    #[error("unreadable manifest row at line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: io::Error,
    },
}

impl RowError {
    pub fn line(&self) -> u64 {
        match self {
            RowError::TooFewFields { line, .. } => *line,
            RowError::Read { line, .. } => *line,
        }
    }

    /// Invalid UTF-8 spoils only the one line; any other read failure means
    /// the rest of the manifest cannot be trusted.
    pub fn is_fatal(&self) -> bool {
        match self {
            RowError::Read { source, .. } => source.kind() != io::ErrorKind::InvalidData,
            _ => false,
        }
    }
}
