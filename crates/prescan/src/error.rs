//! Errors surfaced by reader-backed prescans.

use std::io;

#[derive(Debug)]
pub enum PrescanError {
    /// The underlying reader failed before the scan reached a verdict.
    Io(io::Error),
}

impl std::fmt::Display for PrescanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrescanError::Io(err) => write!(f, "failed to read document bytes: {err}"),
        }
    }
}

impl std::error::Error for PrescanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PrescanError::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for PrescanError {
    fn from(err: io::Error) -> Self {
        PrescanError::Io(err)
    }
}
