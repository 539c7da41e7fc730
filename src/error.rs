use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListError {
    // Config
    #[error("invalid start directory")]
    InvalidRoot(String),

    #[error("invalid pattern")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // Traversal
    #[error("IO error")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    // Merge
    #[error("combined list length overflows")]
    CountOverflow,
}

impl ListError {
    /// The path this error occurred at, if applicable.
    /// Callers use this to present "failed at: <path>" without pattern matching on variants.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidRoot(p) | Self::Io { path: p, .. } => Some(p),
            _ => None,
        }
    }
}
