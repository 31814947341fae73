use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("failed to list directory {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color {0:?}: expected 6 hex digits like #5CA3DD")]
    Invalid(String),
    #[error("unknown file category {0:?}")]
    UnknownCategory(String),
    #[error("invalid color override {0:?}: expected CATEGORY=HEX")]
    MalformedOverride(String),
}
