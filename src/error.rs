//! Errors of the I/O surface. The derivation itself is total and never fails.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON ({origin}): {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Glob(#[from] glob::GlobError),

    #[error("glob pattern matched no files: {pattern}")]
    NoMatch { pattern: String },

    #[error("JSON pointer {pointer} selects nothing in {origin}")]
    Pointer { pointer: String, origin: String },

    #[error("failed to apply jq expression ({origin}): {message}")]
    Jq { origin: String, message: String },

    #[error("invalid config {origin}: {source}")]
    Config {
        origin: String,
        #[source]
        source: crate::path_de::PathError,
    },
}
