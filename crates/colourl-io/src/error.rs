use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a page or one of its stylesheets.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid location '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported scheme '{scheme}' in {url}")]
    UnsupportedScheme { scheme: String, url: String },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{url} is not valid UTF-8")]
    NotUtf8 { url: String },

    #[error("file with length {length} exceeds max file size {limit}")]
    FileTooLarge { length: u64, limit: u64 },

    #[error("file with length {length} exceeds max page size {limit} of page with current size {current}")]
    PageTooLarge { length: u64, limit: u64, current: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache lock poisoned")]
    Poisoned,
}
