//! Error types for color extraction.

use thiserror::Error;

/// Errors raised by the selector [`Context`](crate::Context) stack.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// `pop` was called on an empty stack.
    #[error("selector context stack is empty")]
    Empty,
}

/// Errors that abort extraction for a whole input.
///
/// Individual malformed declarations never surface here; they are skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The input could not be tokenized at all.
    #[error("document could not be tokenized: {reason}")]
    Parse { reason: String },
}
