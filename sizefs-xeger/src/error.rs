//! Errors produced by this crate.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors produced while parsing or evaluating a Xeger pattern, or while
/// parsing a size-encoded filename.
pub enum Error {
    /// The pattern violates the Xeger grammar (unbalanced brackets, empty
    /// set, multiplier without an atom, non-numeric `{...}` contents, ...).
    #[error("invalid xeger pattern: {0}")]
    Parse(String),
    /// A filename did not match the size grammar in `FILE_REGEX`.
    #[error("filename does not match the size grammar: {0}")]
    BadFilename(String),
}

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;
