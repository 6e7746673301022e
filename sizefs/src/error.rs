//! Errors produced by this crate.

/// Errors produced while resolving paths, mutating the namespace, or
/// building a file's content generator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A Xeger pattern attached to a file (via `filler`/`prefix`/`suffix`/
    /// `padder`) violates the pattern grammar.
    #[error(transparent)]
    Pattern(#[from] sizefs_xeger::Error),
    /// `path` does not exist.
    #[error("no such path: {0}")]
    NotFound(String),
    /// The operation is always refused, or is refused given the current
    /// namespace shape (e.g. `mkdir` under a non-root directory).
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// `rmdir` on a directory that still has children.
    #[error("directory not empty: {0}")]
    NotEmpty(String),
    /// `getxattr`/`removexattr` of a name that isn't set on `path`.
    #[error("no such attribute {name:?} on {path:?}")]
    MissingXattr { path: String, name: String },
}

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// POSIX errno values a bridge (e.g. a FUSE adapter) would return for each
/// error kind. This crate never interprets these itself; `errno()` is a
/// pure mapping function so a future bridge has one source of truth
/// without pulling in a libc/fuse dependency here.
pub mod errno {
    pub const EPERM: i32 = 1;
    pub const ENOENT: i32 = 2;
    pub const ENOTEMPTY: i32 = 39;
    pub const ENODATA: i32 = 61;
}

impl Error {
    /// The POSIX errno a bridge should surface for this error.
    ///
    /// `BadFilename` is deliberately absent here: the source grammar maps
    /// it to `EPERM` at `create` and `ENOENT` at `open`/lazy-create, which
    /// depends on which operation produced it, not on the error value
    /// alone. Callers at those two call sites pick the errno directly
    /// instead of going through this mapping for that one case.
    pub fn errno(&self) -> i32 {
        match self {
            Error::Pattern(sizefs_xeger::Error::BadFilename(_)) => errno::EPERM,
            Error::Pattern(sizefs_xeger::Error::Parse(_)) => errno::EPERM,
            Error::NotFound(_) => errno::ENOENT,
            Error::PermissionDenied(_) => errno::EPERM,
            Error::NotEmpty(_) => errno::ENOTEMPTY,
            Error::MissingXattr { .. } => errno::ENODATA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_enoent() {
        assert_eq!(Error::NotFound("/x".into()).errno(), errno::ENOENT);
    }

    #[test]
    fn not_empty_maps_to_enotempty() {
        assert_eq!(Error::NotEmpty("/x".into()).errno(), errno::ENOTEMPTY);
    }

    #[test]
    fn missing_xattr_maps_to_enodata() {
        let err = Error::MissingXattr {
            path: "/x".into(),
            name: "user.foo".into(),
        };
        assert_eq!(err.errno(), errno::ENODATA);
    }

    #[test]
    fn permission_denied_maps_to_eperm() {
        assert_eq!(Error::PermissionDenied("/x".into()).errno(), errno::EPERM);
    }
}
