use cairn_odb::OdbError;
use cairn_types::{Digest, ObjectKind, TypeError};

/// Errors from object-handle operations.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// Backend failure, surfaced unchanged.
    #[error(transparent)]
    Odb(#[from] OdbError),

    /// Malformed digest or kind name, surfaced unchanged.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// The backend reports a different kind than the handle is bound to.
    ///
    /// This is a backend-integrity fault: the binding was established from a
    /// previous backend answer and kinds never change for a given digest.
    #[error("backend reports {actual} for {digest}, but handle is bound to {bound}")]
    KindMismatch {
        digest: Digest,
        bound: ObjectKind,
        actual: ObjectKind,
    },

    /// Positional metadata was read but never supplied at construction.
    ///
    /// `mode` and `path` exist only relative to a parent listing; they cannot
    /// be recovered from the digest or the backend afterwards.
    #[error("{field} was not supplied at construction and cannot be derived")]
    MetadataUnset { field: &'static str },

    /// A field name with no lazy resolution logic.
    #[error("no lazily resolvable field named {field:?}")]
    UnsupportedField { field: String },

    /// I/O failure while copying object data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for object-handle operations.
pub type ObjectResult<T> = Result<T, ObjectError>;
