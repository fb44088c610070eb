use cairn_types::{Digest, TypeError};

/// Errors from object-database backend operations.
#[derive(Debug, thiserror::Error)]
pub enum OdbError {
    /// No object with this digest exists in the backend.
    #[error("object not found: {0}")]
    NotFound(Digest),

    /// A rev-spec did not resolve to any object.
    #[error("rev-spec did not resolve: {spec:?}")]
    RevNotFound { spec: String },

    /// A rev-spec resolved to more than one object.
    #[error("ambiguous rev-spec: {spec:?}")]
    Ambiguous { spec: String },

    /// The repository has no working tree.
    #[error("repository is bare: no working tree")]
    BareRepository,

    /// Malformed digest or kind name.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// I/O error from the underlying storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for backend operations.
pub type OdbResult<T> = Result<T, OdbError>;
