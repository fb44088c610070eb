use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use cairn_types::{Digest, ObjectKind};

use crate::error::OdbResult;

/// Metadata record for a stored object.
///
/// Returned by [`Odb::info`] and [`Odb::rev_parse`]. The digest is always the
/// canonical one, even when the lookup went through a rev-spec or an
/// abbreviated form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// The kind of the stored object.
    pub kind: ObjectKind,
    /// Canonical content digest.
    pub digest: Digest,
    /// Size of the object's data in bytes.
    pub size: u64,
}

/// Capability contract for an object-database backend.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable: the same digest always refers to the same bytes.
/// - `info` and `stream` are pure functions of the digest.
/// - Streams returned by `stream` are single-use and forward-only. A stream
///   must be fully and sequentially consumed before another read of the same
///   logical object is requested; stream handles must never be shared across
///   callers.
/// - All errors are propagated, never silently swallowed.
///
/// Thread safety of the backend itself is part of this contract
/// (`Send + Sync`); callers share one backend across many handles.
pub trait Odb: Send + Sync {
    /// Look up the metadata record for a digest.
    ///
    /// Fails with [`OdbError::NotFound`] if the backend holds no such object.
    ///
    /// [`OdbError::NotFound`]: crate::error::OdbError::NotFound
    fn info(&self, digest: &Digest) -> OdbResult<ObjectInfo>;

    /// Open a forward-only stream over the object's uncompressed data.
    ///
    /// Fails with [`OdbError::NotFound`] if the backend holds no such object.
    ///
    /// [`OdbError::NotFound`]: crate::error::OdbError::NotFound
    fn stream(&self, digest: &Digest) -> OdbResult<Box<dyn Read + Send>>;

    /// Resolve a rev-spec (ref name, full or abbreviated hex) to the
    /// metadata record of a concrete object.
    ///
    /// Fails with [`OdbError::RevNotFound`] when nothing matches and
    /// [`OdbError::Ambiguous`] when more than one object does.
    ///
    /// [`OdbError::RevNotFound`]: crate::error::OdbError::RevNotFound
    /// [`OdbError::Ambiguous`]: crate::error::OdbError::Ambiguous
    fn rev_parse(&self, spec: &str) -> OdbResult<ObjectInfo>;

    /// The filesystem root of the working tree.
    ///
    /// Fails with [`OdbError::BareRepository`] when the repository has no
    /// working tree.
    ///
    /// [`OdbError::BareRepository`]: crate::error::OdbError::BareRepository
    fn root_path(&self) -> OdbResult<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_info_serde_roundtrip() {
        let info = ObjectInfo {
            kind: ObjectKind::Tree,
            digest: Digest::from([0x5a; 20]),
            size: 123,
        };
        let json = serde_json::to_string(&info).unwrap();
        let parsed: ObjectInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, parsed);
    }
}
