//! Handles positioned inside a directory listing.
//!
//! A [`TreeEntry`] is an [`Object`] plus the metadata that only exists
//! relative to a parent tree: the slash-separated path from the repository
//! root and the permission/type mode. Both are supplied by whatever walked
//! the listing; neither can be recovered from the digest afterwards.

use std::hash::{Hash, Hasher};
use std::io::{Read, Write};
use std::path::PathBuf;

use cairn_types::{Digest, EntryMode, ObjectKind};

use crate::error::{ObjectError, ObjectResult};
use crate::object::Object;

/// A typed handle carrying its position within a tree.
///
/// Equality stays keyed on the content digest, inherited from [`Object`].
/// Hashing is keyed on `path` instead; see the `Hash` impl.
#[derive(Clone, Debug)]
pub struct TreeEntry {
    object: Object,
    mode: Option<EntryMode>,
    path: Option<String>,
}

impl TreeEntry {
    /// An entry with full positional metadata, as a tree walker produces.
    pub fn new(object: Object, mode: EntryMode, path: impl Into<String>) -> Self {
        Self::with_metadata(object, Some(mode), Some(path.into()))
    }

    /// An entry with no positional metadata.
    ///
    /// Every later `mode`/`path` read fails with
    /// [`ObjectError::MetadataUnset`]; there is no way to supply the
    /// metadata after construction.
    pub fn detached(object: Object) -> Self {
        Self::with_metadata(object, None, None)
    }

    /// An entry with whatever metadata the caller has.
    pub fn with_metadata(object: Object, mode: Option<EntryMode>, path: Option<String>) -> Self {
        Self { object, mode, path }
    }

    /// The underlying typed handle.
    pub fn object(&self) -> &Object {
        &self.object
    }

    /// Discard the positional metadata and return the plain handle.
    pub fn into_object(self) -> Object {
        self.object
    }

    /// The entry's permission/type mode within its tree.
    pub fn mode(&self) -> ObjectResult<EntryMode> {
        self.mode.ok_or(ObjectError::MetadataUnset { field: "mode" })
    }

    /// Slash-separated path relative to the repository root.
    pub fn path(&self) -> ObjectResult<&str> {
        self.path
            .as_deref()
            .ok_or(ObjectError::MetadataUnset { field: "path" })
    }

    /// The name portion of the path, its final component.
    pub fn name(&self) -> ObjectResult<&str> {
        let path = self.path()?;
        Ok(path.rsplit('/').next().unwrap_or(path))
    }

    /// Absolute filesystem path of this entry under the working tree.
    ///
    /// Requires a working tree: on a bare repository this fails with
    /// [`OdbError::BareRepository`] for every input, before the path
    /// metadata is even consulted.
    ///
    /// [`OdbError::BareRepository`]: cairn_odb::OdbError::BareRepository
    pub fn absolute_path(&self) -> ObjectResult<PathBuf> {
        let root = self.object.odb().root_path()?;
        Ok(root.join(self.path()?))
    }

    /// The content digest of the underlying object.
    pub fn digest(&self) -> Digest {
        self.object.digest()
    }

    /// Canonical 40-character lowercase hex form of the digest.
    pub fn to_hex(&self) -> String {
        self.object.to_hex()
    }

    /// The kind the underlying handle is bound to.
    pub fn kind(&self) -> ObjectKind {
        self.object.kind()
    }

    /// Size of the object's data in bytes, fetched lazily and memoized.
    pub fn size(&self) -> ObjectResult<u64> {
        self.object.size()
    }

    /// Open a forward-only stream over the object's data.
    pub fn data_stream(&self) -> ObjectResult<Box<dyn Read + Send>> {
        self.object.data_stream()
    }

    /// Copy the object's data verbatim into `sink`; returns the byte count.
    pub fn copy_data_to<W: Write + ?Sized>(&self, sink: &mut W) -> ObjectResult<u64> {
        self.object.copy_data_to(sink)
    }

    /// Resolve the lazy field named `name`.
    ///
    /// `mode` and `path` are never lazily resolvable: they exist only
    /// relative to a parent listing, so reading them unset fails with
    /// [`ObjectError::MetadataUnset`]. Every other name is delegated to
    /// [`Object::ensure_field`].
    pub fn ensure_field(&self, name: &str) -> ObjectResult<()> {
        match name {
            "mode" => self.mode().map(drop),
            "path" => self.path().map(drop),
            other => self.object.ensure_field(other),
        }
    }
}

/// Equality is inherited from [`Object`]: digest bytes exclusively. Two
/// entries at different paths holding the same content are equal.
impl PartialEq for TreeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.object == other.object
    }
}

impl Eq for TreeEntry {}

/// Hashes the entry's `path`, not its digest.
///
/// Within one listing an entry is identified by its slot: membership checks
/// and tree diffs bucket by path while payload comparison keeps digest
/// equality. The resulting divergence from the usual `Eq`/`Hash` contract is
/// intentional and load-bearing; do not "fix" it here, and do not use
/// `TreeEntry` as a key in std hashed collections, which assume
/// `a == b` implies equal hashes. An unset path hashes as the `None` case.
impl Hash for TreeEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
