//! Typed handles binding a digest to backend-stored data.
//!
//! A handle pairs a [`Digest`] with a shared backend reference. Constructing
//! one performs no I/O; the object's size is fetched and memoized on first
//! read, and its data is only ever touched through explicit streams.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};
use std::sync::Arc;

use tracing::warn;
use cairn_odb::{Odb, ObjectInfo};
use cairn_types::{Digest, ObjectKind};

use crate::error::{ObjectError, ObjectResult};
use crate::lazy::LazyField;
use crate::registry;

/// State shared by every handle variant: the borrowed backend, the immutable
/// digest, and the lazily resolved size.
#[derive(Clone)]
struct ObjectCore {
    odb: Arc<dyn Odb>,
    digest: Digest,
    size: LazyField<u64>,
}

impl ObjectCore {
    fn new(odb: Arc<dyn Odb>, digest: Digest) -> Self {
        Self {
            odb,
            digest,
            size: LazyField::new(),
        }
    }

    /// First read issues exactly one `info` query; later reads hit the cache.
    ///
    /// The backend's answer must still carry the kind this handle was bound
    /// to. A divergence means the backend contradicts its own earlier answer
    /// and is surfaced as [`ObjectError::KindMismatch`].
    fn size(&self, bound: ObjectKind) -> ObjectResult<u64> {
        let size = self.size.get_or_resolve(|| {
            let info = self.odb.info(&self.digest)?;
            if info.kind != bound {
                warn!(
                    digest = %self.digest.short_hex(),
                    bound = %bound,
                    actual = %info.kind,
                    "backend kind diverges from handle binding"
                );
                return Err(ObjectError::KindMismatch {
                    digest: self.digest,
                    bound,
                    actual: info.kind,
                });
            }
            Ok(info.size)
        })?;
        Ok(*size)
    }

    fn data_stream(&self) -> ObjectResult<Box<dyn Read + Send>> {
        Ok(self.odb.stream(&self.digest)?)
    }
}

impl fmt::Debug for ObjectCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCore")
            .field("digest", &self.digest)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Handle variants
// ---------------------------------------------------------------------------

/// Handle to raw content.
#[derive(Clone, Debug)]
pub struct Blob {
    core: ObjectCore,
}

impl Blob {
    /// The kind every `Blob` handle is bound to.
    pub const KIND: ObjectKind = ObjectKind::Blob;

    /// Bind a handle to `digest` without consulting the backend.
    pub fn new(odb: Arc<dyn Odb>, digest: Digest) -> Self {
        Self {
            core: ObjectCore::new(odb, digest),
        }
    }

    /// The content digest this handle refers to.
    pub fn digest(&self) -> Digest {
        self.core.digest
    }

    /// Size of the blob's data in bytes, fetched lazily and memoized.
    pub fn size(&self) -> ObjectResult<u64> {
        self.core.size(Self::KIND)
    }

    /// Open a forward-only stream over the blob's data.
    pub fn data_stream(&self) -> ObjectResult<Box<dyn Read + Send>> {
        self.core.data_stream()
    }
}

/// Handle to a directory listing.
#[derive(Clone, Debug)]
pub struct Tree {
    core: ObjectCore,
}

impl Tree {
    /// The kind every `Tree` handle is bound to.
    pub const KIND: ObjectKind = ObjectKind::Tree;

    /// Bind a handle to `digest` without consulting the backend.
    pub fn new(odb: Arc<dyn Odb>, digest: Digest) -> Self {
        Self {
            core: ObjectCore::new(odb, digest),
        }
    }

    /// The content digest this handle refers to.
    pub fn digest(&self) -> Digest {
        self.core.digest
    }

    /// Size of the serialized listing in bytes, fetched lazily and memoized.
    pub fn size(&self) -> ObjectResult<u64> {
        self.core.size(Self::KIND)
    }

    /// Open a forward-only stream over the serialized listing.
    pub fn data_stream(&self) -> ObjectResult<Box<dyn Read + Send>> {
        self.core.data_stream()
    }
}

/// Handle to a recorded snapshot with ancestry.
#[derive(Clone, Debug)]
pub struct Commit {
    core: ObjectCore,
}

impl Commit {
    /// The kind every `Commit` handle is bound to.
    pub const KIND: ObjectKind = ObjectKind::Commit;

    /// Bind a handle to `digest` without consulting the backend.
    pub fn new(odb: Arc<dyn Odb>, digest: Digest) -> Self {
        Self {
            core: ObjectCore::new(odb, digest),
        }
    }

    /// The content digest this handle refers to.
    pub fn digest(&self) -> Digest {
        self.core.digest
    }

    /// Size of the commit's payload in bytes, fetched lazily and memoized.
    pub fn size(&self) -> ObjectResult<u64> {
        self.core.size(Self::KIND)
    }

    /// Open a forward-only stream over the commit's payload.
    pub fn data_stream(&self) -> ObjectResult<Box<dyn Read + Send>> {
        self.core.data_stream()
    }
}

/// Handle to an annotated, named pointer.
#[derive(Clone, Debug)]
pub struct Tag {
    core: ObjectCore,
}

impl Tag {
    /// The kind every `Tag` handle is bound to.
    pub const KIND: ObjectKind = ObjectKind::Tag;

    /// Bind a handle to `digest` without consulting the backend.
    pub fn new(odb: Arc<dyn Odb>, digest: Digest) -> Self {
        Self {
            core: ObjectCore::new(odb, digest),
        }
    }

    /// The content digest this handle refers to.
    pub fn digest(&self) -> Digest {
        self.core.digest
    }

    /// Size of the tag's payload in bytes, fetched lazily and memoized.
    pub fn size(&self) -> ObjectResult<u64> {
        self.core.size(Self::KIND)
    }

    /// Open a forward-only stream over the tag's payload.
    pub fn data_stream(&self) -> ObjectResult<Box<dyn Read + Send>> {
        self.core.data_stream()
    }
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

/// A typed handle onto backend-stored data.
///
/// The union is closed: exactly these four variants exist, each permanently
/// bound to its [`ObjectKind`]. Identity is keyed on the digest alone; two
/// handles with the same digest are equal even across variants.
#[derive(Clone)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    /// Construct the variant bound to `kind` for `digest`.
    ///
    /// No backend consultation; the caller vouches for the kind.
    pub fn with_kind(odb: Arc<dyn Odb>, kind: ObjectKind, digest: Digest) -> Self {
        registry::constructor_for(kind)(odb, digest)
    }

    /// Resolve a rev-spec (ref name, full or abbreviated hex) to a handle.
    ///
    /// Resolution is delegated entirely to the backend; the returned variant
    /// is whatever the backend determined, with `size` already populated.
    /// Backend errors (unknown or ambiguous spec) surface unchanged.
    pub fn resolve_spec(odb: Arc<dyn Odb>, spec: &str) -> ObjectResult<Self> {
        let info = odb.rev_parse(spec)?;
        Ok(Self::from_info(odb, info))
    }

    /// Build the handle for a known digest.
    ///
    /// The null digest is, by convention, always the root commit: a commit
    /// handle is returned without consulting the backend, its size left
    /// unresolved. Any other digest is looked up, and the handle is
    /// constructed with the canonical digest and a pre-populated size.
    pub fn from_digest(odb: Arc<dyn Odb>, digest: Digest) -> ObjectResult<Self> {
        if digest.is_null() {
            return Ok(Object::Commit(Commit::new(odb, digest)));
        }
        let info = odb.info(&digest)?;
        Ok(Self::from_info(odb, info))
    }

    fn from_info(odb: Arc<dyn Odb>, info: ObjectInfo) -> Self {
        let object = registry::constructor_for(info.kind)(odb, info.digest);
        object.core().size.preset(info.size);
        object
    }

    fn core(&self) -> &ObjectCore {
        match self {
            Object::Blob(o) => &o.core,
            Object::Tree(o) => &o.core,
            Object::Commit(o) => &o.core,
            Object::Tag(o) => &o.core,
        }
    }

    /// The kind this handle is bound to.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Blob(_) => Blob::KIND,
            Object::Tree(_) => Tree::KIND,
            Object::Commit(_) => Commit::KIND,
            Object::Tag(_) => Tag::KIND,
        }
    }

    /// The shared backend this handle reads through.
    pub fn odb(&self) -> &Arc<dyn Odb> {
        &self.core().odb
    }

    /// The content digest this handle refers to.
    pub fn digest(&self) -> Digest {
        self.core().digest
    }

    /// Canonical 40-character lowercase hex form of the digest.
    pub fn to_hex(&self) -> String {
        self.digest().to_hex()
    }

    /// Short hex form of the digest, for log lines.
    pub fn short_hex(&self) -> String {
        self.digest().short_hex()
    }

    /// Size of the object's data in bytes, fetched lazily and memoized.
    pub fn size(&self) -> ObjectResult<u64> {
        self.core().size(self.kind())
    }

    /// Open a forward-only stream over the object's data.
    ///
    /// The stream is single-use: consume it fully before requesting any other
    /// read of the same logical object.
    pub fn data_stream(&self) -> ObjectResult<Box<dyn Read + Send>> {
        self.core().data_stream()
    }

    /// Copy the object's data verbatim into `sink`; returns the byte count.
    pub fn copy_data_to<W: Write + ?Sized>(&self, sink: &mut W) -> ObjectResult<u64> {
        let mut stream = self.data_stream()?;
        Ok(io::copy(&mut stream, sink)?)
    }

    /// Resolve the lazy field named `name`, memoizing its value.
    ///
    /// Only `"size"` has resolution logic on plain handles; any other name
    /// fails with [`ObjectError::UnsupportedField`].
    pub fn ensure_field(&self, name: &str) -> ObjectResult<()> {
        match name {
            "size" => self.size().map(drop),
            other => Err(ObjectError::UnsupportedField {
                field: other.to_string(),
            }),
        }
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Object::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Self {
        Object::Tree(tree)
    }
}

impl From<Commit> for Object {
    fn from(commit: Commit) -> Self {
        Object::Commit(commit)
    }
}

impl From<Tag> for Object {
    fn from(tag: Tag) -> Self {
        Object::Tag(tag)
    }
}

/// Equality is keyed on digest bytes exclusively, across variants.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.digest() == other.digest()
    }
}

impl Eq for Object {}

/// Hashes the digest bytes, matching equality.
impl Hash for Object {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.digest().hash(state);
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({} {})", self.kind(), self.short_hex())
    }
}
