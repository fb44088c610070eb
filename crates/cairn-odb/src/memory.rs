//! In-memory object database for tests and embedding.
//!
//! [`InMemoryOdb`] keeps objects and named refs in `HashMap`s behind
//! `RwLock`s. It implements the full [`Odb`] contract and is suitable for
//! unit tests, tooling, and short-lived processes. Data is lost on drop.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::RwLock;

use sha1::{Digest as _, Sha1};
use tracing::debug;
use cairn_types::{Digest, ObjectKind};

use crate::error::{OdbError, OdbResult};
use crate::traits::{Odb, ObjectInfo};

/// Minimum length for abbreviated hex resolution.
const MIN_ABBREV: usize = 4;

#[derive(Clone)]
struct StoredObject {
    kind: ObjectKind,
    data: Vec<u8>,
}

/// An in-memory implementation of [`Odb`].
///
/// Digests are minted on insert by hashing `"<kind> <len>\0"` followed by the
/// object data, so content inserted here carries the same digest a compatible
/// on-disk backend would assign.
///
/// The store is constructed bare; attach a working tree with
/// [`InMemoryOdb::with_workdir`] when `root_path` needs to resolve.
pub struct InMemoryOdb {
    objects: RwLock<HashMap<Digest, StoredObject>>,
    refs: RwLock<HashMap<String, Digest>>,
    workdir: Option<PathBuf>,
}

impl InMemoryOdb {
    /// Create a new empty, bare store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            refs: RwLock::new(HashMap::new()),
            workdir: None,
        }
    }

    /// Create a new empty store with an attached working tree root.
    pub fn with_workdir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(workdir.into()),
            ..Self::new()
        }
    }

    /// Insert an object and return its minted digest.
    ///
    /// Idempotent: inserting the same kind and data twice stores one object.
    pub fn insert(&self, kind: ObjectKind, data: &[u8]) -> Digest {
        let digest = mint_digest(kind, data);
        let mut objects = self.objects.write().expect("lock poisoned");
        objects.entry(digest).or_insert_with(|| StoredObject {
            kind,
            data: data.to_vec(),
        });
        debug!(digest = %digest.short_hex(), kind = %kind, size = data.len(), "inserted object");
        digest
    }

    /// Register a named ref (branch, tag) pointing at a digest.
    pub fn insert_ref(&self, name: impl Into<String>, digest: Digest) {
        let name = name.into();
        debug!(name = %name, digest = %digest.short_hex(), "inserted ref");
        self.refs.write().expect("lock poisoned").insert(name, digest);
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Remove all objects and refs.
    pub fn clear(&self) {
        self.objects.write().expect("lock poisoned").clear();
        self.refs.write().expect("lock poisoned").clear();
    }

    fn resolve_abbrev(&self, spec: &str) -> OdbResult<Digest> {
        let needle = spec.to_ascii_lowercase();
        let objects = self.objects.read().expect("lock poisoned");
        let mut matches = objects
            .keys()
            .filter(|digest| digest.to_hex().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(digest), None) => Ok(*digest),
            (Some(_), Some(_)) => Err(OdbError::Ambiguous {
                spec: spec.to_string(),
            }),
            (None, _) => Err(OdbError::RevNotFound {
                spec: spec.to_string(),
            }),
        }
    }
}

impl Default for InMemoryOdb {
    fn default() -> Self {
        Self::new()
    }
}

impl Odb for InMemoryOdb {
    fn info(&self, digest: &Digest) -> OdbResult<ObjectInfo> {
        let objects = self.objects.read().expect("lock poisoned");
        let stored = objects.get(digest).ok_or(OdbError::NotFound(*digest))?;
        Ok(ObjectInfo {
            kind: stored.kind,
            digest: *digest,
            size: stored.data.len() as u64,
        })
    }

    fn stream(&self, digest: &Digest) -> OdbResult<Box<dyn Read + Send>> {
        let objects = self.objects.read().expect("lock poisoned");
        let stored = objects.get(digest).ok_or(OdbError::NotFound(*digest))?;
        Ok(Box::new(Cursor::new(stored.data.clone())))
    }

    fn rev_parse(&self, spec: &str) -> OdbResult<ObjectInfo> {
        // Named refs take precedence over hex forms.
        let by_ref = {
            let refs = self.refs.read().expect("lock poisoned");
            refs.get(spec).copied()
        };
        if let Some(digest) = by_ref {
            debug!(spec = %spec, digest = %digest.short_hex(), "resolved ref");
            return self.info(&digest);
        }

        if spec.len() == 40 {
            if let Ok(digest) = Digest::from_hex(spec) {
                return self.info(&digest).map_err(|_| OdbError::RevNotFound {
                    spec: spec.to_string(),
                });
            }
        }

        if spec.len() >= MIN_ABBREV
            && spec.len() < 40
            && spec.chars().all(|c| c.is_ascii_hexdigit())
        {
            let digest = self.resolve_abbrev(spec)?;
            debug!(spec = %spec, digest = %digest.short_hex(), "resolved abbreviated digest");
            return self.info(&digest);
        }

        Err(OdbError::RevNotFound {
            spec: spec.to_string(),
        })
    }

    fn root_path(&self) -> OdbResult<PathBuf> {
        self.workdir.clone().ok_or(OdbError::BareRepository)
    }
}

impl std::fmt::Debug for InMemoryOdb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryOdb")
            .field("object_count", &self.len())
            .field("bare", &self.workdir.is_none())
            .finish()
    }
}

/// Hash `"<kind> <len>\0" + data`, the classic object-header construction.
fn mint_digest(kind: ObjectKind, data: &[u8]) -> Digest {
    let mut hasher = Sha1::new();
    hasher.update(kind.as_str().as_bytes());
    hasher.update(b" ");
    hasher.update(data.len().to_string().as_bytes());
    hasher.update(b"\0");
    hasher.update(data);
    let bytes: [u8; 20] = hasher.finalize().into();
    Digest::from(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Insert / info
    // -----------------------------------------------------------------------

    #[test]
    fn insert_and_info() {
        let odb = InMemoryOdb::new();
        let digest = odb.insert(ObjectKind::Blob, b"hello world");

        let info = odb.info(&digest).unwrap();
        assert_eq!(info.kind, ObjectKind::Blob);
        assert_eq!(info.digest, digest);
        assert_eq!(info.size, 11);
    }

    #[test]
    fn minted_digest_matches_known_value() {
        // `git hash-object` of "hello world" without a trailing newline.
        let odb = InMemoryOdb::new();
        let digest = odb.insert(ObjectKind::Blob, b"hello world");
        assert_eq!(digest.to_hex(), "95d09f2b10159347eece71399a7e2e907ea3df4f");
    }

    #[test]
    fn insert_is_idempotent() {
        let odb = InMemoryOdb::new();
        let first = odb.insert(ObjectKind::Blob, b"same");
        let second = odb.insert(ObjectKind::Blob, b"same");
        assert_eq!(first, second);
        assert_eq!(odb.len(), 1);
    }

    #[test]
    fn same_data_different_kind_differs() {
        let odb = InMemoryOdb::new();
        let blob = odb.insert(ObjectKind::Blob, b"data");
        let tag = odb.insert(ObjectKind::Tag, b"data");
        assert_ne!(blob, tag);
        assert_eq!(odb.len(), 2);
    }

    #[test]
    fn info_missing_object() {
        let odb = InMemoryOdb::new();
        let digest = Digest::from([9u8; 20]);
        let err = odb.info(&digest).unwrap_err();
        assert!(matches!(err, OdbError::NotFound(d) if d == digest));
    }

    // -----------------------------------------------------------------------
    // Streams
    // -----------------------------------------------------------------------

    #[test]
    fn stream_reproduces_bytes() {
        let odb = InMemoryOdb::new();
        let content = b"some file content\nwith lines\n";
        let digest = odb.insert(ObjectKind::Blob, content);

        let mut buf = Vec::new();
        odb.stream(&digest).unwrap().read_to_end(&mut buf).unwrap();
        assert_eq!(buf, content);
    }

    #[test]
    fn stream_missing_object() {
        let odb = InMemoryOdb::new();
        assert!(matches!(
            odb.stream(&Digest::from([1u8; 20])),
            Err(OdbError::NotFound(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Rev-spec resolution
    // -----------------------------------------------------------------------

    #[test]
    fn rev_parse_by_ref_name() {
        let odb = InMemoryOdb::new();
        let digest = odb.insert(ObjectKind::Commit, b"commit payload");
        odb.insert_ref("refs/heads/main", digest);

        let info = odb.rev_parse("refs/heads/main").unwrap();
        assert_eq!(info.digest, digest);
        assert_eq!(info.kind, ObjectKind::Commit);
    }

    #[test]
    fn rev_parse_by_full_hex() {
        let odb = InMemoryOdb::new();
        let digest = odb.insert(ObjectKind::Blob, b"abc");
        let info = odb.rev_parse(&digest.to_hex()).unwrap();
        assert_eq!(info.digest, digest);
    }

    #[test]
    fn rev_parse_by_unique_prefix() {
        let odb = InMemoryOdb::new();
        let digest = odb.insert(ObjectKind::Blob, b"unique");
        let prefix = &digest.to_hex()[..8];
        let info = odb.rev_parse(prefix).unwrap();
        assert_eq!(info.digest, digest);
    }

    #[test]
    fn rev_parse_ambiguous_prefix() {
        let odb = InMemoryOdb::new();
        // Find two payloads whose minted digests share a 4-char hex prefix;
        // a 16-bit prefix collides after a few hundred candidates.
        let mut seen: HashMap<String, u32> = HashMap::new();
        let (a, b, prefix) = (0u32..)
            .find_map(|i| {
                let digest = mint_digest(ObjectKind::Blob, &i.to_be_bytes());
                let prefix = digest.to_hex()[..4].to_string();
                match seen.insert(prefix.clone(), i) {
                    Some(j) => Some((j, i, prefix)),
                    None => None,
                }
            })
            .unwrap();

        odb.insert(ObjectKind::Blob, &a.to_be_bytes());
        odb.insert(ObjectKind::Blob, &b.to_be_bytes());
        let err = odb.rev_parse(&prefix).unwrap_err();
        assert!(matches!(err, OdbError::Ambiguous { .. }));
    }

    #[test]
    fn rev_parse_unknown_spec() {
        let odb = InMemoryOdb::new();
        odb.insert(ObjectKind::Blob, b"x");
        let err = odb.rev_parse("refs/heads/nope").unwrap_err();
        assert!(matches!(err, OdbError::RevNotFound { .. }));
    }

    #[test]
    fn rev_parse_prefix_too_short() {
        let odb = InMemoryOdb::new();
        let digest = odb.insert(ObjectKind::Blob, b"y");
        let err = odb.rev_parse(&digest.to_hex()[..3]).unwrap_err();
        assert!(matches!(err, OdbError::RevNotFound { .. }));
    }

    #[test]
    fn rev_parse_full_hex_missing() {
        let odb = InMemoryOdb::new();
        let absent = Digest::from([0xaa; 20]);
        let err = odb.rev_parse(&absent.to_hex()).unwrap_err();
        assert!(matches!(err, OdbError::RevNotFound { .. }));
    }

    // -----------------------------------------------------------------------
    // Working tree
    // -----------------------------------------------------------------------

    #[test]
    fn root_path_bare() {
        let odb = InMemoryOdb::new();
        assert!(matches!(odb.root_path(), Err(OdbError::BareRepository)));
    }

    #[test]
    fn root_path_with_workdir() {
        let odb = InMemoryOdb::with_workdir("/tmp/work");
        assert_eq!(odb.root_path().unwrap(), PathBuf::from("/tmp/work"));
    }

    // -----------------------------------------------------------------------
    // Utilities
    // -----------------------------------------------------------------------

    #[test]
    fn len_is_empty_clear() {
        let odb = InMemoryOdb::new();
        assert!(odb.is_empty());
        odb.insert(ObjectKind::Blob, b"a");
        odb.insert_ref("refs/heads/main", Digest::from([1u8; 20]));
        assert_eq!(odb.len(), 1);

        odb.clear();
        assert!(odb.is_empty());
        assert!(matches!(
            odb.rev_parse("refs/heads/main"),
            Err(OdbError::RevNotFound { .. })
        ));
    }

    #[test]
    fn debug_format() {
        let odb = InMemoryOdb::new();
        let debug = format!("{odb:?}");
        assert!(debug.contains("InMemoryOdb"));
        assert!(debug.contains("bare: true"));
    }
}
