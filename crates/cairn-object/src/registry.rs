//! The closed kind-to-constructor table.
//!
//! Dispatch from a backend-reported kind to the matching handle variant goes
//! through a fixed table covering exactly the four kinds. The table is built
//! at compile time; there is nothing to register at runtime.

use std::sync::Arc;

use cairn_odb::Odb;
use cairn_types::{Digest, ObjectKind};

use crate::object::{Blob, Commit, Object, Tag, Tree};

/// Constructor producing the handle variant bound to one kind.
pub type Constructor = fn(Arc<dyn Odb>, Digest) -> Object;

fn construct_blob(odb: Arc<dyn Odb>, digest: Digest) -> Object {
    Object::Blob(Blob::new(odb, digest))
}

fn construct_tree(odb: Arc<dyn Odb>, digest: Digest) -> Object {
    Object::Tree(Tree::new(odb, digest))
}

fn construct_commit(odb: Arc<dyn Odb>, digest: Digest) -> Object {
    Object::Commit(Commit::new(odb, digest))
}

fn construct_tag(odb: Arc<dyn Odb>, digest: Digest) -> Object {
    Object::Tag(Tag::new(odb, digest))
}

/// One constructor per kind, in [`ObjectKind::ALL`] order.
const CONSTRUCTORS: [(ObjectKind, Constructor); 4] = [
    (ObjectKind::Blob, construct_blob),
    (ObjectKind::Tree, construct_tree),
    (ObjectKind::Commit, construct_commit),
    (ObjectKind::Tag, construct_tag),
];

/// Look up the constructor for `kind`.
///
/// Total: the table covers every [`ObjectKind`].
pub fn constructor_for(kind: ObjectKind) -> Constructor {
    CONSTRUCTORS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, constructor)| *constructor)
        .expect("constructor table covers every object kind")
}
