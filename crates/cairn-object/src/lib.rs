//! Typed object handles for cairn.
//!
//! This crate turns an opaque 20-byte digest into a typed, lazily-populated
//! handle onto data held by an object-database backend. A handle owns nothing
//! but its digest; everything else (size, data) is fetched from the shared
//! backend on demand and memoized.
//!
//! # Key Types
//!
//! - [`Object`] — closed union of the four typed handles
//! - [`Blob`], [`Tree`], [`Commit`], [`Tag`] — the handles, each permanently
//!   bound to one [`ObjectKind`](cairn_types::ObjectKind)
//! - [`TreeEntry`] — a handle plus the positional metadata (path, mode) it
//!   carries inside a directory listing
//! - [`LazyField`] — the deferred-field primitive behind `size` memoization
//!
//! # Identity
//!
//! Handles are equal exactly when their digests are byte-equal, regardless of
//! variant. [`TreeEntry`] keeps that equality but hashes by `path`; see its
//! `Hash` impl before using it in hashed collections.

pub mod entry;
pub mod error;
pub mod lazy;
pub mod object;
pub mod registry;

pub use entry::TreeEntry;
pub use error::{ObjectError, ObjectResult};
pub use lazy::LazyField;
pub use object::{Blob, Commit, Object, Tag, Tree};
pub use registry::{constructor_for, Constructor};
