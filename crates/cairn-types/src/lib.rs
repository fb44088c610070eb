//! Foundation types for cairn.
//!
//! This crate provides the identity and classification types shared by every
//! other cairn crate. It holds no behavior beyond the types themselves.
//!
//! # Key Types
//!
//! - [`Digest`] — 20-byte content-addressed object identifier
//! - [`ObjectKind`] — closed set of object kinds (blob, tree, commit, tag)
//! - [`EntryMode`] — permission/type bits for tree entries
//! - [`TypeError`] — construction and parsing failures

pub mod digest;
pub mod error;
pub mod kind;
pub mod mode;

pub use digest::Digest;
pub use error::TypeError;
pub use kind::ObjectKind;
pub use mode::EntryMode;
