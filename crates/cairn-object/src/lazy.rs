//! Deferred-field resolution: a slot that stays empty until first read.

use std::fmt;
use std::sync::OnceLock;

/// A field resolved on first access instead of at construction.
///
/// The slot starts unresolved. The first successful [`get_or_resolve`] call
/// invokes the resolver, memoizes its value, and every later call returns the
/// cached value without further work. A failed resolution leaves the slot
/// unresolved, so the read can be retried.
///
/// Concurrent first reads may invoke the resolver redundantly; the first
/// stored value wins. Callers use this for values that are pure functions of
/// immutable state (a digest), so the race is benign: every contender
/// computed the same value.
///
/// [`get_or_resolve`]: LazyField::get_or_resolve
pub struct LazyField<T> {
    slot: OnceLock<T>,
}

impl<T> LazyField<T> {
    /// An unresolved slot.
    pub fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// A slot already holding `value`; no resolver will ever run.
    pub fn resolved(value: T) -> Self {
        let slot = OnceLock::new();
        let _ = slot.set(value);
        Self { slot }
    }

    /// Populate the slot if it is still unresolved; a no-op otherwise.
    pub fn preset(&self, value: T) {
        let _ = self.slot.set(value);
    }

    /// The cached value, if resolution has happened.
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    /// Returns `true` once a value is cached.
    pub fn is_resolved(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Return the cached value, resolving and memoizing on first access.
    ///
    /// `resolve` runs only when the slot is unresolved. Its error propagates
    /// unchanged and leaves the slot unresolved.
    pub fn get_or_resolve<E>(&self, resolve: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        if let Some(value) = self.slot.get() {
            return Ok(value);
        }
        let value = resolve()?;
        // A concurrent resolver may have filled the slot meanwhile; keep the
        // first stored value.
        Ok(self.slot.get_or_init(|| value))
    }
}

impl<T> Default for LazyField<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LazyField<T> {
    fn clone(&self) -> Self {
        match self.slot.get() {
            Some(value) => Self::resolved(value.clone()),
            None => Self::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.get() {
            Some(value) => write!(f, "LazyField({value:?})"),
            None => write!(f, "LazyField(<unresolved>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn starts_unresolved() {
        let field: LazyField<u64> = LazyField::new();
        assert!(!field.is_resolved());
        assert_eq!(field.get(), None);
    }

    #[test]
    fn resolves_once_and_memoizes() {
        let field: LazyField<u64> = LazyField::new();
        let calls = Cell::new(0u32);
        let resolve = || -> Result<u64, ()> {
            calls.set(calls.get() + 1);
            Ok(42)
        };

        assert_eq!(*field.get_or_resolve(resolve).unwrap(), 42);
        assert_eq!(*field.get_or_resolve(resolve).unwrap(), 42);
        assert_eq!(calls.get(), 1);
        assert!(field.is_resolved());
    }

    #[test]
    fn resolved_skips_resolver() {
        let field = LazyField::resolved(7u64);
        let value = field
            .get_or_resolve(|| -> Result<u64, ()> { panic!("resolver must not run") })
            .unwrap();
        assert_eq!(*value, 7);
    }

    #[test]
    fn preset_fills_empty_slot_only() {
        let field: LazyField<u64> = LazyField::new();
        field.preset(1);
        field.preset(2);
        assert_eq!(field.get(), Some(&1));
    }

    #[test]
    fn failed_resolution_leaves_slot_unresolved() {
        let field: LazyField<u64> = LazyField::new();
        let err = field
            .get_or_resolve(|| -> Result<u64, &str> { Err("backend down") })
            .unwrap_err();
        assert_eq!(err, "backend down");
        assert!(!field.is_resolved());

        // A retry can still succeed.
        assert_eq!(
            *field.get_or_resolve(|| -> Result<u64, &str> { Ok(9) }).unwrap(),
            9
        );
    }

    #[test]
    fn clone_copies_resolution_state() {
        let unresolved: LazyField<u64> = LazyField::new();
        assert!(!unresolved.clone().is_resolved());

        let resolved = LazyField::resolved(5u64);
        assert_eq!(resolved.clone().get(), Some(&5));
    }

    #[test]
    fn debug_shows_state() {
        let field: LazyField<u64> = LazyField::new();
        assert_eq!(format!("{field:?}"), "LazyField(<unresolved>)");
        field.preset(3);
        assert_eq!(format!("{field:?}"), "LazyField(3)");
    }
}
