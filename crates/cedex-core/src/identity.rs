//! # Identity Allocator
//!
//! Maps source handles to export ids.
//!
//! Ids are handed out in strictly increasing order. A handle keeps the first
//! id it receives: `allocate` is idempotent and `alias` never rebinds. The
//! only way to jump ahead of the counter is `preassign`, which must land
//! strictly above the current maximum.

use crate::{CedexError, ExportId, SourceHandle};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// The identity table of one export run.
#[derive(Debug, Clone, Default)]
pub struct IdentityAllocator {
    table: BTreeMap<SourceHandle, ExportId>,
    max: ExportId,
}

impl IdentityAllocator {
    /// Create an empty table. The first id handed out is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest id handed out so far.
    #[must_use]
    pub fn max(&self) -> ExportId {
        self.max
    }

    /// Number of handles with an id.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True if no handle has an id.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn bump(&mut self) -> Result<ExportId, CedexError> {
        let next = self.max.checked_next().ok_or(CedexError::IdSpaceExhausted)?;
        self.max = next;
        Ok(next)
    }

    /// Id of `handle`, allocating the next id on first use.
    pub fn allocate(&mut self, handle: impl Into<SourceHandle>) -> Result<ExportId, CedexError> {
        let handle = handle.into();
        if let Some(&id) = self.table.get(&handle) {
            return Ok(id);
        }
        let id = self.bump()?;
        self.table.insert(handle, id);
        Ok(id)
    }

    /// Reserve the next id without binding it to a handle.
    pub fn allocate_anonymous(&mut self) -> Result<ExportId, CedexError> {
        self.bump()
    }

    /// Bind `handle` to an id above the current maximum.
    ///
    /// The maximum moves up to `id`. Ids skipped over are never reused.
    pub fn preassign(
        &mut self,
        handle: impl Into<SourceHandle>,
        id: ExportId,
    ) -> Result<(), CedexError> {
        let handle = handle.into();
        if id <= self.max {
            return Err(CedexError::OrderingViolation {
                id: id.value(),
                max: self.max.value(),
            });
        }
        if let Some(&existing) = self.table.get(&handle) {
            return Err(CedexError::AlreadyAssigned { handle, existing });
        }
        self.table.insert(handle, id);
        self.max = id;
        Ok(())
    }

    /// Raise the maximum to `id` without binding anything.
    ///
    /// Used after a block of reserved slots where some slots were left
    /// unbound. Lower values are ignored.
    pub fn advance_to(&mut self, id: ExportId) {
        if id > self.max {
            self.max = id;
        }
    }

    /// Id of `handle`, if it has one.
    #[must_use]
    pub fn lookup(&self, handle: impl Into<SourceHandle>) -> Option<ExportId> {
        self.table.get(&handle.into()).copied()
    }

    /// Id of `handle`. A handle without an id is `Unresolved`.
    pub fn resolve(&self, handle: impl Into<SourceHandle>) -> Result<ExportId, CedexError> {
        let handle = handle.into();
        self.table
            .get(&handle)
            .copied()
            .ok_or_else(|| CedexError::Unresolved(handle.to_string()))
    }

    /// Bind `handle` to an existing id. No-op if `handle` already has one.
    ///
    /// Returns true if a binding was added.
    pub fn alias(&mut self, handle: impl Into<SourceHandle>, id: ExportId) -> bool {
        match self.table.entry(handle.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(id);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditId, FeatureId, LocationId};

    #[test]
    fn allocate_is_idempotent() {
        let mut ids = IdentityAllocator::new();
        let a = ids.allocate(FeatureId(4)).expect("allocate");
        let b = ids.allocate(FeatureId(4)).expect("allocate");
        assert_eq!(a, b);
        assert_eq!(a, ExportId(1));
        assert_eq!(ids.max(), ExportId(1));
    }

    #[test]
    fn allocation_is_strictly_increasing() {
        let mut ids = IdentityAllocator::new();
        let a = ids.allocate(EditId(0)).expect("a");
        let b = ids.allocate_anonymous().expect("b");
        let c = ids.allocate(FeatureId(0)).expect("c");
        assert!(a < b && b < c);
    }

    #[test]
    fn preassign_moves_max_and_rejects_low_ids() {
        let mut ids = IdentityAllocator::new();
        ids.allocate(FeatureId(1)).expect("allocate");
        ids.preassign(FeatureId(2), ExportId(5)).expect("preassign");
        assert_eq!(ids.max(), ExportId(5));
        assert_eq!(ids.allocate(FeatureId(3)).expect("next"), ExportId(6));

        let err = ids.preassign(FeatureId(9), ExportId(6));
        assert_eq!(err, Err(CedexError::OrderingViolation { id: 6, max: 6 }));
        assert_eq!(ids.lookup(FeatureId(9)), None);
    }

    #[test]
    fn preassign_rejects_numbered_handles() {
        let mut ids = IdentityAllocator::new();
        let first = ids.allocate(FeatureId(1)).expect("allocate");
        let err = ids.preassign(FeatureId(1), ExportId(10));
        assert_eq!(
            err,
            Err(CedexError::AlreadyAssigned {
                handle: SourceHandle::Feature(FeatureId(1)),
                existing: first,
            })
        );
        assert_eq!(ids.max(), ExportId(1));
    }

    #[test]
    fn resolve_never_allocates() {
        let mut ids = IdentityAllocator::new();
        assert!(matches!(
            ids.resolve(FeatureId(1)),
            Err(CedexError::Unresolved(_))
        ));
        assert!(ids.is_empty());
        let id = ids.allocate(FeatureId(1)).expect("allocate");
        assert_eq!(ids.resolve(FeatureId(1)), Ok(id));
    }

    #[test]
    fn alias_keeps_existing_binding() {
        let mut ids = IdentityAllocator::new();
        let a = ids.allocate(LocationId(1)).expect("a");
        let b = ids.allocate(LocationId(2)).expect("b");

        assert!(!ids.alias(LocationId(1), b));
        assert_eq!(ids.resolve(LocationId(1)), Ok(a));

        assert!(ids.alias(LocationId(3), a));
        assert_eq!(ids.resolve(LocationId(3)), Ok(a));
        assert_eq!(ids.max(), b);
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn advance_to_never_lowers_max() {
        let mut ids = IdentityAllocator::new();
        ids.advance_to(ExportId(4));
        ids.advance_to(ExportId(2));
        assert_eq!(ids.max(), ExportId(4));
        assert_eq!(ids.allocate_anonymous().expect("next"), ExportId(5));
    }
}
