//! # Core Type Definitions
//!
//! This module contains the identity types shared by every component of the
//! export engine:
//! - Source model handles (`EditId`, `FeatureId`, `LocationId`, `TileId`, `CircleId`)
//! - The identity-table key (`SourceHandle`)
//! - The integer identity written to the log (`ExportId`)
//! - Error types (`CedexError`)
//!
//! ## Determinism Guarantees
//!
//! All identifier types implement `Ord` so that they can key `BTreeMap` and
//! `BTreeSet` collections. Iteration order never depends on hashing.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// SOURCE MODEL HANDLES
// =============================================================================

/// Handle of an edit (operation) in the source model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EditId(pub u32);

/// Handle of a spatial feature (point, line or text) in the source model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub u32);

/// Handle of a location record. Several location records may share the
/// same coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationId(pub u32);

/// Handle of a spatial index tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// Handle of a circle that arcs may lie on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CircleId(pub u32);

// =============================================================================
// SOURCE HANDLE
// =============================================================================

/// Key of the identity table.
///
/// Identity is handle equality: two location records at the same position
/// are different handles, and only the alias index relates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceHandle {
    /// An edit of the source history.
    Edit(EditId),
    /// A point, line or text feature.
    Feature(FeatureId),
    /// A location record (used for line terminals).
    Location(LocationId),
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edit(id) => write!(f, "edit #{}", id.0),
            Self::Feature(id) => write!(f, "feature #{}", id.0),
            Self::Location(id) => write!(f, "location #{}", id.0),
        }
    }
}

impl From<EditId> for SourceHandle {
    fn from(id: EditId) -> Self {
        Self::Edit(id)
    }
}

impl From<FeatureId> for SourceHandle {
    fn from(id: FeatureId) -> Self {
        Self::Feature(id)
    }
}

impl From<LocationId> for SourceHandle {
    fn from(id: LocationId) -> Self {
        Self::Location(id)
    }
}

// =============================================================================
// EXPORT ID
// =============================================================================

/// Integer identity of an object in the exported log.
///
/// Identities are strictly increasing across one export run. Zero is
/// reserved and means "no reference".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct ExportId(pub u32);

impl ExportId {
    /// The reserved "no reference" value.
    pub const NONE: Self = Self(0);

    /// Get the raw value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// True for the reserved zero id.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// The id that follows this one, if the 32-bit space is not exhausted.
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Error type for export operations.
///
/// Every variant except `AlreadyExported` aborts the whole export: a
/// half-written interchange log cannot be resumed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CedexError {
    /// A reference was resolved against a handle that was never numbered.
    #[error("Unresolved reference: {0}")]
    Unresolved(String),

    /// A pre-assignment was attempted at or below the current maximum id.
    #[error("Ordering violation: id {id} is not above the current maximum {max}")]
    OrderingViolation { id: u32, max: u32 },

    /// A pre-assignment targeted a handle that already carries an id.
    #[error("{handle} already carries export id {existing}")]
    AlreadyAssigned {
        handle: SourceHandle,
        existing: ExportId,
    },

    /// All 32-bit export ids have been consumed.
    #[error("Export id space exhausted")]
    IdSpaceExhausted,

    /// The edit kind has no counterpart in the interchange log.
    #[error("Cannot process {kind} edit (sequence {sequence})")]
    UnsupportedOperationKind { kind: String, sequence: u32 },

    /// The map has an index marker from an earlier export.
    #[error("Map has been exported previously: {0}")]
    AlreadyExported(String),

    /// The source model is internally inconsistent.
    #[error("Invalid source model: {0}")]
    InvalidSource(String),

    /// The record writer was driven out of balance.
    #[error("Writer error: {0}")]
    Writer(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl CedexError {
    /// True for the clean refusal raised by the export marker guard.
    #[must_use]
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::AlreadyExported(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_id_zero_is_none() {
        assert!(ExportId::NONE.is_none());
        assert!(ExportId::default().is_none());
        assert!(!ExportId(1).is_none());
    }

    #[test]
    fn export_id_checked_next_stops_at_max() {
        assert_eq!(ExportId(7).checked_next(), Some(ExportId(8)));
        assert_eq!(ExportId(u32::MAX).checked_next(), None);
    }

    #[test]
    fn source_handles_order_by_kind_then_index() {
        let a = SourceHandle::Edit(EditId(9));
        let b = SourceHandle::Feature(FeatureId(1));
        let c = SourceHandle::Location(LocationId(0));
        assert!(a < b);
        assert!(b < c);
        assert_eq!(SourceHandle::from(FeatureId(3)), SourceHandle::Feature(FeatureId(3)));
    }

    #[test]
    fn handle_display_names_kind() {
        assert_eq!(SourceHandle::Location(LocationId(4)).to_string(), "location #4");
        assert_eq!(SourceHandle::Edit(EditId(2)).to_string(), "edit #2");
    }

    #[test]
    fn only_marker_error_is_refusal() {
        assert!(CedexError::AlreadyExported("m".to_string()).is_refusal());
        assert!(!CedexError::Unresolved("x".to_string()).is_refusal());
    }
}
