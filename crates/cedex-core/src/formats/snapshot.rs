//! # Binary Snapshots
//!
//! A frozen copy of a `MemoryModel`, so a legacy history captured once can be
//! exported repeatedly without the editor that produced it.
//!
//! Format: Header (5 bytes) + postcard-serialized model.
//! - 4 bytes: Magic ("CEDX")
//! - 1 byte: Version
//!
//! The size limit and the header are checked before the payload is decoded.

use crate::CedexError;
use crate::primitives::{MAX_SNAPSHOT_SIZE, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
use crate::source::MemoryModel;

/// Header length in bytes.
const HEADER_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The snapshot header precedes the model payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Header for the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), CedexError> {
        if &self.magic != SNAPSHOT_MAGIC {
            return Err(CedexError::SerializationError(
                "Not a source model snapshot".to_string(),
            ));
        }
        if self.version != SNAPSHOT_VERSION {
            return Err(CedexError::SerializationError(format!(
                "Unsupported snapshot version: {} (expected {})",
                self.version, SNAPSHOT_VERSION
            )));
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CedexError> {
        let Some(head) = bytes.get(..HEADER_SIZE) else {
            return Err(CedexError::SerializationError(
                "Snapshot header too short".to_string(),
            ));
        };
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&head[0..4]);
        Ok(Self {
            magic,
            version: head[4],
        })
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION
// =============================================================================

/// Serialize a model to snapshot bytes.
pub fn model_to_bytes(model: &MemoryModel) -> Result<Vec<u8>, CedexError> {
    let payload =
        postcard::to_stdvec(model).map_err(|e| CedexError::SerializationError(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(&SnapshotHeader::new().to_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Deserialize a model from snapshot bytes.
pub fn model_from_bytes(bytes: &[u8]) -> Result<MemoryModel, CedexError> {
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(CedexError::SerializationError(format!(
            "Snapshot of {} bytes exceeds the {} byte limit",
            bytes.len(),
            MAX_SNAPSHOT_SIZE
        )));
    }

    let header = SnapshotHeader::from_bytes(bytes)?;
    header.validate()?;

    postcard::from_bytes(&bytes[HEADER_SIZE..]).map_err(|e| {
        CedexError::SerializationError(format!("Failed to decode source model: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{EditKind, NewPoint, Position, SourceModel};
    use chrono::NaiveDate;

    fn sample() -> MemoryModel {
        let when = NaiveDate::from_ymd_opt(2001, 2, 3)
            .and_then(|d| d.and_hms_opt(4, 5, 6))
            .expect("time");
        let mut m = MemoryModel::new("sample.cedx");
        let s = m.add_session("ann", when, when);
        let t = m.add_tile(None);
        let loc = m.add_location(t, Position::from_units(7, 8)).expect("loc");
        let e = m.next_edit_id();
        let p = m.add_point(e, "pt", loc).expect("point");
        m.add_edit(s, EditKind::NewPoint(NewPoint { point: p }), vec![p])
            .expect("edit");
        m
    }

    #[test]
    fn snapshot_restores_the_model() {
        let model = sample();
        let bytes = model_to_bytes(&model).expect("encode");
        assert_eq!(&bytes[0..4], SNAPSHOT_MAGIC);

        let restored = model_from_bytes(&bytes).expect("decode");
        assert_eq!(restored, model);
        assert_eq!(restored.map_name(), "sample.cedx");
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut bytes = model_to_bytes(&sample()).expect("encode");
        bytes[0..4].copy_from_slice(b"KREM");
        assert!(matches!(
            model_from_bytes(&bytes),
            Err(CedexError::SerializationError(_))
        ));
    }

    #[test]
    fn future_version_is_rejected() {
        let mut bytes = model_to_bytes(&sample()).expect("encode");
        bytes[4] = SNAPSHOT_VERSION + 1;
        let err = model_from_bytes(&bytes).expect_err("version");
        assert!(err.to_string().contains("Unsupported snapshot version"));
    }

    #[test]
    fn truncated_header_is_rejected() {
        assert!(model_from_bytes(b"CED").is_err());
    }
}
