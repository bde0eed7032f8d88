//! # Formats
//!
//! Serialized forms of the source model.
//!
//! - `snapshot` — binary snapshots: a 5-byte header then a postcard payload
//!
//! File I/O lives with the callers; everything here works on byte slices.

pub mod snapshot;

pub use snapshot::{SnapshotHeader, model_from_bytes, model_to_bytes};
