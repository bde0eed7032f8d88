//! # cedex-core
//!
//! The deterministic export engine for cedex - THE LOGIC.
//!
//! This crate walks a legacy cadastral edit history once and serializes it
//! into the append-only interchange log read by the successor editor. Every
//! object the log refers to receives a stable integer identity; allocation
//! order is part of the output contract.
//!
//! ## Pipeline
//!
//! - `source` → read-only view of the legacy history
//! - `synth` → pre-pass fabricating points at bare line terminals
//! - `catalog` → one transform per edit kind, producing `records`
//! - `identity` + `alias` → the identity table shared by the transforms
//! - `writer` → the text grammar of the log
//! - `driver` → orchestration of one run; `output` → marker and files
//!
//! ## Architectural Constraints
//!
//! - Single pass, single thread: two allocators racing would renumber
//!   everything downstream
//! - No global state: the allocator is owned by the run and passed down
//! - Deterministic: `BTreeMap`/`BTreeSet` only, no clock reads, no randomness
//! - Silent: the engine returns statistics and leaves logging to the binary

// =============================================================================
// MODULES
// =============================================================================

pub mod alias;
pub mod catalog;
pub mod driver;
pub mod formats;
pub mod identity;
pub mod mappings;
pub mod output;
pub mod primitives;
pub mod records;
pub mod source;
pub mod synth;
pub mod types;
pub mod writer;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{CedexError, CircleId, EditId, ExportId, FeatureId, LocationId, SourceHandle, TileId};

// =============================================================================
// RE-EXPORTS: Export Engine
// =============================================================================

pub use alias::{LocationAliasIndex, coincident_handles};
pub use catalog::Catalog;
pub use driver::{ExportDriver, ExportLog, ExportStats};
pub use identity::IdentityAllocator;
pub use mappings::{ExportSettings, Mappings, parse_mapping_file};
pub use output::{ExportOutcome, ExportTarget, atomic_write};
pub use source::{MemoryModel, SourceModel};
pub use synth::ExtraPointSynthesizer;
pub use writer::{Field, Record, RecordWriter};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{SnapshotHeader, model_from_bytes, model_to_bytes};
