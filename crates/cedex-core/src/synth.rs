//! # Extra-Point Synthesizer
//!
//! The legacy editor let a line end on a bare location record with no point
//! feature on it. The log requires a point at both ends of every line, so a
//! pre-pass over the whole history fabricates one for each such terminal.
//!
//! - Point features register their full coincidence group. They are not
//!   numbered here; their owning edit numbers them later.
//! - Line terminals whose group is unregistered get a fabricated point,
//!   numbered on the spot through the location handle.
//! - Lines of a circle edit with a typed radius are skipped: that edit
//!   creates its own closing point.
//!
//! The fabricated points are emitted as one import ahead of the sessions.

use crate::alias::LocationAliasIndex;
use crate::identity::IdentityAllocator;
use crate::records::{ChangeHeader, FeatureRecord, FeatureStub, ImportOperation, PointFeature};
use crate::source::{Edit, EditKind, Length, SourceModel};
use crate::{CedexError, LocationId};
use chrono::NaiveDateTime;

/// Pre-pass producing the synthetic import.
pub struct ExtraPointSynthesizer;

impl ExtraPointSynthesizer {
    /// Scan every session and build the synthetic import.
    ///
    /// The import's own id is taken before any point, and is spent even when
    /// no point is needed. Returns `None` in that case.
    pub fn synthesize<M: SourceModel + ?Sized>(
        model: &M,
        ids: &mut IdentityAllocator,
        aliases: &mut LocationAliasIndex,
        when: NaiveDateTime,
    ) -> Result<Option<ImportOperation>, CedexError> {
        let header = ChangeHeader::new(ids.allocate_anonymous()?, when);
        let mut features = Vec::new();

        for session in model.sessions() {
            for &edit_id in &session.edits {
                let edit = model.edit(edit_id)?;

                for &f in &edit.features {
                    if let Some(location) = model.feature(f)?.point_location() {
                        aliases.register(model, location)?;
                    }
                }

                if !checks_terminals(edit) {
                    continue;
                }

                for &f in &edit.features {
                    if let Some((start, end)) = model.feature(f)?.line_terminals() {
                        for terminal in [start, end] {
                            if let Some(point) = Self::extra_point(model, ids, aliases, terminal)? {
                                features.push(FeatureRecord::Point(point));
                            }
                        }
                    }
                }
            }
        }

        if features.is_empty() {
            return Ok(None);
        }
        Ok(Some(ImportOperation {
            header,
            source: String::new(),
            features,
        }))
    }

    /// Fabricate a point for `terminal` unless its group is already known.
    fn extra_point<M: SourceModel + ?Sized>(
        model: &M,
        ids: &mut IdentityAllocator,
        aliases: &mut LocationAliasIndex,
        terminal: LocationId,
    ) -> Result<Option<PointFeature>, CedexError> {
        if aliases.is_registered(terminal) {
            return Ok(None);
        }
        let id = ids.allocate(terminal)?;
        aliases.bind_point(model, ids, terminal, id)?;
        Ok(Some(PointFeature {
            stub: FeatureStub {
                id,
                entity: 0,
                key: None,
            },
            position: model.location(terminal)?.position,
        }))
    }
}

/// A circle with a typed radius supplies its own closing point.
fn checks_terminals(edit: &Edit) -> bool {
    !matches!(
        &edit.kind,
        EditKind::NewCircle(op) if matches!(op.radius, Length::Distance(_))
    )
}
