//! # Operation Catalog
//!
//! One transform per edit kind, turning a source edit into zero or more
//! operation records.
//!
//! Every transform follows the same protocol:
//! - the edit's own id is taken first
//! - objects the edit creates are numbered in the order their records are
//!   built, or reserved in a contiguous block where the log needs them ahead
//!   of time
//! - objects the edit refers to must already carry an id
//!
//! The dispatch is a closed match over `EditKind`. The deprecated set theme
//! edit has no export form and aborts the run.

mod creation;
mod features;
mod intersection;
mod observations;
mod subdivision;
mod update;

use crate::alias::LocationAliasIndex;
use crate::identity::IdentityAllocator;
use crate::mappings::Mappings;
use crate::records::{ChangeHeader, EditRecord};
use crate::source::{Edit, EditKind, SourceModel};
use crate::{CedexError, EditId, ExportId, FeatureId};
use chrono::NaiveDateTime;

/// Mutable state shared by the transforms of one export run.
pub struct Catalog<'a, M: SourceModel + ?Sized> {
    model: &'a M,
    mappings: &'a Mappings,
    ids: &'a mut IdentityAllocator,
    aliases: &'a mut LocationAliasIndex,
}

impl<'a, M: SourceModel + ?Sized> Catalog<'a, M> {
    pub fn new(
        model: &'a M,
        mappings: &'a Mappings,
        ids: &'a mut IdentityAllocator,
        aliases: &'a mut LocationAliasIndex,
    ) -> Self {
        Self {
            model,
            mappings,
            ids,
            aliases,
        }
    }

    /// Highest id handed out so far.
    #[must_use]
    pub fn max_id(&self) -> ExportId {
        self.ids.max()
    }

    /// Transform one edit stamped at `when`.
    ///
    /// Most kinds produce exactly one record. A two-faced line subdivision
    /// produces two; an empty deletion produces none.
    pub fn transform(
        &mut self,
        edit_id: EditId,
        when: NaiveDateTime,
    ) -> Result<Vec<EditRecord>, CedexError> {
        let model = self.model;
        let edit = model.edit(edit_id)?;

        let record: EditRecord = match &edit.kind {
            EditKind::Import(op) | EditKind::GetBackground(op) => {
                self.import(edit_id, edit, op, when)?.into()
            }
            EditKind::GetControl => self.get_control(edit_id, edit, when)?.into(),
            EditKind::LineSubdivision(op) => return self.line_subdivision(edit_id, edit, op, when),
            EditKind::PointOnLine(op) => self.point_on_line(edit_id, op, when)?.into(),
            EditKind::IntersectTwoDirections(op) => {
                self.intersect_two_directions(edit_id, op, when)?.into()
            }
            EditKind::IntersectTwoDistances(op) => {
                self.intersect_two_distances(edit_id, op, when)?.into()
            }
            EditKind::IntersectDirectionAndDistance(op) => {
                self.intersect_direction_and_distance(edit_id, op, when)?.into()
            }
            EditKind::IntersectTwoLines(op) => self.intersect_two_lines(edit_id, op, when)?.into(),
            EditKind::IntersectDirectionAndLine(op) => {
                self.intersect_direction_and_line(edit_id, op, when)?.into()
            }
            EditKind::NewPoint(op) => self.new_point(edit_id, op, when)?.into(),
            EditKind::NewLine(op) => self.new_line(edit_id, op, when)?.into(),
            EditKind::NewText(op) => self.new_text(edit_id, op, when)?.into(),
            EditKind::NewCircle(op) => self.new_circle(edit_id, op, when)?.into(),
            EditKind::Path(op) => self.path(edit_id, edit, op, when)?.into(),
            EditKind::Radial(op) => self.radial(edit_id, op, when)?.into(),
            EditKind::LineExtension(op) => self.line_extension(edit_id, op, when)?.into(),
            EditKind::Parallel(op) => self.parallel(edit_id, op, when)?.into(),
            EditKind::AttachPoint(op) => self.attach_point(edit_id, op, when)?.into(),
            EditKind::MoveText(op) => self.move_text(edit_id, op, when)?.into(),
            EditKind::SetTextRotation(op) => self.text_rotation(edit_id, op, when)?.into(),
            EditKind::Deletion(op) => match self.deletion(edit_id, op, when)? {
                Some(record) => record.into(),
                None => return Ok(Vec::new()),
            },
            EditKind::PolygonSubdivision(op) => {
                self.polygon_subdivision(edit_id, edit, op, when)?.into()
            }
            EditKind::SetTopology(op) => self.set_topology(edit_id, op, when)?.into(),
            EditKind::Trim(op) => self.trim(edit_id, op, when)?.into(),
            EditKind::SetTheme => {
                return Err(CedexError::UnsupportedOperationKind {
                    kind: edit.kind.name().to_string(),
                    sequence: edit.sequence,
                });
            }
        };

        Ok(vec![record])
    }

    // -------------------------------------------------------------------------
    // Identity helpers
    // -------------------------------------------------------------------------

    /// Header carrying the edit's own id.
    fn header(&mut self, edit_id: EditId, when: NaiveDateTime) -> Result<ChangeHeader, CedexError> {
        let id = self.ids.allocate(edit_id)?;
        Ok(ChangeHeader::new(id, when))
    }

    /// Id of a feature the edit creates, allocated on first use.
    ///
    /// Numbering a point also binds every location record coincident with it.
    fn number(&mut self, feature: FeatureId) -> Result<ExportId, CedexError> {
        let id = self.ids.allocate(feature)?;
        self.bind_locations(feature, id)?;
        Ok(id)
    }

    fn bind_locations(&mut self, feature: FeatureId, id: ExportId) -> Result<(), CedexError> {
        if let Some(location) = self.model.feature(feature)?.point_location() {
            self.aliases
                .bind_point(self.model, self.ids, location, id)?;
        }
        Ok(())
    }

    /// Take the next id slot, binding it to `feature` when given one that
    /// has no id yet. The slot is consumed either way.
    fn reserve_slot(&mut self, feature: Option<FeatureId>) -> Result<ExportId, CedexError> {
        let slot = self
            .ids
            .max()
            .checked_next()
            .ok_or(CedexError::IdSpaceExhausted)?;
        match feature {
            Some(f) if self.ids.lookup(f).is_none() => {
                self.ids.preassign(f, slot)?;
                self.bind_locations(f, slot)?;
            }
            _ => self.ids.advance_to(slot),
        }
        Ok(slot)
    }

    /// Id of an object the edit refers to.
    fn reference(&self, feature: FeatureId) -> Result<ExportId, CedexError> {
        self.ids.resolve(feature)
    }

    fn optional_reference(&self, feature: Option<FeatureId>) -> Result<Option<ExportId>, CedexError> {
        feature.map(|f| self.reference(f)).transpose()
    }

    /// Mapped entity id of a feature.
    fn entity_of(&self, feature: FeatureId) -> Result<u32, CedexError> {
        Ok(self.mappings.entity(&self.model.feature(feature)?.entity))
    }
}

/// True if `feature` was created by `edit`.
fn created_by<M: SourceModel + ?Sized>(
    model: &M,
    feature: FeatureId,
    edit: EditId,
) -> Result<bool, CedexError> {
    Ok(model.feature(feature)?.creator == edit)
}

/// Features of an edit with points moved ahead of everything else.
fn points_first<M: SourceModel + ?Sized>(
    model: &M,
    edit: &Edit,
) -> Result<Vec<FeatureId>, CedexError> {
    let mut points = Vec::new();
    let mut others = Vec::new();
    for &f in &edit.features {
        if model.feature(f)?.is_point() {
            points.push(f);
        } else {
            others.push(f);
        }
    }
    points.extend(others);
    Ok(points)
}
