//! # Export Driver
//!
//! Orchestrates one export run over a source model.
//!
//! The run owns the identity table and the alias index for its whole
//! lifetime. Output order:
//! 1. Prologue: project creation, a pseudo session, the ID group ranges, the
//!    synthesized points, end of the pseudo session.
//! 2. Every non-empty session: start event, its edits, end event.
//!
//! Every id is allocated in emission order, so the ids of top-level records
//! strictly increase through the log.

use crate::alias::LocationAliasIndex;
use crate::catalog::Catalog;
use crate::identity::IdentityAllocator;
use crate::mappings::{ExportSettings, Mappings};
use crate::records::{
    ChangeHeader, EditRecord, EndSessionEvent, ExportRecord, IdAllocation, NewProjectEvent,
    NewSessionEvent,
};
use crate::source::{Session, SourceModel};
use crate::synth::ExtraPointSynthesizer;
use crate::writer::{Field, RecordWriter};
use crate::{CedexError, ExportId};
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

// =============================================================================
// RESULTS
// =============================================================================

/// Counters of one export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStats {
    pub sessions_written: usize,
    pub sessions_skipped: usize,
    pub edits: usize,
    /// Top-level records in the log, prologue included.
    pub records: usize,
    pub synthesized_points: usize,
}

/// A complete interchange log held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportLog {
    pub records: Vec<ExportRecord>,
    pub text: String,
    /// Highest id allocated by the run.
    pub last_id: ExportId,
    pub stats: ExportStats,
}

impl ExportLog {
    /// File stem of the log: the id after the last one, as 8 hex digits.
    pub fn file_stem(&self) -> Result<String, CedexError> {
        let next = self
            .last_id
            .checked_next()
            .ok_or(CedexError::IdSpaceExhausted)?;
        Ok(format!("{:08X}", next.value()))
    }
}

// =============================================================================
// DRIVER
// =============================================================================

/// One export run over `model`.
pub struct ExportDriver<'a, M: SourceModel + ?Sized> {
    model: &'a M,
    mappings: &'a Mappings,
    settings: &'a ExportSettings,
}

impl<'a, M: SourceModel + ?Sized> ExportDriver<'a, M> {
    pub fn new(model: &'a M, mappings: &'a Mappings, settings: &'a ExportSettings) -> Self {
        Self {
            model,
            mappings,
            settings,
        }
    }

    /// Run the export and render the log.
    ///
    /// Any error aborts the run; nothing is returned for a partial log.
    pub fn run(&self) -> Result<ExportLog, CedexError> {
        let mut ids = IdentityAllocator::new();
        let mut aliases = LocationAliasIndex::new();
        let mut stats = ExportStats::default();

        let mut records = self.prologue(&mut ids, &mut aliases, &mut stats)?;

        for session in self.model.sessions() {
            if session.is_empty() {
                stats.sessions_skipped += 1;
                continue;
            }
            self.session(session, &mut ids, &mut aliases, &mut records)?;
            stats.sessions_written += 1;
            stats.edits += session.edits.len();
        }
        stats.records = records.len();

        let mut writer = RecordWriter::new();
        for record in &records {
            writer.write_record(Field::Edit, record)?;
        }

        Ok(ExportLog {
            text: writer.finish()?,
            records,
            last_id: ids.max(),
            stats,
        })
    }

    fn prologue(
        &self,
        ids: &mut IdentityAllocator,
        aliases: &mut LocationAliasIndex,
        stats: &mut ExportStats,
    ) -> Result<Vec<ExportRecord>, CedexError> {
        let settings = self.settings;
        let created = settings.created;
        let mut records = Vec::new();

        records.push(ExportRecord::NewProject(NewProjectEvent {
            header: ChangeHeader::new(ids.allocate_anonymous()?, created),
            project_id: settings.project_id.clone(),
            project_name: settings.project_name.clone(),
            layer_id: settings.layer_id,
            coordinate_system: settings.coordinate_system.clone(),
            user_name: settings.user_name.clone(),
            machine_name: settings.machine_name.clone(),
        }));

        records.push(ExportRecord::NewSession(NewSessionEvent {
            header: ChangeHeader::new(ids.allocate_anonymous()?, created),
            user_name: settings.user_name.clone(),
            machine_name: String::new(),
        }));

        for group in self.model.id_groups() {
            let group_id = self.mappings.id_group(&group.name);
            for range in &group.ranges {
                records.push(ExportRecord::IdAllocation(IdAllocation {
                    header: ChangeHeader::new(ids.allocate_anonymous()?, created),
                    group_id,
                    lowest_id: range.min,
                    highest_id: range.max,
                }));
            }
        }

        if let Some(import) = ExtraPointSynthesizer::synthesize(self.model, ids, aliases, created)? {
            stats.synthesized_points = import.features.len();
            records.push(EditRecord::from(import).into());
        }

        records.push(ExportRecord::EndSession(EndSessionEvent {
            header: ChangeHeader::new(ids.allocate_anonymous()?, created),
        }));

        Ok(records)
    }

    fn session(
        &self,
        session: &Session,
        ids: &mut IdentityAllocator,
        aliases: &mut LocationAliasIndex,
        records: &mut Vec<ExportRecord>,
    ) -> Result<(), CedexError> {
        records.push(ExportRecord::NewSession(NewSessionEvent {
            header: ChangeHeader::new(ids.allocate_anonymous()?, session.start),
            user_name: session.user.clone(),
            machine_name: String::new(),
        }));

        {
            let mut catalog = Catalog::new(self.model, self.mappings, ids, aliases);
            for (index, &edit) in session.edits.iter().enumerate() {
                let when = edit_time(session, index)?;
                records.extend(catalog.transform(edit, when)?.into_iter().map(ExportRecord::from));
            }
        }

        records.push(ExportRecord::EndSession(EndSessionEvent {
            header: ChangeHeader::new(ids.allocate_anonymous()?, session.end),
        }));
        Ok(())
    }
}

/// Time stamp of the edit at `index`: the session span is cut into
/// `n + 2` whole-second steps and edit `i` sits at step `i + 1`.
fn edit_time(session: &Session, index: usize) -> Result<NaiveDateTime, CedexError> {
    let steps = session.edits.len() as i64 + 2;
    let step = (session.end - session.start).num_seconds() / steps;
    let offset = TimeDelta::try_seconds(step * (index as i64 + 1))
        .ok_or_else(|| CedexError::InvalidSource("session span out of range".to_string()))?;
    session
        .start
        .checked_add_signed(offset)
        .ok_or_else(|| CedexError::InvalidSource("session span out of range".to_string()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::records::FeatureRecord;
    use crate::source::{
        EditKind, IdGroup, IdRange, LineGeometry, MemoryModel, NewLine, NewPoint, Position,
    };
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2006, 7, 8)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("time")
    }

    fn settings() -> ExportSettings {
        ExportSettings::new("0F1E2D3C", "parcels.cedx", at(23, 0))
    }

    fn export(model: &MemoryModel) -> ExportLog {
        let mappings = Mappings::default();
        let settings = settings();
        ExportDriver::new(model, &mappings, &settings)
            .run()
            .expect("export")
    }

    #[test]
    fn empty_model_writes_only_the_prologue() {
        let log = export(&MemoryModel::new("empty.cedx"));
        // project, pseudo session start, end; the import id is still spent
        assert_eq!(log.records.len(), 3);
        assert_eq!(log.last_id, ExportId(4));
        assert_eq!(log.file_stem().expect("stem"), "00000005");
        assert!(log.text.starts_with("Edit=NewProjectEvent\n{\n\tId=1\n"));
    }

    #[test]
    fn id_ranges_are_announced_in_the_prologue() {
        let mut m = MemoryModel::new("m");
        m.add_id_group(IdGroup {
            name: "lots".to_string(),
            check_digit: false,
            ranges: vec![IdRange { min: 100, max: 199 }, IdRange { min: 500, max: 599 }],
        });
        let log = export(&m);
        let ranges: Vec<(u32, u32)> = log
            .records
            .iter()
            .filter_map(|r| match r {
                ExportRecord::IdAllocation(a) => Some((a.lowest_id, a.highest_id)),
                _ => None,
            })
            .collect();
        assert_eq!(ranges, vec![(100, 199), (500, 599)]);
    }

    #[test]
    fn empty_sessions_are_skipped_without_ids() {
        let mut m = MemoryModel::new("m");
        m.add_session("ann", at(9, 0), at(10, 0));
        m.add_session("bob", at(11, 0), at(12, 0));
        let log = export(&m);
        assert_eq!(log.stats.sessions_skipped, 2);
        assert_eq!(log.stats.sessions_written, 0);
        assert_eq!(log.last_id, ExportId(4));
    }

    #[test]
    fn edits_are_spread_across_the_session() {
        let mut m = MemoryModel::new("m");
        let t = m.add_tile(None);
        let s = m.add_session("ann", at(9, 0), at(10, 0));
        for x in 0..2 {
            let loc = m.add_location(t, Position::from_units(x, 0)).expect("loc");
            let e = m.next_edit_id();
            let p = m.add_point(e, "pt", loc).expect("point");
            m.add_edit(s, EditKind::NewPoint(NewPoint { point: p }), vec![p])
                .expect("edit");
        }

        let log = export(&m);
        let times: Vec<NaiveDateTime> = log
            .records
            .iter()
            .filter_map(|r| match r {
                ExportRecord::Edit(EditRecord::NewPoint(op)) => Some(op.header.when),
                _ => None,
            })
            .collect();
        // 3600 s over 4 steps
        assert_eq!(times, vec![at(9, 15), at(9, 30)]);
        assert_eq!(log.stats.edits, 2);
        assert_eq!(log.stats.sessions_written, 1);
    }

    #[test]
    fn synthesized_points_precede_the_sessions() {
        let mut m = MemoryModel::new("m");
        let t = m.add_tile(None);
        let a = m.add_location(t, Position::from_units(0, 0)).expect("a");
        let b = m.add_location(t, Position::from_units(4, 3)).expect("b");
        let s = m.add_session("ann", at(9, 0), at(10, 0));
        let e = m.next_edit_id();
        let line = m.add_line(e, "road", a, b, LineGeometry::Segment).expect("line");
        m.add_edit(s, EditKind::NewLine(NewLine { line }), vec![line])
            .expect("edit");

        let log = export(&m);
        assert_eq!(log.stats.synthesized_points, 2);

        let ExportRecord::Edit(EditRecord::Import(import)) = &log.records[2] else {
            panic!("third record is the synthetic import");
        };
        let point_ids: Vec<ExportId> = import.features.iter().map(FeatureRecord::id).collect();
        assert_eq!(point_ids, vec![ExportId(4), ExportId(5)]);

        let new_line = log
            .records
            .iter()
            .find_map(|r| match r {
                ExportRecord::Edit(EditRecord::NewLine(op)) => Some(op),
                _ => None,
            })
            .expect("line record");
        assert_eq!((new_line.line.from, new_line.line.to), (ExportId(4), ExportId(5)));
    }

    #[test]
    fn top_level_ids_strictly_increase() {
        let mut m = MemoryModel::new("m");
        let t = m.add_tile(None);
        let s = m.add_session("ann", at(9, 0), at(9, 30));
        for x in 0..4 {
            let loc = m.add_location(t, Position::from_units(x, x)).expect("loc");
            let e = m.next_edit_id();
            let p = m.add_point(e, "pt", loc).expect("point");
            m.add_edit(s, EditKind::NewPoint(NewPoint { point: p }), vec![p])
                .expect("edit");
        }

        let log = export(&m);
        let ids: Vec<ExportId> = log.records.iter().map(ExportRecord::id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
