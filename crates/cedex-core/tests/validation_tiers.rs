//! # Validation Tier Tests (T0-T3)
//!
//! If ANY tier fails, the exported log cannot be trusted.
//!
//! ## Tiers
//! - T0: Identity Integrity
//! - T1: Log Grammar
//! - T2: History Scenarios
//! - T3: Export Idempotency

use cedex_core::records::{EditRecord, ExportRecord};
use cedex_core::source::{
    Deletion, EditKind, LineGeometry, LineSubdivision, NewLine, NewPoint, Position,
    SubdivisionFace, SubdivisionSection,
};
use cedex_core::{
    CedexError, EditId, ExportDriver, ExportId, ExportLog, ExportSettings, ExportTarget,
    FeatureId, IdentityAllocator, LocationId, LocationAliasIndex, Mappings, MemoryModel,
    SourceModel, TileId,
};
use chrono::{NaiveDate, NaiveDateTime};

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2007, 11, 20)
        .and_then(|d| d.and_hms_opt(h, m, 0))
        .expect("time")
}

fn settings() -> ExportSettings {
    ExportSettings::new("6F9619FF-8B86-D011-B42D-00C04FC964FF", "Riverside", at(18, 0))
}

fn export(model: &MemoryModel) -> Result<ExportLog, CedexError> {
    let mappings = Mappings::default();
    let settings = settings();
    ExportDriver::new(model, &mappings, &settings).run()
}

/// Small builder over a single-tile model with one session.
struct History {
    model: MemoryModel,
    tile: TileId,
    session: usize,
}

impl History {
    fn new() -> Self {
        let mut model = MemoryModel::new("riverside.cedx");
        let tile = model.add_tile(None);
        let session = model.add_session("jdoe", at(8, 0), at(16, 0));
        Self {
            model,
            tile,
            session,
        }
    }

    fn location(&mut self, x: i64, y: i64) -> LocationId {
        self.model
            .add_location(self.tile, Position::from_units(x, y))
            .expect("location")
    }

    fn point(&mut self, x: i64, y: i64) -> (FeatureId, LocationId) {
        let loc = self.location(x, y);
        let e = self.model.next_edit_id();
        let p = self.model.add_point(e, "pt", loc).expect("point");
        self.model
            .add_edit(self.session, EditKind::NewPoint(NewPoint { point: p }), vec![p])
            .expect("edit");
        (p, loc)
    }

    fn line(&mut self, start: LocationId, end: LocationId) -> FeatureId {
        let e = self.model.next_edit_id();
        let l = self
            .model
            .add_line(e, "road", start, end, LineGeometry::Segment)
            .expect("line");
        self.model
            .add_edit(self.session, EditKind::NewLine(NewLine { line: l }), vec![l])
            .expect("edit");
        l
    }
}

fn edits(log: &ExportLog) -> impl Iterator<Item = &EditRecord> {
    log.records.iter().filter_map(|r| match r {
        ExportRecord::Edit(e) => Some(e),
        _ => None,
    })
}

// =============================================================================
// TIER T0: IDENTITY INTEGRITY
// =============================================================================

mod t0_identity_integrity {
    use super::*;

    /// T0.1: Allocation is idempotent per handle.
    #[test]
    fn allocate_twice_same_id() {
        let mut ids = IdentityAllocator::new();
        let a = ids.allocate(EditId(3)).expect("allocate");
        let b = ids.allocate(EditId(3)).expect("allocate");
        assert_eq!(a, b);
        assert_eq!(ids.max(), ExportId(1));
    }

    /// T0.2: Preassignment below the maximum is rejected.
    #[test]
    fn preassign_below_max_rejected() {
        let mut ids = IdentityAllocator::new();
        ids.allocate(FeatureId(0)).expect("allocate");
        ids.allocate(FeatureId(1)).expect("allocate");
        let result = ids.preassign(FeatureId(2), ExportId(2));
        assert!(matches!(result, Err(CedexError::OrderingViolation { id: 2, max: 2 })));
    }

    /// T0.3: Coincident locations resolve to the point numbered first.
    #[test]
    fn coincident_locations_share_an_id() {
        let mut h = History::new();
        let a = h.location(1, 1);
        let b = h.location(1, 1);
        let mut ids = IdentityAllocator::new();
        let mut aliases = LocationAliasIndex::new();

        let id = ids.allocate(a).expect("allocate");
        let added = aliases
            .bind_point(&h.model, &mut ids, a, id)
            .expect("bind");
        assert_eq!(added, 1);
        assert_eq!(ids.resolve(b), Ok(id));
    }

    /// T0.4: A reference to a never-numbered object is fatal.
    #[test]
    fn unresolved_reference_is_fatal() {
        let mut h = History::new();
        let (p, _) = h.point(0, 0);
        let ghost = FeatureId(h.model.feature_count() as u32 + 5);
        let session = h.session;
        h.model
            .add_edit(
                session,
                EditKind::Deletion(Deletion {
                    deleted: vec![p, ghost],
                }),
                Vec::new(),
            )
            .expect("edit");

        assert!(matches!(export(&h.model), Err(CedexError::Unresolved(_))));
    }
}

// =============================================================================
// TIER T1: LOG GRAMMAR
// =============================================================================

mod t1_log_grammar {
    use super::*;

    /// T1.1: Every top-level record is written under `Edit`.
    #[test]
    fn top_level_records_use_edit_field() {
        let mut h = History::new();
        h.point(2, 3);
        let log = export(&h.model).expect("export");

        let top: Vec<&str> = log
            .text
            .lines()
            .filter(|l| !l.starts_with('\t') && l.contains('='))
            .collect();
        assert_eq!(top.len(), log.records.len());
        assert!(top.iter().all(|l| l.starts_with("Edit=")));
    }

    /// T1.2: A new point renders with its header, stub and coordinates.
    #[test]
    fn new_point_layout() {
        let mut h = History::new();
        h.point(2, 3);
        let log = export(&h.model).expect("export");

        // project 1, session 2, import 3 (spent), end 4, session 5
        let expected = "Edit=NewPointOperation\n{\n\tId=6\n\tWhen=2007-11-20T10:40:00\n\
                        \tPoint=PointFeature\n\t{\n\t\tId=7\n\t\tEntity=0\n\
                        \t\tX=2000000\n\t\tY=3000000\n\t}\n}\n";
        assert!(log.text.contains(expected), "log was:\n{}", log.text);
    }

    /// T1.3: The prologue names the project and its defaults.
    #[test]
    fn prologue_layout() {
        let log = export(&MemoryModel::new("riverside.cedx")).expect("export");
        assert!(log.text.starts_with(
            "Edit=NewProjectEvent\n{\n\tId=1\n\tWhen=2007-11-20T18:00:00\n\
             \tProjectId=6F9619FF-8B86-D011-B42D-00C04FC964FF\n\tProjectName=Riverside\n\
             \tLayerId=10\n\tCoordinateSystem=UTM83-14\n\tUserName=CEdit\n\tMachineName=\n}\n"
        ));
    }
}

// =============================================================================
// TIER T2: HISTORY SCENARIOS
// =============================================================================

mod t2_history_scenarios {
    use super::*;

    /// T2.1: A line between a new point and an earlier point refers to two
    /// distinct ids, both below its own.
    #[test]
    fn point_then_line() {
        let mut h = History::new();
        let (_, old) = h.point(0, 0);
        let (_, new) = h.point(5, 5);
        h.line(new, old);
        let log = export(&h.model).expect("export");

        let line = edits(&log)
            .find_map(|e| match e {
                EditRecord::NewLine(op) => Some(op),
                _ => None,
            })
            .expect("line record");
        let point_ids: Vec<ExportId> = edits(&log)
            .filter_map(|e| match e {
                EditRecord::NewPoint(op) => Some(op.point.stub.id),
                _ => None,
            })
            .collect();

        assert_ne!(line.line.from, line.line.to);
        assert!(point_ids.contains(&line.line.from));
        assert!(point_ids.contains(&line.line.to));
        assert!(point_ids.iter().all(|&p| line.line.stub.id > p));
    }

    /// T2.2: A deletion three edits after the creation refers to an older id.
    #[test]
    fn deletion_refers_backwards() {
        let mut h = History::new();
        let (p, _) = h.point(0, 0);
        h.point(1, 0);
        h.point(2, 0);
        let session = h.session;
        h.model
            .add_edit(
                session,
                EditKind::Deletion(Deletion { deleted: vec![p] }),
                Vec::new(),
            )
            .expect("edit");
        let log = export(&h.model).expect("export");

        let deletion = edits(&log)
            .find_map(|e| match e {
                EditRecord::Deletion(op) => Some(op),
                _ => None,
            })
            .expect("deletion record");
        assert_eq!(deletion.deleted.len(), 1);
        assert!(deletion.deleted[0] < deletion.header.id);
    }

    /// T2.3: A two-faced subdivision emits two records, the second pointing
    /// back at the first.
    #[test]
    fn two_faced_subdivision() {
        let mut h = History::new();
        let (a_point, a) = h.point(0, 0);
        let (b_point, b) = h.point(10, 0);
        let parent = h.line(a, b);

        let e = h.model.next_edit_id();
        let mid_loc = h.location(4, 0);
        let back_loc = h.location(6, 0);
        let mid = h.model.add_point(e, "pt", mid_loc).expect("mid");
        let back = h.model.add_point(e, "pt", back_loc).expect("back");
        let mut section = |s, t| {
            h.model
                .add_line(e, "road", s, t, LineGeometry::Section)
                .expect("section")
        };
        let (s1, s2) = (section(a, mid_loc), section(mid_loc, b));
        let (t1, t2) = (section(b, back_loc), section(back_loc, a));

        let session = h.session;
        h.model
            .add_edit(
                session,
                EditKind::LineSubdivision(LineSubdivision {
                    line: parent,
                    faces: vec![
                        SubdivisionFace {
                            distances: Vec::new(),
                            sections: vec![
                                SubdivisionSection {
                                    line: s1,
                                    end_point: mid,
                                },
                                SubdivisionSection {
                                    line: s2,
                                    end_point: b_point,
                                },
                            ],
                        },
                        SubdivisionFace {
                            distances: Vec::new(),
                            sections: vec![
                                SubdivisionSection {
                                    line: t1,
                                    end_point: back,
                                },
                                SubdivisionSection {
                                    line: t2,
                                    end_point: a_point,
                                },
                            ],
                        },
                    ],
                }),
                vec![mid, back, s1, s2, t1, t2],
            )
            .expect("edit");

        let log = export(&h.model).expect("export");
        let faces: Vec<_> = edits(&log)
            .filter_map(|e| match e {
                EditRecord::LineSubdivision(op) => Some(op),
                _ => None,
            })
            .collect();

        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].other_side, None);
        assert_eq!(faces[1].other_side, Some(faces[0].header.id));
        assert!(faces[1].header.id > faces[0].header.id);
        assert!(log.text.contains(&format!("\tOtherSide={}\n", faces[0].header.id)));
    }

    /// T2.4: Bare terminals get one synthesized point per coincidence group,
    /// ahead of every session record.
    #[test]
    fn synthesized_points_per_group() {
        let mut h = History::new();
        let a = h.location(0, 0);
        let a_twin = h.location(0, 0);
        let b = h.location(3, 0);
        let (_, c) = h.point(6, 0);
        h.line(a, b);
        h.line(a_twin, c);

        let log = export(&h.model).expect("export");
        assert_eq!(log.stats.synthesized_points, 2);

        let import_index = log
            .records
            .iter()
            .position(|r| matches!(r, ExportRecord::Edit(EditRecord::Import(_))))
            .expect("synthetic import");
        let first_session = log
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| matches!(r, ExportRecord::NewSession(_)))
            .map(|(i, _)| i)
            .nth(1)
            .expect("history session");
        assert!(import_index < first_session);
    }

    /// T2.5: A terminal that already has a point gets nothing synthesized.
    #[test]
    fn terminals_with_points_need_no_synthesis() {
        let mut h = History::new();
        let (_, a) = h.point(0, 0);
        let (_, b) = h.point(0, 9);
        h.line(a, b);
        let log = export(&h.model).expect("export");
        assert_eq!(log.stats.synthesized_points, 0);
        assert!(!edits(&log).any(|e| matches!(e, EditRecord::Import(_))));
    }

    /// T2.6: Empty sessions produce no records and consume no ids.
    #[test]
    fn empty_sessions_are_invisible() {
        let mut h = History::new();
        h.point(0, 0);
        let baseline = export(&h.model).expect("export");

        h.model.add_session("idle", at(17, 0), at(17, 30));
        let log = export(&h.model).expect("export");

        assert_eq!(log.records.len(), baseline.records.len());
        assert_eq!(log.last_id, baseline.last_id);
        assert_eq!(log.stats.sessions_skipped, 1);
    }

    /// T2.7: The deprecated set theme edit aborts the export.
    #[test]
    fn set_theme_aborts() {
        let mut h = History::new();
        h.point(0, 0);
        let session = h.session;
        h.model
            .add_edit(session, EditKind::SetTheme, Vec::new())
            .expect("edit");
        assert!(matches!(
            export(&h.model),
            Err(CedexError::UnsupportedOperationKind { sequence: 2, .. })
        ));
    }
}

// =============================================================================
// TIER T3: EXPORT IDEMPOTENCY
// =============================================================================

mod t3_export_idempotency {
    use super::*;
    use std::fs;

    /// T3.1: A second export of a marked map is refused and touches nothing.
    #[test]
    fn re_export_is_refused_without_side_effects() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = ExportTarget::new(dir.path());
        let mut h = History::new();
        h.point(0, 0);

        let first = target
            .export(&h.model, &Mappings::default(), &settings())
            .expect("first export");
        let log_before = fs::read_to_string(&first.log_path).expect("log");
        let marker_before = fs::read_to_string(&first.marker_path).expect("marker");

        let err = target
            .export(&h.model, &Mappings::default(), &settings())
            .expect_err("second export");
        assert!(err.is_refusal());

        assert_eq!(fs::read_to_string(&first.log_path).expect("log"), log_before);
        assert_eq!(
            fs::read_to_string(&first.marker_path).expect("marker"),
            marker_before
        );
        let project_dir = dir.path().join(&settings().project_id);
        assert_eq!(fs::read_dir(project_dir).expect("dir").count(), 1);
    }

    /// T3.2: The marker records the project GUID.
    #[test]
    fn marker_holds_project_guid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = ExportTarget::new(dir.path());
        let model = MemoryModel::new("riverside.cedx");
        assert_eq!(target.exported_project(model.map_name()).expect("status"), None);

        target
            .export(&model, &Mappings::default(), &settings())
            .expect("export");
        assert_eq!(
            target.exported_project(model.map_name()).expect("status"),
            Some(settings().project_id)
        );
    }

    /// T3.3: A failed export leaves no marker behind.
    #[test]
    fn failed_export_leaves_no_marker() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = ExportTarget::new(dir.path());
        let mut h = History::new();
        let session = h.session;
        h.model
            .add_edit(session, EditKind::SetTheme, Vec::new())
            .expect("edit");

        assert!(target.export(&h.model, &Mappings::default(), &settings()).is_err());
        assert_eq!(target.exported_project("riverside.cedx").expect("status"), None);
    }
}
