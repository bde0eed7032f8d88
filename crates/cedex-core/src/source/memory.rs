//! Arena-backed source model.
//!
//! Handles are indices into the arenas. The builder methods keep the
//! cross-references consistent: a location is listed by its tile, an arc is
//! listed by its circle, and an edit lists the features it created.

use super::{
    Circle, Edit, EditKind, Feature, FeatureShape, IdGroup, LineGeometry, Location, Position,
    Session, SourceModel, TextShape, Tile,
};
use crate::{CedexError, CircleId, EditId, FeatureId, LocationId, TileId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// In-memory source model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryModel {
    map_name: String,
    sessions: Vec<Session>,
    edits: Vec<Edit>,
    features: Vec<Feature>,
    locations: Vec<Location>,
    tiles: Vec<Tile>,
    circles: Vec<Circle>,
    id_groups: Vec<IdGroup>,
}

fn dangling(kind: &str, index: u32) -> CedexError {
    CedexError::InvalidSource(format!("dangling {kind} handle #{index}"))
}

fn next_index(len: usize) -> Result<u32, CedexError> {
    u32::try_from(len).map_err(|_| CedexError::InvalidSource("arena overflow".to_string()))
}

impl MemoryModel {
    /// Create an empty model for the named map.
    #[must_use]
    pub fn new(map_name: impl Into<String>) -> Self {
        Self {
            map_name: map_name.into(),
            ..Self::default()
        }
    }

    // -------------------------------------------------------------------------
    // Spatial index
    // -------------------------------------------------------------------------

    /// Add a tile, optionally chained to the tile it overflowed from.
    pub fn add_tile(&mut self, previous: Option<TileId>) -> TileId {
        let id = TileId(self.tiles.len() as u32);
        self.tiles.push(Tile {
            locations: Vec::new(),
            previous,
        });
        id
    }

    /// Add a location record to a tile.
    pub fn add_location(
        &mut self,
        tile: TileId,
        position: Position,
    ) -> Result<LocationId, CedexError> {
        let id = LocationId(next_index(self.locations.len())?);
        let slot = self
            .tiles
            .get_mut(tile.0 as usize)
            .ok_or_else(|| dangling("tile", tile.0))?;
        slot.locations.push(id);
        self.locations.push(Location { position, tile });
        Ok(id)
    }

    /// Add a circle around an existing center point.
    pub fn add_circle(&mut self, center: FeatureId) -> Result<CircleId, CedexError> {
        self.feature(center)?;
        let id = CircleId(next_index(self.circles.len())?);
        self.circles.push(Circle {
            center,
            arcs: Vec::new(),
        });
        Ok(id)
    }

    // -------------------------------------------------------------------------
    // Features
    // -------------------------------------------------------------------------

    /// Add a feature. Arcs are appended to their circle.
    ///
    /// The creator does not have to exist yet: features are added before the
    /// edit that lists them (see [`MemoryModel::next_edit_id`]).
    pub fn add_feature(&mut self, feature: Feature) -> Result<FeatureId, CedexError> {
        let id = FeatureId(next_index(self.features.len())?);
        match &feature.shape {
            FeatureShape::Point { location } => {
                self.location(*location)?;
            }
            FeatureShape::Line {
                start,
                end,
                geometry,
            } => {
                self.location(*start)?;
                self.location(*end)?;
                if let LineGeometry::Arc { circle, .. } = geometry {
                    self.circles
                        .get_mut(circle.0 as usize)
                        .ok_or_else(|| dangling("circle", circle.0))?
                        .arcs
                        .push(id);
                }
            }
            FeatureShape::Text(_) => {}
        }
        self.features.push(feature);
        Ok(id)
    }

    /// Add a keyless, non-topological point.
    pub fn add_point(
        &mut self,
        creator: EditId,
        entity: &str,
        location: LocationId,
    ) -> Result<FeatureId, CedexError> {
        self.add_feature(Feature {
            creator,
            entity: entity.to_string(),
            key: None,
            topological: false,
            shape: FeatureShape::Point { location },
        })
    }

    /// Add a keyless, non-topological line.
    pub fn add_line(
        &mut self,
        creator: EditId,
        entity: &str,
        start: LocationId,
        end: LocationId,
        geometry: LineGeometry,
    ) -> Result<FeatureId, CedexError> {
        self.add_feature(Feature {
            creator,
            entity: entity.to_string(),
            key: None,
            topological: false,
            shape: FeatureShape::Line {
                start,
                end,
                geometry,
            },
        })
    }

    /// Add a keyless text.
    pub fn add_text(
        &mut self,
        creator: EditId,
        entity: &str,
        topological: bool,
        shape: TextShape,
    ) -> Result<FeatureId, CedexError> {
        self.add_feature(Feature {
            creator,
            entity: entity.to_string(),
            key: None,
            topological,
            shape: FeatureShape::Text(shape),
        })
    }

    /// Mutable access to a feature, for adjusting keys and flags after
    /// construction.
    pub fn feature_mut(&mut self, id: FeatureId) -> Result<&mut Feature, CedexError> {
        self.features
            .get_mut(id.0 as usize)
            .ok_or_else(|| dangling("feature", id.0))
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// Add a session. Returns its index.
    pub fn add_session(&mut self, user: &str, start: NaiveDateTime, end: NaiveDateTime) -> usize {
        self.sessions.push(Session {
            user: user.to_string(),
            start,
            end,
            edits: Vec::new(),
        });
        self.sessions.len() - 1
    }

    /// The handle the next added edit will receive.
    #[must_use]
    pub fn next_edit_id(&self) -> EditId {
        EditId(self.edits.len() as u32)
    }

    /// Append an edit to a session.
    ///
    /// `features` lists what the edit created; each must name the new edit
    /// as its creator.
    pub fn add_edit(
        &mut self,
        session: usize,
        kind: EditKind,
        features: Vec<FeatureId>,
    ) -> Result<EditId, CedexError> {
        let id = EditId(next_index(self.edits.len())?);
        for &f in &features {
            let creator = self.feature(f)?.creator;
            if creator != id {
                return Err(CedexError::InvalidSource(format!(
                    "feature #{} was created by edit #{}, not edit #{}",
                    f.0, creator.0, id.0
                )));
            }
        }
        let slot = self
            .sessions
            .get_mut(session)
            .ok_or_else(|| CedexError::InvalidSource(format!("no session {session}")))?;
        slot.edits.push(id);
        self.edits.push(Edit {
            sequence: id.0 + 1,
            kind,
            features,
        });
        Ok(id)
    }

    /// Register an ID group.
    pub fn add_id_group(&mut self, group: IdGroup) {
        self.id_groups.push(group);
    }

    /// Number of features in the model.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

impl SourceModel for MemoryModel {
    fn map_name(&self) -> &str {
        &self.map_name
    }

    fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    fn id_groups(&self) -> &[IdGroup] {
        &self.id_groups
    }

    fn edit(&self, id: EditId) -> Result<&Edit, CedexError> {
        self.edits
            .get(id.0 as usize)
            .ok_or_else(|| dangling("edit", id.0))
    }

    fn feature(&self, id: FeatureId) -> Result<&Feature, CedexError> {
        self.features
            .get(id.0 as usize)
            .ok_or_else(|| dangling("feature", id.0))
    }

    fn location(&self, id: LocationId) -> Result<&Location, CedexError> {
        self.locations
            .get(id.0 as usize)
            .ok_or_else(|| dangling("location", id.0))
    }

    fn tile(&self, id: TileId) -> Result<&Tile, CedexError> {
        self.tiles
            .get(id.0 as usize)
            .ok_or_else(|| dangling("tile", id.0))
    }

    fn tile_tail(&self, id: TileId) -> Result<TileId, CedexError> {
        self.tile(id)?;
        let mut tail = id;
        let mut hops = 0;
        while let Some(next) = self.tiles.iter().position(|t| t.previous == Some(tail)) {
            hops += 1;
            if hops > self.tiles.len() {
                return Err(CedexError::InvalidSource(format!(
                    "tile chain from tile #{} never ends",
                    id.0
                )));
            }
            tail = TileId(next_index(next)?);
        }
        Ok(tail)
    }

    fn circle(&self, id: CircleId) -> Result<&Circle, CedexError> {
        self.circles
            .get(id.0 as usize)
            .ok_or_else(|| dangling("circle", id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::NewPoint;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2008, 3, 14)
            .and_then(|d| d.and_hms_opt(h, 0, 0))
            .expect("valid time")
    }

    #[test]
    fn location_is_listed_by_its_tile() {
        let mut m = MemoryModel::new("m");
        let tile = m.add_tile(None);
        let loc = m.add_location(tile, Position::new(5, 6)).expect("loc");

        assert_eq!(m.tile(tile).expect("tile").locations, vec![loc]);
        assert_eq!(m.location(loc).expect("loc").tile, tile);
    }

    #[test]
    fn tile_tail_follows_chain_forward() {
        let mut m = MemoryModel::new("m");
        let first = m.add_tile(None);
        let second = m.add_tile(Some(first));
        let third = m.add_tile(Some(second));
        let lone = m.add_tile(None);

        assert_eq!(m.tile_tail(first), Ok(third));
        assert_eq!(m.tile_tail(second), Ok(third));
        assert_eq!(m.tile_tail(third), Ok(third));
        assert_eq!(m.tile_tail(lone), Ok(lone));
        assert!(matches!(
            m.tile_tail(TileId(9)),
            Err(CedexError::InvalidSource(_))
        ));
    }

    #[test]
    fn add_location_rejects_unknown_tile() {
        let mut m = MemoryModel::new("m");
        assert!(m.add_location(TileId(3), Position::default()).is_err());
    }

    #[test]
    fn edit_lists_created_features_and_gets_sequence() {
        let mut m = MemoryModel::new("m");
        let s = m.add_session("ann", at(9), at(10));
        let tile = m.add_tile(None);
        let loc = m.add_location(tile, Position::default()).expect("loc");
        let e = m.next_edit_id();
        let p = m.add_point(e, "pt", loc).expect("point");
        let id = m
            .add_edit(s, EditKind::NewPoint(NewPoint { point: p }), vec![p])
            .expect("edit");

        assert_eq!(id, e);
        let edit = m.edit(id).expect("edit");
        assert_eq!(edit.sequence, 1);
        assert_eq!(edit.features, vec![p]);
        assert_eq!(m.sessions()[0].edits, vec![id]);
        assert_eq!(m.edit_count(), 1);
    }

    #[test]
    fn add_edit_rejects_foreign_features() {
        let mut m = MemoryModel::new("m");
        let s = m.add_session("ann", at(9), at(10));
        let tile = m.add_tile(None);
        let loc = m.add_location(tile, Position::default()).expect("loc");
        let p = m.add_point(EditId(7), "pt", loc).expect("point");

        let err = m.add_edit(s, EditKind::NewPoint(NewPoint { point: p }), vec![p]);
        assert!(matches!(err, Err(CedexError::InvalidSource(_))));
    }

    #[test]
    fn arcs_are_listed_by_their_circle() {
        let mut m = MemoryModel::new("m");
        let tile = m.add_tile(None);
        let c = m.add_location(tile, Position::default()).expect("loc");
        let a = m.add_location(tile, Position::from_units(5, 0)).expect("loc");
        let e = m.next_edit_id();
        let center = m.add_point(e, "pt", c).expect("center");
        let circle = m.add_circle(center).expect("circle");
        let arc = m
            .add_line(
                e,
                "arc",
                a,
                a,
                LineGeometry::Arc {
                    circle,
                    clockwise: true,
                },
            )
            .expect("arc");

        assert_eq!(m.circle(circle).expect("circle").arcs, vec![arc]);
    }

    #[test]
    fn dangling_lookups_are_invalid_source() {
        let m = MemoryModel::new("m");
        assert!(matches!(
            m.feature(FeatureId(0)),
            Err(CedexError::InvalidSource(_))
        ));
        assert!(m.edit(EditId(0)).is_err());
        assert!(m.circle(CircleId(0)).is_err());
    }
}
