//! # Location Alias Index
//!
//! Groups location records that sit at the same position.
//!
//! The legacy model lets several independent location records share one
//! position, and a line may end on any of them. Coincidence is found by
//! walking the location's tile chain from its newest tile back to the
//! oldest, comparing positions exactly. Every member of a group therefore
//! sees the same group.

use crate::identity::IdentityAllocator;
use crate::source::SourceModel;
use crate::{CedexError, ExportId, LocationId, TileId};
use std::collections::BTreeSet;

/// Every location record at the same position as `location`, itself included.
pub fn coincident_handles<M: SourceModel + ?Sized>(
    model: &M,
    location: LocationId,
) -> Result<BTreeSet<LocationId>, CedexError> {
    let origin = model.location(location)?;
    let mut group = BTreeSet::from([location]);
    let mut visited: BTreeSet<TileId> = BTreeSet::new();
    let mut next = Some(model.tile_tail(origin.tile)?);

    while let Some(tile_id) = next {
        if !visited.insert(tile_id) {
            return Err(CedexError::InvalidSource(format!(
                "tile chain loops back to tile #{}",
                tile_id.0
            )));
        }
        let tile = model.tile(tile_id)?;
        for &candidate in &tile.locations {
            if model.location(candidate)?.position == origin.position {
                group.insert(candidate);
            }
        }
        next = tile.previous;
    }

    Ok(group)
}

/// Coincidence groups seen so far in one export run.
#[derive(Debug, Clone, Default)]
pub struct LocationAliasIndex {
    registered: BTreeSet<LocationId>,
}

impl LocationAliasIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the whole coincidence group of `location` as known.
    ///
    /// Returns the group.
    pub fn register<M: SourceModel + ?Sized>(
        &mut self,
        model: &M,
        location: LocationId,
    ) -> Result<BTreeSet<LocationId>, CedexError> {
        let group = coincident_handles(model, location)?;
        self.registered.extend(group.iter().copied());
        Ok(group)
    }

    /// True if `location` belongs to a registered group.
    #[must_use]
    pub fn is_registered(&self, location: LocationId) -> bool {
        self.registered.contains(&location)
    }

    /// Number of registered location records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Make every location coincident with `location` resolve to `id`.
    ///
    /// Locations that already carry an id keep it. Returns how many
    /// bindings were added.
    pub fn bind_point<M: SourceModel + ?Sized>(
        &mut self,
        model: &M,
        ids: &mut IdentityAllocator,
        location: LocationId,
        id: ExportId,
    ) -> Result<usize, CedexError> {
        let group = self.register(model, location)?;
        Ok(group
            .into_iter()
            .filter(|&member| ids.alias(member, id))
            .count())
    }
}
