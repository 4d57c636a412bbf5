//! Sparse tile grid with kind resolution and blocking queries.
//! Positions outside the loaded level have no tile and count as impassable.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::content::{ContentPack, TileKind};
use crate::error::SchemaError;
use crate::types::{BlockingSpec, CARDINAL_OFFSETS, DIAGONAL_OFFSETS, ItemId, MobId, Pos};

/// One grid cell. Empty occupant lists are stored as `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub name: String,
    pub occupant_mobs: Option<Vec<MobId>>,
    pub occupant_items: Option<Vec<ItemId>>,
    pub explored: bool,
    pub blocking_override: Option<BlockingSpec>,
}

impl Tile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            occupant_mobs: None,
            occupant_items: None,
            explored: false,
            blocking_override: None,
        }
    }

    pub fn has_mob(&self) -> bool {
        self.occupant_mobs.is_some()
    }

    pub fn mobs(&self) -> &[MobId] {
        self.occupant_mobs.as_deref().unwrap_or_default()
    }

    pub fn items(&self) -> &[ItemId] {
        self.occupant_items.as_deref().unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct TileGrid {
    tiles: BTreeMap<Pos, Tile>,
    content: Rc<ContentPack>,
}

impl TileGrid {
    pub fn new(content: Rc<ContentPack>) -> Self {
        Self { tiles: BTreeMap::new(), content }
    }

    pub fn content(&self) -> &ContentPack {
        &self.content
    }

    pub fn insert(&mut self, pos: Pos, tile: Tile) {
        self.tiles.insert(pos, tile);
    }

    pub fn tile_at(&self, pos: Pos) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    pub(crate) fn tile_at_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        self.tiles.get_mut(&pos)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.tiles.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> impl Iterator<Item = (Pos, &Tile)> {
        self.tiles.iter().map(|(pos, tile)| (*pos, tile))
    }

    pub fn resolve_kind(&self, name: &str) -> Result<&TileKind, SchemaError> {
        self.content.resolve_kind(name)
    }

    /// Resolved kind of the tile at `pos`, if there is one.
    pub fn kind_at(&self, pos: Pos) -> Option<&TileKind> {
        let tile = self.tile_at(pos)?;
        self.content.resolve_kind(&tile.name).ok()
    }

    fn blocking_at(&self, pos: Pos) -> Option<BlockingSpec> {
        let tile = self.tile_at(pos)?;
        tile.blocking_override
            .or_else(|| self.content.resolve_kind(&tile.name).ok().and_then(|kind| kind.blocking))
    }

    pub fn is_movement_blocked(&self, pos: Pos) -> bool {
        if !self.contains(pos) {
            return true;
        }
        self.blocking_at(pos).is_some_and(|blocking| blocking.blocks_movement())
    }

    pub fn is_sight_blocked(&self, pos: Pos) -> bool {
        if !self.contains(pos) {
            return true;
        }
        self.blocking_at(pos).is_some_and(|blocking| blocking.blocks_sight())
    }

    /// Offsets around `pos`, cardinals first and then diagonals. Positions are not filtered.
    pub fn neighbors(&self, pos: Pos, include_diagonals: bool) -> impl Iterator<Item = Pos> + use<> {
        let cardinals: &'static [(i32, i32)] = &CARDINAL_OFFSETS;
        let diagonals: &'static [(i32, i32)] =
            if include_diagonals { &DIAGONAL_OFFSETS } else { &[] };
        cardinals.iter().chain(diagonals).map(move |offset| pos.offset(*offset))
    }

    /// Positions whose resolved kind is named `kind`, in grid order.
    pub fn positions_of_kind(&self, kind: &str) -> Vec<Pos> {
        self.tiles
            .keys()
            .copied()
            .filter(|pos| self.kind_at(*pos).is_some_and(|resolved| resolved.name == kind))
            .collect()
    }

    /// Replaces a tile's kind name, keeping its occupants.
    pub(crate) fn set_kind(&mut self, pos: Pos, name: &str) {
        if let Some(tile) = self.tiles.get_mut(&pos) {
            tile.name = name.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{open_grid, standard_content};

    #[test]
    fn missing_tiles_block_everything() {
        let grid = open_grid(3, 3);
        let outside = Pos::new(-1, 0);
        assert!(grid.tile_at(outside).is_none());
        assert!(grid.is_movement_blocked(outside));
        assert!(grid.is_sight_blocked(outside));
        assert!(!grid.is_movement_blocked(Pos::new(1, 1)));
    }

    #[test]
    fn override_takes_precedence_over_kind() {
        let mut grid = open_grid(3, 3);
        let pos = Pos::new(1, 1);
        grid.tile_at_mut(pos).unwrap().blocking_override =
            Some(BlockingSpec { movement_rate: 100, sight_opacity: 0 });
        assert!(grid.is_movement_blocked(pos));

        let wall = Pos::new(0, 0);
        grid.set_kind(wall, "wall");
        assert!(grid.is_movement_blocked(wall));
        grid.tile_at_mut(wall).unwrap().blocking_override = Some(BlockingSpec::default());
        assert!(!grid.is_movement_blocked(wall));
    }

    #[test]
    fn sight_can_be_blocked_without_blocking_movement() {
        let mut grid = open_grid(3, 3);
        let door = Pos::new(1, 2);
        grid.set_kind(door, "closed-door");
        assert!(!grid.is_movement_blocked(door));
        assert!(grid.is_sight_blocked(door));
    }

    #[test]
    fn aliases_resolve_through_reference_chain() {
        let mut grid = TileGrid::new(standard_content());
        grid.insert(Pos::new(0, 0), Tile::named("default"));
        assert_eq!(grid.kind_at(Pos::new(0, 0)).unwrap().name, "wall");
        assert!(grid.is_movement_blocked(Pos::new(0, 0)));
    }

    #[test]
    fn neighbor_order_is_cardinals_then_diagonals() {
        let grid = open_grid(3, 3);
        let center = Pos::new(1, 1);
        let cardinal: Vec<Pos> = grid.neighbors(center, false).collect();
        assert_eq!(
            cardinal,
            vec![Pos::new(1, 2), Pos::new(1, 0), Pos::new(2, 1), Pos::new(0, 1)]
        );
        let all: Vec<Pos> = grid.neighbors(center, true).collect();
        assert_eq!(all.len(), 8);
        assert_eq!(&all[..4], cardinal.as_slice());
        assert_eq!(all[4], Pos::new(2, 2));
    }
}
