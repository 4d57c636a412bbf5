//! Mob and item storage plus the occupant lists they keep on the grid.
//! This module exists so placement, removal, and relocation keep grid lists and
//! positions in lockstep. It does not own movement rules or combat.

use slotmap::{SecondaryMap, SlotMap};

use crate::content::Display;
use crate::grid::TileGrid;
use crate::types::{Combatant, ItemId, MobId, Pos};

#[derive(Clone, Debug)]
pub struct Mob {
    pub kind: String,
    pub stats: Combatant,
    pub display: Display,
}

#[derive(Clone, Debug)]
pub struct Item {
    pub name: String,
    pub display: Display,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Mob(MobId),
    Item(ItemId),
}

/// Read-only view of one tile's occupants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Occupants<'a> {
    pub mobs: &'a [MobId],
    pub items: &'a [ItemId],
}

impl Occupants<'_> {
    pub fn is_empty(&self) -> bool {
        self.mobs.is_empty() && self.items.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct EntityRegistry {
    mobs: SlotMap<MobId, Mob>,
    items: SlotMap<ItemId, Item>,
    mob_positions: SecondaryMap<MobId, Pos>,
    item_positions: SecondaryMap<ItemId, Pos>,
}

fn push_occupant<K: Copy>(list: &mut Option<Vec<K>>, id: K) {
    list.get_or_insert_with(Vec::new).push(id);
}

fn remove_occupant<K: Copy + PartialEq>(list: &mut Option<Vec<K>>, id: K) -> bool {
    let Some(ids) = list.as_mut() else {
        return false;
    };
    let Some(index) = ids.iter().position(|candidate| *candidate == id) else {
        return false;
    };
    ids.remove(index);
    if ids.is_empty() {
        *list = None;
    }
    true
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a mob and places it at `pos`. Returns `None` when `pos` has no tile.
    pub fn spawn_mob(&mut self, grid: &mut TileGrid, mob: Mob, pos: Pos) -> Option<MobId> {
        if !grid.contains(pos) {
            return None;
        }
        let id = self.mobs.insert(mob);
        self.place(grid, Entity::Mob(id), pos);
        Some(id)
    }

    pub fn spawn_item(&mut self, grid: &mut TileGrid, item: Item, pos: Pos) -> Option<ItemId> {
        if !grid.contains(pos) {
            return None;
        }
        let id = self.items.insert(item);
        self.place(grid, Entity::Item(id), pos);
        Some(id)
    }

    /// Appends `entity` to the occupant list at `pos`. Returns false when `pos` has no tile.
    pub fn place(&mut self, grid: &mut TileGrid, entity: Entity, pos: Pos) -> bool {
        let Some(tile) = grid.tile_at_mut(pos) else {
            return false;
        };
        match entity {
            Entity::Mob(id) => {
                push_occupant(&mut tile.occupant_mobs, id);
                self.mob_positions.insert(id, pos);
            }
            Entity::Item(id) => {
                push_occupant(&mut tile.occupant_items, id);
                self.item_positions.insert(id, pos);
            }
        }
        true
    }

    /// Takes `entity` off the occupant list at `pos`; the entity itself stays stored.
    pub fn remove(&mut self, grid: &mut TileGrid, entity: Entity, pos: Pos) -> bool {
        let Some(tile) = grid.tile_at_mut(pos) else {
            return false;
        };
        match entity {
            Entity::Mob(id) => {
                let removed = remove_occupant(&mut tile.occupant_mobs, id);
                if removed {
                    self.mob_positions.remove(id);
                }
                removed
            }
            Entity::Item(id) => {
                let removed = remove_occupant(&mut tile.occupant_items, id);
                if removed {
                    self.item_positions.remove(id);
                }
                removed
            }
        }
    }

    pub fn move_entity(&mut self, grid: &mut TileGrid, entity: Entity, from: Pos, to: Pos) -> bool {
        if !grid.contains(to) || !self.remove(grid, entity, from) {
            return false;
        }
        self.place(grid, entity, to)
    }

    /// Removes a mob from the grid and from storage.
    pub fn despawn_mob(&mut self, grid: &mut TileGrid, id: MobId) -> Option<Mob> {
        if let Some(pos) = self.mob_positions.get(id).copied() {
            self.remove(grid, Entity::Mob(id), pos);
        }
        self.mobs.remove(id)
    }

    /// Removes every item at `pos` and hands them back in list order.
    pub fn take_items(&mut self, grid: &mut TileGrid, pos: Pos) -> Vec<Item> {
        let Some(tile) = grid.tile_at_mut(pos) else {
            return Vec::new();
        };
        let ids = tile.occupant_items.take().unwrap_or_default();
        ids.into_iter()
            .filter_map(|id| {
                self.item_positions.remove(id);
                self.items.remove(id)
            })
            .collect()
    }

    pub fn occupants_at<'g>(&self, grid: &'g TileGrid, pos: Pos) -> Occupants<'g> {
        grid.tile_at(pos)
            .map(|tile| Occupants { mobs: tile.mobs(), items: tile.items() })
            .unwrap_or_default()
    }

    pub fn mob(&self, id: MobId) -> Option<&Mob> {
        self.mobs.get(id)
    }

    pub fn mob_mut(&mut self, id: MobId) -> Option<&mut Mob> {
        self.mobs.get_mut(id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn mob_position(&self, id: MobId) -> Option<Pos> {
        self.mob_positions.get(id).copied()
    }

    pub fn item_position(&self, id: ItemId) -> Option<Pos> {
        self.item_positions.get(id).copied()
    }

    pub fn mob_count(&self) -> usize {
        self.mobs.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Placed mobs ordered by position, then by their order on the tile.
    pub fn placed_mobs<'a>(&'a self, grid: &'a TileGrid) -> impl Iterator<Item = (Pos, MobId, &'a Mob)> + 'a {
        grid.tiles().flat_map(move |(pos, tile)| {
            tile.mobs().iter().filter_map(move |id| self.mobs.get(*id).map(|mob| (pos, *id, mob)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::open_grid;

    fn bug() -> Mob {
        Mob {
            kind: "bug".to_string(),
            stats: Combatant {
                health: 4,
                attack_max: 2,
                hit_chance_pct: 40,
                display_name: "bug".to_string(),
            },
            display: Display::default(),
        }
    }

    fn duck() -> Item {
        Item { name: "rubber-duck".to_string(), display: Display::default() }
    }

    #[test]
    fn removing_last_occupant_clears_the_list() {
        let mut grid = open_grid(3, 3);
        let mut registry = EntityRegistry::new();
        let pos = Pos::new(1, 1);
        let first = registry.spawn_mob(&mut grid, bug(), pos).unwrap();
        let second = registry.spawn_mob(&mut grid, bug(), pos).unwrap();
        assert_eq!(registry.occupants_at(&grid, pos).mobs, [first, second]);

        assert!(registry.remove(&mut grid, Entity::Mob(first), pos));
        assert_eq!(grid.tile_at(pos).unwrap().occupant_mobs, Some(vec![second]));
        assert!(registry.remove(&mut grid, Entity::Mob(second), pos));
        assert_eq!(grid.tile_at(pos).unwrap().occupant_mobs, None);
        assert!(!registry.remove(&mut grid, Entity::Mob(second), pos));
    }

    #[test]
    fn move_updates_lists_and_position_index() {
        let mut grid = open_grid(3, 3);
        let mut registry = EntityRegistry::new();
        let from = Pos::new(0, 0);
        let to = Pos::new(1, 1);
        let id = registry.spawn_mob(&mut grid, bug(), from).unwrap();

        assert!(registry.move_entity(&mut grid, Entity::Mob(id), from, to));
        assert!(registry.occupants_at(&grid, from).is_empty());
        assert_eq!(grid.tile_at(from).unwrap().occupant_mobs, None);
        assert_eq!(registry.occupants_at(&grid, to).mobs, [id]);
        assert_eq!(registry.mob_position(id), Some(to));

        assert!(!registry.move_entity(&mut grid, Entity::Mob(id), to, Pos::new(7, 7)));
        assert_eq!(registry.mob_position(id), Some(to));
    }

    #[test]
    fn take_items_empties_tile_and_storage() {
        let mut grid = open_grid(2, 2);
        let mut registry = EntityRegistry::new();
        let pos = Pos::new(0, 1);
        registry.spawn_item(&mut grid, duck(), pos).unwrap();
        registry.spawn_item(&mut grid, duck(), pos).unwrap();

        let taken = registry.take_items(&mut grid, pos);
        assert_eq!(taken.len(), 2);
        assert_eq!(grid.tile_at(pos).unwrap().occupant_items, None);
        assert_eq!(registry.item_count(), 0);
        assert!(registry.take_items(&mut grid, pos).is_empty());
    }

    #[test]
    fn despawn_removes_mob_everywhere() {
        let mut grid = open_grid(2, 2);
        let mut registry = EntityRegistry::new();
        let pos = Pos::new(1, 0);
        let id = registry.spawn_mob(&mut grid, bug(), pos).unwrap();
        let mob = registry.despawn_mob(&mut grid, id).expect("mob stored");
        assert_eq!(mob.kind, "bug");
        assert!(registry.mob(id).is_none());
        assert!(!grid.tile_at(pos).unwrap().has_mob());
        assert_eq!(registry.placed_mobs(&grid).count(), 0);
    }

    #[test]
    fn spawning_off_grid_is_rejected() {
        let mut grid = open_grid(2, 2);
        let mut registry = EntityRegistry::new();
        assert!(registry.spawn_mob(&mut grid, bug(), Pos::new(5, 5)).is_none());
        assert_eq!(registry.mob_count(), 0);
    }
}
