use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct MobId;
    pub struct ItemId;
}

/// Grid coordinate as `(row, col)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    pub fn offset(self, (dy, dx): (i32, i32)) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn step(self, direction: Direction) -> Self {
        self.offset(direction.offset())
    }

    /// True when `other` is one of the eight tiles surrounding `self`.
    pub fn is_adjacent(self, other: Pos) -> bool {
        self != other && self.y.abs_diff(other.y) <= 1 && self.x.abs_diff(other.x) <= 1
    }
}

pub const CARDINAL_OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// `(dy, dx)` offset with rows growing downwards.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (-1, 1),
            Direction::DownLeft => (1, -1),
            Direction::DownRight => (1, 1),
        }
    }
}

/// One discrete player intent; exactly one is consumed per round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    Move(Direction),
    Attack(Direction),
    Rest,
    ToggleDebug,
    Quit,
}

/// Movement and sight blocking rates, each in `0..=100`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockingSpec {
    pub movement_rate: u8,
    pub sight_opacity: u8,
}

impl BlockingSpec {
    pub const FULL: u8 = 100;

    pub fn blocks_movement(&self) -> bool {
        self.movement_rate >= Self::FULL
    }

    pub fn blocks_sight(&self) -> bool {
        self.blocks_movement() || self.sight_opacity >= Self::FULL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundPhase {
    AwaitingIntent,
    Resolving,
    RoundComplete,
    PlayerDead,
    Quit,
}

impl RoundPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RoundPhase::PlayerDead | RoundPhase::Quit)
    }
}

/// Effects the current intent produced; reset at the start of every round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntentEffects {
    pub moved: bool,
    pub acted: bool,
}

/// Health and attack profile shared by the player and mobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub health: i32,
    pub attack_max: i32,
    pub hit_chance_pct: u8,
    pub display_name: String,
}

impl Combatant {
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_covers_diagonals_but_not_self() {
        let center = Pos::new(2, 2);
        for direction in Direction::ALL {
            assert!(center.is_adjacent(center.step(direction)), "{direction:?}");
        }
        assert!(!center.is_adjacent(center));
        assert!(!center.is_adjacent(Pos::new(0, 2)));
    }

    #[test]
    fn full_movement_block_also_blocks_sight() {
        let wall = BlockingSpec { movement_rate: 100, sight_opacity: 0 };
        let curtain = BlockingSpec { movement_rate: 0, sight_opacity: 100 };
        let rubble = BlockingSpec { movement_rate: 50, sight_opacity: 99 };
        assert!(wall.blocks_sight() && wall.blocks_movement());
        assert!(curtain.blocks_sight() && !curtain.blocks_movement());
        assert!(!rubble.blocks_sight() && !rubble.blocks_movement());
    }
}
