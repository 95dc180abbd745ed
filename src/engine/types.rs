use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Directions the authored world uses for room exits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
    ];

    /// Parse a direction word or its single-letter alias, case-insensitive.
    pub fn parse(word: &str) -> Option<Direction> {
        match word.trim().to_uppercase().as_str() {
            "N" | "NORTH" => Some(Direction::North),
            "S" | "SOUTH" => Some(Direction::South),
            "E" | "EAST" => Some(Direction::East),
            "W" | "WEST" => Some(Direction::West),
            "U" | "UP" => Some(Direction::Up),
            "D" | "DOWN" => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lockable container sitting in a room. Contents become reachable once
/// `locked` is false; the chest itself never leaves the room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chest {
    pub locked: bool,
    /// Item id of the key that opens this chest, if a specific one exists.
    pub key: Option<String>,
    pub contents: Vec<String>,
}

impl Chest {
    pub fn locked_with_key(key: &str, contents: &[&str]) -> Self {
        Self {
            locked: true,
            key: Some(key.to_string()),
            contents: contents.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn unlocked(contents: &[&str]) -> Self {
        Self {
            locked: false,
            key: None,
            contents: contents.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// One-shot monster spawn rule, evaluated on a room's first visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpawnRule {
    pub monster: String,
    /// Probability in [0,1]; boss lairs ignore this and always spawn.
    pub chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: String,
    pub exits: HashMap<Direction, String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub chest: Option<Chest>,
    #[serde(default)]
    pub dark: bool,
    /// Item id required to enter this room while `locked` is set.
    #[serde(default)]
    pub door_key: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub spawn: Option<SpawnRule>,
    #[serde(default)]
    pub boss_lair: bool,
    /// True until the player first enters; consumed by spawn evaluation.
    #[serde(default = "first_visit_default_true")]
    pub first_visit: bool,
}

fn first_visit_default_true() -> bool {
    true
}

impl Room {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            exits: HashMap::new(),
            items: Vec::new(),
            chest: None,
            dark: false,
            door_key: None,
            locked: false,
            spawn: None,
            boss_lair: false,
            first_visit: true,
        }
    }

    pub fn with_exit(mut self, direction: Direction, destination: &str) -> Self {
        self.exits.insert(direction, destination.to_string());
        self
    }

    pub fn with_item(mut self, item: &str) -> Self {
        self.items.push(item.to_string());
        self
    }

    pub fn with_chest(mut self, chest: Chest) -> Self {
        self.chest = Some(chest);
        self
    }

    pub fn with_dark(mut self) -> Self {
        self.dark = true;
        self
    }

    pub fn with_door_key(mut self, key: &str) -> Self {
        self.door_key = Some(key.to_string());
        self.locked = true;
        self
    }

    pub fn with_spawn(mut self, monster: &str, chance: f64) -> Self {
        self.spawn = Some(SpawnRule {
            monster: monster.to_string(),
            chance,
        });
        self
    }

    pub fn with_boss_lair(mut self, monster: &str) -> Self {
        self.spawn = Some(SpawnRule {
            monster: monster.to_string(),
            chance: 1.0,
        });
        self.boss_lair = true;
        self
    }
}

/// A monster currently standing in a room, keyed by room id in the world.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveMonster {
    pub template: String,
    pub hp: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub attack_bonus: i32,
    pub defense_bonus: i32,
    /// Ordered; duplicates allowed.
    pub inventory: Vec<String>,
    pub gold: u32,
    pub xp: u32,
    pub level: u32,
    pub room: String,
    pub visited: HashSet<String>,
    pub kills: u32,
    pub steps: u32,
    /// Remaining poison turns; `None` when not poisoned.
    #[serde(default)]
    pub poison: Option<u8>,
}

pub const BASE_MAX_HP: i32 = 100;
pub const BASE_CAPACITY: u32 = 50;
pub const CAPACITY_PER_LEVEL: u32 = 10;

impl Player {
    pub fn new(name: &str, starting_room: &str) -> Self {
        let mut visited = HashSet::new();
        visited.insert(starting_room.to_string());
        Self {
            name: name.to_string(),
            hp: BASE_MAX_HP,
            max_hp: BASE_MAX_HP,
            attack_bonus: 0,
            defense_bonus: 0,
            inventory: Vec::new(),
            gold: 0,
            xp: 0,
            level: 1,
            room: starting_room.to_string(),
            visited,
            kills: 0,
            steps: 0,
            poison: None,
        }
    }

    /// Maximum carry weight at the current level.
    pub fn capacity(&self) -> u32 {
        BASE_CAPACITY + (self.level.saturating_sub(1)) * CAPACITY_PER_LEVEL
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.inventory.iter().any(|i| i == id)
    }

    /// Remove one copy of an item, preserving the order of the rest.
    pub fn remove_item(&mut self, id: &str) -> bool {
        if let Some(pos) = self.inventory.iter().position(|i| i == id) {
            self.inventory.remove(pos);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parse_words_and_letters() {
        assert_eq!(Direction::parse("n"), Some(Direction::North));
        assert_eq!(Direction::parse("NORTH"), Some(Direction::North));
        assert_eq!(Direction::parse(" down "), Some(Direction::Down));
        assert_eq!(Direction::parse("ne"), None);
        assert_eq!(Direction::parse(""), None);
    }

    #[test]
    fn room_builders_compose() {
        let room = Room::new("cell", "Damp Cell", "Moss everywhere.")
            .with_exit(Direction::North, "hall")
            .with_item("torch")
            .with_dark();
        assert_eq!(room.exits.get(&Direction::North).map(String::as_str), Some("hall"));
        assert_eq!(room.items, vec!["torch"]);
        assert!(room.dark);
        assert!(room.first_visit);
        assert!(!room.locked);
    }

    #[test]
    fn door_key_builder_sets_lock() {
        let room = Room::new("vault", "Vault", "Sealed tight.").with_door_key("silver_key");
        assert!(room.locked);
        assert_eq!(room.door_key.as_deref(), Some("silver_key"));
    }

    #[test]
    fn player_capacity_grows_with_level() {
        let mut p = Player::new("Tess", "entrance");
        assert_eq!(p.capacity(), BASE_CAPACITY);
        p.level = 3;
        assert_eq!(p.capacity(), BASE_CAPACITY + 2 * CAPACITY_PER_LEVEL);
    }

    #[test]
    fn remove_item_takes_one_copy() {
        let mut p = Player::new("Tess", "entrance");
        p.inventory = vec!["rock".into(), "rock".into(), "rope".into()];
        assert!(p.remove_item("rock"));
        assert_eq!(p.inventory, vec!["rock".to_string(), "rope".to_string()]);
        assert!(!p.remove_item("gem"));
    }
}
