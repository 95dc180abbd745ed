//! The delve engine: immutable template registries, the room graph,
//! turn-based combat, prose views, and save files. Everything here is
//! deterministic for a given seed; the only I/O lives in `save`.

pub mod catalog;
pub mod combat;
pub mod content;
pub mod errors;
pub mod render;
pub mod resolver;
pub mod save;
pub mod types;
pub mod world;

pub use catalog::{Catalog, FireBreath, ItemKind, ItemTemplate, LootRule, MonsterTemplate};
pub use combat::{level_threshold, PoisonTick, StrikeReport, TurnOutcome, TurnReport};
pub use content::{BOSS_MONSTER_ID, EXIT_ROOM_ID, START_ROOM_ID, WIN_TREASURE_VALUE};
pub use errors::EngineError;
pub use resolver::{resolve_item, ResolveResult};
pub use save::{SaveGame, SAVE_SCHEMA_VERSION};
pub use types::{ActiveMonster, Chest, Direction, Player, Room, SpawnRule};
pub use world::{
    DropOutcome, MoveBlock, MoveOutcome, TakeOutcome, TakeRequest, UnlockMethod, UnlockOutcome,
    World,
};
