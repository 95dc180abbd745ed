//! Saving and restoring a delve.
//!
//! A save file holds the player plus the mutable part of every room
//! (floor items, first-visit flag, entry lock, chest) and the monsters
//! still standing. Room prose, exits, and spawn rules are rebuilt from
//! the shipped world, so a save written by an older build stays loadable
//! as long as the room ids line up; ids the current world does not know
//! are silently dropped.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::engine::content::START_ROOM_ID;
use crate::engine::errors::EngineError;
use crate::engine::types::{ActiveMonster, Chest, Player, Room};
use crate::engine::world::World;

pub const SAVE_SCHEMA_VERSION: u8 = 1;

/// The mutable slice of one room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomDelta {
    pub items: Vec<String>,
    pub first_visit: bool,
    pub locked: bool,
    pub chest: Option<Chest>,
}

impl RoomDelta {
    fn of(room: &Room) -> Self {
        Self {
            items: room.items.clone(),
            first_visit: room.first_visit,
            locked: room.locked,
            chest: room.chest.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveGame {
    pub schema_version: u8,
    pub saved_at: DateTime<Utc>,
    pub player: Player,
    pub rooms: HashMap<String, RoomDelta>,
    pub monsters: HashMap<String, ActiveMonster>,
}

/// Project the live game onto its serializable form.
pub fn snapshot(player: &Player, world: &World) -> SaveGame {
    SaveGame {
        schema_version: SAVE_SCHEMA_VERSION,
        saved_at: Utc::now(),
        player: player.clone(),
        rooms: world
            .rooms()
            .map(|r| (r.id.clone(), RoomDelta::of(r)))
            .collect(),
        monsters: world.monsters.clone(),
    }
}

/// Serialize and write atomically; an existing save is replaced whole or
/// not at all.
pub fn save(path: &Path, player: &Player, world: &World) -> Result<(), EngineError> {
    let snap = snapshot(player, world);
    let json = serde_json::to_string_pretty(&snap)?;
    write_json_atomic(path, &json)?;
    info!("saved game to {}", path.display());
    Ok(())
}

/// Read and validate a save file. Nothing in memory is touched; apply the
/// result with [`apply`] once it is in hand.
pub fn load(path: &Path) -> Result<SaveGame, EngineError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(EngineError::SaveNotFound(path.display().to_string()));
        }
        Err(e) => return Err(EngineError::Io(e)),
    };
    let snap: SaveGame = serde_json::from_str(&text)
        .map_err(|e| EngineError::SaveCorrupt(e.to_string()))?;
    if snap.schema_version != SAVE_SCHEMA_VERSION {
        return Err(EngineError::SchemaMismatch {
            expected: SAVE_SCHEMA_VERSION,
            found: snap.schema_version,
        });
    }
    Ok(snap)
}

/// Lay a loaded save over a freshly built base world and hand back the
/// restored player. Room ids and monster positions the base world does
/// not know are dropped; a player standing in a dropped room is put back
/// at the entrance.
pub fn apply(snap: SaveGame, world: &mut World) -> Player {
    for (room_id, delta) in snap.rooms {
        let Ok(room) = world.room_mut(&room_id) else {
            debug!("save references unknown room {room_id}, skipping");
            continue;
        };
        room.items = delta.items;
        room.first_visit = delta.first_visit;
        room.locked = delta.locked;
        room.chest = delta.chest;
    }

    let monsters: HashMap<String, ActiveMonster> = snap
        .monsters
        .into_iter()
        .filter(|(room_id, _)| world.contains(room_id))
        .collect();
    world.monsters = monsters;

    let mut player = snap.player;
    if !world.contains(&player.room) {
        debug!("save puts the player in unknown room {}, resetting", player.room);
        player.room = START_ROOM_ID.to_string();
        player.visited.insert(START_ROOM_ID.to_string());
    }
    player
}

fn ensure_dir(path: &Path) {
    let _ = fs::create_dir_all(path);
}

fn write_json_atomic(path: &Path, content: &str) -> io::Result<()> {
    ensure_dir(path.parent().unwrap_or(Path::new(".")));
    // Exclusive lock on the target path, created if missing, so two
    // processes cannot interleave their renames.
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(path)?;
    lock_file.lock_exclusive()?;
    let dir = path.parent().unwrap_or(Path::new("."));
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("save.json");
    let mut counter = 0u32;
    let tmp_path = loop {
        let cand = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&cand) {
            Ok(mut tmp) => {
                tmp.write_all(content.as_bytes())?;
                let _ = tmp.flush();
                let _ = tmp.sync_all();
                break cand;
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
                continue;
            }
            Err(e) => return Err(e),
        }
    };
    fs::rename(&tmp_path, path)?;
    if let Ok(dirf) = File::open(dir) {
        let _ = dirf.sync_all();
    }
    drop(lock_file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::content::EXIT_ROOM_ID;
    use tempfile::TempDir;

    fn played_state() -> (Player, World) {
        let mut world = World::builtin();
        let mut player = Player::new("Tess", START_ROOM_ID);
        // Disturb a little of everything a save must carry.
        player.inventory.push("torch".to_string());
        player.hp = 61;
        player.xp = 40;
        player.poison = Some(2);
        player.steps = 7;
        world.room_mut(START_ROOM_ID).unwrap().items.clear();
        world.room_mut(START_ROOM_ID).unwrap().first_visit = false;
        world.monsters.insert(
            "great_hall".to_string(),
            ActiveMonster {
                template: "goblin_scout".to_string(),
                hp: 4,
            },
        );
        (player, world)
    }

    #[test]
    fn round_trip_restores_player_and_world() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("delve.json");
        let (player, world) = played_state();

        save(&path, &player, &world).expect("save");
        let snap = load(&path).expect("load");

        let mut fresh = World::builtin();
        let restored = apply(snap, &mut fresh);

        assert_eq!(restored, player);
        assert_eq!(
            fresh.room(START_ROOM_ID).unwrap().items,
            world.room(START_ROOM_ID).unwrap().items
        );
        assert!(!fresh.room(START_ROOM_ID).unwrap().first_visit);
        assert_eq!(
            fresh.monster_at("great_hall"),
            world.monster_at("great_hall")
        );
        // Untouched rooms come back exactly as authored.
        assert_eq!(
            fresh.room(EXIT_ROOM_ID).unwrap(),
            world.room(EXIT_ROOM_ID).unwrap()
        );
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let err = load(&dir.path().join("nothing-here.json")).unwrap_err();
        assert!(matches!(err, EngineError::SaveNotFound(_)));
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("delve.json");
        fs::write(&path, "{ this is not a save").expect("write");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, EngineError::SaveCorrupt(_)));
    }

    #[test]
    fn wrong_schema_version_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("delve.json");
        let (player, world) = played_state();
        let mut snap = snapshot(&player, &world);
        snap.schema_version = 9;
        fs::write(&path, serde_json::to_string_pretty(&snap).expect("json")).expect("write");
        let err = load(&path).unwrap_err();
        assert!(matches!(
            err,
            EngineError::SchemaMismatch {
                expected: SAVE_SCHEMA_VERSION,
                found: 9
            }
        ));
    }

    #[test]
    fn unknown_rooms_and_stranded_players_are_handled() {
        let (mut player, world) = played_state();
        player.room = "demolished_wing".to_string();
        let mut snap = snapshot(&player, &world);
        snap.rooms.insert(
            "demolished_wing".to_string(),
            RoomDelta {
                items: vec!["ghost_item".to_string()],
                first_visit: false,
                locked: false,
                chest: None,
            },
        );
        snap.monsters.insert(
            "demolished_wing".to_string(),
            ActiveMonster {
                template: "giant_rat".to_string(),
                hp: 5,
            },
        );

        let mut fresh = World::builtin();
        let restored = apply(snap, &mut fresh);
        assert!(!fresh.contains("demolished_wing"));
        assert!(fresh.monster_at("demolished_wing").is_none());
        assert_eq!(restored.room, START_ROOM_ID);
        assert!(restored.visited.contains(START_ROOM_ID));
    }

    #[test]
    fn save_overwrites_whole_and_leaves_no_droppings() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("delve.json");
        let (mut player, world) = played_state();

        save(&path, &player, &world).expect("first save");
        player.steps = 99;
        save(&path, &player, &world).expect("second save");

        let snap = load(&path).expect("load");
        assert_eq!(snap.player.steps, 99);

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.contains("tmp"))
            .collect();
        assert!(leftovers.is_empty(), "stray temp files: {:?}", leftovers);
    }
}
