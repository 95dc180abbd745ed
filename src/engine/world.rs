//! The room graph and everything that mutates it: movement, locks, chests,
//! item transfer, and monster spawning.

use std::collections::HashMap;

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

use crate::engine::catalog::{Catalog, ItemKind};
use crate::engine::combat::{self, PoisonTick, StrikeReport};
use crate::engine::content;
use crate::engine::errors::EngineError;
use crate::engine::types::{ActiveMonster, Direction, Player, Room};

/// Chance a lockpick defeats a chest lock; failure breaks the pick.
pub const LOCKPICK_CHANCE: f64 = 0.4;

/// Why a move did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveBlock {
    NoSuchExit,
    Locked,
}

/// Everything that happened during one successful room transition, in the
/// order it happened.
#[derive(Debug, Clone)]
pub struct MoveEvents {
    pub to: String,
    /// Key id that opened the destination's entry lock this move.
    pub unlocked_door: Option<String>,
    /// Parting hit taken on a failed flee roll.
    pub flee_strike: Option<StrikeReport>,
    /// Venom applied on the transition; when fatal, bookkeeping after it
    /// (steps, visited, spawns) never ran.
    pub poison: Option<PoisonTick>,
    /// Monster template that appeared on this first visit.
    pub spawned: Option<String>,
}

#[derive(Debug, Clone)]
pub enum MoveOutcome {
    Moved(MoveEvents),
    Blocked(MoveBlock),
    /// The source-room monster cut the player down mid-flight; the move was
    /// aborted and the player never left.
    FleeDeath(StrikeReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TakeRequest {
    All,
    Item(String),
}

/// Per-item capacity results of a take; skipped items stay where they were.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TakeOutcome {
    pub acquired: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Dropped,
    NotCarried,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockMethod {
    SkeletonKey,
    MatchingKey,
    Picked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockOutcome {
    NoChest,
    AlreadyOpen,
    Opened {
        method: UnlockMethod,
        contents: Vec<String>,
    },
    /// The key exists but belongs to some other lock.
    WrongKey,
    /// The pick snapped; it is gone.
    PickFailed,
    /// The item cannot open chests at all.
    NotAnOpener,
}

/// The mutable room graph plus the monsters currently standing in it,
/// keyed by room id.
#[derive(Debug, Clone)]
pub struct World {
    rooms: HashMap<String, Room>,
    pub monsters: HashMap<String, ActiveMonster>,
}

impl World {
    pub fn from_rooms(rooms: Vec<Room>) -> Self {
        Self {
            rooms: rooms.into_iter().map(|r| (r.id.clone(), r)).collect(),
            monsters: HashMap::new(),
        }
    }

    /// The shipped sixteen-room keep.
    pub fn builtin() -> Self {
        Self::from_rooms(content::builtin_world())
    }

    pub fn room(&self, id: &str) -> Result<&Room, EngineError> {
        self.rooms
            .get(id)
            .ok_or_else(|| EngineError::NoSuchRoom(id.to_string()))
    }

    pub fn room_mut(&mut self, id: &str) -> Result<&mut Room, EngineError> {
        self.rooms
            .get_mut(id)
            .ok_or_else(|| EngineError::NoSuchRoom(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rooms.contains_key(id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn monster_at(&self, room_id: &str) -> Option<&ActiveMonster> {
        self.monsters.get(room_id)
    }

    /// Put the room's spawn rule into effect. Idempotent: a room that
    /// already holds a monster is left untouched. Boss lairs spawn without
    /// consulting the dice.
    pub fn spawn_monster(
        &mut self,
        catalog: &Catalog,
        room_id: &str,
        rng: &mut StdRng,
    ) -> Option<String> {
        if self.monsters.contains_key(room_id) {
            return None;
        }
        let (rule, boss_lair) = {
            let room = self.rooms.get(room_id)?;
            (room.spawn.clone()?, room.boss_lair)
        };
        if !boss_lair && !rng.gen_bool(rule.chance.clamp(0.0, 1.0)) {
            return None;
        }
        let tpl = catalog.monster(&rule.monster)?;
        self.monsters.insert(
            room_id.to_string(),
            ActiveMonster {
                template: tpl.id.clone(),
                hp: tpl.max_hp,
            },
        );
        debug!("spawned {} in {}", tpl.id, room_id);
        Some(tpl.id.clone())
    }

    /// Consume the room's first-visit flag; on the first visit only,
    /// evaluate its spawn rule. Called for the starting room at game start
    /// and for every destination of a successful move.
    pub fn enter_room(
        &mut self,
        catalog: &Catalog,
        room_id: &str,
        rng: &mut StdRng,
    ) -> Option<String> {
        let first = {
            let room = self.rooms.get_mut(room_id)?;
            let first = room.first_visit;
            room.first_visit = false;
            first
        };
        if !first {
            return None;
        }
        self.spawn_monster(catalog, room_id, rng)
    }

    /// Attempt to move the player one exit over.
    ///
    /// Order of business: exit and entry-lock checks (a blocked move rolls
    /// no dice and changes nothing), then the flee check against a monster
    /// in the room being left, then the transition itself, then the poison
    /// tick with its immediate death check, and only then step counting,
    /// the visited set, and first-visit spawn evaluation.
    pub fn move_player(
        &mut self,
        player: &mut Player,
        catalog: &Catalog,
        rng: &mut StdRng,
        dir: Direction,
    ) -> MoveOutcome {
        let from = player.room.clone();
        let dest_id = match self.rooms.get(&from).and_then(|r| r.exits.get(&dir)) {
            Some(d) => d.clone(),
            None => return MoveOutcome::Blocked(MoveBlock::NoSuchExit),
        };
        let dest = match self.rooms.get(&dest_id) {
            Some(d) => d,
            None => return MoveOutcome::Blocked(MoveBlock::NoSuchExit),
        };

        let mut unlocked_door = None;
        if dest.locked {
            match dest.door_key.clone() {
                Some(key) if player.has_item(&key) => unlocked_door = Some(key),
                _ => return MoveOutcome::Blocked(MoveBlock::Locked),
            }
        }

        // Flee check against whatever holds the room being left. A room
        // without a live monster is a plain walk out.
        let mut flee_strike = None;
        if let Some(tpl) = self
            .monsters
            .get(&from)
            .and_then(|m| catalog.monster(&m.template))
            .cloned()
        {
            if !rng.gen_bool(tpl.flee_chance.clamp(0.0, 1.0)) {
                if let Some(mon) = self.monsters.get_mut(&from) {
                    let strike = combat::monster_action(player, catalog, &tpl, &mut mon.hp, rng);
                    if strike.fatal {
                        return MoveOutcome::FleeDeath(strike);
                    }
                    flee_strike = Some(strike);
                }
            }
        }

        player.room = dest_id.clone();
        if unlocked_door.is_some() {
            if let Some(room) = self.rooms.get_mut(&dest_id) {
                room.locked = false;
            }
        }

        let poison = combat::poison_tick(player, rng);
        if poison.map(|t| t.fatal).unwrap_or(false) {
            return MoveOutcome::Moved(MoveEvents {
                to: dest_id,
                unlocked_door,
                flee_strike,
                poison,
                spawned: None,
            });
        }

        player.steps += 1;
        player.visited.insert(dest_id.clone());
        let spawned = self.enter_room(catalog, &dest_id, rng);

        MoveOutcome::Moved(MoveEvents {
            to: dest_id,
            unlocked_door,
            flee_strike,
            poison,
            spawned,
        })
    }

    /// Pick up items from the room floor, then from an open chest. Each
    /// item is checked against carry capacity individually, in place order,
    /// so a heavy item up front can starve the lighter ones behind it.
    pub fn take(
        &mut self,
        player: &mut Player,
        catalog: &Catalog,
        request: &TakeRequest,
    ) -> TakeOutcome {
        let room_id = player.room.clone();
        let mut outcome = TakeOutcome::default();
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return outcome;
        };
        let capacity = player.capacity();

        let mut lift = |pool: &mut Vec<String>, wanted: Option<&str>, out: &mut TakeOutcome| {
            let mut kept = Vec::new();
            let mut taken_one = false;
            for id in std::mem::take(pool) {
                let matches = match wanted {
                    Some(w) => !taken_one && id == w,
                    None => true,
                };
                if !matches {
                    kept.push(id);
                    continue;
                }
                let weight = catalog.item_weight(&id);
                if catalog.carried_weight(&player.inventory) + weight <= capacity {
                    player.inventory.push(id.clone());
                    out.acquired.push(id);
                    taken_one = true;
                } else {
                    out.skipped.push(id.clone());
                    kept.push(id);
                    if wanted.is_some() {
                        taken_one = true;
                    }
                }
            }
            *pool = kept;
            taken_one
        };

        match request {
            TakeRequest::All => {
                lift(&mut room.items, None, &mut outcome);
                if let Some(chest) = room.chest.as_mut() {
                    if !chest.locked {
                        lift(&mut chest.contents, None, &mut outcome);
                    }
                }
            }
            TakeRequest::Item(id) => {
                let found = lift(&mut room.items, Some(id.as_str()), &mut outcome);
                if !found {
                    if let Some(chest) = room.chest.as_mut() {
                        if !chest.locked {
                            lift(&mut chest.contents, Some(id.as_str()), &mut outcome);
                        }
                    }
                }
            }
        }
        outcome
    }

    /// Drop one carried item onto the room floor. Chests are never drop
    /// targets.
    pub fn drop_item(&mut self, player: &mut Player, item_id: &str) -> DropOutcome {
        if !player.remove_item(item_id) {
            return DropOutcome::NotCarried;
        }
        let room_id = player.room.clone();
        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.items.push(item_id.to_string());
        }
        DropOutcome::Dropped
    }

    /// Try to open the current room's chest with a specific carried item.
    ///
    /// A matching key is consumed by the lock; the skeleton key never is; a
    /// lockpick survives success but snaps on failure.
    pub fn unlock_chest_with(
        &mut self,
        player: &mut Player,
        catalog: &Catalog,
        rng: &mut StdRng,
        item_id: &str,
    ) -> UnlockOutcome {
        let room_id = player.room.clone();
        let (locked, chest_key) = match self.rooms.get(&room_id).and_then(|r| r.chest.as_ref()) {
            None => return UnlockOutcome::NoChest,
            Some(c) => (c.locked, c.key.clone()),
        };
        if !locked {
            return UnlockOutcome::AlreadyOpen;
        }

        let method = match catalog.item(item_id).map(|t| &t.kind) {
            Some(ItemKind::SkeletonKey) => UnlockMethod::SkeletonKey,
            Some(ItemKind::Key) => {
                if chest_key.as_deref() != Some(item_id) {
                    return UnlockOutcome::WrongKey;
                }
                player.remove_item(item_id);
                UnlockMethod::MatchingKey
            }
            Some(ItemKind::Lockpick) => {
                if !rng.gen_bool(LOCKPICK_CHANCE) {
                    player.remove_item(item_id);
                    return UnlockOutcome::PickFailed;
                }
                UnlockMethod::Picked
            }
            _ => return UnlockOutcome::NotAnOpener,
        };

        let contents = match self
            .rooms
            .get_mut(&room_id)
            .and_then(|r| r.chest.as_mut())
        {
            Some(chest) => {
                chest.locked = false;
                chest.contents.clone()
            }
            None => Vec::new(),
        };
        UnlockOutcome::Opened { method, contents }
    }
}
