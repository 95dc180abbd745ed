use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::engine::content;

/// Classification driving what an item does when carried, used, or cast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Weapon { bonus: i32 },
    Shield { defense: i32 },
    Potion { heal: i32 },
    FireScroll { min: i32, max: i32 },
    /// Banishes the dungeon's boss outright; burns lesser foes for the range.
    BanishScroll { min: i32, max: i32 },
    Bomb {
        min: i32,
        max: i32,
        splash_min: i32,
        splash_max: i32,
    },
    Key,
    /// Opens any chest and is never consumed.
    SkeletonKey,
    Lockpick,
    Light,
    Amulet { fire_resist: i32 },
    Treasure,
    Misc,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub weight: u32,
    /// Gold worth; also what the win condition measures.
    pub value: u32,
    pub kind: ItemKind,
}

impl ItemTemplate {
    pub fn new(id: &str, name: &str, description: &str, weight: u32, value: u32, kind: ItemKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            weight,
            value,
            kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FireBreath {
    pub chance: f64,
    pub min: i32,
    pub max: i32,
}

/// What a monster leaves behind when it dies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LootRule {
    None,
    /// At most one drop, rolled once.
    Chance { item: String, chance: f64 },
    /// Dropped in full; used by boss lairs.
    Hoard(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonsterTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub max_hp: i32,
    pub damage_min: i32,
    pub damage_max: i32,
    pub defense: i32,
    pub xp: u32,
    /// Chance the player slips away when moving out of this monster's room.
    pub flee_chance: f64,
    /// Healed at the start of the monster's action; 0 = none.
    pub regeneration: i32,
    /// Heals half of dealt damage back to itself.
    pub life_drain: bool,
    pub fire_breath: Option<FireBreath>,
    pub boss: bool,
    pub loot: LootRule,
}

impl MonsterTemplate {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        max_hp: i32,
        damage: (i32, i32),
        defense: i32,
        xp: u32,
        flee_chance: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            max_hp,
            damage_min: damage.0,
            damage_max: damage.1,
            defense,
            xp,
            flee_chance,
            regeneration: 0,
            life_drain: false,
            fire_breath: None,
            boss: false,
            loot: LootRule::None,
        }
    }

    pub fn with_regeneration(mut self, amount: i32) -> Self {
        self.regeneration = amount;
        self
    }

    pub fn with_life_drain(mut self) -> Self {
        self.life_drain = true;
        self
    }

    pub fn with_fire_breath(mut self, chance: f64, min: i32, max: i32) -> Self {
        self.fire_breath = Some(FireBreath { chance, min, max });
        self
    }

    pub fn with_loot(mut self, item: &str, chance: f64) -> Self {
        self.loot = LootRule::Chance {
            item: item.to_string(),
            chance,
        };
        self
    }

    pub fn with_boss_hoard(mut self, hoard: &[&str]) -> Self {
        self.boss = true;
        self.loot = LootRule::Hoard(hoard.iter().map(|s| s.to_string()).collect());
        self
    }
}

/// Immutable template registries, built once at startup and passed by
/// reference. Lookups never panic; unknown ids fall back to the raw id
/// string in display paths and weigh nothing.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: HashMap<String, ItemTemplate>,
    monsters: HashMap<String, MonsterTemplate>,
    /// Weapon tiers from best to worst; the first carried entry wins.
    weapon_precedence: Vec<String>,
}

impl Catalog {
    pub fn new(
        items: Vec<ItemTemplate>,
        monsters: Vec<MonsterTemplate>,
        weapon_precedence: Vec<String>,
    ) -> Self {
        Self {
            items: items.into_iter().map(|t| (t.id.clone(), t)).collect(),
            monsters: monsters.into_iter().map(|t| (t.id.clone(), t)).collect(),
            weapon_precedence,
        }
    }

    /// The shipped game content.
    pub fn builtin() -> Self {
        Self::new(
            content::builtin_items(),
            content::builtin_monsters(),
            content::weapon_precedence(),
        )
    }

    pub fn item(&self, id: &str) -> Option<&ItemTemplate> {
        self.items.get(id)
    }

    pub fn monster(&self, id: &str) -> Option<&MonsterTemplate> {
        self.monsters.get(id)
    }

    /// Display name for an item, falling back to the raw id.
    pub fn item_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.items.get(id).map(|t| t.name.as_str()).unwrap_or(id)
    }

    /// Display name for a monster, falling back to the raw id.
    pub fn monster_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.monsters.get(id).map(|t| t.name.as_str()).unwrap_or(id)
    }

    pub fn item_weight(&self, id: &str) -> u32 {
        self.items.get(id).map(|t| t.weight).unwrap_or(0)
    }

    pub fn item_value(&self, id: &str) -> u32 {
        self.items.get(id).map(|t| t.value).unwrap_or(0)
    }

    pub fn carried_weight(&self, inventory: &[String]) -> u32 {
        inventory.iter().map(|id| self.item_weight(id)).sum()
    }

    /// Attack bonus of the best carried weapon, by fixed tier precedence.
    pub fn best_weapon_bonus(&self, inventory: &[String]) -> i32 {
        for id in &self.weapon_precedence {
            if inventory.iter().any(|i| i == id) {
                if let Some(ItemKind::Weapon { bonus }) = self.items.get(id).map(|t| &t.kind) {
                    return *bonus;
                }
            }
        }
        0
    }

    /// Defense of the best carried shield.
    pub fn best_shield_defense(&self, inventory: &[String]) -> i32 {
        inventory
            .iter()
            .filter_map(|id| match self.items.get(id).map(|t| &t.kind) {
                Some(ItemKind::Shield { defense }) => Some(*defense),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Fire resistance of the best carried amulet.
    pub fn best_fire_resist(&self, inventory: &[String]) -> i32 {
        inventory
            .iter()
            .filter_map(|id| match self.items.get(id).map(|t| &t.kind) {
                Some(ItemKind::Amulet { fire_resist }) => Some(*fire_resist),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// True when any carried item lights up dark rooms.
    pub fn has_light(&self, inventory: &[String]) -> bool {
        inventory
            .iter()
            .any(|id| matches!(self.items.get(id).map(|t| &t.kind), Some(ItemKind::Light)))
    }
}
