//! Prose views over the world and the player. Pure string builders; no
//! mutation, no I/O, no dice.

use crate::engine::catalog::{Catalog, ItemKind};
use crate::engine::combat::level_threshold;
use crate::engine::types::{Direction, Player};
use crate::engine::world::World;

const DARKNESS_NOTICE: &str =
    "It is pitch dark. You grope along cold stone, seeing nothing of the room or what lies in it.";

/// Four-step condition ladder used wherever a combatant's shape is shown.
pub fn health_phrase(hp: i32, max_hp: i32) -> &'static str {
    if hp >= max_hp {
        "unharmed"
    } else if hp * 10 >= max_hp * 6 {
        "lightly wounded"
    } else if hp * 10 >= max_hp * 3 {
        "wounded"
    } else {
        "gravely wounded"
    }
}

fn name_list(catalog: &Catalog, ids: &[String]) -> String {
    ids.iter()
        .map(|id| catalog.item_name(id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The full description shown on entering a room and on `look`.
///
/// A dark room without a carried light hides its narrative, its floor
/// items, and its chest. Exits are always listed, and a monster always
/// announces itself; you can hear it even when you cannot see it.
pub fn room_view(world: &World, player: &Player, catalog: &Catalog) -> String {
    let Ok(room) = world.room(&player.room) else {
        return "You are nowhere you can put a name to.".to_string();
    };

    let mut out = String::new();
    out.push_str(&format!("-- {} --\n", room.name));

    let dark = room.dark && !catalog.has_light(&player.inventory);
    if dark {
        out.push_str(DARKNESS_NOTICE);
        out.push('\n');
    } else {
        out.push_str(&room.description);
        out.push('\n');
        if !room.items.is_empty() {
            out.push_str(&format!("On the ground: {}.\n", name_list(catalog, &room.items)));
        }
        if let Some(chest) = &room.chest {
            if chest.locked {
                out.push_str("A locked chest squats here.\n");
            } else if chest.contents.is_empty() {
                out.push_str("An open chest stands here, emptied.\n");
            } else {
                out.push_str(&format!(
                    "An open chest holds: {}.\n",
                    name_list(catalog, &chest.contents)
                ));
            }
        }
    }

    if let Some(mon) = world.monster_at(&room.id) {
        match catalog.monster(&mon.template) {
            Some(tpl) => out.push_str(&format!(
                "{} is here, {}.\n",
                tpl.name,
                health_phrase(mon.hp, tpl.max_hp)
            )),
            None => out.push_str(&format!("Something called {} is here.\n", mon.template)),
        }
    }

    let mut exits = Vec::new();
    for dir in Direction::ALL {
        if room.exits.contains_key(&dir) {
            exits.push(dir.to_string());
        }
    }
    if exits.is_empty() {
        out.push_str("There is no way out.");
    } else {
        out.push_str(&format!("Exits: {}.", exits.join(", ")));
    }
    out
}

/// Carried items in acquisition order, duplicates and all, with the
/// running weight total.
pub fn inventory_view(player: &Player, catalog: &Catalog) -> String {
    if player.inventory.is_empty() {
        return format!(
            "You are carrying nothing. (0/{} weight)",
            player.capacity()
        );
    }
    let mut out = String::from("You are carrying:\n");
    for id in &player.inventory {
        out.push_str(&format!(
            "  {} (wt {})\n",
            catalog.item_name(id),
            catalog.item_weight(id)
        ));
    }
    out.push_str(&format!(
        "Weight: {}/{}",
        catalog.carried_weight(&player.inventory),
        player.capacity()
    ));
    out
}

pub fn stats_sheet(player: &Player, catalog: &Catalog) -> String {
    let weapon = catalog.best_weapon_bonus(&player.inventory);
    let shield = catalog.best_shield_defense(&player.inventory);
    let mut out = String::new();
    out.push_str(&format!("{}, level {}\n", player.name, player.level));
    out.push_str(&format!(
        "HP {}/{}   XP {}/{}\n",
        player.hp,
        player.max_hp,
        player.xp,
        level_threshold(player.level)
    ));
    out.push_str(&format!(
        "Attack +{} ({} gear)   Defense +{} ({} gear)\n",
        player.attack_bonus + weapon,
        weapon,
        player.defense_bonus + shield,
        shield
    ));
    out.push_str(&format!(
        "Carrying {}/{}   Steps {}   Kills {}\n",
        catalog.carried_weight(&player.inventory),
        player.capacity(),
        player.steps,
        player.kills
    ));
    match player.poison {
        Some(turns) => out.push_str(&format!(
            "Venom in your blood: {} more room{} before it runs its course.",
            turns,
            if turns == 1 { "" } else { "s" }
        )),
        None => out.push_str("No poison in your veins."),
    }
    out
}

/// Chart of everywhere the player has been. The current room is starred;
/// exits that lead somewhere unvisited show as `?`.
pub fn map_view(world: &World, player: &Player) -> String {
    let mut rooms: Vec<_> = world
        .rooms()
        .filter(|r| player.visited.contains(&r.id))
        .collect();
    rooms.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = String::from("Charted so far:\n");
    for room in rooms {
        let marker = if room.id == player.room { '*' } else { ' ' };
        let mut ways = Vec::new();
        for dir in Direction::ALL {
            let Some(dest) = room.exits.get(&dir) else {
                continue;
            };
            if player.visited.contains(dest) {
                let dest_name = world.room(dest).map(|r| r.name.as_str()).unwrap_or(dest);
                ways.push(format!("{} to {}", dir, dest_name));
            } else {
                ways.push(format!("{} to ?", dir));
            }
        }
        if ways.is_empty() {
            out.push_str(&format!(" {} {}\n", marker, room.name));
        } else {
            out.push_str(&format!(" {} {} ({})\n", marker, room.name, ways.join(", ")));
        }
    }
    out.push_str(&format!(
        "{} room{} charted.",
        player.visited.len(),
        if player.visited.len() == 1 { "" } else { "s" }
    ));
    out
}

/// Close look at one item template; unknown ids get the bare-id shrug.
pub fn item_detail(catalog: &Catalog, id: &str) -> String {
    let Some(tpl) = catalog.item(id) else {
        return format!("Nothing special about {}.", id);
    };
    let mut out = format!("{}: {}\n", tpl.name, tpl.description);
    let line = match &tpl.kind {
        ItemKind::Weapon { bonus } => format!("A weapon. Attack +{}.", bonus),
        ItemKind::Shield { defense } => format!("A shield. Defense +{}.", defense),
        ItemKind::Potion { heal } => format!("Drinkable. Restores up to {} hp.", heal),
        ItemKind::FireScroll { min, max } => {
            format!("A scroll of fire. Burns a foe for {}-{}.", min, max)
        }
        ItemKind::BanishScroll { .. } => {
            "A scroll of banishment. Legend says it unmakes the dungeon's master.".to_string()
        }
        ItemKind::Bomb { min, max, .. } => {
            format!("A bomb. Blasts for {}-{}, and you will feel it too.", min, max)
        }
        ItemKind::Key => "A key. Some lock in this place answers to it.".to_string(),
        ItemKind::SkeletonKey => "A skeleton key. No chest lock refuses it.".to_string(),
        ItemKind::Lockpick => "A lockpick. Steady hands required.".to_string(),
        ItemKind::Light => "A light source. Dark rooms yield to it.".to_string(),
        ItemKind::Amulet { fire_resist } => {
            format!("A warding amulet. Softens flame by {}.", fire_resist)
        }
        ItemKind::Treasure => "Treasure. The reason you came down here.".to_string(),
        ItemKind::Misc => "Nothing obviously useful about it.".to_string(),
    };
    out.push_str(&line);
    out.push('\n');
    out.push_str(&format!("Weight {}, worth {} gold.", tpl.weight, tpl.value));
    out
}

pub fn help_text() -> &'static str {
    "Commands:\n\
  go <direction>   - walk an exit (bare n/s/e/w/up/down work too)\n\
  look             - describe the room again\n\
  take <item|all>  - pick up from the floor or an open chest\n\
  drop <item>      - put a carried item down\n\
  examine <thing>  - look closely at an item or a monster\n\
  use <item>       - drink a potion, throw a bomb, try a key or pick on a chest\n\
  attack           - strike the monster in the room\n\
  cast <scroll>    - read a fire or banishment scroll\n\
  inventory (i)    - list what you carry\n\
  stats            - your full sheet\n\
  map              - chart of everywhere you have been\n\
  save / load      - keep or restore your delve\n\
  help             - this text\n\
  quit             - give up the delve (asks first)\n\
Haul a royal treasure out through the breach and you win."
}

pub fn victory_epilogue(player: &Player, treasure_name: &str) -> String {
    format!(
        "You shoulder through the breach into daylight, {} in hand.\n\
         {} steps, {} kills, level {}. The delve is won.",
        treasure_name, player.steps, player.kills, player.level
    )
}

pub fn death_epilogue(player: &Player) -> String {
    format!(
        "Here ends {}: {} steps, {} kills, level {}.\n\
         The dungeon keeps what it takes.",
        player.name, player.steps, player.kills, player.level
    )
}

pub fn quit_epilogue(player: &Player) -> String {
    format!(
        "You turn back toward the surface. {} steps, {} kills, level {}.",
        player.steps, player.kills, player.level
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{ActiveMonster, Chest, Room};

    fn dark_room_world() -> World {
        World::from_rooms(vec![Room::new("crypt", "Crypt", "Bones in alcoves.")
            .with_dark()
            .with_exit(Direction::North, "hall")
            .with_item("old_bone")
            .with_chest(Chest::unlocked(&["healing_potion"]))])
    }

    #[test]
    fn health_phrase_buckets() {
        assert_eq!(health_phrase(100, 100), "unharmed");
        assert_eq!(health_phrase(60, 100), "lightly wounded");
        assert_eq!(health_phrase(59, 100), "wounded");
        assert_eq!(health_phrase(30, 100), "wounded");
        assert_eq!(health_phrase(29, 100), "gravely wounded");
        assert_eq!(health_phrase(1, 100), "gravely wounded");
    }

    #[test]
    fn darkness_hides_items_but_not_exits() {
        let catalog = Catalog::builtin();
        let world = dark_room_world();
        let p = Player::new("Tess", "crypt");
        let view = room_view(&world, &p, &catalog);
        assert!(view.contains("pitch dark"));
        assert!(!view.contains("Old Bone"));
        assert!(!view.contains("chest"));
        assert!(view.contains("Exits: north."));
    }

    #[test]
    fn a_light_source_reveals_the_room() {
        let catalog = Catalog::builtin();
        let world = dark_room_world();
        let mut p = Player::new("Tess", "crypt");
        p.inventory.push("torch".to_string());
        let view = room_view(&world, &p, &catalog);
        assert!(view.contains("Bones in alcoves."));
        assert!(view.contains("Old Bone"));
        assert!(view.contains("Healing Potion"), "open chest contents show");
    }

    #[test]
    fn monsters_announce_themselves_even_in_the_dark() {
        let catalog = Catalog::builtin();
        let mut world = dark_room_world();
        world.monsters.insert(
            "crypt".to_string(),
            ActiveMonster {
                template: "wraith".to_string(),
                hp: 5,
            },
        );
        let p = Player::new("Tess", "crypt");
        let view = room_view(&world, &p, &catalog);
        assert!(view.contains("Wraith is here"));
        assert!(view.contains("gravely wounded"));
    }

    #[test]
    fn unknown_item_ids_render_as_raw_ids() {
        let catalog = Catalog::builtin();
        let world = World::from_rooms(vec![
            Room::new("attic", "Attic", "Dust.").with_item("glowing_whatsit")
        ]);
        let p = Player::new("Tess", "attic");
        let view = room_view(&world, &p, &catalog);
        assert!(view.contains("glowing_whatsit"));
        assert!(item_detail(&catalog, "glowing_whatsit").contains("Nothing special"));
    }

    #[test]
    fn inventory_keeps_order_and_duplicates() {
        let catalog = Catalog::builtin();
        let mut p = Player::new("Tess", "attic");
        p.inventory = vec![
            "torch".to_string(),
            "healing_potion".to_string(),
            "torch".to_string(),
        ];
        let view = inventory_view(&p, &catalog);
        let torch_lines = view.matches("Torch").count();
        assert_eq!(torch_lines, 2);
        let first_torch = view.find("Torch").unwrap();
        let potion = view.find("Healing Potion").unwrap();
        assert!(first_torch < potion, "acquisition order preserved");
    }

    #[test]
    fn map_stars_current_room_and_fogs_the_unseen() {
        let world = World::from_rooms(vec![
            Room::new("a", "Anteroom", "").with_exit(Direction::North, "b"),
            Room::new("b", "Ballroom", "")
                .with_exit(Direction::South, "a")
                .with_exit(Direction::East, "c"),
            Room::new("c", "Cellar", ""),
        ]);
        let mut p = Player::new("Tess", "b");
        p.visited.insert("a".to_string());
        let view = map_view(&world, &p);
        assert!(view.contains(" * Ballroom"));
        assert!(view.contains("east to ?"), "unvisited rooms are fogged");
        assert!(view.contains("south to Anteroom"));
        assert!(!view.contains("Cellar"));
        assert!(view.contains("2 rooms charted."));
    }

    #[test]
    fn stats_sheet_counts_gear() {
        let catalog = Catalog::builtin();
        let mut p = Player::new("Tess", "attic");
        p.inventory.push("iron_shield".to_string());
        let sheet = stats_sheet(&p, &catalog);
        assert!(sheet.contains("Defense +4 (4 gear)"));
        assert!(sheet.contains("No poison"));
        p.poison = Some(1);
        assert!(stats_sheet(&p, &catalog).contains("1 more room before"));
    }
}
