//! One playthrough: the mutable game state, command dispatch, and the
//! play loop itself.

use std::path::PathBuf;

use anyhow::Result;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::catalog::{Catalog, ItemKind};
use crate::engine::combat::{self, PoisonTick, TurnOutcome, TurnReport};
use crate::engine::content::{EXIT_ROOM_ID, START_ROOM_ID, WIN_TREASURE_VALUE};
use crate::engine::errors::EngineError;
use crate::engine::render;
use crate::engine::resolver::{self, ResolveResult};
use crate::engine::save;
use crate::engine::types::{Direction, Player};
use crate::engine::world::{
    DropOutcome, MoveBlock, MoveOutcome, TakeRequest, UnlockMethod, UnlockOutcome, World,
};
use crate::game::commands::{self, Command};
use crate::game::input::{LineEditor, ReadResult};
use crate::logutil::escape_log;

const WELCOME: &str = "You came down into the ruin of Gloomdelve Keep for one reason: somewhere \
in these halls lies a treasure worth a retirement, and the breach in the far wall is the only \
way out with it. Type help if you lose your nerve or your way.";

/// How the loop should proceed after a handled line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
    Dead,
    Won,
}

/// Everything that changes over a playthrough, threaded explicitly through
/// the handlers rather than living in globals.
pub struct GameState {
    pub player: Player,
    pub world: World,
    pub rng: StdRng,
    pub save_path: PathBuf,
    pending_quit: bool,
}

pub struct Session<'a> {
    catalog: &'a Catalog,
    pub state: GameState,
}

impl<'a> Session<'a> {
    pub fn new(
        catalog: &'a Catalog,
        player_name: &str,
        save_path: PathBuf,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut world = World::builtin();
        let player = Player::new(player_name, START_ROOM_ID);
        world.enter_room(catalog, START_ROOM_ID, &mut rng);
        info!("new delve for {} (seed: {:?})", player_name, seed);
        Self {
            catalog,
            state: GameState {
                player,
                world,
                rng,
                save_path,
                pending_quit: false,
            },
        }
    }

    /// Banner plus the first room view.
    pub fn opening(&self) -> String {
        format!(
            "{}\n\n{}",
            WELCOME,
            render::room_view(&self.state.world, &self.state.player, self.catalog)
        )
    }

    /// Drive the session from an editor until it ends one way or another.
    pub fn run(&mut self, editor: &mut dyn LineEditor) -> Result<LoopControl> {
        println!("{}\n", self.opening());
        loop {
            match editor.read_line("> ")? {
                ReadResult::Line(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history(&line);
                    }
                    let (text, control) = self.handle_line(&line);
                    if !text.is_empty() {
                        println!("{}\n", text);
                    }
                    if control != LoopControl::Continue {
                        return Ok(control);
                    }
                }
                ReadResult::Interrupted | ReadResult::Eof => {
                    println!("{}", render::quit_epilogue(&self.state.player));
                    return Ok(LoopControl::Quit);
                }
            }
        }
    }

    /// Handle one typed line and say how the loop should proceed.
    pub fn handle_line(&mut self, line: &str) -> (String, LoopControl) {
        if self.state.pending_quit {
            self.state.pending_quit = false;
            let answer = line.trim().to_lowercase();
            if answer == "y" || answer == "yes" {
                return (
                    render::quit_epilogue(&self.state.player),
                    LoopControl::Quit,
                );
            }
            return (
                "You steel yourself and press on.".to_string(),
                LoopControl::Continue,
            );
        }

        let command = commands::parse(line);
        debug!("input '{}' parsed as {:?}", escape_log(line), command);
        match command {
            Command::Empty => (String::new(), LoopControl::Continue),
            Command::Unknown(verb) => (
                format!("You don't know how to {}. Try help.", verb),
                LoopControl::Continue,
            ),
            Command::Go(None) => (
                "Go where? Name a direction.".to_string(),
                LoopControl::Continue,
            ),
            Command::Go(Some(dir)) => self.do_go(dir),
            Command::Look => (
                render::room_view(&self.state.world, &self.state.player, self.catalog),
                LoopControl::Continue,
            ),
            Command::Take(arg) => self.do_take(&arg),
            Command::Drop(arg) => self.do_drop(&arg),
            Command::Examine(arg) => self.do_examine(&arg),
            Command::Use(arg) => self.do_use(&arg),
            Command::Inventory => (
                render::inventory_view(&self.state.player, self.catalog),
                LoopControl::Continue,
            ),
            Command::Attack => self.do_attack(),
            Command::Cast(arg) => self.do_cast(&arg),
            Command::Stats => (
                render::stats_sheet(&self.state.player, self.catalog),
                LoopControl::Continue,
            ),
            Command::Map => (
                render::map_view(&self.state.world, &self.state.player),
                LoopControl::Continue,
            ),
            Command::Save => self.do_save(),
            Command::Load => self.do_load(),
            Command::Help => (render::help_text().to_string(), LoopControl::Continue),
            Command::Quit => {
                self.state.pending_quit = true;
                (
                    "Give up the delve? (y to confirm)".to_string(),
                    LoopControl::Continue,
                )
            }
        }
    }

    fn do_go(&mut self, dir: Direction) -> (String, LoopControl) {
        let outcome = self.state.world.move_player(
            &mut self.state.player,
            self.catalog,
            &mut self.state.rng,
            dir,
        );
        match outcome {
            MoveOutcome::Blocked(MoveBlock::NoSuchExit) => (
                format!("There is no way {} from here.", dir),
                LoopControl::Continue,
            ),
            MoveOutcome::Blocked(MoveBlock::Locked) => (
                "A locked door bars the way. Some key in this place must fit it.".to_string(),
                LoopControl::Continue,
            ),
            MoveOutcome::FleeDeath(strike) => {
                let mut out = strike.text;
                out.push('\n');
                out.push_str(&render::death_epilogue(&self.state.player));
                (out, LoopControl::Dead)
            }
            MoveOutcome::Moved(ev) => {
                let mut out = String::new();
                if let Some(key) = &ev.unlocked_door {
                    out.push_str(&format!(
                        "The {} turns and the way stands open.\n",
                        self.catalog.item_name(key)
                    ));
                }
                if let Some(strike) = &ev.flee_strike {
                    out.push_str(&strike.text);
                    out.push_str("\nYou tear yourself free and run.\n");
                }
                if let Some(tick) = ev.poison {
                    out.push_str(&poison_prose(tick));
                    out.push('\n');
                    if tick.fatal {
                        out.push_str(&render::death_epilogue(&self.state.player));
                        return (out, LoopControl::Dead);
                    }
                }
                if let Some(spawned) = &ev.spawned {
                    let name = self
                        .catalog
                        .monster(spawned)
                        .map(|t| t.name.as_str())
                        .unwrap_or(spawned);
                    out.push_str(&format!("Something stirs: {}!\n", name));
                }
                out.push_str(&render::room_view(
                    &self.state.world,
                    &self.state.player,
                    self.catalog,
                ));
                if let Some(treasure) = self.win_trophy() {
                    out.push('\n');
                    out.push_str(&render::victory_epilogue(&self.state.player, &treasure));
                    return (out, LoopControl::Won);
                }
                (out, LoopControl::Continue)
            }
        }
    }

    /// The winning check: standing in the breach with a single item rich
    /// enough to retire on.
    fn win_trophy(&self) -> Option<String> {
        if self.state.player.room != EXIT_ROOM_ID {
            return None;
        }
        self.state
            .player
            .inventory
            .iter()
            .filter_map(|id| self.catalog.item(id))
            .filter(|t| t.value >= WIN_TREASURE_VALUE)
            .max_by_key(|t| t.value)
            .map(|t| t.name.clone())
    }

    fn room_is_dark(&self) -> bool {
        match self.state.world.room(&self.state.player.room) {
            Ok(room) => room.dark && !self.catalog.has_light(&self.state.player.inventory),
            Err(_) => false,
        }
    }

    /// Floor items plus the contents of an open chest, when there is light
    /// to see them by.
    fn visible_items(&self) -> Vec<String> {
        if self.room_is_dark() {
            return Vec::new();
        }
        let Ok(room) = self.state.world.room(&self.state.player.room) else {
            return Vec::new();
        };
        let mut pool = room.items.clone();
        if let Some(chest) = &room.chest {
            if !chest.locked {
                pool.extend(chest.contents.iter().cloned());
            }
        }
        pool
    }

    fn do_take(&mut self, arg: &str) -> (String, LoopControl) {
        if arg.is_empty() {
            return ("Take what?".to_string(), LoopControl::Continue);
        }
        if self.room_is_dark() {
            return (
                "You fumble in the dark and find nothing.".to_string(),
                LoopControl::Continue,
            );
        }
        let request = if arg.eq_ignore_ascii_case("all") {
            TakeRequest::All
        } else {
            let pool = self.visible_items();
            match resolver::resolve_item(self.catalog, &pool, arg) {
                ResolveResult::NotFound => {
                    return (
                        format!("There is no {} here.", arg),
                        LoopControl::Continue,
                    );
                }
                ResolveResult::Ambiguous(matches) => {
                    return (
                        resolver::format_ambiguous(self.catalog, &matches),
                        LoopControl::Continue,
                    );
                }
                ResolveResult::Found(id) => TakeRequest::Item(id),
            }
        };

        let outcome = self
            .state
            .world
            .take(&mut self.state.player, self.catalog, &request);
        let mut lines = Vec::new();
        for id in &outcome.acquired {
            lines.push(format!("You take the {}.", self.catalog.item_name(id)));
        }
        for id in &outcome.skipped {
            lines.push(format!(
                "The {} is more than you can carry.",
                self.catalog.item_name(id)
            ));
        }
        if lines.is_empty() {
            lines.push("There is nothing here worth taking.".to_string());
        }
        (lines.join("\n"), LoopControl::Continue)
    }

    fn do_drop(&mut self, arg: &str) -> (String, LoopControl) {
        if arg.is_empty() {
            return ("Drop what?".to_string(), LoopControl::Continue);
        }
        match resolver::resolve_item(self.catalog, &self.state.player.inventory, arg) {
            ResolveResult::NotFound => (
                format!("You are not carrying any {}.", arg),
                LoopControl::Continue,
            ),
            ResolveResult::Ambiguous(matches) => (
                resolver::format_ambiguous(self.catalog, &matches),
                LoopControl::Continue,
            ),
            ResolveResult::Found(id) => {
                match self.state.world.drop_item(&mut self.state.player, &id) {
                    DropOutcome::Dropped => (
                        format!("You set down the {}.", self.catalog.item_name(&id)),
                        LoopControl::Continue,
                    ),
                    DropOutcome::NotCarried => (
                        format!("You are not carrying any {}.", arg),
                        LoopControl::Continue,
                    ),
                }
            }
        }
    }

    fn do_examine(&mut self, arg: &str) -> (String, LoopControl) {
        if arg.is_empty() {
            return ("Examine what?".to_string(), LoopControl::Continue);
        }
        // The monster first: it announces itself even in the dark.
        if let Some(mon) = self.state.world.monster_at(&self.state.player.room) {
            if let Some(tpl) = self.catalog.monster(&mon.template) {
                let wanted = arg.to_lowercase();
                if tpl.name.to_lowercase().contains(&wanted) || tpl.id == wanted {
                    return (
                        format!(
                            "{}: {}\nIt looks {}.",
                            tpl.name,
                            tpl.description,
                            render::health_phrase(mon.hp, tpl.max_hp)
                        ),
                        LoopControl::Continue,
                    );
                }
            }
        }
        let mut pool = self.state.player.inventory.clone();
        pool.extend(self.visible_items());
        match resolver::resolve_item(self.catalog, &pool, arg) {
            ResolveResult::NotFound => (
                format!("You see no {} here.", arg),
                LoopControl::Continue,
            ),
            ResolveResult::Ambiguous(matches) => (
                resolver::format_ambiguous(self.catalog, &matches),
                LoopControl::Continue,
            ),
            ResolveResult::Found(id) => (
                render::item_detail(self.catalog, &id),
                LoopControl::Continue,
            ),
        }
    }

    fn do_use(&mut self, arg: &str) -> (String, LoopControl) {
        if arg.is_empty() {
            return ("Use what?".to_string(), LoopControl::Continue);
        }
        let id = match resolver::resolve_item(self.catalog, &self.state.player.inventory, arg) {
            ResolveResult::NotFound => {
                return (
                    format!("You are not carrying any {}.", arg),
                    LoopControl::Continue,
                );
            }
            ResolveResult::Ambiguous(matches) => {
                return (
                    resolver::format_ambiguous(self.catalog, &matches),
                    LoopControl::Continue,
                );
            }
            ResolveResult::Found(id) => id,
        };
        let name = self.catalog.item_name(&id).to_string();
        let kind = self.catalog.item(&id).map(|t| t.kind.clone());
        match kind {
            Some(ItemKind::Potion { heal }) => {
                if self.state.player.hp >= self.state.player.max_hp {
                    return (
                        format!("You are hale; no sense wasting the {}.", name),
                        LoopControl::Continue,
                    );
                }
                self.state.player.remove_item(&id);
                let healed =
                    heal.min(self.state.player.max_hp - self.state.player.hp);
                self.state.player.hp += healed;
                (
                    format!(
                        "You drink the {}. Warmth knits you back together ({}/{} hp).",
                        name, self.state.player.hp, self.state.player.max_hp
                    ),
                    LoopControl::Continue,
                )
            }
            Some(ItemKind::Bomb { .. }) => {
                let report = combat::use_bomb(
                    &mut self.state.world,
                    &mut self.state.player,
                    self.catalog,
                    &mut self.state.rng,
                    &id,
                );
                self.finish_combat(report)
            }
            Some(ItemKind::Key) | Some(ItemKind::SkeletonKey) | Some(ItemKind::Lockpick) => {
                self.do_unlock(&id, &name)
            }
            Some(ItemKind::Light) => (
                format!("You hold the {} high and the shadows pull back.", name),
                LoopControl::Continue,
            ),
            Some(ItemKind::FireScroll { .. }) | Some(ItemKind::BanishScroll { .. }) => (
                format!("Scrolls are read aloud. Try cast {}.", arg),
                LoopControl::Continue,
            ),
            Some(ItemKind::Weapon { .. })
            | Some(ItemKind::Shield { .. })
            | Some(ItemKind::Amulet { .. }) => (
                format!("Carrying the {} is enough; it serves you in a fight.", name),
                LoopControl::Continue,
            ),
            Some(ItemKind::Treasure) | Some(ItemKind::Misc) | None => (
                format!("You turn the {} over in your hands. Nothing happens.", name),
                LoopControl::Continue,
            ),
        }
    }

    fn do_unlock(&mut self, item_id: &str, name: &str) -> (String, LoopControl) {
        let outcome = self.state.world.unlock_chest_with(
            &mut self.state.player,
            self.catalog,
            &mut self.state.rng,
            item_id,
        );
        let text = match outcome {
            UnlockOutcome::NoChest => "There is no chest here.".to_string(),
            UnlockOutcome::AlreadyOpen => "The chest is already open.".to_string(),
            UnlockOutcome::WrongKey => {
                format!("The {} does not fit this lock.", name)
            }
            UnlockOutcome::PickFailed => {
                format!("The {} snaps off inside the lock.", name)
            }
            UnlockOutcome::NotAnOpener => {
                format!("You cannot open anything with the {}.", name)
            }
            UnlockOutcome::Opened { method, contents } => {
                let mut text = match method {
                    UnlockMethod::SkeletonKey => {
                        format!("The {} turns as if the lock were made for it.", name)
                    }
                    UnlockMethod::MatchingKey => {
                        format!("The {} turns once and stays behind in the lock.", name)
                    }
                    UnlockMethod::Picked => "The lock gives way to your pick.".to_string(),
                };
                if contents.is_empty() {
                    text.push_str(" The chest is empty.");
                } else {
                    let names: Vec<&str> = contents
                        .iter()
                        .map(|id| self.catalog.item_name(id))
                        .collect();
                    text.push_str(&format!(" Inside: {}.", names.join(", ")));
                }
                text
            }
        };
        (text, LoopControl::Continue)
    }

    fn do_attack(&mut self) -> (String, LoopControl) {
        let report = combat::attack_turn(
            &mut self.state.world,
            &mut self.state.player,
            self.catalog,
            &mut self.state.rng,
        );
        self.finish_combat(report)
    }

    fn do_cast(&mut self, arg: &str) -> (String, LoopControl) {
        if arg.is_empty() {
            return ("Cast what?".to_string(), LoopControl::Continue);
        }
        let id = match resolver::resolve_item(self.catalog, &self.state.player.inventory, arg) {
            ResolveResult::NotFound => {
                return (
                    format!("You are not carrying any {}.", arg),
                    LoopControl::Continue,
                );
            }
            ResolveResult::Ambiguous(matches) => {
                return (
                    resolver::format_ambiguous(self.catalog, &matches),
                    LoopControl::Continue,
                );
            }
            ResolveResult::Found(id) => id,
        };
        let kind = self.catalog.item(&id).map(|t| t.kind.clone());
        match kind {
            Some(ItemKind::FireScroll { .. }) => {
                let report = combat::cast_fire_scroll(
                    &mut self.state.world,
                    &mut self.state.player,
                    self.catalog,
                    &mut self.state.rng,
                    &id,
                );
                self.finish_combat(report)
            }
            Some(ItemKind::BanishScroll { .. }) => {
                let report = combat::cast_banishment(
                    &mut self.state.world,
                    &mut self.state.player,
                    self.catalog,
                    &mut self.state.rng,
                    &id,
                );
                self.finish_combat(report)
            }
            _ => (
                format!(
                    "The {} has no words on it to read.",
                    self.catalog.item_name(&id)
                ),
                LoopControl::Continue,
            ),
        }
    }

    fn finish_combat(&mut self, report: TurnReport) -> (String, LoopControl) {
        if report.outcome == TurnOutcome::PlayerDefeated {
            let mut out = report.text;
            out.push('\n');
            out.push_str(&render::death_epilogue(&self.state.player));
            return (out, LoopControl::Dead);
        }
        (report.text, LoopControl::Continue)
    }

    fn do_save(&mut self) -> (String, LoopControl) {
        match save::save(
            &self.state.save_path,
            &self.state.player,
            &self.state.world,
        ) {
            Ok(()) => (
                format!("Saved to {}.", self.state.save_path.display()),
                LoopControl::Continue,
            ),
            Err(e) => (format!("The save failed: {}", e), LoopControl::Continue),
        }
    }

    fn do_load(&mut self) -> (String, LoopControl) {
        match save::load(&self.state.save_path) {
            Ok(snap) => {
                let mut world = World::builtin();
                let player = save::apply(snap, &mut world);
                self.state.world = world;
                self.state.player = player;
                info!("loaded save from {}", self.state.save_path.display());
                (
                    format!(
                        "The delve resumes where you left it.\n{}",
                        render::room_view(&self.state.world, &self.state.player, self.catalog)
                    ),
                    LoopControl::Continue,
                )
            }
            Err(EngineError::SaveNotFound(_)) => (
                "There is no save to load.".to_string(),
                LoopControl::Continue,
            ),
            Err(e) => (
                format!("Could not load the save: {}", e),
                LoopControl::Continue,
            ),
        }
    }
}

fn poison_prose(tick: PoisonTick) -> String {
    let mut out = format!("Venom scalds through you for {} damage.", tick.damage);
    if tick.fatal {
        out.push_str(" Your legs give out.");
    } else if tick.cured {
        out.push_str(" With that, the venom has run its course.");
    } else {
        out.push_str(&format!(
            " {} more room{} and it will pass.",
            tick.remaining,
            if tick.remaining == 1 { "" } else { "s" }
        ));
    }
    out
}
