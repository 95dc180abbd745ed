//! # Gloomdelve - Terminal Dungeon Crawler
//!
//! Gloomdelve is a single-player dungeon crawl played at a line prompt: explore the
//! ruined keep, fight what lives there, and haul a treasure worth keeping back out
//! through the breach in the far wall.
//!
//! ## Features
//!
//! - **Classic Command Loop**: `go`, `take`, `attack`, `cast` and friends, with
//!   short aliases, tab completion, and history at the prompt.
//! - **Deterministic Worlds**: Every run can be replayed from a seed; dice rolls,
//!   monster spawns, and loot drops all flow from one RNG.
//! - **Turn-Based Combat**: Player strikes first, criticals land harder, scrolls and
//!   bombs burn on use, and the boss guards a hoard.
//! - **Weight-Limited Looting**: Carry capacity grows with level; `take all` grabs
//!   greedily in room order and tells you what it left behind.
//! - **Atomic Saves**: One JSON save file, written whole-or-not-at-all, versioned so
//!   a stale or mangled file is refused instead of half-loaded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gloomdelve::config::Config;
//! use gloomdelve::engine::Catalog;
//! use gloomdelve::game::{RustylineEditor, Session};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("gloomdelve.toml")?;
//!     let catalog = Catalog::builtin();
//!     let mut session = Session::new(
//!         &catalog,
//!         &config.game.player_name,
//!         config.game.save_path.clone().into(),
//!         config.game.seed,
//!     );
//!     let mut editor = RustylineEditor::new()?;
//!     session.run(&mut editor)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`engine`] - The rules: catalog, world graph, combat, rendering, and saves
//! - [`game`] - The loop: command parsing, line editing, and session dispatch
//! - [`config`] - TOML configuration with defaults for every field
//! - [`logutil`] - Log sanitization for player-typed text
//!
//! ## Architecture
//!
//! The binary owns the prompt; everything below it is a library so the whole game
//! can be driven from tests with a scripted editor:
//!
//! ```text
//! ┌─────────────────┐
//! │     Session     │ ← parses lines, dispatches commands
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │     Engine      │ ← world graph, combat, catalog lookups
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │      Saves      │ ← atomic JSON snapshots on disk
//! └─────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod game;
pub mod logutil;
