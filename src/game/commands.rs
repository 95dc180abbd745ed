//! Turning a typed line into a command.
//!
//! The verb is the first whitespace-separated token, matched
//! case-insensitively; everything after it is passed through untouched for
//! name resolution. A bare direction word works as shorthand for `go`.

use crate::engine::types::Direction;

/// Verbs offered to tab completion at the prompt.
pub const VERBS: &[&str] = &[
    "go", "look", "take", "drop", "examine", "use", "inventory", "attack", "cast", "stats", "map",
    "save", "load", "help", "quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `go <direction>`; `None` when the direction was missing or garbled.
    Go(Option<Direction>),
    Look,
    /// Argument is the raw item text, or `all`.
    Take(String),
    Drop(String),
    Examine(String),
    Use(String),
    Inventory,
    Attack,
    Cast(String),
    Stats,
    Map,
    Save,
    Load,
    Help,
    Quit,
    Empty,
    /// Verb nobody taught us; carries the offending word.
    Unknown(String),
}

pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or("").to_lowercase();
    let rest = parts.next().unwrap_or("").trim().to_string();

    // A lone direction word walks that way.
    if rest.is_empty() {
        if let Some(dir) = Direction::parse(&verb) {
            return Command::Go(Some(dir));
        }
    }

    match verb.as_str() {
        "go" | "walk" | "move" => Command::Go(Direction::parse(&rest)),
        "look" | "l" => Command::Look,
        "take" | "get" | "grab" => Command::Take(rest),
        "drop" => Command::Drop(rest),
        "examine" | "x" | "inspect" => Command::Examine(rest),
        "use" => Command::Use(rest),
        "inventory" | "inv" | "i" => Command::Inventory,
        "attack" | "fight" | "hit" => Command::Attack,
        "cast" | "read" => Command::Cast(rest),
        "stats" | "status" => Command::Stats,
        "map" | "m" => Command::Map,
        "save" => Command::Save,
        "load" => Command::Load,
        "help" | "?" | "h" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(verb),
    }
}
