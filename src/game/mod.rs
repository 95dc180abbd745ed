//! The interactive layer: line parsing, the prompt, and the session that
//! ties a catalog, a world, and a player together into a playthrough.

pub mod commands;
pub mod input;
pub mod session;

pub use commands::{parse, Command};
pub use input::{LineEditor, ReadResult, RustylineEditor, ScriptedEditor};
pub use session::{GameState, LoopControl, Session};
