//! Line input for the game prompt.
//!
//! A small trait seam over rustyline, so the play loop can be driven by a
//! scripted editor in tests and the real terminal in the binary.

use std::collections::VecDeque;

use anyhow::Result;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::{Completer, Config, Context, Editor, Helper, Highlighter, Hinter, Validator};

use crate::game::commands::VERBS;

/// What one read of the prompt produced.
#[derive(Debug)]
pub enum ReadResult {
    Line(String),
    /// Ctrl+C.
    Interrupted,
    /// Ctrl+D.
    Eof,
}

/// Abstraction over the prompt so the loop never touches rustyline
/// directly.
pub trait LineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;
    fn add_history(&mut self, line: &str);
}

/// Completes the verb at the start of the line; later words are the
/// world's business, not the editor's.
struct VerbCompleter;

impl Completer for VerbCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(char::is_whitespace)
            .map_or(0, |i| i + 1);
        if start > 0 {
            return Ok((pos, Vec::new()));
        }
        let word = line[..pos].to_lowercase();
        let candidates = VERBS
            .iter()
            .filter(|v| v.starts_with(word.as_str()))
            .map(|v| Pair {
                display: (*v).to_string(),
                replacement: (*v).to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

#[derive(Helper, Completer, Highlighter, Hinter, Validator)]
struct PromptHelper {
    #[rustyline(Completer)]
    completer: VerbCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
}

/// The real terminal editor.
pub struct RustylineEditor {
    editor: Editor<PromptHelper, DefaultHistory>,
}

impl RustylineEditor {
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(500)?
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(PromptHelper {
            completer: VerbCompleter,
            hinter: HistoryHinter::new(),
        }));
        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }
}

/// Feeds a fixed script of lines, then EOF. Used by tests to drive the
/// play loop without a terminal.
pub struct ScriptedEditor {
    lines: VecDeque<String>,
    pub history: Vec<String>,
}

impl ScriptedEditor {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            history: Vec::new(),
        }
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(match self.lines.pop_front() {
            Some(line) => ReadResult::Line(line),
            None => ReadResult::Eof,
        })
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }
}
