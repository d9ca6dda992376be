use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use log::error;

use crate::error::{GameError, GameResult};

/// One line in the player-visible feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    pub text: String,
    pub is_error: bool,
}

impl Narration {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Append-only sink for narration.
pub trait Narrator {
    fn narrate(&mut self, entry: Narration);

    fn say(&mut self, text: &str) {
        self.narrate(Narration::message(text));
    }

    fn warn_player(&mut self, text: &str) {
        self.narrate(Narration::error(text));
    }
}

/// Prints narration to the terminal.
#[derive(Debug, Default)]
pub struct ConsoleNarrator;

impl Narrator for ConsoleNarrator {
    fn narrate(&mut self, entry: Narration) {
        if entry.is_error {
            error!("{}", entry.text);
            println!("[!] {}", entry.text);
        } else {
            println!("{}", entry.text);
        }
    }
}

/// Keeps every entry in memory.
#[derive(Debug, Default)]
pub struct NarrationLog {
    entries: Vec<Narration>,
}

impl NarrationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.text.as_str()).collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.is_error)
            .map(|e| e.text.as_str())
            .collect()
    }
}

impl Narrator for NarrationLog {
    fn narrate(&mut self, entry: Narration) {
        self.entries.push(entry);
    }
}

// ---------------------------------------------------------------------------
// Player input
// ---------------------------------------------------------------------------

/// Asks the player a question and returns the trimmed answer.
pub trait PlayerPrompt {
    fn ask(&mut self, question: &str) -> GameResult<String>;
}

/// Reads answers from stdin.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl PlayerPrompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> GameResult<String> {
        print!("{question} ");
        io::stdout().flush().map_err(GameError::Prompt)?;
        let mut input = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(GameError::Prompt)?;
        if read == 0 {
            return Err(GameError::Prompt(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        Ok(input.trim().to_string())
    }
}

/// Replays canned answers; runs dry with an EOF error.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl PlayerPrompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> GameResult<String> {
        self.asked.push(question.to_string());
        self.answers.pop_front().ok_or_else(|| {
            GameError::Prompt(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no scripted answer left",
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_order_and_error_flag() {
        let mut log = NarrationLog::new();
        log.say("first");
        log.warn_player("oops");
        log.say("second");
        assert_eq!(log.texts(), ["first", "oops", "second"]);
        assert_eq!(log.errors(), ["oops"]);
    }

    #[test]
    fn test_scripted_prompt_runs_dry() {
        let mut prompt = ScriptedPrompt::new(["p-1"]);
        assert_eq!(prompt.ask("id?").unwrap(), "p-1");
        assert!(matches!(prompt.ask("name?"), Err(GameError::Prompt(_))));
        assert_eq!(prompt.asked(), ["id?", "name?"]);
    }
}
