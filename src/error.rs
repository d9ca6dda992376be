use std::path::PathBuf;

use thiserror::Error;

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;

/// Errors surfaced by the scene engine, the profile store and the quest driver.
#[derive(Debug, Error)]
pub enum GameError {
    /// A flat resource (scene file, element descriptions) could not be read.
    #[error("failed to load resource {}: {source}", .path.display())]
    ResourceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A scene line without exactly one `：` separator.
    #[error("malformed scene on line {line}: {content:?}")]
    MalformedScene { line: usize, content: String },

    /// Two lines whose titles lowercase to the same id.
    #[error("duplicate scene id '{0}'")]
    DuplicateScene(String),

    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    /// `index` is 0-based; the message shows the 1-based number the player typed.
    #[error("there is no choice {} here (scene has {available})", .index + 1)]
    InvalidChoice { index: usize, available: usize },

    #[error("the game is over; restart to play again")]
    GameOver,

    #[error("storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored player profile is corrupt")]
    CorruptProfile(#[from] serde_json::Error),

    #[error(transparent)]
    Quest(#[from] QuestError),

    #[error("failed to read player input: {0}")]
    Prompt(#[source] std::io::Error),
}

/// Why a quest step did not succeed.
///
/// The `Display` text is exactly what the player sees (and what lands in the
/// history), so keep it free of debugging detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    /// The random draw came up at or above the step's success probability.
    #[error("{message}")]
    StepFailed { step: String, message: String },

    /// A decoding step was reached without a clue to decode.
    #[error("No clue to decode!")]
    MissingClue { step: String },
}

impl QuestError {
    /// Name of the step that failed.
    pub fn step(&self) -> &str {
        match self {
            QuestError::StepFailed { step, .. } | QuestError::MissingClue { step } => step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quest_error_display_is_player_text() {
        let err = QuestError::StepFailed {
            step: "searchTemple".into(),
            message: "Oops! Ran into the temple guards!".into(),
        };
        assert_eq!(err.to_string(), "Oops! Ran into the temple guards!");
        assert_eq!(err.step(), "searchTemple");
    }

    #[test]
    fn test_missing_clue_is_distinct() {
        let err = QuestError::MissingClue {
            step: "decodeAncientScript".into(),
        };
        assert_eq!(err.to_string(), "No clue to decode!");
        assert!(matches!(err, QuestError::MissingClue { .. }));
    }

    #[test]
    fn test_invalid_choice_reports_typed_number() {
        let err = GameError::InvalidChoice {
            index: 6,
            available: 1,
        };
        assert_eq!(err.to_string(), "there is no choice 7 here (scene has 1)");
    }

    #[test]
    fn test_corrupt_profile_keeps_cause_as_source() {
        use std::error::Error as _;

        let cause = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let cause_text = cause.to_string();
        let err = GameError::from(cause);
        assert_eq!(err.to_string(), "stored player profile is corrupt");
        assert_eq!(err.source().map(|s| s.to_string()), Some(cause_text));
    }

    #[test]
    fn test_quest_error_converts_into_game_error() {
        let err: GameError = QuestError::MissingClue {
            step: "decodeAncientScript".into(),
        }
        .into();
        assert!(matches!(err, GameError::Quest(QuestError::MissingClue { .. })));
        assert_eq!(err.to_string(), "No clue to decode!");
    }
}
