use std::time::Duration;

// ---------------------------------------------------------------------------
// Step tuning
// ---------------------------------------------------------------------------

pub const INITIAL_CLUE_DELAY_MS: u64 = 1000;
pub const INITIAL_CLUE_PROBABILITY: f64 = 1.0;

pub const DECODE_SCRIPT_DELAY_MS: u64 = 1500;
pub const DECODE_SCRIPT_PROBABILITY: f64 = 1.0;

pub const SEARCH_TEMPLE_DELAY_MS: u64 = 2000;
pub const SEARCH_TEMPLE_PROBABILITY: f64 = 0.5;

pub const CROSS_BRIDGE_DELAY_MS: u64 = 2000;
pub const CROSS_BRIDGE_PROBABILITY: f64 = 0.5;

pub const ENTER_MAZE_DELAY_MS: u64 = 2500;
pub const ENTER_MAZE_PROBABILITY: f64 = 0.7;

pub const EXPLORE_CAVERN_DELAY_MS: u64 = 2500;
pub const EXPLORE_CAVERN_PROBABILITY: f64 = 0.5;

pub const OPEN_BOX_DELAY_MS: u64 = 1000;
pub const OPEN_BOX_PROBABILITY: f64 = 1.0;

/// One scripted beat of the treasure hunt.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestStep {
    pub name: &'static str,
    /// Narrative pause before the outcome is revealed.
    pub delay: Duration,
    /// Chance in [0, 1] that the step succeeds.
    pub success_probability: f64,
    pub success_message: &'static str,
    pub failure_message: &'static str,
    /// Whether the step consumes the previous step's result as a clue.
    pub requires_clue: bool,
}

impl QuestStep {
    fn new(
        name: &'static str,
        delay_ms: u64,
        success_probability: f64,
        success_message: &'static str,
        failure_message: &'static str,
    ) -> Self {
        Self {
            name,
            delay: Duration::from_millis(delay_ms),
            success_probability: success_probability.clamp(0.0, 1.0),
            success_message,
            failure_message,
            requires_clue: false,
        }
    }

    fn needing_clue(mut self) -> Self {
        self.requires_clue = true;
        self
    }
}

pub fn get_initial_clue() -> QuestStep {
    QuestStep::new(
        "getInitialClue",
        INITIAL_CLUE_DELAY_MS,
        INITIAL_CLUE_PROBABILITY,
        "Found the first clue in the ancient library...",
        "The library was empty. No clue to be found.",
    )
}

pub fn decode_ancient_script() -> QuestStep {
    QuestStep::new(
        "decodeAncientScript",
        DECODE_SCRIPT_DELAY_MS,
        DECODE_SCRIPT_PROBABILITY,
        "Decoded! The treasure lies in an ancient temple...",
        "The ancient script could not be deciphered.",
    )
    .needing_clue()
}

pub fn search_temple() -> QuestStep {
    QuestStep::new(
        "searchTemple",
        SEARCH_TEMPLE_DELAY_MS,
        SEARCH_TEMPLE_PROBABILITY,
        "Found the temple and a mysterious treasure box inside...",
        "Oops! Ran into the temple guards!",
    )
}

pub fn cross_ancient_bridge() -> QuestStep {
    QuestStep::new(
        "crossAncientBridge",
        CROSS_BRIDGE_DELAY_MS,
        CROSS_BRIDGE_PROBABILITY,
        "Crossed the ancient bridge just before it crumbled...",
        "The ancient bridge collapsed beneath your feet!",
    )
}

pub fn enter_maze() -> QuestStep {
    QuestStep::new(
        "enterMaze",
        ENTER_MAZE_DELAY_MS,
        ENTER_MAZE_PROBABILITY,
        "Found the way through the maze...",
        "Lost in the maze with no way out!",
    )
}

pub fn explore_underground_cavern() -> QuestStep {
    QuestStep::new(
        "exploreUndergroundCavern",
        EXPLORE_CAVERN_DELAY_MS,
        EXPLORE_CAVERN_PROBABILITY,
        "Found a mysterious treasure box deep in the underground cavern...",
        "The cavern flooded before you could reach the treasure!",
    )
}

pub fn open_treasure_box() -> QuestStep {
    QuestStep::new(
        "openTreasureBox",
        OPEN_BOX_DELAY_MS,
        OPEN_BOX_PROBABILITY,
        "Congratulations! You found the legendary treasure!",
        "The treasure box would not budge.",
    )
}

// ---------------------------------------------------------------------------
// Scripts
// ---------------------------------------------------------------------------

/// Which step list to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestScript {
    /// clue -> decode -> temple -> box
    Minimal,
    /// clue -> decode -> bridge -> maze -> cavern -> box
    #[default]
    Extended,
}

impl QuestScript {
    pub fn steps(self) -> Vec<QuestStep> {
        match self {
            QuestScript::Minimal => vec![
                get_initial_clue(),
                decode_ancient_script(),
                search_temple(),
                open_treasure_box(),
            ],
            QuestScript::Extended => vec![
                get_initial_clue(),
                decode_ancient_script(),
                cross_ancient_bridge(),
                enter_maze(),
                explore_underground_cavern(),
                open_treasure_box(),
            ],
        }
    }
}

impl std::str::FromStr for QuestScript {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" | "short" => Ok(QuestScript::Minimal),
            "extended" | "long" => Ok(QuestScript::Extended),
            other => Err(format!("unknown quest script '{other}' (minimal|extended)")),
        }
    }
}

impl std::fmt::Display for QuestScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestScript::Minimal => write!(f, "minimal"),
            QuestScript::Extended => write!(f, "extended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(script: QuestScript) -> Vec<&'static str> {
        script.steps().iter().map(|s| s.name).collect()
    }

    #[test]
    fn test_minimal_order() {
        assert_eq!(
            names(QuestScript::Minimal),
            [
                "getInitialClue",
                "decodeAncientScript",
                "searchTemple",
                "openTreasureBox"
            ]
        );
    }

    #[test]
    fn test_extended_order() {
        assert_eq!(
            names(QuestScript::Extended),
            [
                "getInitialClue",
                "decodeAncientScript",
                "crossAncientBridge",
                "enterMaze",
                "exploreUndergroundCavern",
                "openTreasureBox"
            ]
        );
    }

    #[test]
    fn test_step_tuning() {
        let steps = QuestScript::Extended.steps();
        let tuning: Vec<(u128, f64)> = steps
            .iter()
            .map(|s| (s.delay.as_millis(), s.success_probability))
            .collect();
        assert_eq!(
            tuning,
            [
                (1000, 1.0),
                (1500, 1.0),
                (2000, 0.5),
                (2500, 0.7),
                (2500, 0.5),
                (1000, 1.0)
            ]
        );

        let temple = search_temple();
        assert_eq!(temple.delay, Duration::from_millis(2000));
        assert_eq!(temple.success_probability, 0.5);
    }

    #[test]
    fn test_only_decode_needs_clue() {
        for step in QuestScript::Extended.steps() {
            assert_eq!(step.requires_clue, step.name == "decodeAncientScript");
        }
    }

    #[test]
    fn test_parse_script_name() {
        assert_eq!("Minimal".parse::<QuestScript>(), Ok(QuestScript::Minimal));
        assert_eq!("extended".parse::<QuestScript>(), Ok(QuestScript::Extended));
        assert!("medium".parse::<QuestScript>().is_err());
        assert_eq!(QuestScript::default().to_string(), "extended");
    }
}
