pub mod ports;
pub mod step;

use log::{debug, info};

use crate::error::{GameResult, QuestError};
use crate::narration::Narrator;
use crate::profile::HistoryLog;
use ports::{Pacer, RandomSource};
use step::QuestStep;

/// How a quest run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestStatus {
    Completed,
    /// `step` is 1-based.
    Failed { step: usize, error: QuestError },
}

/// Outcome of one pass through the step list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestRun {
    /// Steps started, including the failing one.
    pub steps_attempted: usize,
    /// Success messages, in order.
    pub messages: Vec<String>,
    pub status: QuestStatus,
}

impl QuestRun {
    pub fn is_success(&self) -> bool {
        self.status == QuestStatus::Completed
    }

    pub fn failure(&self) -> Option<&QuestError> {
        match &self.status {
            QuestStatus::Completed => None,
            QuestStatus::Failed { error, .. } => Some(error),
        }
    }

    pub fn into_result(self) -> Result<Vec<String>, QuestError> {
        match self.status {
            QuestStatus::Completed => Ok(self.messages),
            QuestStatus::Failed { error, .. } => Err(error),
        }
    }
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

/// Runs quest steps one after another until one fails.
pub struct QuestSequencer<R: RandomSource, P: Pacer> {
    steps: Vec<QuestStep>,
    random: R,
    pacer: P,
}

impl<R: RandomSource, P: Pacer> QuestSequencer<R, P> {
    pub fn new(steps: Vec<QuestStep>, random: R, pacer: P) -> Self {
        Self {
            steps,
            random,
            pacer,
        }
    }

    pub fn steps(&self) -> &[QuestStep] {
        &self.steps
    }

    pub fn random(&self) -> &R {
        &self.random
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Play a single step.
    ///
    /// A step that needs a clue fails with `MissingClue` before it pauses or
    /// draws, so the outcome does not depend on the random source.
    pub fn attempt(&mut self, step: &QuestStep, clue: Option<&str>) -> Result<String, QuestError> {
        if step.requires_clue && clue.map_or(true, |c| c.trim().is_empty()) {
            return Err(QuestError::MissingClue {
                step: step.name.to_string(),
            });
        }

        self.pacer.pause(step.delay);

        let roll = self.random.next_unit();
        debug!(
            "Step {}: rolled {roll:.3} against {:.2}",
            step.name, step.success_probability
        );

        if roll < step.success_probability {
            Ok(step.success_message.to_string())
        } else {
            Err(QuestError::StepFailed {
                step: step.name.to_string(),
                message: step.failure_message.to_string(),
            })
        }
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// Each outcome is written to `history` before the next step starts; a
    /// failing step's message is recorded before the run returns. Successes
    /// are narrated as they happen, failures are left for the caller.
    /// Only a history write error is returned as `Err`.
    pub fn run(
        &mut self,
        history: &mut dyn HistoryLog,
        narrator: &mut dyn Narrator,
    ) -> GameResult<QuestRun> {
        let steps = self.steps.clone();
        let mut messages: Vec<String> = Vec::with_capacity(steps.len());

        info!("Quest started with {} steps", steps.len());

        for (idx, step) in steps.iter().enumerate() {
            let clue = messages.last().map(String::as_str);
            match self.attempt(step, clue) {
                Ok(message) => {
                    info!("Step {} succeeded", step.name);
                    narrator.say(&message);
                    history.record(&message)?;
                    messages.push(message);
                }
                Err(error) => {
                    info!("Step {} failed: {error}", step.name);
                    history.record(&error.to_string())?;
                    return Ok(QuestRun {
                        steps_attempted: idx + 1,
                        messages,
                        status: QuestStatus::Failed {
                            step: idx + 1,
                            error,
                        },
                    });
                }
            }
        }

        info!("Quest completed");
        Ok(QuestRun {
            steps_attempted: steps.len(),
            messages,
            status: QuestStatus::Completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::NarrationLog;
    use crate::profile::PlayerProfile;
    use super::ports::{FixedRandom, VirtualClock};
    use super::step::{self, QuestScript};
    use std::time::Duration;

    fn sequencer(
        script: QuestScript,
        draws: Vec<f64>,
    ) -> QuestSequencer<FixedRandom, VirtualClock> {
        QuestSequencer::new(script.steps(), FixedRandom::new(draws), VirtualClock::new())
    }

    #[test]
    fn test_all_steps_succeed_below_thresholds() {
        let mut seq = sequencer(QuestScript::Extended, vec![0.0]);
        let mut profile = PlayerProfile::new("p-1", "Indy");
        let mut log = NarrationLog::new();

        let run = seq.run(&mut profile, &mut log).unwrap();

        assert!(run.is_success());
        assert_eq!(run.steps_attempted, 6);
        assert_eq!(profile.history.len(), 6);
        assert_eq!(run.messages, profile.history);
        assert_eq!(
            run.messages.last().map(String::as_str),
            Some("Congratulations! You found the legendary treasure!")
        );
        assert_eq!(log.texts().len(), 6);
        assert!(log.errors().is_empty());
    }

    #[test]
    fn test_steps_run_in_order_with_their_delays() {
        let mut seq = sequencer(QuestScript::Minimal, vec![0.0]);
        let mut profile = PlayerProfile::new("p-1", "Indy");
        seq.run(&mut profile, &mut NarrationLog::new()).unwrap();

        let pauses: Vec<u128> = seq.pacer().pauses().iter().map(Duration::as_millis).collect();
        assert_eq!(pauses, [1000, 1500, 2000, 1000]);
        assert_eq!(seq.pacer().elapsed(), Duration::from_millis(5500));
        assert_eq!(seq.random().draws(), 4);
    }

    #[test]
    fn test_failure_at_step_k_stops_the_run() {
        // Bridge (step 3) passes, maze (step 4, p=0.7) fails on 0.7.
        let mut seq = sequencer(QuestScript::Extended, vec![0.0, 0.0, 0.49, 0.7]);
        let mut profile = PlayerProfile::new("p-1", "Indy");
        let mut log = NarrationLog::new();

        let run = seq.run(&mut profile, &mut log).unwrap();

        assert_eq!(run.steps_attempted, 4);
        assert_eq!(run.messages.len(), 3);
        assert_eq!(profile.history.len(), 4);
        assert_eq!(profile.history[3], "Lost in the maze with no way out!");
        assert_eq!(seq.random().draws(), 4);
        assert_eq!(seq.pacer().pauses().len(), 4);
        // The sequencer leaves failure narration to its caller.
        assert_eq!(log.texts().len(), 3);

        match run.clone().status {
            QuestStatus::Failed { step, error } => {
                assert_eq!(step, 4);
                assert_eq!(
                    error,
                    QuestError::StepFailed {
                        step: "enterMaze".into(),
                        message: "Lost in the maze with no way out!".into(),
                    }
                );
            }
            QuestStatus::Completed => panic!("quest should have failed"),
        }
        assert!(run.into_result().is_err());
    }

    #[test]
    fn test_temple_guard_failure_in_minimal_script() {
        let mut seq = sequencer(QuestScript::Minimal, vec![0.0, 0.0, 0.5]);
        let mut profile = PlayerProfile::new("p-1", "Indy");

        let run = seq.run(&mut profile, &mut NarrationLog::new()).unwrap();

        let err = run.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Oops! Ran into the temple guards!");
        assert_eq!(
            profile.history,
            [
                "Found the first clue in the ancient library...",
                "Decoded! The treasure lies in an ancient temple...",
                "Oops! Ran into the temple guards!",
            ]
        );
    }

    #[test]
    fn test_certain_steps_ignore_high_draws() {
        // Probability 1.0 succeeds on any draw in [0, 1).
        let mut seq = sequencer(QuestScript::Minimal, vec![0.999]);
        let step = step::open_treasure_box();
        assert!(seq.attempt(&step, None).is_ok());
    }

    #[test]
    fn test_decode_without_clue_is_missing_clue() {
        for draws in [vec![0.0], vec![0.999]] {
            let mut seq = sequencer(QuestScript::Minimal, draws);
            let decode = step::decode_ancient_script();

            for clue in [None, Some(""), Some("   ")] {
                let err = seq.attempt(&decode, clue).unwrap_err();
                assert_eq!(
                    err,
                    QuestError::MissingClue {
                        step: "decodeAncientScript".into()
                    }
                );
            }
            assert_eq!(seq.random().draws(), 0);
            assert!(seq.pacer().pauses().is_empty());
        }
    }

    #[test]
    fn test_missing_clue_follows_failure_path() {
        // A script that starts straight at decoding has no clue to pass.
        let steps = vec![step::decode_ancient_script(), step::open_treasure_box()];
        let mut seq = QuestSequencer::new(steps, FixedRandom::constant(0.0), VirtualClock::new());
        let mut profile = PlayerProfile::new("p-1", "Indy");

        let run = seq.run(&mut profile, &mut NarrationLog::new()).unwrap();

        assert_eq!(run.steps_attempted, 1);
        assert!(matches!(
            run.failure(),
            Some(QuestError::MissingClue { .. })
        ));
        assert_eq!(profile.history, ["No clue to decode!"]);
    }
}
