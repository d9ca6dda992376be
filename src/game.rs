use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::narration::{ConsoleNarrator, Narrator, PlayerPrompt, StdinPrompt};
use crate::profile::{JsonFileStore, KeyValueStore, MemoryStore, PlayerProfile, ProfileStore};
use crate::quest::ports::{Pacer, RandomSource, RngSource, SleepPacer};
use crate::quest::{QuestRun, QuestSequencer};
use crate::resources::{self, ELEMENTS_UNAVAILABLE};
use crate::scene::node::ScenePayload;
use crate::scene::SceneSession;

// ---------------------------------------------------------------------------
// Game session
// ---------------------------------------------------------------------------

/// Everything one player's session owns. The scene panel and the treasure
/// hunt share nothing but this struct.
pub struct GameSession<S: KeyValueStore> {
    config: GameConfig,
    /// `None` when the scene file could not be loaded.
    scenes: Option<SceneSession>,
    profiles: ProfileStore<S>,
}

impl<S: KeyValueStore> GameSession<S> {
    pub fn new(config: GameConfig, store: S) -> Self {
        Self {
            config,
            scenes: None,
            profiles: ProfileStore::new(store),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scenes(&self) -> Option<&SceneSession> {
        self.scenes.as_ref()
    }

    pub fn profiles(&self) -> &ProfileStore<S> {
        &self.profiles
    }

    pub fn set_scenes(&mut self, scenes: SceneSession) {
        self.scenes = Some(scenes);
    }

    /// Load the scene file. On failure the error is narrated and only the
    /// scene panel is disabled.
    pub fn load_scenes(&mut self, narrator: &mut dyn Narrator) -> bool {
        let loaded = resources::load_scene_graph(&self.config.scene_path())
            .and_then(|graph| SceneSession::new(graph, self.config.initial_scene.clone()));

        match loaded {
            Ok(scenes) => {
                self.scenes = Some(scenes);
                true
            }
            Err(e) => {
                narrator.warn_player(&format!("Failed to load scenes: {e}"));
                self.scenes = None;
                false
            }
        }
    }

    /// Show the element descriptions verbatim, or a notice when missing.
    pub fn show_element_descriptions(&self, narrator: &mut dyn Narrator) {
        match resources::load_text(&self.config.elements_path()) {
            Ok(text) => narrator.say(&text),
            Err(e) => {
                warn!("{e}");
                narrator.warn_player(ELEMENTS_UNAVAILABLE);
            }
        }
    }

    /// Return the stored profile, asking the player to create one first if
    /// there is none.
    pub fn ensure_profile(
        &mut self,
        prompt: &mut dyn PlayerPrompt,
        narrator: &mut dyn Narrator,
    ) -> GameResult<PlayerProfile> {
        let profile = match self.profiles.load()? {
            Some(profile) => {
                info!("Welcome back, player '{}'", profile.id);
                profile
            }
            None => {
                let id = ask_non_empty(prompt, narrator, "Enter player ID:")?;
                let nickname = ask_non_empty(prompt, narrator, "Enter nickname:")?;
                self.profiles.create(id, nickname)?
            }
        };

        narrator.say(&profile.summary());
        Ok(profile)
    }

    /// Play the configured treasure hunt, recording into the stored profile.
    ///
    /// A failed quest is narrated once as `Quest failed: ..` and still
    /// returns `Ok`; the run carries the failure.
    pub fn run_treasure_hunt<R: RandomSource, P: Pacer>(
        &mut self,
        random: R,
        pacer: P,
        narrator: &mut dyn Narrator,
    ) -> GameResult<QuestRun> {
        info!("Treasure hunt starting ({} script)", self.config.script);
        let mut sequencer = QuestSequencer::new(self.config.script.steps(), random, pacer);
        let run = sequencer.run(&mut self.profiles, narrator)?;

        if let Some(failure) = run.failure() {
            narrator.warn_player(&format!("Quest failed: {failure}"));
        }
        Ok(run)
    }

    /// Back to the initial scene with an empty scene history. The stored
    /// quest history is left alone; see [`Self::clear_quest_history`].
    pub fn restart(&mut self) -> GameResult<Option<ScenePayload>> {
        match self.scenes.as_mut() {
            Some(scenes) => scenes.restart().map(Some),
            None => Ok(None),
        }
    }

    /// Empty the stored quest history, keeping the player's identity.
    pub fn clear_quest_history(&mut self) -> GameResult<Option<PlayerProfile>> {
        self.profiles.reset_history()
    }

    /// Interactive scene loop. Returns when the player quits.
    pub fn play_scenes(
        &mut self,
        prompt: &mut dyn PlayerPrompt,
        narrator: &mut dyn Narrator,
    ) -> GameResult<()> {
        loop {
            let Some(scenes) = self.scenes.as_mut() else {
                return Ok(());
            };

            if scenes.is_ended() {
                show_game_over(narrator);
                if !prompt_restart(prompt, narrator)? {
                    return Ok(());
                }
                info!("Player chose to restart");
                self.restart()?;
                continue;
            }

            let payload = scenes.render_current()?;
            show_scene(&payload, narrator);

            let input = prompt.ask(">")?;
            match input.to_lowercase().as_str() {
                "" => narrator.say("(Pick a choice number, or [e], [c] or [q].)"),
                "q" | "quit" | "exit" => return Ok(()),
                "e" | "end" => {
                    let text = scenes.end_game();
                    narrator.say(text);
                }
                "c" | "clear" => match self.clear_quest_history() {
                    Ok(Some(_)) => narrator.say("Quest history cleared."),
                    Ok(None) => narrator.say("No player profile to clear."),
                    Err(e) => narrator.warn_player(&format!("Could not clear quest history: {e}")),
                },
                other => match other.parse::<usize>() {
                    Ok(n) if n >= 1 => match scenes.choose(n - 1) {
                        Ok(_) => {
                            if let Some(entry) = scenes.history().last() {
                                narrator.say(entry);
                            }
                        }
                        Err(e) => narrator.warn_player(&e.to_string()),
                    },
                    _ => narrator.warn_player(&format!("Unknown command '{input}'")),
                },
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

fn show_scene(payload: &ScenePayload, narrator: &mut dyn Narrator) {
    narrator.say(&format!("\n== {} ==", payload.title));
    narrator.say(&payload.description);
    narrator.say(&payload.narrative);
    for (i, choice) in payload.choices.iter().enumerate() {
        narrator.say(&format!("  [{}] {}", i + 1, choice.label));
    }
    narrator.say("  [e] End game    [c] Clear quest history    [q] Quit");
}

fn show_game_over(narrator: &mut dyn Narrator) {
    narrator.say("\n========================================");
    narrator.say("             GAME OVER");
    narrator.say("========================================");
    narrator.say("  [r] Restart    [q] Quit\n");
}

/// Read the player's post-game choice. Returns `true` to restart.
fn prompt_restart(prompt: &mut dyn PlayerPrompt, narrator: &mut dyn Narrator) -> GameResult<bool> {
    loop {
        match prompt.ask(">")?.to_lowercase().as_str() {
            "r" => return Ok(true),
            "q" => return Ok(false),
            _ => narrator.say("  Press [r] to restart or [q] to quit."),
        }
    }
}

fn ask_non_empty(
    prompt: &mut dyn PlayerPrompt,
    narrator: &mut dyn Narrator,
    question: &str,
) -> GameResult<String> {
    loop {
        let answer = prompt.ask(question)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
        narrator.say("(Please enter a value.)");
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Play one game on the terminal.
pub fn run(config: GameConfig) -> Result<()> {
    let random = RngSource::from_seed(config.seed);
    run_with(config, random, SleepPacer, &mut StdinPrompt, &mut ConsoleNarrator)
}

/// Play one game with the given ports.
///
/// A save file that cannot be opened, or a stored profile that cannot be
/// read, only costs the player the treasure hunt: the error is narrated and
/// the scene panel still loads. Only running out of player input aborts.
pub fn run_with<R: RandomSource, P: Pacer>(
    config: GameConfig,
    random: R,
    pacer: P,
    prompt: &mut dyn PlayerPrompt,
    narrator: &mut dyn Narrator,
) -> Result<()> {
    narrator.say("\n========================================");
    narrator.say("            TREASURE HUNT");
    narrator.say("========================================\n");

    match JsonFileStore::open(config.storage_path()) {
        Ok(store) => play(GameSession::new(config, store), Some((random, pacer)), prompt, narrator),
        Err(e) => {
            error!("Save file unavailable: {e}");
            narrator.warn_player(&format!("Failed to open save file: {e}"));
            let session = GameSession::new(config, MemoryStore::new());
            play(session, None::<(R, P)>, prompt, narrator)
        }
    }
}

fn play<S: KeyValueStore, R: RandomSource, P: Pacer>(
    mut session: GameSession<S>,
    quest: Option<(R, P)>,
    prompt: &mut dyn PlayerPrompt,
    narrator: &mut dyn Narrator,
) -> Result<()> {
    session.show_element_descriptions(narrator);

    if let Some((random, pacer)) = quest {
        match play_treasure_hunt(&mut session, random, pacer, prompt, narrator) {
            Ok(run) => info!(
                "Treasure hunt finished after {} steps (success={})",
                run.steps_attempted,
                run.is_success()
            ),
            Err(e @ GameError::Prompt(_)) => {
                return Err(e).context("failed to set up player profile");
            }
            Err(e) => {
                error!("Treasure hunt aborted: {e}");
                narrator.warn_player(&format!("Treasure hunt unavailable: {e}"));
            }
        }
    }

    if session.load_scenes(narrator) {
        session.play_scenes(prompt, narrator)?;
    }

    narrator.say("Thanks for playing!");
    Ok(())
}

fn play_treasure_hunt<S: KeyValueStore, R: RandomSource, P: Pacer>(
    session: &mut GameSession<S>,
    random: R,
    pacer: P,
    prompt: &mut dyn PlayerPrompt,
    narrator: &mut dyn Narrator,
) -> GameResult<QuestRun> {
    session.ensure_profile(prompt, narrator)?;
    session.run_treasure_hunt(random, pacer, narrator)
}
