pub mod graph;
pub mod node;

use log::info;

use crate::error::{GameError, GameResult};
use graph::SceneGraph;
use node::{render, SceneNode, ScenePayload};

/// Line shown when the player ends the game.
pub const GAME_OVER_TEXT: &str = "Game over, thanks for playing!";

// ---------------------------------------------------------------------------
// Scene session state
// ---------------------------------------------------------------------------

/// The player's walk through a scene graph: where they are, and what they
/// picked to get there.
#[derive(Debug, Clone)]
pub struct SceneSession {
    graph: SceneGraph,
    initial_scene_id: String,
    current_scene_id: String,
    history: Vec<String>,
    ended: bool,
}

impl SceneSession {
    /// Start a session at `initial_scene_id`, which must exist in the graph.
    pub fn new(graph: SceneGraph, initial_scene_id: impl Into<String>) -> GameResult<Self> {
        let initial_scene_id = initial_scene_id.into();
        graph.resolve(&initial_scene_id)?;
        Ok(Self {
            graph,
            current_scene_id: initial_scene_id.clone(),
            initial_scene_id,
            history: Vec::new(),
            ended: false,
        })
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn current_scene_id(&self) -> &str {
        &self.current_scene_id
    }

    pub fn current(&self) -> GameResult<&SceneNode> {
        self.graph.resolve(&self.current_scene_id)
    }

    pub fn render_current(&self) -> GameResult<ScenePayload> {
        self.current().map(render)
    }

    /// Choices the player has made since the last restart.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Follow the choice at `index` (0-based) of the current scene.
    ///
    /// The target is resolved before anything changes, so a dangling choice
    /// leaves both the pointer and the history untouched.
    pub fn choose(&mut self, index: usize) -> GameResult<ScenePayload> {
        if self.ended {
            return Err(GameError::GameOver);
        }

        let node = self.current()?;
        let choice = node.choices.get(index).ok_or(GameError::InvalidChoice {
            index,
            available: node.choices.len(),
        })?;
        let target = choice.target.clone();
        let payload = render(self.graph.resolve(&target)?);

        info!("Transition: {} -> {}", self.current_scene_id, target);
        self.history.push(format!("you chose: {target}"));
        self.current_scene_id = target;

        Ok(payload)
    }

    /// Stop accepting choices until the next restart.
    pub fn end_game(&mut self) -> &'static str {
        info!("Game ended at scene: {}", self.current_scene_id);
        self.ended = true;
        GAME_OVER_TEXT
    }

    /// Clear the history and go back to the initial scene.
    pub fn restart(&mut self) -> GameResult<ScenePayload> {
        info!("Restarting at scene: {}", self.initial_scene_id);
        self.history.clear();
        self.current_scene_id = self.initial_scene_id.clone();
        self.ended = false;
        self.render_current()
    }
}
