use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::quest::step::QuestScript;

pub const SCENE_FILE: &str = "data.txt";
pub const ELEMENTS_FILE: &str = "data/elements.txt";
pub const STORAGE_FILE: &str = "save.json";
pub const INITIAL_SCENE: &str = "library";

// ---------------------------------------------------------------------------
// Game configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Directory holding the scene file, element descriptions and save file.
    pub data_dir: PathBuf,
    /// Scene the player starts in, and returns to on restart.
    pub initial_scene: String,
    pub script: QuestScript,
    /// Fixed RNG seed for reproducible quests; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            initial_scene: INITIAL_SCENE.to_string(),
            script: QuestScript::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Build from positional arguments: `[data_dir] [minimal|extended] [seed]`.
    ///
    /// `args` excludes the program name.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = args.first() {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(script) = args.get(1) {
            config.script = script.parse().map_err(|e: String| anyhow!(e))?;
        }
        if let Some(seed) = args.get(2) {
            config.seed = Some(
                seed.parse()
                    .with_context(|| format!("invalid seed '{seed}'"))?,
            );
        }

        Ok(config)
    }

    pub fn scene_path(&self) -> PathBuf {
        self.data_dir.join(SCENE_FILE)
    }

    pub fn elements_path(&self) -> PathBuf {
        self.data_dir.join(ELEMENTS_FILE)
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE)
    }
}
