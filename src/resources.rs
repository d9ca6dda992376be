use std::fs;
use std::path::Path;

use log::info;

use crate::error::{GameError, GameResult};
use crate::scene::graph::SceneGraph;

/// Shown in place of the element descriptions when they can't be read.
pub const ELEMENTS_UNAVAILABLE: &str = "Failed to load element descriptions, please try again later.";

/// Read a flat text resource.
pub fn load_text(path: &Path) -> GameResult<String> {
    let text = fs::read_to_string(path).map_err(|source| GameError::ResourceLoad {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded {} ({} bytes)", path.display(), text.len());
    Ok(text)
}

pub fn load_scene_graph(path: &Path) -> GameResult<SceneGraph> {
    let graph = SceneGraph::parse(&load_text(path)?)?;
    info!("Parsed {} scenes from {}", graph.len(), path.display());
    Ok(graph)
}
