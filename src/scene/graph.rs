use std::collections::HashMap;

use log::debug;

use crate::error::{GameError, GameResult};
use crate::scene::node::SceneNode;

/// Full-width colon separating a scene title from its description.
pub const SCENE_SEPARATOR: char = '：';

/// All scenes of a story: a map of scene-id -> SceneNode.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: HashMap<String, SceneNode>,
}

impl SceneGraph {
    /// Parse a flat scene file, one `Title：Description` per line.
    ///
    /// Blank lines are ignored. A line with zero or several separators, or
    /// with an empty title, is rejected rather than skipped, as is a title
    /// whose id collides with an earlier line.
    pub fn parse(raw: &str) -> GameResult<Self> {
        let mut nodes = HashMap::new();

        for (idx, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let malformed = || GameError::MalformedScene {
                line: idx + 1,
                content: line.to_string(),
            };

            let mut parts = line.split(SCENE_SEPARATOR);
            let (title, description) = match (parts.next(), parts.next(), parts.next()) {
                (Some(title), Some(description), None) => (title, description),
                _ => return Err(malformed()),
            };
            if title.is_empty() {
                return Err(malformed());
            }

            let node = SceneNode::from_parts(title, description);
            if nodes.contains_key(&node.id) {
                return Err(GameError::DuplicateScene(node.id));
            }
            debug!("Parsed scene '{}' from line {}", node.id, idx + 1);
            nodes.insert(node.id.clone(), node);
        }

        Ok(Self { nodes })
    }

    pub fn get(&self, id: &str) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    #[cfg(test)]
    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Look up a scene, failing with `UnknownScene` when it isn't there.
    pub fn resolve(&self, id: &str) -> GameResult<&SceneNode> {
        self.get(id)
            .ok_or_else(|| GameError::UnknownScene(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Scene ids in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
