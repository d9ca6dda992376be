use serde::Serialize;

/// A single location in the scene graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    /// Lowercased title; the key the node is stored under.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Text shown when the player arrives here.
    pub narrative: String,
    pub choices: Vec<Choice>,
}

/// A button the player can press to move on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub label: String,
    /// Id of the scene this choice leads to.
    pub target: String,
}

impl SceneNode {
    /// Build a node from one `Title：Description` pair.
    ///
    /// Every node gets a single choice pointing back at itself. Scene files
    /// in the wild rely on that, so don't "fix" it here.
    pub fn from_parts(title: &str, description: &str) -> Self {
        let id = scene_id(title);
        Self {
            narrative: format!("you arrive at {title}, {description}"),
            choices: vec![Choice {
                label: format!("go to {title}"),
                target: id.clone(),
            }],
            id,
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Normalize a title into a scene id.
pub fn scene_id(title: &str) -> String {
    title.to_lowercase()
}

/// What the front end needs to draw a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenePayload {
    pub title: String,
    pub description: String,
    pub narrative: String,
    pub choices: Vec<Choice>,
}

pub fn render(node: &SceneNode) -> ScenePayload {
    ScenePayload {
        title: node.title.clone(),
        description: node.description.clone(),
        narrative: node.narrative.clone(),
        choices: node.choices.clone(),
    }
}
