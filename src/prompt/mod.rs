mod builder;
mod engine;

pub use builder::{DEFAULT_SCENE_TEMPLATE, ScenePromptBuilder};
pub use engine::TeraEngine;
