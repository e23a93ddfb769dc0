use super::engine::TeraEngine;
use crate::error::TemplateError;
use crate::selection::Selection;
use tera::Context;

pub const DEFAULT_SCENE_TEMPLATE: &str = "\
Create a highly detailed, cinematic, joyful illustration. \
Scene: {{ actors }} {{ activities }} {{ areas }} with {{ accessories }}. \
Use a warm, whimsical palette, dynamic action, and strong character expressions. \
Ensure the scene clearly shows the actors, activity, area, and accessory.";

const SCENE_TEMPLATE_NAME: &str = "scene_prompt";

/// Variables the built-in template expects even when the catalog lacks them.
const BUILTIN_CATEGORIES: &[&str] = &["actors", "activities", "areas", "accessories"];

/// Turns a selection into the text prompt sent to the image API.
///
/// Every catalog category is a template variable holding its tags joined
/// with " and "; categories missing from the selection render as "". The
/// full selection is also exposed as `tags` (category → list).
pub struct ScenePromptBuilder {
    engine: TeraEngine,
    categories: Vec<String>,
}

impl ScenePromptBuilder {
    /// Compile the template and dry-run it with an empty selection so an
    /// undefined variable fails at startup rather than on first use.
    pub fn new(template: Option<&str>, categories: Vec<String>) -> Result<Self, TemplateError> {
        let mut engine = TeraEngine::new();
        engine.add_template(SCENE_TEMPLATE_NAME, template.unwrap_or(DEFAULT_SCENE_TEMPLATE))?;
        let builder = Self { engine, categories };
        builder.build(&Selection::new())?;
        Ok(builder)
    }

    pub fn build(&self, selection: &Selection) -> Result<String, TemplateError> {
        let mut ctx = Context::new();
        let names = BUILTIN_CATEGORIES
            .iter()
            .copied()
            .chain(self.categories.iter().map(String::as_str))
            .chain(selection.categories());
        for name in names {
            ctx.insert(name, &selection.joined(name));
        }
        ctx.insert("tags", selection);

        let prompt = self.engine.render(SCENE_TEMPLATE_NAME, &ctx)?;
        Ok(collapse_whitespace(&prompt))
    }
}

/// Gated-out categories leave double spaces behind.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
