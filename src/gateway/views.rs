//! HTML pages, rendered with Tera (auto-escaped).

use crate::error::TemplateError;
use crate::media::GeneratedArtifact;
use crate::prompt::TeraEngine;
use crate::selection::Selection;
use serde::Serialize;
use tera::Context;

const PAGE: &str = "page.html";

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Smile Generator</title>
  <style>
    body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; color: #333; }
    img { max-width: 100%; border-radius: 12px; }
    .tags dt { font-weight: bold; text-transform: capitalize; }
    .rating button { font-size: 1.2rem; margin-right: .3rem; }
    .error { color: #a33; }
  </style>
</head>
<body>
  <h1>Smile Generator</h1>
{% if view == "result" %}
  <img src="{{ image | safe }}" alt="Generated scene">
  <dl class="tags">
  {% for row in rows %}
    <dt>{{ row.category }}</dt><dd>{{ row.tags }}</dd>
  {% endfor %}
  </dl>
  <form class="rating" method="post" action="/rate">
    <p>How much did it make you smile?</p>
  {% for score in [1, 2, 3, 4, 5] %}
    <button type="submit" name="rating" value="{{ score }}">{{ score }}</button>
  {% endfor %}
  </form>
{% elif view == "failure" %}
  <p class="error">{{ reason }}</p>
  <dl class="tags">
  {% for row in rows %}
    <dt>{{ row.category }}</dt><dd>{{ row.tags }}</dd>
  {% endfor %}
  </dl>
  <form method="post" action="/generate">
    <input type="hidden" name="retry" value="true">
    <button type="submit">Try this scene again</button>
  </form>
  <form method="post" action="/generate">
    <button type="submit">Draw a new scene</button>
  </form>
{% else %}
  {% if reason %}<p class="error">{{ reason }}</p>{% endif %}
  <p>Press the button for a random scene, then rate it.</p>
  <form method="post" action="/generate">
    <button type="submit">Make me smile</button>
  </form>
  <p><small>{{ curated }} inspiration image{{ curated | pluralize }} so far.</small></p>
{% endif %}
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct TagRow<'a> {
    category: &'a str,
    tags: String,
}

fn rows(selection: &Selection) -> Vec<TagRow<'_>> {
    selection
        .iter()
        .map(|(category, _)| TagRow {
            category,
            tags: selection.joined(category),
        })
        .collect()
}

pub struct Views {
    engine: TeraEngine,
}

impl Views {
    pub fn new() -> Result<Self, TemplateError> {
        let mut engine = TeraEngine::new();
        engine.add_template(PAGE, PAGE_TEMPLATE)?;
        Ok(Self { engine })
    }

    fn render(&self, view: &str, fill: impl FnOnce(&mut Context)) -> Result<String, TemplateError> {
        let mut context = Context::new();
        context.insert("view", view);
        context.insert("reason", "");
        context.insert("curated", &0);
        fill(&mut context);
        self.engine.render(PAGE, &context)
    }

    /// Landing page, optionally with a notice.
    pub fn landing(&self, curated: usize, notice: Option<&str>) -> Result<String, TemplateError> {
        self.render("landing", |context| {
            context.insert("curated", &curated);
            context.insert("reason", notice.unwrap_or_default());
        })
    }

    pub fn result(
        &self,
        selection: &Selection,
        artifact: &GeneratedArtifact,
    ) -> Result<String, TemplateError> {
        self.render("result", |context| {
            context.insert("image", &artifact.public_path);
            context.insert("rows", &rows(selection));
        })
    }

    pub fn failure(&self, selection: &Selection, reason: &str) -> Result<String, TemplateError> {
        self.render("failure", |context| {
            context.insert("reason", reason);
            context.insert("rows", &rows(selection));
        })
    }
}
