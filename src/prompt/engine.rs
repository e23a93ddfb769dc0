use crate::error::TemplateError;
use tera::Tera;

/// Tera-backed template engine for prompts and HTML views.
///
/// Templates named `*.html` are auto-escaped; prompt templates are not.
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Create with inline templates (no filesystem).
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Register a template from a string, replacing any previous one.
    pub fn add_template(&mut self, name: &str, content: &str) -> Result<(), TemplateError> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| TemplateError::Render(format!("{name}: {}", error_chain(&e))))
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &tera::Context) -> Result<String, TemplateError> {
        if !self.has_template(name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        self.tera
            .render(name, context)
            .map_err(|e| TemplateError::Render(format!("{name}: {}", error_chain(&e))))
    }
}

/// Tera nests the useful message (e.g. the missing variable) in `source()`.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Context;

    #[test]
    fn unknown_template_is_not_found() {
        let engine = TeraEngine::new();
        let err = engine.render("nonexistent", &Context::new()).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(name) if name == "nonexistent"));
    }

    #[test]
    fn add_template_and_render() {
        let mut engine = TeraEngine::new();
        engine.add_template("scene", "Scene: {{ areas }}").unwrap();

        let mut ctx = Context::new();
        ctx.insert("areas", "on a windy beach");
        assert_eq!(engine.render("scene", &ctx).unwrap(), "Scene: on a windy beach");
    }

    #[test]
    fn missing_variable_names_the_variable() {
        let mut engine = TeraEngine::new();
        engine.add_template("scene", "Scene: {{ villain }}").unwrap();

        let err = engine.render("scene", &Context::new()).unwrap_err();
        assert!(err.to_string().contains("villain"), "{err}");
    }

    #[test]
    fn malformed_template_is_rejected() {
        let mut engine = TeraEngine::new();
        assert!(engine.add_template("broken", "{% if %}").is_err());
    }

    #[test]
    fn html_templates_escape_and_prompts_do_not() {
        let mut engine = TeraEngine::new();
        engine.add_template("page.html", "{{ tag }}").unwrap();
        engine.add_template("prompt", "{{ tag }}").unwrap();

        let mut ctx = Context::new();
        ctx.insert("tag", "inside an Applebee's");
        assert_eq!(
            engine.render("page.html", &ctx).unwrap(),
            "inside an Applebee&#x27;s"
        );
        assert_eq!(engine.render("prompt", &ctx).unwrap(), "inside an Applebee's");
    }
}
