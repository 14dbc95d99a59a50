//! Expansion engine used for file names and file contents.
use crate::data::DataContext;
use crate::error::{Error, Result};
use minijinja::{Environment, ErrorKind, UndefinedBehavior};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given data.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `data` - Substitution data
    /// * `target` - What is being rendered, used in error messages
    ///
    /// # Errors
    /// * `Error::ExpansionSyntaxError` for malformed template syntax
    /// * `Error::UndefinedDataError` for references to undefined data
    /// * `Error::ExpansionError` for any other rendering failure
    fn render(&self, template: &str, data: &DataContext, target: &str) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer that fails on undefined data and keeps trailing newlines.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, data: &DataContext, target: &str) -> Result<String> {
        self.env
            .render_str(template, data)
            .map_err(|source| classify(target, source))
    }
}

fn classify(target: &str, source: minijinja::Error) -> Error {
    let target = target.to_string();
    match source.kind() {
        ErrorKind::SyntaxError | ErrorKind::BadEscape => {
            Error::ExpansionSyntaxError { target, source }
        }
        ErrorKind::UndefinedError => Error::UndefinedDataError { target, source },
        _ => Error::ExpansionError { target, source },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: serde_json::Value) -> DataContext {
        match value {
            serde_json::Value::Object(map) => DataContext::new(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_render_nested_data() {
        let renderer = MiniJinjaRenderer::new();
        let data = data(json!({"project": {"name": "demo"}, "year": 2026}));
        let result = renderer.render("{{ project.name }}-{{ year }}\n", &data, "t").unwrap();
        assert_eq!(result, "demo-2026\n");
    }

    #[test]
    fn test_render_error_kinds() {
        let renderer = MiniJinjaRenderer::new();
        let data = data(json!({"a": 1}));

        let err = renderer.render("{{ a ", &data, "t").unwrap_err();
        assert!(matches!(err, Error::ExpansionSyntaxError { .. }));

        let err = renderer.render("{{ missing }}", &data, "t").unwrap_err();
        assert!(matches!(err, Error::UndefinedDataError { .. }));
    }

    #[test]
    fn test_plain_text_untouched() {
        let renderer = MiniJinjaRenderer::new();
        let result = renderer.render("README.md", &DataContext::default(), "t").unwrap();
        assert_eq!(result, "README.md");
    }
}
