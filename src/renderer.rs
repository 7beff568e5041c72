//! Template renderer for templatedir.
//! The tree engine only depends on [`TemplateRenderer`]; MiniJinja is the
//! implementation used by default.
use crate::error::{Error, Result};
use minijinja::Environment;

/// Trait for template rendering engines.
///
/// Implementations are shared by every render worker, hence `Send + Sync`.
pub trait TemplateRenderer: Send + Sync {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `name` - Name reported in error messages, usually the source path
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, name: &str, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a new MiniJinjaRenderer instance with default environment.
    ///
    /// Trailing newlines are kept so rendered files end the way their
    /// templates do.
    pub fn new() -> Self {
        let mut env = Environment::new();
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
    /// Renders a template string using MiniJinja.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if the template does not parse or fails
    ///   while rendering
    fn render(&self, name: &str, template: &str, context: &serde_json::Value) -> Result<String> {
        self.env.render_named_str(name, template, context).map_err(Error::MinijinjaError)
    }
}
