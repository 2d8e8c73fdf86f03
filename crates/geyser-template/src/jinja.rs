//! MiniJinja-based template implementation

use crate::{Result, ReportTemplate, TemplateError, format};
use minijinja::{Environment, UndefinedBehavior};

/// A report template backed by MiniJinja
///
/// Besides the standard Jinja2 syntax the environment registers the
/// financial filters from [`crate::format`]:
///
/// | filter     | example output |
/// |------------|----------------|
/// | `currency` | `$2.50T`       |
/// | `percent`  | `15.3%`        |
/// | `ratio`    | `24.57x`       |
/// | `number`   | `1,234.50`     |
/// | `billions` | `$2750.0B`     |
/// | `fixed(n)` | `1.23`         |
///
/// Missing values (`null` or undefined) render as `N/A`.
pub struct JinjaTemplate {
    name: String,
    source: String,
}

impl JinjaTemplate {
    /// Compile-check and wrap a template source
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();

        let env = environment();
        env.template_from_str(&source)
            .map_err(|e| TemplateError::TemplateParseFailed {
                name: name.clone(),
                detail: e.to_string(),
            })?;

        Ok(Self { name, source })
    }
}

impl ReportTemplate for JinjaTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, vars: &serde_json::Value) -> Result<String> {
        // Create a new environment for each render to avoid lifetime issues
        let env = environment();
        let value = minijinja::Value::from_serialize(vars);

        env.render_str(&self.source, value)
            .map_err(|e| TemplateError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }

    fn raw_template(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("name", &self.name)
            .field("len", &self.source.len())
            .finish()
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Chainable);

    env.add_filter("currency", format::currency);
    env.add_filter("percent", format::percent);
    env.add_filter("ratio", format::ratio);
    env.add_filter("number", format::number);
    env.add_filter("billions", format::billions);
    env.add_filter("fixed", |v: Option<f64>, places: Option<usize>| {
        format::fixed(v, places.unwrap_or(2))
    });
    env.add_filter("na", |v: Option<String>| {
        v.filter(|s| !s.is_empty())
            .unwrap_or_else(|| format::NOT_AVAILABLE.to_string())
    });
    env
}
