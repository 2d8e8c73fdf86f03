//! Report template registry

use crate::{JinjaTemplate, ReportTemplate, Result, TemplateError, TemplateLoader};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// A thread-safe registry of report templates
///
/// The report generator registers its built-in section templates here, then
/// lets a user-supplied directory override any of them by name.
pub struct TemplateRegistry {
    templates: RwLock<HashMap<String, Arc<dyn ReportTemplate>>>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
        }
    }

    /// Register a template
    ///
    /// If a template with the same name already exists, it will be replaced.
    pub fn register<T: ReportTemplate + 'static>(&self, template: T) {
        if let Ok(mut templates) = self.templates.write() {
            templates.insert(template.name().to_string(), Arc::new(template));
        }
    }

    /// Compile and register a batch of `(name, source)` pairs
    pub fn register_sources<'a, I>(&self, sources: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, source) in sources {
            self.register(JinjaTemplate::new(name, source)?);
        }
        Ok(())
    }

    /// Replace registered templates with any same-named files found in `dir`
    ///
    /// Returns the names that were overridden, sorted.
    pub fn load_overrides(&self, dir: impl AsRef<Path>) -> Result<Vec<String>> {
        let loader = TemplateLoader::new(dir.as_ref());
        let mut overridden = Vec::new();
        for template in loader.load_all()? {
            overridden.push(template.name().to_string());
            self.register(template);
        }
        overridden.sort();
        Ok(overridden)
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ReportTemplate>> {
        self.templates.read().ok()?.get(name).cloned()
    }

    /// Check if a template is registered
    pub fn contains(&self, name: &str) -> bool {
        self.templates
            .read()
            .map(|t| t.contains_key(name))
            .unwrap_or(false)
    }

    /// Render a registered template
    pub fn render(&self, name: &str, vars: &serde_json::Value) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::TemplateNotRegistered(name.to_string()))?;
        template.render(vars)
    }

    /// List all registered template names, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .templates
            .read()
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Get the number of registered templates
    pub fn len(&self) -> usize {
        self.templates.read().map(|t| t.len()).unwrap_or(0)
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("templates", &self.list())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_and_render() {
        let registry = TemplateRegistry::new();
        assert!(registry.is_empty());

        registry.register(JinjaTemplate::new("title", "# {{ ticker }} Report").unwrap());
        assert!(registry.contains("title"));
        assert_eq!(registry.len(), 1);

        let out = registry.render("title", &json!({ "ticker": "AMD" })).unwrap();
        assert_eq!(out, "# AMD Report");
    }

    #[test]
    fn test_render_not_registered() {
        let registry = TemplateRegistry::new();
        let result = registry.render("missing", &json!({}));
        assert!(matches!(result, Err(TemplateError::TemplateNotRegistered(n)) if n == "missing"));
    }

    #[test]
    fn test_register_sources_and_list() {
        let registry = TemplateRegistry::new();
        registry
            .register_sources([("b", "B"), ("a", "A")])
            .unwrap();
        assert_eq!(registry.list(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let registry = TemplateRegistry::new();
        registry.register(JinjaTemplate::new("x", "one").unwrap());
        registry.register(JinjaTemplate::new("x", "two").unwrap());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.render("x", &json!({})).unwrap(), "two");
    }

    #[test]
    fn test_load_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("disclaimer.md.j2"), "Custom disclaimer").unwrap();

        let registry = TemplateRegistry::new();
        registry
            .register_sources([("disclaimer", "Default"), ("summary", "Summary")])
            .unwrap();

        let overridden = registry.load_overrides(dir.path()).unwrap();
        assert_eq!(overridden, vec!["disclaimer".to_string()]);
        assert_eq!(
            registry.render("disclaimer", &json!({})).unwrap(),
            "Custom disclaimer"
        );
        assert_eq!(registry.render("summary", &json!({})).unwrap(), "Summary");
    }

    #[test]
    fn test_debug() {
        let registry = TemplateRegistry::new();
        registry.register(JinjaTemplate::new("t", "x").unwrap());
        assert!(format!("{registry:?}").contains("TemplateRegistry"));
    }
}
