//! File-based template loader

use crate::{JinjaTemplate, Result, TemplateError};
use std::path::{Path, PathBuf};

/// Recognised template file extensions, longest first
const EXTENSIONS: &[&str] = &[".md.j2", ".md.jinja", ".j2", ".jinja"];

/// Loads report templates from a directory
///
/// The template name is the file name with its extension removed, so
/// `templates/executive_summary.md.j2` becomes `executive_summary`.
///
/// ```text
/// templates/
/// ├── executive_summary.md.j2
/// ├── disclaimer.j2
/// └── notes.txt        # ignored
/// ```
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    base_path: PathBuf,
}

impl TemplateLoader {
    /// Create a new loader with the given base path
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Load a single template by name
    pub fn load_template(&self, name: &str) -> Result<JinjaTemplate> {
        for ext in EXTENSIONS {
            let path = self.base_path.join(format!("{name}{ext}"));
            if path.is_file() {
                return JinjaTemplate::new(name, read(&path)?);
            }
        }

        Err(TemplateError::FileLoadError {
            path: self.base_path.join(name).display().to_string(),
            detail: "No template files found".to_string(),
        })
    }

    /// Load every template in the base directory, sorted by name
    pub fn load_all(&self) -> Result<Vec<JinjaTemplate>> {
        let entries =
            std::fs::read_dir(&self.base_path).map_err(|e| TemplateError::FileLoadError {
                path: self.base_path.display().to_string(),
                detail: e.to_string(),
            })?;

        let mut found: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(name) = template_name(filename) {
                found.push((name.to_string(), path.clone()));
            }
        }
        found.sort_by(|a, b| a.0.cmp(&b.0));

        found
            .into_iter()
            .map(|(name, path)| JinjaTemplate::new(name, read(&path)?))
            .collect()
    }

    /// List template names available in the base directory
    pub fn list_available(&self) -> Result<Vec<String>> {
        Ok(self
            .load_all()?
            .iter()
            .map(|t| crate::ReportTemplate::name(t).to_string())
            .collect())
    }
}

fn template_name(filename: &str) -> Option<&str> {
    EXTENSIONS
        .iter()
        .find_map(|ext| filename.strip_suffix(ext))
        .filter(|stem| !stem.is_empty())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| TemplateError::FileLoadError {
        path: path.display().to_string(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportTemplate;
    use serde_json::json;

    #[test]
    fn test_template_name() {
        assert_eq!(template_name("summary.md.j2"), Some("summary"));
        assert_eq!(template_name("summary.jinja"), Some("summary"));
        assert_eq!(template_name("notes.txt"), None);
        assert_eq!(template_name(".j2"), None);
    }

    #[test]
    fn test_load_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("title.md.j2"), "# {{ ticker }}").unwrap();

        let loader = TemplateLoader::new(dir.path());
        let template = loader.load_template("title").unwrap();
        assert_eq!(template.render(&json!({ "ticker": "MSFT" })).unwrap(), "# MSFT");
    }

    #[test]
    fn test_load_template_missing() {
        let dir = tempfile::tempdir().unwrap();
        let loader = TemplateLoader::new(dir.path());
        assert!(matches!(
            loader.load_template("nope"),
            Err(TemplateError::FileLoadError { .. })
        ));
    }

    #[test]
    fn test_load_all_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.j2"), "B").unwrap();
        std::fs::write(dir.path().join("a.md.jinja"), "A").unwrap();
        std::fs::write(dir.path().join("readme.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested.j2")).unwrap();

        let loader = TemplateLoader::new(dir.path());
        assert_eq!(
            loader.list_available().unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_load_all_missing_dir() {
        let loader = TemplateLoader::new("/nonexistent/geyser/templates");
        assert!(loader.load_all().is_err());
    }

    #[test]
    fn test_invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.j2"), "{% if %}").unwrap();
        let loader = TemplateLoader::new(dir.path());
        assert!(matches!(
            loader.load_all(),
            Err(TemplateError::TemplateParseFailed { .. })
        ));
    }
}
