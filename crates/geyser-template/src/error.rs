//! Error types for template operations

use thiserror::Error;

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Errors that can occur while loading or rendering templates
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template source failed to compile
    #[error("Failed to parse template '{name}': {detail}")]
    TemplateParseFailed { name: String, detail: String },

    /// Template rendering failed
    #[error("Failed to render template '{name}': {detail}")]
    RenderError { name: String, detail: String },

    /// Template not registered in registry
    #[error("Template '{0}' not registered")]
    TemplateNotRegistered(String),

    /// File loading error
    #[error("Failed to load template file '{path}': {detail}")]
    FileLoadError { path: String, detail: String },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
