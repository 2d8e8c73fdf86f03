//! Core report template trait

use crate::Result;

/// A named template that renders a report fragment from a JSON context
///
/// The trait is dyn-compatible: variables are passed as `serde_json::Value`
/// so the registry can hold heterogeneous implementations behind `Arc<dyn _>`.
pub trait ReportTemplate: Send + Sync {
    /// Template name/identifier
    fn name(&self) -> &str;

    /// Render the template with the given variables
    fn render(&self, vars: &serde_json::Value) -> Result<String>;

    /// Raw template source (for debugging/inspection)
    fn raw_template(&self) -> &str;
}
