//! Report template management for geyser
//!
//! Markdown report sections are rendered from Jinja2 templates. The engine is
//! preloaded with financial formatting filters so templates can write
//! `{{ market_cap | currency }}` or `{{ net_margin | percent }}` and get `N/A`
//! for missing values.
//!
//! # Quick Start
//!
//! ```
//! use geyser_template::{JinjaTemplate, ReportTemplate};
//! use serde_json::json;
//!
//! let template = JinjaTemplate::new("cap", "Market Cap: {{ cap | currency }}").unwrap();
//! let out = template.render(&json!({ "cap": 2_500_000_000_000.0_f64 })).unwrap();
//! assert_eq!(out, "Market Cap: $2.50T");
//! ```
//!
//! # Using the Builder
//!
//! ```
//! use geyser_template::MarkdownBuilder;
//!
//! let doc = MarkdownBuilder::new()
//!     .subsection("Peers Analyzed")
//!     .line("AMD, INTC")
//!     .table(&["Metric", "Value"], &[vec!["P/E".to_string(), "12.00x".to_string()]])
//!     .build();
//!
//! assert!(doc.contains("### Peers Analyzed"));
//! assert!(doc.contains("| P/E | 12.00x |"));
//! ```

mod builder;
mod error;
pub mod format;
mod jinja;
mod loader;
mod registry;
mod template;

pub use builder::MarkdownBuilder;
pub use error::{Result, TemplateError};
pub use jinja::JinjaTemplate;
pub use loader::TemplateLoader;
pub use registry::TemplateRegistry;
pub use template::ReportTemplate;
