//! Fluent markdown builder
//!
//! Used for the table-heavy parts of a report where a template loop would be
//! harder to read than code.

/// A fluent builder for markdown fragments
///
/// # Examples
///
/// ```
/// use geyser_template::MarkdownBuilder;
///
/// let doc = MarkdownBuilder::new()
///     .subsection("Bull Case")
///     .numbered_list(["Revenue growing at 35.0% YoY", "Net cash position"])
///     .build();
///
/// assert!(doc.contains("### Bull Case"));
/// assert!(doc.contains("2. Net cash position"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkdownBuilder {
    out: String,
}

impl MarkdownBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw text
    pub fn text(mut self, content: impl AsRef<str>) -> Self {
        self.out.push_str(content.as_ref());
        self
    }

    /// Text followed by a newline
    pub fn line(self, content: impl AsRef<str>) -> Self {
        let line = format!("{}\n", content.as_ref());
        self.text(line)
    }

    /// `###` heading surrounded by blank lines
    pub fn subsection(self, title: impl AsRef<str>) -> Self {
        let heading = format!("\n### {}\n\n", title.as_ref());
        self.text(heading)
    }

    pub fn bullets<I, S>(self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        items
            .into_iter()
            .fold(self, |b, item| b.line(format!("- {}", item.as_ref())))
    }

    /// Items numbered from 1
    pub fn numbered_list<I, S>(self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        items
            .into_iter()
            .enumerate()
            .fold(self, |b, (i, item)| b.line(format!("{}. {}", i + 1, item.as_ref())))
    }

    /// `**key:** value` on its own line
    pub fn field(self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let field = format!("**{}:** {}", key.as_ref(), value.as_ref());
        self.line(field)
    }

    /// Pipe table; short rows are padded with empty cells
    pub fn table(self, headers: &[&str], rows: &[Vec<String>]) -> Self {
        let width = headers.len();
        let mut b = self
            .line(format!("| {} |", headers.join(" | ")))
            .line(format!("|{}|", vec!["---"; width].join("|")));
        for row in rows {
            let cells: Vec<&str> = (0..width.max(row.len()))
                .map(|i| row.get(i).map_or("", String::as_str))
                .collect();
            b = b.line(format!("| {} |", cells.join(" | ")));
        }
        b
    }

    pub fn build(self) -> String {
        self.out
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_and_fields() {
        let doc = MarkdownBuilder::new()
            .bullets(["one", "two"])
            .numbered_list(vec!["first".to_string()])
            .field("Status", "Premium")
            .build();
        assert_eq!(doc, "- one\n- two\n1. first\n**Status:** Premium\n");
    }

    #[test]
    fn test_subsection_spacing() {
        let doc = MarkdownBuilder::new().subsection("Key Metrics").build();
        assert_eq!(doc, "\n### Key Metrics\n\n");
    }

    #[test]
    fn test_table_padding() {
        let doc = MarkdownBuilder::new()
            .table(
                &["Metric", "NVDA", "AMD"],
                &[vec!["P/E".to_string(), "65.00".to_string()]],
            )
            .build();

        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines[0], "| Metric | NVDA | AMD |");
        assert_eq!(lines[1], "|---|---|---|");
        assert_eq!(lines[2], "| P/E | 65.00 |  |");
    }

    #[test]
    fn test_empty() {
        assert!(MarkdownBuilder::new().is_empty());
        assert!(!MarkdownBuilder::new().line("x").is_empty());
    }
}
