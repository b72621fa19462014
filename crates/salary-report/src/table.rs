//! Minimal column-aligned text table.
//!
//! Widths are measured in terminal columns with `unicode-width`, so en dashes
//! and non-ASCII state or company names line up.

use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A header row plus data rows, rendered with a rule under the header.
#[derive(Debug, Clone)]
pub struct TextTable {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
    footer: Option<Vec<String>>,
}

impl TextTable {
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Self {
            headers: columns.iter().map(|(h, _)| h.to_string()).collect(),
            aligns: columns.iter().map(|(_, a)| *a).collect(),
            rows: Vec::new(),
            footer: None,
        }
    }

    /// Append a row. Missing cells render blank; extra cells are dropped.
    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(self.fit(cells));
    }

    /// A row set off from the data by a second rule.
    pub fn set_footer(&mut self, cells: Vec<String>) {
        self.footer = Some(self.fit(cells));
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let rule: String = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ");

        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(self.render_row(&self.headers, &widths));
        lines.push(rule.clone());
        for row in &self.rows {
            lines.push(self.render_row(row, &widths));
        }
        if let Some(footer) = &self.footer {
            lines.push(rule);
            lines.push(self.render_row(footer, &widths));
        }
        lines.join("\n")
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn fit(&self, mut cells: Vec<String>) -> Vec<String> {
        cells.resize(self.headers.len(), String::new());
        cells
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in self.rows.iter().chain(self.footer.iter()) {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.width());
            }
        }
        widths
    }

    fn render_row(&self, cells: &[String], widths: &[usize]) -> String {
        let rendered: Vec<String> = cells
            .iter()
            .zip(widths)
            .zip(&self.aligns)
            .map(|((cell, width), align)| pad(cell, *width, *align))
            .collect();
        rendered.join("  ").trim_end().to_string()
    }
}

/// Pad `text` to `width` terminal columns.
pub fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    match align {
        Align::Left => format!("{text}{fill}"),
        Align::Right => format!("{fill}{text}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
