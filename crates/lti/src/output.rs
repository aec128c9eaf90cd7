//! Colored terminal output for launch reports.

use std::collections::BTreeMap;

use console::{Style, Term};

/// Terminal output formatter.
///
/// Writes to stderr so that `lti sign` keeps stdout for the signed body.
pub(crate) struct Output {
    term: Term,
    green: Style,
    red: Style,
    cyan_bold: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.green.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.red.apply_to(msg).to_string());
    }

    /// Print a `label: value` line with a dimmed label.
    pub(crate) fn field(&self, label: &str, value: &str) {
        self.line(&format!("{} {value}", self.dim.apply_to(format!("{label}:"))));
    }

    /// Print a titled parameter group. Empty groups print nothing.
    pub(crate) fn parameters(&self, title: &str, params: &BTreeMap<String, String>) {
        let Some(lines) = parameter_lines(params) else {
            return;
        };
        self.line("");
        self.line(&self.cyan_bold.apply_to(title).to_string());
        for line in lines {
            self.line(&line);
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

/// Indented `key = value` lines with keys padded to a common width.
fn parameter_lines(params: &BTreeMap<String, String>) -> Option<Vec<String>> {
    let width = params.keys().map(String::len).max()?;
    Some(
        params
            .iter()
            .map(|(key, value)| format!("  {key:<width$} = {value}"))
            .collect(),
    )
}
