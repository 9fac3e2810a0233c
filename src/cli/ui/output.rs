//! Status lines for the terminal.
//!
//! Everything here goes to stderr; stdout carries only the briefing or the
//! compiled prompt so either can be piped to a file.

use console::style;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        eprintln!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        eprintln!("{} {}", style("ℹ").blue(), message);
    }

    /// Progress step of a running submission
    pub fn step(&self, message: &str) {
        eprintln!("{} {}", style("→").cyan(), style(message).dim());
    }

    pub fn header(&self, message: &str) {
        eprintln!("\n{}", style(message).bold().underlined());
    }

    /// Aligned `label: value` line
    pub fn field(&self, label: &str, value: &str) {
        eprintln!("  {:<12} {}", style(format!("{}:", label)).bold(), value);
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
