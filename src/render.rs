//! Terminal output renderer for status messages.
//!
//! Everything human-facing goes to stderr so stdout stays clean for `--json`.

use crossterm::style::{Color, Stylize};

use crate::reconcile::{TabOutcome, TabReport};

const INDENT_1: &str = "  ";
const GLYPH_SECTION_BULLET: &str = "•";
const LABEL_WARNING: &str = "warning:";
const LABEL_ERROR: &str = "error:";

const COLOR_WARNING: Color = Color::Yellow;
const COLOR_ERROR: Color = Color::Red;
const COLOR_SECTION_BULLET: Color = Color::DarkGrey;
const COLOR_SECTION_TITLE: Color = Color::White;
const COLOR_ACTIVITY_TEXT: Color = Color::Grey;
const COLOR_FIELD_KEY: Color = Color::DarkGrey;
const COLOR_FIELD_VALUE: Color = Color::Reset;

/// Handles all terminal output formatting.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Whether ANSI color/style output is enabled.
    color: bool,
}

impl Renderer {
    /// Create a renderer with optional color output.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Print a warning (to stderr).
    pub fn warn(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", LABEL_WARNING.with(COLOR_WARNING).bold());
        } else {
            eprintln!("{LABEL_WARNING} {msg}");
        }
    }

    /// Print an error (to stderr).
    pub fn error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", LABEL_ERROR.with(COLOR_ERROR).bold());
        } else {
            eprintln!("{LABEL_ERROR} {msg}");
        }
    }

    /// Print a small section header in status-style output.
    pub fn section(&self, title: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                GLYPH_SECTION_BULLET.with(COLOR_SECTION_BULLET),
                title.with(COLOR_SECTION_TITLE).bold()
            );
        } else {
            eprintln!("{title}:");
        }
    }

    /// Print an activity line for lifecycle updates.
    pub fn activity(&self, text: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                GLYPH_SECTION_BULLET.with(COLOR_SECTION_BULLET),
                text.with(COLOR_ACTIVITY_TEXT).bold()
            );
        } else {
            eprintln!("{text}");
        }
    }

    /// Print a key/value line under a status section.
    pub fn field(&self, key: &str, value: &str) {
        if self.color {
            eprintln!(
                "{INDENT_1}{} {}",
                format!("{key}:").with(COLOR_FIELD_KEY),
                value.with(COLOR_FIELD_VALUE),
            );
        } else {
            eprintln!("{INDENT_1}{key}: {value}");
        }
    }

    /// Print one line per tab describing what the run did with it.
    pub fn tab_reports(&self, reports: &[TabReport]) {
        for report in reports {
            self.field(&report.name, &tab_report_value(report));
        }
    }
}

fn tab_report_value(report: &TabReport) -> String {
    let label = report.outcome.label();
    match (&report.tab, report.outcome) {
        (Some(tab), TabOutcome::Created | TabOutcome::Reused) => format!("{label} ({tab})"),
        _ => label.to_string(),
    }
}
