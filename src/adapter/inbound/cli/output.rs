//! CLI output formatting.
//!
//! Every printer builds a [`Line`] and hands it to one emitter, which writes
//! either a JSON object (`{"type": .., "payload": ..}`) or a colored human
//! line. Quiet mode drops human lines except warnings and errors.

use std::fmt::Display;

use owo_colors::OwoColorize;
use parking_lot::{const_rwlock, RwLock};
use serde_json::{json, Value};

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT: RwLock<OutputConfig> = const_rwlock(OutputConfig::new(false, false, 0));

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    *OUTPUT.write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    OUTPUT.read().json
}

#[must_use]
pub fn is_quiet() -> bool {
    OUTPUT.read().quiet
}

#[must_use]
pub fn verbosity() -> u8 {
    OUTPUT.read().verbose
}

/// One unit of CLI output.
#[derive(Debug, Clone, PartialEq)]
enum Line<'a> {
    Header { version: &'a str },
    Field { label: &'a str, value: String },
    Success(&'a str),
    Warning(&'a str),
    Error(&'a str),
    Section(&'a str),
    Note(&'a str),
    Hint(&'a str),
}

impl Line<'_> {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Header { .. } => "header",
            Self::Field { .. } => "field",
            Self::Success(_) => "success",
            Self::Warning(_) => "warning",
            Self::Error(_) => "error",
            Self::Section(_) => "section",
            Self::Note(_) => "note",
            Self::Hint(_) => "hint",
        }
    }

    fn payload(&self) -> Value {
        match self {
            Self::Header { version } => json!({ "app": APP, "version": version }),
            Self::Field { label, value } => json!({ "label": label, "value": value }),
            Self::Section(title) => json!({ "title": title }),
            Self::Hint(command) => json!({ "command": command }),
            Self::Success(message)
            | Self::Warning(message)
            | Self::Error(message)
            | Self::Note(message) => json!({ "message": message }),
        }
    }

    const fn survives_quiet(&self) -> bool {
        matches!(self, Self::Warning(_) | Self::Error(_))
    }

    fn human(&self) -> String {
        match self {
            Self::Header { version } => format!("{} {}\n", APP.bold(), version.dimmed()),
            Self::Field { label, value } => format!("  {:<12} {value}", label.dimmed()),
            Self::Success(message) => format!("  {} {message}", "✓".green()),
            Self::Warning(message) => format!("  {} {message}", "⚠".yellow()),
            Self::Error(message) => format!("  {} {message}", "×".red()),
            Self::Section(title) => format!("\n{}", title.bold()),
            Self::Note(message) => format!("  {}", message.dimmed()),
            Self::Hint(command) => format!("    {}", command.cyan()),
        }
    }

    /// Text to print under `config`, or `None` when the line is suppressed.
    fn render(&self, config: OutputConfig) -> Option<String> {
        if config.json {
            return Some(json!({ "type": self.kind(), "payload": self.payload() }).to_string());
        }
        if config.quiet && !self.survives_quiet() {
            return None;
        }
        Some(self.human())
    }
}

const APP: &str = "groupwatch";

fn emit(line: &Line<'_>) {
    let Some(text) = line.render(*OUTPUT.read()) else {
        return;
    };
    if matches!(line, Line::Error(_)) {
        eprintln!("{text}");
    } else {
        println!("{text}");
    }
}

/// Print the application name and version.
pub fn header(version: &str) {
    emit(&Line::Header { version });
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    emit(&Line::Field {
        label,
        value: value.to_string(),
    });
}

pub fn success(message: &str) {
    emit(&Line::Success(message));
}

/// Print a warning. Shown even in quiet mode.
pub fn warning(message: &str) {
    emit(&Line::Warning(message));
}

/// Print an error to stderr.
pub fn error(message: &str) {
    emit(&Line::Error(message));
}

pub fn section(title: &str) {
    emit(&Line::Section(title));
}

pub fn note(message: &str) {
    emit(&Line::Note(message));
}

/// Print a command the operator can run next.
pub fn hint(command: &str) {
    emit(&Line::Hint(command));
}
