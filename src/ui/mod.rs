//! Terminal status lines for the CLI.
//!
//! Colour is only used when stdout is a terminal, so CI logs stay plain.

use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

/// Status icons for different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
    }
}

/// Render a status line, coloured when `color` is set.
pub fn format_status(status: Status, msg: &str, color: bool) -> String {
    let icon = status_icon(status);
    if !color {
        return format!("{} {}", icon, msg);
    }
    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg),
        Status::Error => format!("{} {}", icon.red().bold(), msg),
        Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
        Status::Info => format!("{} {}", icon.cyan().bold(), msg),
    }
}

/// Print a status line to stdout (errors go to stderr).
pub fn print_status(status: Status, msg: &str) {
    match status {
        Status::Error => eprintln!("{}", format_status(status, msg, std::io::stderr().is_terminal())),
        _ => println!("{}", format_status(status, msg, is_terminal())),
    }
}
