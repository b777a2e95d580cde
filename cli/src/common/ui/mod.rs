//! # Drim Terminal Output (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Operator-facing output. `Console` prints the colored status lines every
//! command uses (info, success, warning, error) and the `prompt` submodule
//! owns interactive input.
//!
//! Color is an explicit setting carried by the `Console` value. `main` decides
//! it once from `--no-color`, the `NO_COLOR` variable and whether stdout is a
//! terminal, then hands the console to the command through `AppContext`.
//! Nothing in this module reads process-wide flags.
//!
//! Diagnostics for developers go through `tracing` to stderr; `Console` is
//! for the messages the operator is meant to read.
//!
pub mod prompt;

pub use prompt::{NonInteractivePrompter, Prompter, TerminalPrompter};

use colored::Colorize;

/// Status-line printer with an explicit color setting.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    color: bool,
}

impl Console {
    pub fn new(color: bool) -> Self {
        // `colored` keeps its own global override; keep it in step so that
        // strings built outside `Console` honour the same choice.
        if !color {
            colored::control::set_override(false);
        }
        Self { color }
    }

    /// Section header, e.g. "Deploying Kaneo".
    pub fn banner(&self, title: &str) {
        let line = "=".repeat(title.len() + 4);
        if self.color {
            println!("{}", line.blue());
            println!("  {}", title.bold());
            println!("{}", line.blue());
        } else {
            println!("{}", line);
            println!("  {}", title);
            println!("{}", line);
        }
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", self.symbol("i", Tone::Info), message);
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", self.symbol("✓", Tone::Success), message);
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", self.symbol("!", Tone::Warn), message);
    }

    /// Errors go to stderr so they survive stdout redirection.
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", self.symbol("✗", Tone::Error), message);
    }

    /// Indented key/value line used in summaries.
    pub fn detail(&self, key: &str, value: &str) {
        if self.color {
            println!("  {} {}", format!("{}:", key).dimmed(), value.bold());
        } else {
            println!("  {}: {}", key, value);
        }
    }

    pub fn blank(&self) {
        println!();
    }

    fn symbol(&self, symbol: &str, tone: Tone) -> String {
        let text = format!("[{}]", symbol);
        if !self.color {
            return text;
        }
        match tone {
            Tone::Info => text.blue().to_string(),
            Tone::Success => text.green().bold().to_string(),
            Tone::Warn => text.yellow().bold().to_string(),
            Tone::Error => text.red().bold().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Info,
    Success,
    Warn,
    Error,
}

/// Whether color output should be used, given the `--no-color` flag.
pub fn color_wanted(no_color_flag: bool) -> bool {
    use std::io::IsTerminal;
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    std::io::stdout().is_terminal()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_symbols_without_color() {
        let console = Console::new(false);
        assert_eq!(console.symbol("✓", Tone::Success), "[✓]");
        assert_eq!(console.symbol("!", Tone::Warn), "[!]");
    }

    #[test]
    fn test_no_color_flag_wins() {
        assert!(!color_wanted(true));
    }
}
