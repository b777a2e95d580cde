//! # Interactive Prompts (`common::ui::prompt`)
//!
//! File: cli/src/common/ui/prompt.rs
//!
//! ## Overview
//!
//! Line-based operator input behind the `Prompter` trait. The topology
//! builder and the destructive commands (restore, uninstall) only see the
//! trait, so they can be driven by:
//!
//! - `TerminalPrompter`: reads lines from stdin, blocking without timeout
//! - `NonInteractivePrompter`: never reads; `is_interactive()` is false, so
//!   callers apply their documented non-interactive fallback instead
//!
//! Reads block on the terminal. An end-of-file on stdin is treated as an
//! empty answer.
//!
use std::io::{self, BufRead, Write};

/// Source of operator answers.
pub trait Prompter {
    /// Whether questions can actually reach an operator.
    fn is_interactive(&self) -> bool;

    /// Asks a free-form question. Returns the trimmed answer, possibly empty.
    fn ask(&mut self, question: &str) -> io::Result<String>;

    /// Asks a yes/no question. An empty answer selects `default`.
    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool>;

    /// Shows a numbered menu. Returns the zero-based index of the choice, or
    /// `None` when the answer is not a valid option number.
    fn select(&mut self, question: &str, options: &[String]) -> io::Result<Option<usize>>;
}

/// Interprets a yes/no answer.
pub fn parse_yes_no(answer: &str, default: bool) -> bool {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}

/// Interprets a 1-based menu answer against `count` options.
pub fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    match answer.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= count => Some(n - 1),
        _ => None,
    }
}

/// Prompter reading from the process's stdin.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line(&self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

impl Prompter for TerminalPrompter {
    fn is_interactive(&self) -> bool {
        true
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        print!("{} ", question);
        io::stdout().flush()?;
        self.read_line()
    }

    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        print!("{} {} ", question, hint);
        io::stdout().flush()?;
        Ok(parse_yes_no(&self.read_line()?, default))
    }

    fn select(&mut self, question: &str, options: &[String]) -> io::Result<Option<usize>> {
        println!("{}", question);
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {}", i + 1, option);
        }
        print!("Enter choice [1-{}]: ", options.len());
        io::stdout().flush()?;
        Ok(parse_choice(&self.read_line()?, options.len()))
    }
}

/// Prompter for `--non-interactive` runs and non-terminal stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn is_interactive(&self) -> bool {
        false
    }

    fn ask(&mut self, _question: &str) -> io::Result<String> {
        Ok(String::new())
    }

    fn confirm(&mut self, _question: &str, default: bool) -> io::Result<bool> {
        Ok(default)
    }

    fn select(&mut self, _question: &str, _options: &[String]) -> io::Result<Option<usize>> {
        Ok(None)
    }
}

/// Prompter answering from a fixed script, recording every question asked.
#[cfg(test)]
pub(crate) mod scripted {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Debug, Default)]
    pub(crate) struct ScriptedPrompter {
        answers: VecDeque<String>,
        pub(crate) asked: Vec<String>,
    }

    impl ScriptedPrompter {
        pub(crate) fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                asked: Vec::new(),
            }
        }

        fn next(&mut self, question: &str) -> String {
            self.asked.push(question.to_string());
            self.answers.pop_front().unwrap_or_default()
        }
    }

    impl Prompter for ScriptedPrompter {
        fn is_interactive(&self) -> bool {
            true
        }

        fn ask(&mut self, question: &str) -> io::Result<String> {
            Ok(self.next(question).trim().to_string())
        }

        fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
            let answer = self.next(question);
            Ok(parse_yes_no(&answer, default))
        }

        fn select(&mut self, question: &str, options: &[String]) -> io::Result<Option<usize>> {
            let answer = self.next(question);
            Ok(parse_choice(&answer, options.len()))
        }
    }
}
