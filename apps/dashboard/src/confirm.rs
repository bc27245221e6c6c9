//! # Confirmation Prompts
//!
//! Blocking yes/no questions asked before destructive actions.

use std::io::{self, BufRead, Write};

use tracing::warn;

/// Asks the user to confirm `message`. `true` means go ahead.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// Answers yes without asking (`confirm.assume_yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Prompts on the terminal and reads one line from stdin.
///
/// Only `y` / `yes` (any case) confirm. I/O failures decline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: &str) -> bool {
        let mut stdout = io::stdout();
        if write!(stdout, "{} [y/N] ", message).and_then(|_| stdout.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
