//! Output rendering for the chat front end.
//!
//! This module provides the renderer trait and a plain-text implementation
//! that writes conversation entries to stdout.

use std::io::{self, Stdout, Write};

use crate::mode::Mode;
use crate::session::{Message, Sender};

/// ANSI escape code for dim text (used for the pending indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for brain answers).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for yellow text (used for the mode tag).
const ANSI_YELLOW: &str = "\x1b[33m";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print a conversation entry.
    fn print_message(&mut self, message: &Message);

    /// Show that a query is in flight.
    fn print_pending(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print the banner for the active mode.
    fn print_mode(&mut self, mode: Mode);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    /// Returns true if ANSI styling is enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_message(&mut self, message: &Message) {
        match message.sender {
            Sender::User => println!("You: {}", message.text),
            Sender::Brain => {
                let label = self.styled(ANSI_CYAN, "Brain:");
                println!("{label}\n{}", message.text);
            }
        }
        self.flush();
    }

    fn print_pending(&mut self) {
        let line = self.styled(ANSI_DIM, "Thinking...");
        println!("{line}");
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        let line = self.styled(ANSI_RED, error);
        eprintln!("{line}");
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }

    fn print_mode(&mut self, mode: Mode) {
        let tag = self.styled(ANSI_YELLOW, &format!("[{mode}]"));
        println!("{tag} {}", mode.label());
        self.flush();
    }
}
