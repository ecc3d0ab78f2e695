//! Terminal chat front end.
//!
//! This module provides the pieces the `blackbrain-chat` binary assembles
//! around the core session:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: Slash command parsing
//!
//! Rendering lives in [`crate::render`]; the conversation itself is a
//! [`crate::ChatSession`].

mod commands;
mod config;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, is_confirmation, parse_command};
pub use config::{ChatArgs, ChatConfig};
