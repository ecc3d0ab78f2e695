//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::mode::Mode;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// State file under the home directory when no token file is given.
const DEFAULT_STATE_FILE: &str = ".blackbrain/state.json";

/// Command-line arguments for the blackbrain-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the Brain service.
    #[arrrg(
        optional,
        "Brain service URL (default: $BLACKBRAIN_API_URL or http://127.0.0.1:8000)",
        "URL"
    )]
    pub base_url: Option<String>,

    /// Starting mode.
    #[arrrg(optional, "Starting mode (default: basic)", "MODE")]
    pub mode: Option<String>,

    /// Where the bearer token is persisted.
    #[arrrg(
        optional,
        "File persisting the login token (default: ~/.blackbrain/state.json)",
        "PATH"
    )]
    pub token_file: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat front end.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Explicit base URL; `None` defers to the client's environment lookup.
    pub base_url: Option<String>,

    /// Mode for the first submit.
    pub mode: Mode,

    /// File persisting the token; `None` keeps it in memory only.
    pub token_file: Option<PathBuf>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: from the environment, else the local server
    /// - Mode: basic
    /// - Token file: ~/.blackbrain/state.json when HOME is set
    /// - Timeout: 60 seconds
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: None,
            mode: Mode::Basic,
            token_file: default_token_file(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_color: true,
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the starting mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets or clears the token file.
    pub fn with_token_file(mut self, path: Option<PathBuf>) -> Self {
        self.token_file = path;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let defaults = ChatConfig::new();
        ChatConfig {
            base_url: args.base_url,
            mode: args
                .mode
                .as_deref()
                .map(Mode::normalize)
                .unwrap_or(defaults.mode),
            token_file: args.token_file.map(PathBuf::from).or(defaults.token_file),
            timeout: args
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            use_color: !args.no_color,
        }
    }
}

fn default_token_file() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(DEFAULT_STATE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.base_url, None);
        assert_eq!(config.mode, Mode::Basic);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert_eq!(config.mode, Mode::Basic);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.token_file, default_token_file());
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            base_url: Some("http://brain.test:9000".to_string()),
            mode: Some("decision".to_string()),
            token_file: Some("/tmp/bb.json".to_string()),
            timeout_secs: Some(5),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.base_url.as_deref(), Some("http://brain.test:9000"));
        assert_eq!(config.mode, Mode::Decision);
        assert_eq!(config.token_file, Some(PathBuf::from("/tmp/bb.json")));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.use_color);
    }

    #[test]
    fn unknown_mode_and_zero_timeout_fall_back() {
        let args = ChatArgs {
            mode: Some("creator".to_string()),
            timeout_secs: Some(0),
            ..ChatArgs::default()
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.mode, Mode::Basic);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_base_url("https://brain.example.com")
            .with_mode(Mode::NoBullshit)
            .with_token_file(None)
            .with_timeout(Duration::from_secs(10))
            .without_color();

        assert_eq!(config.base_url.as_deref(), Some("https://brain.example.com"));
        assert_eq!(config.mode, Mode::NoBullshit);
        assert_eq!(config.token_file, None);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(!config.use_color);
    }
}
