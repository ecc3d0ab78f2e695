//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat front end without sending questions
//! to the Brain.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Switch mode for the next question.  The raw tag is normalized later.
    Mode(String),

    /// List the available modes.
    ListModes,

    /// Log in as the given email; the password is prompted for.
    Login(String),

    /// Create an account for the given email; the password is prompted for.
    Signup(String),

    /// Forget the stored token.
    Logout,

    /// Save the conversation to a file.
    SaveTranscript(String),

    /// Display session status.
    Status,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be submitted as a question.
///
/// # Examples
///
/// ```
/// # use blackbrain::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/mode study").is_some());
/// assert!(parse_command("Should I invest now?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "mode" => match argument {
            Some(mode) => ChatCommand::Mode(mode.to_string()),
            None => ChatCommand::Invalid("/mode requires a mode name (see /modes)".to_string()),
        },
        "modes" => ChatCommand::ListModes,
        "login" => parse_email(argument, ChatCommand::Login, "/login"),
        "signup" => parse_email(argument, ChatCommand::Signup, "/signup"),
        "logout" => ChatCommand::Logout,
        "save" => match argument {
            Some(arg) => ChatCommand::SaveTranscript(arg.to_string()),
            None => ChatCommand::Invalid("/save requires a file path".to_string()),
        },
        "status" | "stats" => ChatCommand::Status,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_email<F>(argument: Option<&str>, constructor: F, name: &str) -> ChatCommand
where
    F: Fn(String) -> ChatCommand,
{
    match argument {
        Some(email) if email.contains('@') && !email.contains(' ') => {
            constructor(email.to_string())
        }
        Some(_) => ChatCommand::Invalid(format!("{} expects an email address", name)),
        None => ChatCommand::Invalid(format!("{} requires an email address", name)),
    }
}

/// Returns true if a y/N prompt was answered yes.
///
/// Only `y` and `yes`, in any case, count; an empty answer is a no.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /mode <name>           Use a mode for the next question (e.g., /mode study)
  /modes                 List available modes
  /login <email>         Log in (password is prompted)
  /signup <email>        Create an account (password is prompted)
  /logout                Forget the stored login
  /save <file>           Save the conversation to a file
  /status                Show session status
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_defaults_to_no() {
        assert!(is_confirmation("y"));
        assert!(is_confirmation(" YES "));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("n"));
        assert!(!is_confirmation("yep"));
    }

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_mode() {
        assert_eq!(
            parse_command("/mode money"),
            Some(ChatCommand::Mode("money".to_string()))
        );
        assert_eq!(
            parse_command("/MODE   study  "),
            Some(ChatCommand::Mode("study".to_string()))
        );
        assert!(matches!(
            parse_command("/mode"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
        assert_eq!(parse_command("/modes"), Some(ChatCommand::ListModes));
    }

    #[test]
    fn parse_auth_commands() {
        assert_eq!(
            parse_command("/login me@example.com"),
            Some(ChatCommand::Login("me@example.com".to_string()))
        );
        assert_eq!(
            parse_command("/signup new@example.com"),
            Some(ChatCommand::Signup("new@example.com".to_string()))
        );
        assert!(matches!(
            parse_command("/login bob"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("email")
        ));
        assert!(matches!(
            parse_command("/signup"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
        assert_eq!(parse_command("/logout"), Some(ChatCommand::Logout));
    }

    #[test]
    fn parse_save_and_status() {
        assert_eq!(
            parse_command("/save chat.json"),
            Some(ChatCommand::SaveTranscript("chat.json".to_string()))
        );
        assert!(matches!(
            parse_command("/save"),
            Some(ChatCommand::Invalid(_))
        ));
        assert_eq!(parse_command("/status"), Some(ChatCommand::Status));
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Status));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse_command("/clear"),
            Some(ChatCommand::Invalid("Unknown command: /clear".to_string()))
        );
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Should I invest now?"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(help.contains("/quit"));
        assert!(help.contains("/mode"));
        assert!(help.contains("/login"));
        assert!(help.contains("/logout"));
    }
}
