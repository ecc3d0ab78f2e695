//! Interactive chat application for asking the Brain.
//!
//! This binary is a terminal front end over [`blackbrain::ChatSession`]: it
//! reads lines, submits them as questions, and renders the answers.
//!
//! # Usage
//!
//! ```bash
//! # Talk to the local development server
//! blackbrain-chat
//!
//! # Point at another server and start in study mode
//! blackbrain-chat --base-url https://brain.example.com --mode study
//!
//! # Keep the login token somewhere else
//! blackbrain-chat --token-file ./state.json
//! ```
//!
//! Set `RUST_LOG=blackbrain=debug` to see request logging on stderr.

use std::path::PathBuf;
use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use blackbrain::chat::{
    ChatArgs, ChatCommand, ChatConfig, PlainTextRenderer, Renderer, help_text, is_confirmation,
    parse_command,
};
use blackbrain::{
    AuthAction, AuthFlow, AuthTokenStore, BrainClient, ChatSession, Credentials, FileStore,
    IgnoreReason, Mode, SubmitOutcome,
};

/// Main entry point for the blackbrain-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("blackbrain-chat [OPTIONS]");
    let config = ChatConfig::from(args);

    let tokens = Arc::new(load_tokens(config.token_file.clone())?);
    let client = BrainClient::with_options(
        tokens.clone(),
        config.base_url.clone(),
        Some(config.timeout),
    )?;
    let auth = AuthFlow::new(client.clone(), tokens.clone());
    let session = ChatSession::new(client.clone()).with_mode(config.mode);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    println!("BlackBrain ({})", client.base_url());
    renderer.print_mode(session.mode());
    if !tokens.is_authenticated() {
        renderer.print_info("Not logged in. Use /login <email> or /signup <email>.");
    }
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Mode(raw) => {
                            let mode = session.set_mode(&raw);
                            if mode.as_str() != raw {
                                renderer.print_info(&format!(
                                    "Unknown mode '{raw}', using {}",
                                    mode.as_str()
                                ));
                            }
                            renderer.print_mode(mode);
                        }
                        ChatCommand::ListModes => {
                            for mode in Mode::ALL {
                                println!("    {:<12} {}", mode.as_str(), mode.label());
                            }
                        }
                        ChatCommand::Login(email) => {
                            authenticate(&auth, &mut rl, &mut renderer, email, AuthAction::Login)
                                .await
                        }
                        ChatCommand::Signup(email) => {
                            authenticate(&auth, &mut rl, &mut renderer, email, AuthAction::Signup)
                                .await
                        }
                        ChatCommand::Logout => {
                            if !confirm(&mut rl, "Logout from BlackBrain? [y/N] ") {
                                renderer.print_info("Still logged in.");
                                continue;
                            }
                            match auth.logout() {
                                Ok(()) => renderer.print_info("Logged out."),
                                Err(err) => renderer
                                    .print_error(&format!("Failed to forget login: {err}")),
                            }
                        }
                        ChatCommand::SaveTranscript(path) => {
                            match session.save_transcript_to(&path) {
                                Ok(_) => {
                                    renderer.print_info(&format!("Transcript saved to {}", path))
                                }
                                Err(err) => renderer
                                    .print_error(&format!("Failed to save transcript: {}", err)),
                            }
                        }
                        ChatCommand::Status => print_status(&session, &tokens),
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                if !tokens.is_authenticated() {
                    renderer.print_error("Log in first: /login <email> or /signup <email>.");
                    continue;
                }

                renderer.print_pending();
                match session.submit(&line).await {
                    SubmitOutcome::Answered => {
                        if let Some(message) = session.messages().last() {
                            renderer.print_message(message);
                        }
                    }
                    SubmitOutcome::Failed(message) => renderer.print_error(&message),
                    SubmitOutcome::Ignored(IgnoreReason::Busy) => {
                        renderer.print_info("Still waiting on the previous question.")
                    }
                    SubmitOutcome::Ignored(IgnoreReason::Empty) => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

async fn authenticate(
    auth: &AuthFlow<BrainClient>,
    rl: &mut DefaultEditor,
    renderer: &mut PlainTextRenderer,
    email: String,
    action: AuthAction,
) {
    let password = match rl.readline("Password: ") {
        Ok(password) => password,
        Err(_) => {
            renderer.print_info("Cancelled.");
            return;
        }
    };
    let credentials = Credentials::new(email, password);
    let result = match action {
        AuthAction::Login => auth.login(&credentials).await,
        AuthAction::Signup => auth.signup(&credentials).await,
    };
    match result {
        Ok(()) => renderer.print_info("Logged in."),
        Err(message) => renderer.print_error(&message),
    }
}

/// Asks a yes/no question; a cancelled prompt is a no.
fn confirm(rl: &mut DefaultEditor, prompt: &str) -> bool {
    match rl.readline(prompt) {
        Ok(answer) => is_confirmation(&answer),
        Err(_) => false,
    }
}

fn load_tokens(path: Option<PathBuf>) -> blackbrain::Result<AuthTokenStore> {
    match path {
        Some(path) => AuthTokenStore::load(FileStore::new(path)),
        None => Ok(AuthTokenStore::new()),
    }
}

fn print_status(session: &ChatSession<BrainClient>, tokens: &AuthTokenStore) {
    let snapshot = session.snapshot();
    let stats = session.stats();
    println!("    Session Status:");
    println!(
        "      Logged in: {}",
        if tokens.is_authenticated() { "yes" } else { "no" }
    );
    println!(
        "      Mode: {} ({})",
        snapshot.mode.as_str(),
        snapshot.mode.label()
    );
    println!("      Messages: {}", stats.message_count);
    println!(
        "      Questions: {} ({} answered, {} failed)",
        stats.total_requests, stats.answered, stats.failed
    );
    match snapshot.last_error {
        Some(ref error) => println!("      Last error: {}", error),
        None => println!("      Last error: (none)"),
    }
}
