//! Core chat session management.
//!
//! [`ChatSession`] owns the ordered message log and the single-flight request
//! state.  A submit appends the user's message immediately, moves the session
//! to [`RequestState::AwaitingResponse`], awaits the gateway, then records the
//! answer or the failure text.  The query runs on a spawned task that owns a
//! handle to the session, so its result is applied even if the caller stops
//! waiting.  The move back to [`RequestState::Idle`] is also done by a guard's
//! `Drop`, so it happens on every exit path.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::to_writer_pretty;

use crate::client::BrainGateway;
use crate::error::{Error, GatewayError, Result};
use crate::mode::Mode;
use crate::normalize::ErrorNormalizer;
use crate::observability::{
    SESSION_ANSWERS, SESSION_DROPPED_BUSY, SESSION_DROPPED_EMPTY, SESSION_FAILURES,
    SESSION_SUBMITS,
};
use crate::types::BrainAnswer;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing.
    User,
    /// The Brain service.
    Brain,
}

/// One entry of the conversation log.  Identified by its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message.
    pub sender: Sender,
    /// Display text.
    pub text: String,
}

impl Message {
    /// Creates a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Creates a brain message.
    pub fn brain(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Brain,
            text: text.into(),
        }
    }
}

/// Whether a query is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    /// Ready to accept a submit.
    #[default]
    Idle,
    /// A query has been issued and has not resolved.
    AwaitingResponse,
}

/// Why a submit did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The text was empty after trimming.
    Empty,
    /// Another query is still in flight.
    Busy,
}

/// What a call to [`ChatSession::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was appended and no query was sent.
    Ignored(IgnoreReason),
    /// The brain answered and its message was appended.
    Answered,
    /// The query failed; the text is now the session's last error.
    Failed(String),
}

/// A point-in-time copy of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// The conversation log.
    pub messages: Vec<Message>,
    /// Mode applied to the next submit.
    pub mode: Mode,
    /// True while a query is in flight.
    pub pending: bool,
    /// Text of the most recent failure, cleared on the next submit.
    pub last_error: Option<String>,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// The number of messages in the log.
    pub message_count: usize,
    /// Queries issued.
    pub total_requests: u64,
    /// Queries that produced an answer.
    pub answered: u64,
    /// Queries that failed.
    pub failed: u64,
    /// Submits dropped because a query was in flight.
    pub dropped_busy: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    messages: Vec<Message>,
    mode: Mode,
    request: RequestState,
    last_error: Option<String>,
    stats: SessionStats,
}

struct Shared<G: BrainGateway> {
    gateway: G,
    normalizer: ErrorNormalizer,
    state: Mutex<SessionState>,
}

impl<G: BrainGateway> Shared<G> {
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A chat session that manages the conversation log and single-flight queries.
///
/// All methods take `&self`.  State sits behind a mutex that is released
/// before the gateway is awaited, so a second submit while one is in flight
/// sees [`RequestState::AwaitingResponse`] and returns immediately.
///
/// Clones share the same conversation.
pub struct ChatSession<G: BrainGateway> {
    shared: Arc<Shared<G>>,
}

impl<G: BrainGateway> Clone for ChatSession<G> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<G: BrainGateway + 'static> ChatSession<G> {
    /// Creates a new, empty session in [`Mode::Basic`].
    pub fn new(gateway: G) -> Self {
        Self {
            shared: Arc::new(Shared {
                gateway,
                normalizer: ErrorNormalizer::chat(),
                state: Mutex::new(SessionState::default()),
            }),
        }
    }

    /// Sets the starting mode.
    pub fn with_mode(self, mode: Mode) -> Self {
        self.state().mode = mode;
        self
    }

    /// Returns the gateway queries are sent through.
    pub fn gateway(&self) -> &G {
        &self.shared.gateway
    }

    /// Submits user text.
    ///
    /// Ignored when the text is blank or a query is already in flight.
    /// Otherwise the user message is appended verbatim before the gateway is
    /// called with the mode current at this moment.
    ///
    /// The query runs on its own task.  Dropping the returned future does not
    /// cancel it; the answer or failure is still recorded when it arrives.
    /// Must be called from within a tokio runtime.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let inflight = match self.begin(text) {
            Ok(inflight) => inflight,
            Err(reason) => return SubmitOutcome::Ignored(reason),
        };
        match tokio::spawn(inflight.resolve()).await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => {
                tracing::warn!(error = %err, "query task cancelled");
                self.record_failure(self.shared.normalizer.fallback().to_string())
            }
        }
    }

    /// Normalizes `raw` and uses it for the next submit.
    pub fn set_mode(&self, raw: &str) -> Mode {
        let mode = Mode::normalize(raw);
        self.set_mode_to(mode);
        mode
    }

    /// Uses `mode` for the next submit.
    pub fn set_mode_to(&self, mode: Mode) {
        self.state().mode = mode;
    }

    /// Returns the mode applied to the next submit.
    pub fn mode(&self) -> Mode {
        self.state().mode
    }

    /// Returns a copy of the conversation log.
    pub fn messages(&self) -> Vec<Message> {
        self.state().messages.clone()
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.state().messages.len()
    }

    /// Returns the request state.
    pub fn request_state(&self) -> RequestState {
        self.state().request
    }

    /// Returns true while a query is in flight.
    pub fn is_pending(&self) -> bool {
        self.request_state() == RequestState::AwaitingResponse
    }

    /// Returns the text of the most recent failure, if not yet cleared.
    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    /// Returns a consistent copy of everything a front end renders.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot {
            messages: state.messages.clone(),
            mode: state.mode,
            pending: state.request == RequestState::AwaitingResponse,
            last_error: state.last_error.clone(),
        }
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let state = self.state();
        SessionStats {
            message_count: state.messages.len(),
            ..state.stats.clone()
        }
    }

    /// Saves the transcript to the specified path.
    pub fn save_transcript_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let transcript = {
            let state = self.state();
            TranscriptFile::new(state.mode, &state.messages)
        };
        let file = File::create(path.as_ref())
            .map_err(|err| Error::io("failed to create transcript file", err))?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, &transcript).map_err(|err| {
            Error::serialization("failed to serialize transcript", Some(Box::new(err)))
        })
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.shared.state()
    }

    fn begin(&self, text: &str) -> std::result::Result<InFlight<G>, IgnoreReason> {
        if text.trim().is_empty() {
            SESSION_DROPPED_EMPTY.click();
            return Err(IgnoreReason::Empty);
        }
        let mut state = self.state();
        if state.request == RequestState::AwaitingResponse {
            SESSION_DROPPED_BUSY.click();
            state.stats.dropped_busy += 1;
            tracing::debug!("submit dropped while a query is in flight");
            return Err(IgnoreReason::Busy);
        }
        SESSION_SUBMITS.click();
        state.messages.push(Message::user(text));
        state.last_error = None;
        state.request = RequestState::AwaitingResponse;
        state.stats.total_requests += 1;
        Ok(InFlight {
            shared: Arc::clone(&self.shared),
            question: text.to_string(),
            mode: state.mode,
        })
    }

    fn record_failure(&self, message: String) -> SubmitOutcome {
        SESSION_FAILURES.click();
        let mut state = self.state();
        state.last_error = Some(message.clone());
        state.stats.failed += 1;
        SubmitOutcome::Failed(message)
    }
}

/// An issued query.  Dropping it returns the session to idle.
struct InFlight<G: BrainGateway> {
    shared: Arc<Shared<G>>,
    question: String,
    mode: Mode,
}

impl<G: BrainGateway> InFlight<G> {
    async fn resolve(self) -> SubmitOutcome {
        let result = self.shared.gateway.ask(&self.question, self.mode).await;
        self.finish(result)
    }

    fn finish(self, result: std::result::Result<BrainAnswer, GatewayError>) -> SubmitOutcome {
        let mut state = self.shared.state();
        let outcome = match result {
            Ok(answer) => {
                SESSION_ANSWERS.click();
                state.messages.push(Message::brain(answer.render_text()));
                state.stats.answered += 1;
                SubmitOutcome::Answered
            }
            Err(err) => {
                SESSION_FAILURES.click();
                let message = self.shared.normalizer.normalize(&err);
                state.last_error = Some(message.clone());
                state.stats.failed += 1;
                SubmitOutcome::Failed(message)
            }
        };
        state.request = RequestState::Idle;
        outcome
    }
}

impl<G: BrainGateway> Drop for InFlight<G> {
    fn drop(&mut self) {
        self.shared.state().request = RequestState::Idle;
    }
}

#[derive(Serialize, Deserialize)]
struct TranscriptFile {
    version: u8,
    mode: Mode,
    messages: Vec<Message>,
}

impl TranscriptFile {
    fn new(mode: Mode, messages: &[Message]) -> Self {
        Self {
            version: 1,
            mode,
            messages: messages.to_vec(),
        }
    }
}
