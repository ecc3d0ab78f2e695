//! Logging hook for Brain client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! every query passing through the [`crate::BrainClient`] and how it resolved.

use crate::error::GatewayError;
use crate::mode::Mode;
use crate::types::BrainAnswer;

/// A trait for logging Brain client operations.
///
/// # Example
///
/// ```rust,ignore
/// use blackbrain::{BrainAnswer, ClientLogger, GatewayError, Mode};
/// use std::sync::Mutex;
///
/// struct Transcript {
///     lines: Mutex<Vec<String>>,
/// }
///
/// impl ClientLogger for Transcript {
///     fn log_question(&self, question: &str, mode: Mode) {
///         self.lines.lock().unwrap().push(format!("[{mode}] {question}"));
///     }
///
///     fn log_answer(&self, answer: &BrainAnswer) {
///         self.lines.lock().unwrap().push(answer.render_text());
///     }
///
///     fn log_failure(&self, error: &GatewayError) {
///         self.lines.lock().unwrap().push(error.to_string());
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Called once before a query is sent.
    fn log_question(&self, question: &str, mode: Mode);

    /// Called with every successfully decoded answer.
    fn log_answer(&self, answer: &BrainAnswer);

    /// Called with every classified failure.
    fn log_failure(&self, error: &GatewayError);
}
