use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// Body of a `/brain/ask` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskRequest {
    /// The user's question, exactly as typed.
    pub question: String,

    /// The persona to answer with.
    pub mode: Mode,
}

impl AskRequest {
    /// Creates a new AskRequest.
    pub fn new(question: impl Into<String>, mode: Mode) -> Self {
        Self {
            question: question.into(),
            mode,
        }
    }
}
