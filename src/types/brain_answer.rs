use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Successful payload of a `/brain/ask` call.
///
/// Only `response` is required; the server also echoes the question and mode
/// and stamps the time it stored the exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrainAnswer {
    /// The answer, in whatever shape the selected mode produces.
    pub response: Value,

    /// The question as the server received it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// The mode tag the server answered with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Server-side timestamp of the exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl BrainAnswer {
    /// Creates an answer carrying only a response payload.
    pub fn new(response: impl Into<Value>) -> Self {
        Self {
            response: response.into(),
            question: None,
            mode: None,
            timestamp: None,
        }
    }

    /// Renders the response payload as display text.
    ///
    /// A JSON string is returned as-is; any other value is pretty-printed
    /// with two-space indentation.
    pub fn render_text(&self) -> String {
        match &self.response {
            Value::String(text) => text.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}
