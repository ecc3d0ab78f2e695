use serde::Deserialize;
use serde_json::Value;

/// The error body the server attaches to non-success responses.
///
/// `detail` is usually a string.  Request validation failures instead carry a
/// list of objects, each with a `msg`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// Raw detail value.
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Parses an error body, returning `None` for anything that is not JSON.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Extracts displayable detail text, if the body carries any.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .filter(|msg| !msg.is_empty())
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }
}
