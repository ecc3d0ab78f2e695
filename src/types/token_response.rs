use serde::{Deserialize, Serialize};

/// Successful payload of `/auth/login` and `/auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// The bearer token for subsequent calls.
    pub access_token: String,

    /// Token scheme; the server always reports "bearer".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}
