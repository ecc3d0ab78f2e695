//! Conversion of gateway failures into the single line shown to a user.

use crate::error::GatewayError;

/// Fallback shown when a chat query fails without a server detail.
pub const CHAT_FALLBACK: &str = "Something went wrong. Try again.";

/// Fallback shown when login or signup fails without a server detail.
pub const AUTH_FALLBACK: &str = "Authentication failed. Try again.";

/// Maps a [`GatewayError`] to user-facing text.
///
/// The fallback belongs to the call site, so each caller holds its own
/// normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorNormalizer {
    fallback: &'static str,
}

impl ErrorNormalizer {
    /// Normalizer for chat queries.
    pub const fn chat() -> Self {
        Self::with_fallback(CHAT_FALLBACK)
    }

    /// Normalizer for the authentication flow.
    pub const fn auth() -> Self {
        Self::with_fallback(AUTH_FALLBACK)
    }

    /// Normalizer with a custom fallback.
    pub const fn with_fallback(fallback: &'static str) -> Self {
        Self { fallback }
    }

    /// Returns the fallback text.
    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    /// Returns the text to display for `err`.
    pub fn normalize(&self, err: &GatewayError) -> String {
        match err {
            GatewayError::Server { detail, .. } => detail.clone(),
            GatewayError::Network { .. } | GatewayError::Unknown { .. } => {
                self.fallback.to_string()
            }
        }
    }
}
