//! Credential lifecycle.
//!
//! [`AuthTokenStore`] holds the bearer token.  It is constructed once, wrapped
//! in an `Arc`, and handed to the [`crate::BrainClient`] (which reads it before
//! every call) and to the [`AuthFlow`] (the only writer besides logout).

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{GatewayError, Result};
use crate::normalize::ErrorNormalizer;
use crate::observability::{AUTH_FAILURES, AUTH_REQUESTS};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::types::{Credentials, TokenResponse};

/// Storage key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "token";

/////////////////////////////////////////// AuthTokenStore //////////////////////////////////////////

/// Holds at most one live bearer token and mirrors it into a [`KeyValueStore`].
pub struct AuthTokenStore {
    token: RwLock<Option<String>>,
    backend: Box<dyn KeyValueStore>,
}

impl AuthTokenStore {
    /// Creates an empty store that persists nothing beyond the process.
    pub fn new() -> Self {
        Self {
            token: RwLock::new(None),
            backend: Box::new(MemoryStore::new()),
        }
    }

    /// Creates a store seeded from `backend`.
    ///
    /// The token key is read once; an absent or empty value means the client
    /// starts unauthenticated.
    pub fn load(backend: impl KeyValueStore + 'static) -> Result<Self> {
        let token = backend.get(TOKEN_KEY)?.filter(|token| !token.is_empty());
        Ok(Self {
            token: RwLock::new(token),
            backend: Box::new(backend),
        })
    }

    /// Returns the current token, if any.
    pub fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true if a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replaces any prior token.
    ///
    /// The in-memory token is updated even when persisting fails, so a failed
    /// write still leaves the process authenticated.  The write lock is held
    /// across the backend call, so memory and storage change together.
    pub fn set(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        if token.is_empty() {
            return self.clear();
        }
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        let persisted = self.backend.set(TOKEN_KEY, &token);
        *guard = Some(token);
        persisted
    }

    /// Drops the token.  Subsequent reads return `None`.
    pub fn clear(&self) -> Result<()> {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        self.backend.remove(TOKEN_KEY)
    }
}

impl Default for AuthTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AuthTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokenStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

////////////////////////////////////////////// AuthFlow /////////////////////////////////////////////

/// Which authentication endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    /// Existing account.
    Login,
    /// New account.
    Signup,
}

impl AuthAction {
    /// Path of the endpoint, relative to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            AuthAction::Login => "auth/login",
            AuthAction::Signup => "auth/signup",
        }
    }
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthAction::Login => f.write_str("login"),
            AuthAction::Signup => f.write_str("signup"),
        }
    }
}

/// Exchanges credentials for a bearer token.
#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync {
    /// Calls the login or signup endpoint.
    async fn authenticate(
        &self,
        action: AuthAction,
        credentials: &Credentials,
    ) -> std::result::Result<TokenResponse, GatewayError>;
}

#[async_trait::async_trait]
impl<G: AuthGateway + ?Sized> AuthGateway for Arc<G> {
    async fn authenticate(
        &self,
        action: AuthAction,
        credentials: &Credentials,
    ) -> std::result::Result<TokenResponse, GatewayError> {
        (**self).authenticate(action, credentials).await
    }
}

/// Login, signup, and logout against a shared [`AuthTokenStore`].
///
/// Failures come back as display text produced with the authentication
/// fallback; nothing is propagated further.
pub struct AuthFlow<G: AuthGateway> {
    gateway: G,
    tokens: Arc<AuthTokenStore>,
    normalizer: ErrorNormalizer,
}

impl<G: AuthGateway> AuthFlow<G> {
    /// Creates a new flow writing into `tokens`.
    pub fn new(gateway: G, tokens: Arc<AuthTokenStore>) -> Self {
        Self {
            gateway,
            tokens,
            normalizer: ErrorNormalizer::auth(),
        }
    }

    /// Returns the token store this flow writes to.
    pub fn tokens(&self) -> &Arc<AuthTokenStore> {
        &self.tokens
    }

    /// Logs in with existing credentials.
    pub async fn login(&self, credentials: &Credentials) -> std::result::Result<(), String> {
        self.authenticate(AuthAction::Login, credentials).await
    }

    /// Creates an account and logs in.
    pub async fn signup(&self, credentials: &Credentials) -> std::result::Result<(), String> {
        self.authenticate(AuthAction::Signup, credentials).await
    }

    /// Forgets the token.
    pub fn logout(&self) -> Result<()> {
        tracing::info!("logging out");
        self.tokens.clear()
    }

    async fn authenticate(
        &self,
        action: AuthAction,
        credentials: &Credentials,
    ) -> std::result::Result<(), String> {
        AUTH_REQUESTS.click();
        match self.gateway.authenticate(action, credentials).await {
            Ok(response) => {
                if let Err(err) = self.tokens.set(response.access_token) {
                    tracing::warn!(error = %err, "token persisted in memory only");
                }
                tracing::info!(%action, email = %credentials.email, "authenticated");
                Ok(())
            }
            Err(err) => {
                AUTH_FAILURES.click();
                tracing::warn!(%action, kind = err.kind(), error = %err, "authentication failed");
                Err(self.normalizer.normalize(&err))
            }
        }
    }
}
