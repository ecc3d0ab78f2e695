// Public modules
pub mod auth;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod mode;
pub mod normalize;
pub mod observability;
pub mod render;
pub mod session;
pub mod storage;
pub mod types;

// Re-exports
pub use auth::{AuthAction, AuthFlow, AuthGateway, AuthTokenStore, TOKEN_KEY};
pub use client::{BrainClient, BrainGateway, classify_error_body};
pub use client_logger::ClientLogger;
pub use error::{Error, GatewayError, Result};
pub use mode::{Mode, UnknownMode};
pub use normalize::{AUTH_FALLBACK, CHAT_FALLBACK, ErrorNormalizer};
pub use observability::register_biometrics;
pub use session::{
    ChatSession, IgnoreReason, Message, RequestState, Sender, SessionSnapshot, SessionStats,
    SubmitOutcome,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::*;
