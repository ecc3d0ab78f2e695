// Public modules
pub mod ask_request;
pub mod brain_answer;
pub mod credentials;
pub mod error_body;
pub mod token_response;

// Re-exports
pub use ask_request::AskRequest;
pub use brain_answer::BrainAnswer;
pub use credentials::Credentials;
pub use error_body::ErrorBody;
pub use token_response::TokenResponse;
