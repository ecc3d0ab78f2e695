//! Error types for the BlackBrain client.
//!
//! Two families live here.  [`GatewayError`] is the closed taxonomy of failures
//! a remote call can produce; it is built once at the network boundary and
//! consumed by [`crate::ErrorNormalizer`].  [`Error`] covers everything that
//! fails locally: building the HTTP client, parsing URLs, reading and writing
//! persisted state.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

/////////////////////////////////////////// GatewayError ///////////////////////////////////////////

/// The outcome of a remote call that did not succeed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never reached the server or no response came back.
    Network {
        /// Human-readable description of the transport failure.
        message: String,
    },

    /// The server answered with a structured `detail` field.
    Server {
        /// HTTP status code of the response.
        status_code: u16,
        /// The server-provided detail, suitable for display.
        detail: String,
    },

    /// Any failure that matches neither of the above.
    Unknown {
        /// Human-readable description for logs.
        message: String,
    },
}

impl GatewayError {
    /// Creates a new network error.
    pub fn network(message: impl Into<String>) -> Self {
        GatewayError::Network {
            message: message.into(),
        }
    }

    /// Creates a new server error.
    pub fn server(status_code: u16, detail: impl Into<String>) -> Self {
        GatewayError::Server {
            status_code,
            detail: detail.into(),
        }
    }

    /// Creates a new unknown error.
    pub fn unknown(message: impl Into<String>) -> Self {
        GatewayError::Unknown {
            message: message.into(),
        }
    }

    /// Returns true if this is a transport failure.
    pub fn is_network(&self) -> bool {
        matches!(self, GatewayError::Network { .. })
    }

    /// Returns true if the server supplied a detail message.
    pub fn is_server(&self) -> bool {
        matches!(self, GatewayError::Server { .. })
    }

    /// Returns true if the server rejected the credential (HTTP 401).
    ///
    /// The session layer takes no action on this; callers decide whether a
    /// rejected token warrants logging out.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Returns the status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::Server { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Short label used for log fields and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Network { .. } => "network",
            GatewayError::Server { .. } => "server",
            GatewayError::Unknown { .. } => "unknown",
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Network { message } => write!(f, "Network error: {message}"),
            GatewayError::Server {
                status_code,
                detail,
            } => write!(f, "Server error ({status_code}): {detail}"),
            GatewayError::Unknown { message } => write!(f, "Unknown error: {message}"),
        }
    }
}

impl error::Error for GatewayError {}

/////////////////////////////////////////////// Error //////////////////////////////////////////////

/// The main error type for local failures in the BlackBrain client.
#[derive(Clone, Debug)]
pub enum Error {
    /// HTTP client error.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// A URL parsing or manipulation error.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },

    /// I/O error.
    Io {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },

    /// Error during JSON serialization or deserialization.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// A configuration or argument value was rejected.
    Validation {
        /// Human-readable error message.
        message: String,
        /// Parameter that failed validation.
        param: Option<String>,
    },
}

impl Error {
    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Creates a new I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new validation error.
    pub fn validation(message: impl Into<String>, param: Option<String>) -> Self {
        Error::Validation {
            message: message.into(),
            param,
        }
    }

    /// Returns true if this error is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io { .. })
    }

    /// Returns true if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
            Error::Url { message, .. } => {
                write!(f, "URL error: {message}")
            }
            Error::Io { message, .. } => {
                write!(f, "I/O error: {message}")
            }
            Error::Serialization { message, .. } => {
                write!(f, "Serialization error: {message}")
            }
            Error::Validation { message, param } => {
                if let Some(param) = param {
                    write!(f, "Validation error: {message} (parameter: {param})")
                } else {
                    write!(f, "Validation error: {message}")
                }
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::HttpClient { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            Error::Io { source, .. } => Some(source),
            Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Validation { .. } => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

/// A specialized Result type for BlackBrain operations.
pub type Result<T> = std::result::Result<T, Error>;
