use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Request, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::{AuthAction, AuthGateway, AuthTokenStore};
use crate::client_logger::ClientLogger;
use crate::error::{Error, GatewayError, Result};
use crate::mode::Mode;
use crate::observability::{
    BRAIN_NETWORK_ERRORS, BRAIN_REQUEST_DURATION, BRAIN_REQUESTS, BRAIN_SERVER_ERRORS,
    BRAIN_UNKNOWN_ERRORS,
};
use crate::types::{AskRequest, BrainAnswer, Credentials, ErrorBody, TokenResponse};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
const BASE_URL_ENV: &str = "BLACKBRAIN_API_URL";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const ASK_PATH: &str = "brain/ask";

/// Something that can answer a question in a given mode.
///
/// [`BrainClient`] is the HTTP implementation; sessions are generic over this
/// trait so they can be driven by fakes.
#[async_trait::async_trait]
pub trait BrainGateway: Send + Sync {
    /// Asks the Brain a question.
    async fn ask(&self, question: &str, mode: Mode)
    -> std::result::Result<BrainAnswer, GatewayError>;
}

#[async_trait::async_trait]
impl<G: BrainGateway + ?Sized> BrainGateway for Arc<G> {
    async fn ask(
        &self,
        question: &str,
        mode: Mode,
    ) -> std::result::Result<BrainAnswer, GatewayError> {
        (**self).ask(question, mode).await
    }
}

/// Client for the Brain HTTP API.
#[derive(Clone)]
pub struct BrainClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    tokens: Arc<AuthTokenStore>,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl BrainClient {
    /// Create a new Brain client.
    ///
    /// The base URL is read from the BLACKBRAIN_API_URL environment variable,
    /// falling back to the local development server.
    pub fn new(tokens: Arc<AuthTokenStore>) -> Result<Self> {
        Self::with_options(tokens, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        tokens: Arc<AuthTokenStore>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        let base_url = parse_base_url(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            tokens,
            logger: None,
        })
    }

    /// Attach a logger that observes every query.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Returns the base URL all paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the token store consulted before each call.
    pub fn tokens(&self) -> &Arc<AuthTokenStore> {
        &self.tokens
    }

    /// Build the `/brain/ask` request without sending it.
    pub fn ask_request(
        &self,
        question: &str,
        mode: Mode,
    ) -> std::result::Result<Request, GatewayError> {
        self.post_request(ASK_PATH, &AskRequest::new(question, mode))
    }

    /// Build the login or signup request without sending it.
    pub fn auth_request(
        &self,
        action: AuthAction,
        credentials: &Credentials,
    ) -> std::result::Result<Request, GatewayError> {
        self.post_request(action.path(), credentials)
    }

    /// Log in and return the issued token.  Does not touch the token store.
    pub async fn login(
        &self,
        credentials: &Credentials,
    ) -> std::result::Result<TokenResponse, GatewayError> {
        let request = self.auth_request(AuthAction::Login, credentials)?;
        self.execute(request).await
    }

    /// Sign up and return the issued token.  Does not touch the token store.
    pub async fn signup(
        &self,
        credentials: &Credentials,
    ) -> std::result::Result<TokenResponse, GatewayError> {
        let request = self.auth_request(AuthAction::Signup, credentials)?;
        self.execute(request).await
    }

    /// Create headers for a request, attaching the bearer token when present.
    fn default_headers(&self) -> std::result::Result<HeaderMap, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = self.tokens.get() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                GatewayError::unknown("stored token is not a valid header value")
            })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn post_request<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<Request, GatewayError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| GatewayError::unknown(format!("invalid request URL: {e}")))?;
        self.client
            .post(url)
            .headers(self.default_headers()?)
            .json(body)
            .build()
            .map_err(|e| GatewayError::unknown(format!("failed to build request: {e}")))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: Request,
    ) -> std::result::Result<T, GatewayError> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| GatewayError::network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::network(format!("Failed to read response: {}", e)))?;
        serde_json::from_slice(&body)
            .map_err(|e| GatewayError::unknown(format!("Failed to parse response: {}", e)))
    }

    /// Turn a non-success response into a classified error.
    async fn process_error_response(response: Response) -> GatewayError {
        let status_code = response.status().as_u16();
        match response.text().await {
            Ok(body) => classify_error_body(status_code, &body),
            Err(e) => GatewayError::network(format!("Failed to read error response: {}", e)),
        }
    }
}

impl fmt::Debug for BrainClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrainClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("tokens", &self.tokens)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

#[async_trait::async_trait]
impl BrainGateway for BrainClient {
    async fn ask(
        &self,
        question: &str,
        mode: Mode,
    ) -> std::result::Result<BrainAnswer, GatewayError> {
        BRAIN_REQUESTS.click();
        if let Some(logger) = &self.logger {
            logger.log_question(question, mode);
        }
        tracing::debug!(%mode, authenticated = self.tokens.is_authenticated(), "asking brain");

        let start = Instant::now();
        let result = match self.ask_request(question, mode) {
            Ok(request) => self.execute::<BrainAnswer>(request).await,
            Err(err) => Err(err),
        };
        BRAIN_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        match &result {
            Ok(answer) => {
                if let Some(logger) = &self.logger {
                    logger.log_answer(answer);
                }
            }
            Err(err) => {
                match err {
                    GatewayError::Network { .. } => BRAIN_NETWORK_ERRORS.click(),
                    GatewayError::Server { .. } => BRAIN_SERVER_ERRORS.click(),
                    GatewayError::Unknown { .. } => BRAIN_UNKNOWN_ERRORS.click(),
                }
                if let Some(logger) = &self.logger {
                    logger.log_failure(err);
                }
                tracing::warn!(%mode, kind = err.kind(), error = %err, "brain query failed");
            }
        }
        result
    }
}

#[async_trait::async_trait]
impl AuthGateway for BrainClient {
    async fn authenticate(
        &self,
        action: AuthAction,
        credentials: &Credentials,
    ) -> std::result::Result<TokenResponse, GatewayError> {
        match action {
            AuthAction::Login => self.login(credentials).await,
            AuthAction::Signup => self.signup(credentials).await,
        }
    }
}

/// Classify the body of a non-success response.
///
/// A usable `detail` field makes it a server error; anything else is unknown.
pub fn classify_error_body(status_code: u16, body: &str) -> GatewayError {
    match ErrorBody::parse(body).and_then(|body| body.detail_text()) {
        Some(detail) => GatewayError::server(status_code, detail),
        None => GatewayError::unknown(format!("HTTP {status_code} without error detail")),
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::validation(
            format!("base URL must be http or https, got {}", url.scheme()),
            Some("base_url".to_string()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
