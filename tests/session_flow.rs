//! End-to-end tests driving a session and the auth flow against an in-process
//! fake of the Brain server.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use blackbrain::{
    AUTH_FALLBACK, AuthFlow, AuthTokenStore, BrainAnswer, BrainClient, BrainGateway,
    CHAT_FALLBACK, ChatSession, ClientLogger, Credentials, GatewayError, Message, Mode,
    SubmitOutcome,
};

/// One request as the fake server saw it.
#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    authorization: Option<String>,
    body: Value,
}

/// Serves scripted responses, one per connection, and records requests.
struct FakeBrain {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeBrain {
    async fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        tokio::spawn(async move {
            for (status, reply) in responses {
                let (stream, _) = listener.accept().await.unwrap();
                let mut reader = BufReader::new(stream);

                let mut request_line = String::new();
                reader.read_line(&mut request_line).await.unwrap();
                let path = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or_default()
                    .to_string();

                let mut content_length = 0usize;
                let mut authorization = None;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).await.unwrap();
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    let (name, value) = line.split_once(':').unwrap();
                    let value = value.trim().to_string();
                    match name.to_ascii_lowercase().as_str() {
                        "content-length" => content_length = value.parse().unwrap(),
                        "authorization" => authorization = Some(value),
                        _ => {}
                    }
                }

                let mut raw_body = vec![0u8; content_length];
                reader.read_exact(&mut raw_body).await.unwrap();
                let request_body = serde_json::from_slice(&raw_body).unwrap_or(Value::Null);
                recorded.lock().unwrap().push(Recorded {
                    path,
                    authorization,
                    body: request_body,
                });

                let response = format!(
                    "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
                    reply.len()
                );
                let mut stream = reader.into_inner();
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
        });

        Self { addr, requests }
    }

    fn client(&self, tokens: Arc<AuthTokenStore>) -> BrainClient {
        BrainClient::with_options(
            tokens,
            Some(format!("http://{}", self.addr)),
            Some(Duration::from_secs(5)),
        )
        .unwrap()
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn money_question_with_token() {
    let server = FakeBrain::start(vec![(200, r#"{"response":"Yes, diversify"}"#)]).await;
    let tokens = Arc::new(AuthTokenStore::new());
    tokens.set("tok").unwrap();
    let session = ChatSession::new(server.client(tokens)).with_mode(Mode::Money);

    let outcome = session.submit("Should I invest now?").await;

    assert_eq!(outcome, SubmitOutcome::Answered);
    assert_eq!(
        session.messages(),
        vec![
            Message::user("Should I invest now?"),
            Message::brain("Yes, diversify"),
        ]
    );
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/brain/ask");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer tok"));
    assert_eq!(
        requests[0].body,
        json!({"question": "Should I invest now?", "mode": "money"})
    );
}

#[tokio::test]
async fn no_token_means_no_authorization_header() {
    let server = FakeBrain::start(vec![(200, r#"{"response":{"answer":"ok"}}"#)]).await;
    let session = ChatSession::new(server.client(Arc::new(AuthTokenStore::new())));

    session.submit("hi").await;

    assert_eq!(server.requests()[0].authorization, None);
    assert_eq!(
        session.messages()[1],
        Message::brain("{\n  \"answer\": \"ok\"\n}")
    );
}

#[tokio::test]
async fn server_detail_becomes_last_error() {
    let server = FakeBrain::start(vec![(429, r#"{"detail":"Rate limited"}"#)]).await;
    let session = ChatSession::new(server.client(Arc::new(AuthTokenStore::new())));

    session.submit("hello?").await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.messages, vec![Message::user("hello?")]);
    assert_eq!(snapshot.last_error.as_deref(), Some("Rate limited"));
    assert!(!snapshot.pending);
}

#[tokio::test]
async fn undetailed_failure_uses_fallback_and_session_recovers() {
    let server = FakeBrain::start(vec![
        (502, "<html>Bad Gateway</html>"),
        (200, r#"{"response":"fine now"}"#),
    ])
    .await;
    let session = ChatSession::new(server.client(Arc::new(AuthTokenStore::new())));

    assert_eq!(
        session.submit("first").await,
        SubmitOutcome::Failed(CHAT_FALLBACK.to_string())
    );
    assert_eq!(session.submit("second").await, SubmitOutcome::Answered);
    assert_eq!(session.last_error(), None);
    assert_eq!(
        session.messages(),
        vec![
            Message::user("first"),
            Message::user("second"),
            Message::brain("fine now"),
        ]
    );
}

#[tokio::test]
async fn undecodable_success_is_a_failure() {
    let server = FakeBrain::start(vec![(200, r#"{"question":"where is the answer"}"#)]).await;
    let session = ChatSession::new(server.client(Arc::new(AuthTokenStore::new())));

    assert_eq!(
        session.submit("q").await,
        SubmitOutcome::Failed(CHAT_FALLBACK.to_string())
    );
    assert_eq!(session.message_count(), 1);
}

#[tokio::test]
async fn login_then_ask_carries_new_token() {
    let server = FakeBrain::start(vec![
        (200, r#"{"access_token":"jwt-1","token_type":"bearer"}"#),
        (200, r#"{"response":"hello"}"#),
    ])
    .await;
    let tokens = Arc::new(AuthTokenStore::new());
    let client = server.client(tokens.clone());
    let auth = AuthFlow::new(client.clone(), tokens.clone());
    let session = ChatSession::new(client);

    auth.login(&Credentials::new("me@example.com", "pw"))
        .await
        .unwrap();
    assert_eq!(tokens.get(), Some("jwt-1".to_string()));

    session.submit("hi").await;

    let requests = server.requests();
    assert_eq!(requests[0].path, "/auth/login");
    assert_eq!(
        requests[0].body,
        json!({"email": "me@example.com", "password": "pw"})
    );
    assert_eq!(requests[1].authorization.as_deref(), Some("Bearer jwt-1"));
}

#[tokio::test]
async fn rejected_login_reports_detail() {
    let server = FakeBrain::start(vec![
        (401, r#"{"detail":"Invalid email or password"}"#),
        (400, r#"{"error":"nope"}"#),
    ])
    .await;
    let tokens = Arc::new(AuthTokenStore::new());
    let auth = AuthFlow::new(server.client(tokens.clone()), tokens.clone());
    let credentials = Credentials::new("me@example.com", "wrong");

    assert_eq!(
        auth.login(&credentials).await,
        Err("Invalid email or password".to_string())
    );
    assert_eq!(
        auth.signup(&credentials).await,
        Err(AUTH_FALLBACK.to_string())
    );
    assert!(!tokens.is_authenticated());
    assert_eq!(server.requests()[1].path, "/auth/signup");
}

#[tokio::test]
async fn unauthorized_ask_does_not_log_out() {
    let server = FakeBrain::start(vec![(
        401,
        r#"{"detail":"Could not validate credentials"}"#,
    )])
    .await;
    let tokens = Arc::new(AuthTokenStore::new());
    tokens.set("expired").unwrap();
    let session = ChatSession::new(server.client(tokens.clone()));

    session.submit("hi").await;

    assert_eq!(
        session.last_error().as_deref(),
        Some("Could not validate credentials")
    );
    assert_eq!(tokens.get(), Some("expired".to_string()));
}

/// Keeps every logger callback as a line of text.
#[derive(Default)]
struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl RecordingLogger {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl ClientLogger for RecordingLogger {
    fn log_question(&self, question: &str, mode: Mode) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("question [{mode}] {question}"));
    }

    fn log_answer(&self, answer: &BrainAnswer) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("answer {}", answer.render_text()));
    }

    fn log_failure(&self, error: &GatewayError) {
        self.lines.lock().unwrap().push(format!("failure {error}"));
    }
}

#[tokio::test]
async fn client_logger_sees_questions_answers_and_failures() {
    let server = FakeBrain::start(vec![
        (200, r#"{"response":"Yes, diversify","mode":"money"}"#),
        (429, r#"{"detail":"Rate limited"}"#),
    ])
    .await;
    let logger = Arc::new(RecordingLogger::default());
    let client = server
        .client(Arc::new(AuthTokenStore::new()))
        .with_logger(logger.clone());

    let answer = client
        .ask("Should I invest now?", Mode::Money)
        .await
        .unwrap();
    assert_eq!(answer.mode.as_deref(), Some("money"));
    let err = client.ask("again?", Mode::Study).await.unwrap_err();
    assert_eq!(err, GatewayError::server(429, "Rate limited"));

    assert_eq!(
        logger.lines(),
        vec![
            "question [money] Should I invest now?".to_string(),
            "answer Yes, diversify".to_string(),
            "question [study] again?".to_string(),
            "failure Server error (429): Rate limited".to_string(),
        ]
    );
}
