//! # Backend Client
//!
//! Bearer-token REST client. The token issued by `/login` is kept in memory
//! and, when a [`LocalStore`] is attached, persisted under [`TOKEN_KEY`] so
//! the next run starts logged in.

use crate::domain::errors::{BackendError, DEFAULT_SERVER_ERROR};
use crate::domain::types::*;
use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::LocalStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Local storage key for the bearer token.
pub const TOKEN_KEY: &str = "auth_token";
/// Default backend location.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the peer-review REST API.
pub struct BackendClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
    store: Option<Arc<dyn LocalStore>>,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            store: None,
        })
    }

    /// Persist the token in `store`, picking up one saved earlier.
    pub fn with_store(mut self, store: Arc<dyn LocalStore>) -> Result<Self, BackendError> {
        *self.token.get_mut() = store.get(TOKEN_KEY)?;
        self.store = Some(store);
        Ok(self)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, BackendError> {
        let token = self
            .token
            .read()
            .clone()
            .ok_or(BackendError::Unauthenticated)?;
        Ok(self.client.request(method, self.url(path)).bearer_auth(token))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                BackendError::Network(e)
            } else {
                BackendError::Http(e)
            }
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| DEFAULT_SERVER_ERROR.to_string());
        warn!(status = status.as_u16(), %message, "Backend request failed");
        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        self.execute(request)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        self.json(self.authorized(Method::GET, path)?).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        self.json(self.authorized(Method::POST, path)?.json(body))
            .await
    }

    fn store_token(&self, token: Option<String>) -> Result<(), BackendError> {
        if let Some(store) = &self.store {
            match &token {
                Some(t) => store.set(TOKEN_KEY, t)?,
                None => store.remove(TOKEN_KEY)?,
            }
        }
        *self.token.write() = token;
        Ok(())
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// Create an account. Does not log in.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), BackendError> {
        self.execute(self.client.post(self.url("/register")).json(request))
            .await?;
        info!("Account registered");
        Ok(())
    }

    /// Log in and keep the issued token.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        let response: LoginResponse = self
            .json(self.client.post(self.url("/login")).json(request))
            .await?;
        self.store_token(Some(response.token.clone()))?;
        info!("Logged in");
        Ok(response)
    }

    /// Forget the token locally.
    pub fn logout(&self) -> Result<(), BackendError> {
        self.store_token(None)?;
        debug!("Logged out");
        Ok(())
    }

    pub async fn current_user(&self) -> Result<User, BackendError> {
        self.get("/api/user").await
    }

    // =========================================================================
    // REVIEWS
    // =========================================================================

    /// Rate another user (1 to 5 stars).
    pub async fn rate(&self, request: &RatingRequest) -> Result<Review, BackendError> {
        if !(1..=5).contains(&request.rating) {
            return Err(BackendError::InvalidRating(request.rating));
        }
        self.post("/api/rate", request).await
    }

    pub async fn reviews(&self) -> Result<Vec<Review>, BackendError> {
        self.get("/api/reviews").await
    }

    /// The reviews spreadsheet as raw bytes.
    pub async fn export_reviews(&self) -> Result<Vec<u8>, BackendError> {
        let response = self
            .execute(self.authorized(Method::GET, "/api/export-reviews")?)
            .await?;
        let bytes = response.bytes().await?;
        debug!(len = bytes.len(), "Reviews exported");
        Ok(bytes.to_vec())
    }

    // =========================================================================
    // DOCUMENTS
    // =========================================================================

    pub async fn task_docs(&self) -> Result<Vec<TaskDoc>, BackendError> {
        self.get("/api/task-docs").await
    }

    pub async fn create_task_doc(&self, doc: &NewTaskDoc) -> Result<TaskDoc, BackendError> {
        self.post("/api/task-docs", doc).await
    }

    pub async fn meet_reports(&self) -> Result<Vec<MeetReport>, BackendError> {
        self.get("/api/meet-reports").await
    }

    pub async fn create_meet_report(
        &self,
        report: &NewMeetReport,
    ) -> Result<MeetReport, BackendError> {
        self.post("/api/meet-reports", report).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use shared_types::MemoryStore;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One canned HTTP response per accepted connection; requests are
    /// recorded as raw text.
    async fn serve(
        responses: Vec<(u16, &'static str, Vec<u8>)>,
    ) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        tokio::spawn(async move {
            for (status, content_type, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let request = read_request(&mut socket).await;
                log.lock().push(request);
                let head = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                socket.write_all(head.as_bytes()).await.unwrap();
                socket.write_all(&body).await.unwrap();
                socket.shutdown().await.ok();
            }
        });
        (url, seen)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(split) = text.find("\r\n\r\n") {
                let length = text[..split]
                    .lines()
                    .find_map(|l| {
                        l.to_ascii_lowercase()
                            .strip_prefix("content-length:")
                            .and_then(|v| v.trim().parse::<usize>().ok())
                    })
                    .unwrap_or(0);
                if buf.len() >= split + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn json(body: &str) -> Vec<u8> {
        body.as_bytes().to_vec()
    }

    #[tokio::test]
    async fn test_protected_call_requires_token() {
        let client = BackendClient::new("http://127.0.0.1:9").unwrap();
        assert!(matches!(
            client.reviews().await,
            Err(BackendError::Unauthenticated)
        ));
        assert!(client.reviews().await.unwrap_err().needs_login());
    }

    #[tokio::test]
    async fn test_login_stores_token_and_authorizes() {
        let (url, seen) = serve(vec![
            (200, "application/json", json(r#"{"token":"tok-123"}"#)),
            (
                200,
                "application/json",
                json(r#"{"_id":"u1","name":"Ada","email":"ada@example.com"}"#),
            ),
        ])
        .await;
        let store = Arc::new(MemoryStore::new());
        let client = BackendClient::new(url)
            .unwrap()
            .with_store(store.clone())
            .unwrap();

        client
            .login(&LoginRequest {
                email: "ada@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-123"));

        let user = client.current_user().await.unwrap();
        assert_eq!(user.name, "Ada");

        let requests = seen.lock().clone();
        assert!(requests[0].starts_with("POST /login "));
        assert!(requests[1].starts_with("GET /api/user "));
        assert!(requests[1]
            .to_ascii_lowercase()
            .contains("authorization: bearer tok-123"));

        client.logout().unwrap();
        assert!(!client.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_saved_token_is_reused() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "saved").unwrap();
        let client = BackendClient::new("http://127.0.0.1:9")
            .unwrap()
            .with_store(store)
            .unwrap();
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn test_error_message_extraction() {
        let (url, _) = serve(vec![
            (400, "application/json", json(r#"{"message":"User already exists"}"#)),
            (500, "text/html", json("<html>boom</html>")),
        ])
        .await;
        let client = BackendClient::new(url).unwrap();
        let request = RegisterRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "pw".into(),
        };
        match client.register(&request).await {
            Err(BackendError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "User already exists");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            client.register(&request).await.unwrap_err().to_string(),
            DEFAULT_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_rating_range_checked_locally() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "t").unwrap();
        let client = BackendClient::new("http://127.0.0.1:9")
            .unwrap()
            .with_store(store)
            .unwrap();
        let request = RatingRequest {
            reviewee: "u2".into(),
            rating: 6,
            comment: String::new(),
        };
        assert!(matches!(
            client.rate(&request).await,
            Err(BackendError::InvalidRating(6))
        ));
    }

    #[tokio::test]
    async fn test_export_returns_bytes() {
        let sheet = vec![0x50, 0x4b, 0x03, 0x04, 0x00];
        let (url, seen) = serve(vec![(
            200,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            sheet.clone(),
        )])
        .await;
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "t").unwrap();
        let client = BackendClient::new(url).unwrap().with_store(store).unwrap();
        assert_eq!(client.export_reviews().await.unwrap(), sheet);
        assert!(seen.lock()[0].starts_with("GET /api/export-reviews "));
    }

    #[tokio::test]
    async fn test_create_task_doc_posts_json() {
        let (url, seen) = serve(vec![(
            201,
            "application/json",
            json(r#"{"_id":"d1","title":"Sprint","content":"Notes"}"#),
        )])
        .await;
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "t").unwrap();
        let client = BackendClient::new(url).unwrap().with_store(store).unwrap();
        let doc = client
            .create_task_doc(&NewTaskDoc {
                title: "Sprint".into(),
                content: "Notes".into(),
            })
            .await
            .unwrap();
        assert_eq!(doc.id, "d1");
        let request = seen.lock()[0].clone();
        assert!(request.starts_with("POST /api/task-docs "));
        assert!(request.ends_with(r#"{"title":"Sprint","content":"Notes"}"#));
    }
}
