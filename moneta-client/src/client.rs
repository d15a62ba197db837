//! The session-aware HTTP client.
//!
//! Every API call funnels through [`ApiClient::send`], an explicit wrapper
//! around the reqwest transport: the auth-header decision happens strictly
//! before dispatch, status classification strictly after the response.
//! Call sites never touch token logic.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::StreamExt;
use moneta_core::{Category, DashboardSummary, Profile, Transaction, TransactionKind,
    TransactionPayload};
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::endpoints;
use crate::error::{ApiError, classify_status, extract_message};
use crate::session::{Session, SessionState, SessionStore};
use crate::types::{CategoryPayload, FilterRequest, LoginRequest, LoginResponse, RegisterRequest};

/// Decide the Authorization header for a request, before it is sent.
///
/// Excluded paths never carry the header, even when a token is stored;
/// everywhere else a real token becomes `Bearer <token>` and anything
/// else (absent, blank, or a persisted `"undefined"`/`"null"` sentinel)
/// means no header rather than a malformed one.
pub fn auth_header(path: &str, stored: Option<&str>) -> Option<String> {
    if endpoints::skip_auth(path) {
        return None;
    }
    let token = stored?.trim();
    if token.is_empty() || token == "undefined" || token == "null" {
        return None;
    }
    Some(format!("Bearer {token}"))
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    sessions: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, sessions: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// One decorated trip through the transport.
    ///
    /// On 401 the session is invalidated as a process-wide side effect
    /// before the error is returned, whichever call site issued the
    /// request. No status is retried automatically, and the original
    /// failure is always what the caller sees.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!(%method, path, "dispatching request");

        let mut request = self
            .http
            .request(method, self.url(path))
            .header(ACCEPT, "application/json");
        if let Some(header) = auth_header(path, self.sessions.token().as_deref()) {
            request = request.header(AUTHORIZATION, header);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::Network)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body_text = response.text().await.unwrap_or_default();
        let error = classify_status(status, extract_message(&body_text, status));
        match &error {
            ApiError::Unauthorized => {
                tracing::warn!(path, "authorization failure, invalidating session");
                self.sessions.invalidate();
            }
            ApiError::Server => {
                tracing::error!(path, %status, "internal server error");
            }
            _ => {}
        }
        Err(error)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        response.json().await.map_err(ApiError::Decode)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        response.json().await.map_err(ApiError::Decode)
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        response.json().await.map_err(ApiError::Decode)
    }

    // --- session lifecycle -------------------------------------------------

    /// Log in, persist the returned token, and populate the session store.
    pub async fn log_in(&self, request: &LoginRequest) -> Result<Session, ApiError> {
        let response: LoginResponse = self.post_json(endpoints::LOGIN, request).await?;
        if let Err(e) = self.sessions.store_token(&response.token) {
            tracing::warn!("could not persist token: {e}");
        }
        let session = Session {
            token: response.token,
            profile: response.profile,
        };
        self.sessions.set(session.clone());
        Ok(session)
    }

    /// Create an account. The server sends an activation email; the new
    /// user logs in separately once activated.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.send(Method::POST, endpoints::REGISTER, Some(request))
            .await?;
        Ok(())
    }

    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.get_json(endpoints::PROFILE).await
    }

    /// Startup session check: decide whether a previously issued token
    /// still maps to a valid session, fetching the profile at most once
    /// per process.
    ///
    /// No token means anonymous without any request. A 401 clears the
    /// token (handled by the send path); any other failure keeps the
    /// token and reports the session as temporarily unavailable.
    pub async fn bootstrap(&self) -> SessionState {
        self.bootstrap_guarded(&AtomicBool::new(false)).await
    }

    /// [`bootstrap`](Self::bootstrap) with an unmount guard: when
    /// `cancelled` is set before the response lands, the fetched profile
    /// is not committed to the store. Concurrent callers share one
    /// in-flight fetch.
    pub async fn bootstrap_guarded(&self, cancelled: &AtomicBool) -> SessionState {
        if let Some(session) = self.sessions.current() {
            return SessionState::Active(session);
        }
        let Some(token) = self.sessions.token() else {
            return SessionState::Anonymous;
        };

        let _gate = self.sessions.bootstrap_gate.lock().await;
        // Another caller may have finished while we waited on the gate.
        if let Some(session) = self.sessions.current() {
            return SessionState::Active(session);
        }

        match self.get_json::<Profile>(endpoints::PROFILE).await {
            Ok(profile) => {
                let session = Session { token, profile };
                if !cancelled.load(Ordering::SeqCst) {
                    self.sessions.set(session.clone());
                }
                SessionState::Active(session)
            }
            Err(ApiError::Unauthorized) => SessionState::Anonymous,
            Err(e) => SessionState::Unavailable(e),
        }
    }

    // --- categories --------------------------------------------------------

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_json(endpoints::CATEGORIES).await
    }

    pub async fn categories_by_type(
        &self,
        kind: TransactionKind,
    ) -> Result<Vec<Category>, ApiError> {
        self.get_json(&endpoints::categories_by_type(kind)).await
    }

    pub async fn add_category(&self, payload: &CategoryPayload) -> Result<Category, ApiError> {
        self.post_json(endpoints::CATEGORIES, payload).await
    }

    pub async fn update_category(
        &self,
        id: i64,
        payload: &CategoryPayload,
    ) -> Result<Category, ApiError> {
        self.put_json(&endpoints::category_by_id(id), payload).await
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        self.send(Method::DELETE, &endpoints::category_by_id(id), None::<&()>)
            .await?;
        Ok(())
    }

    // --- transactions ------------------------------------------------------

    pub async fn transactions(&self, kind: TransactionKind) -> Result<Vec<Transaction>, ApiError> {
        self.get_json(&endpoints::transactions(kind)).await
    }

    pub async fn add_transaction(
        &self,
        kind: TransactionKind,
        payload: &TransactionPayload,
    ) -> Result<Transaction, ApiError> {
        self.post_json(&endpoints::transactions(kind), payload).await
    }

    pub async fn update_transaction(
        &self,
        kind: TransactionKind,
        id: i64,
        payload: &TransactionPayload,
    ) -> Result<Transaction, ApiError> {
        self.put_json(&endpoints::transaction_by_id(kind, id), payload)
            .await
    }

    pub async fn delete_transaction(
        &self,
        kind: TransactionKind,
        id: i64,
    ) -> Result<(), ApiError> {
        self.send(
            Method::DELETE,
            &endpoints::transaction_by_id(kind, id),
            None::<&()>,
        )
        .await?;
        Ok(())
    }

    // --- derived views and exports -----------------------------------------

    pub async fn dashboard(&self) -> Result<DashboardSummary, ApiError> {
        self.get_json(endpoints::DASHBOARD).await
    }

    pub async fn filter(&self, request: &FilterRequest) -> Result<Vec<Transaction>, ApiError> {
        self.post_json(endpoints::FILTER, request).await
    }

    /// Stream the server-generated spreadsheet into `out`; returns the
    /// number of bytes written.
    pub async fn download_excel<W: std::io::Write>(
        &self,
        kind: TransactionKind,
        out: &mut W,
    ) -> Result<u64, ApiError> {
        let response = self
            .send(Method::GET, &endpoints::excel_download(kind), None::<&()>)
            .await?;

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(ApiError::Network)?;
            out.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        Ok(written)
    }

    /// Ask the server to email the spreadsheet to the account address.
    pub async fn email_excel(&self, kind: TransactionKind) -> Result<(), ApiError> {
        self.send(Method::GET, &endpoints::email_excel(kind), None::<&()>)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;

    #[test]
    fn test_auth_header_absent_for_excluded_paths() {
        assert_eq!(auth_header("/login", Some("tok-123")), None);
        assert_eq!(auth_header("/register", Some("tok-123")), None);
        assert_eq!(auth_header("/status", Some("tok-123")), None);
    }

    #[test]
    fn test_auth_header_attached_for_real_token() {
        assert_eq!(
            auth_header("/incomes/", Some("tok-123")),
            Some("Bearer tok-123".to_string())
        );
    }

    #[test]
    fn test_auth_header_never_malformed() {
        assert_eq!(auth_header("/incomes/", None), None);
        assert_eq!(auth_header("/incomes/", Some("undefined")), None);
        assert_eq!(auth_header("/incomes/", Some("null")), None);
        assert_eq!(auth_header("/incomes/", Some("   ")), None);
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let sessions = Arc::new(SessionStore::new(Arc::new(MemoryTokenStore::default())));
        let client = ApiClient::new("http://localhost:8081/api/v1.0/", sessions);
        assert_eq!(client.url("/login"), "http://localhost:8081/api/v1.0/login");
    }

    #[tokio::test]
    async fn test_bootstrap_without_token_is_anonymous_without_a_request() {
        // Unroutable base URL: if bootstrap tried the network this would
        // come back Unavailable, not Anonymous.
        let sessions = Arc::new(SessionStore::new(Arc::new(MemoryTokenStore::default())));
        let client = ApiClient::new("http://127.0.0.1:1", sessions);
        assert!(matches!(client.bootstrap().await, SessionState::Anonymous));
    }

    #[tokio::test]
    async fn test_bootstrap_skips_fetch_when_session_loaded() {
        let sessions = Arc::new(SessionStore::new(Arc::new(MemoryTokenStore::with_token(
            "tok",
        ))));
        sessions.set(Session {
            token: "tok".to_string(),
            profile: Profile {
                full_name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                profile_image_url: None,
            },
        });
        let client = ApiClient::new("http://127.0.0.1:1", sessions);

        match client.bootstrap().await {
            SessionState::Active(session) => assert_eq!(session.profile.full_name, "Ada"),
            other => panic!("expected Active, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_401_from_any_request_clears_token_and_fires_login_side_effect() {
        use std::io::{Read, Write};
        use std::sync::atomic::AtomicUsize;

        // Minimal one-shot HTTP server so the 401 travels the real send
        // path, not a hand-called invalidate().
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let body = r#"{"message":"expired"}"#;
            let response = format!(
                "HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        let sessions = Arc::new(SessionStore::new(Arc::new(MemoryTokenStore::with_token(
            "tok",
        ))));
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        sessions.on_invalidated(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let client = ApiClient::new(format!("http://{addr}"), sessions.clone());

        let err = client
            .transactions(TransactionKind::Income)
            .await
            .unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, ApiError::Unauthorized));
        // The global side effect ran regardless of which endpoint hit it:
        // token reads come back empty and the login hook fired.
        assert_eq!(sessions.token(), None);
        assert!(sessions.current().is_none());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_classifies_as_network_and_keeps_token() {
        let sessions = Arc::new(SessionStore::new(Arc::new(MemoryTokenStore::with_token(
            "tok",
        ))));
        let client = ApiClient::new("http://127.0.0.1:1", sessions.clone());

        match client.bootstrap().await {
            SessionState::Unavailable(e) => assert!(e.is_connectivity()),
            other => panic!("expected Unavailable, got {other:?}"),
        }
        // A non-auth failure must not log the user out.
        assert_eq!(sessions.token(), Some("tok".to_string()));
    }
}
