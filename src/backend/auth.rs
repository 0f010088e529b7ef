//! OAuth 2.0 installed-app authorization for the Google Tasks API.
//!
//! Tokens are persisted as JSON next to the config. A cached token is reused
//! while it has more than a minute left, refreshed when it has a refresh
//! token, and otherwise replaced through the interactive loopback flow: a
//! one-shot HTTP listener on `127.0.0.1` receives the consent redirect.

use chrono::Utc;
use log::{debug, info, warn};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};

use super::RemoteError;

pub const OAUTH_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const TASKS_SCOPE: &str = "https://www.googleapis.com/auth/tasks";

/// Seconds of validity a cached token must still have to be reused.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;
const REDIRECT_READ_LIMIT: usize = 16 * 1024;

/// OAuth client identity, either from config or from a downloaded
/// `credentials.json`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    OAUTH_AUTH_URL.to_string()
}

fn default_token_uri() -> String {
    OAUTH_TOKEN_URL.to_string()
}

#[derive(Deserialize)]
struct CredentialsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_uri: default_auth_uri(),
            token_uri: default_token_uri(),
        }
    }

    /// Parse the client secrets JSON downloaded from the Google console.
    pub fn from_json(content: &str) -> Result<Self, RemoteError> {
        let file: CredentialsFile =
            serde_json::from_str(content).map_err(|e| RemoteError::Config(format!("invalid credentials file: {e}")))?;
        file.installed
            .or(file.web)
            .ok_or_else(|| RemoteError::Config("credentials file has no \"installed\" or \"web\" client".to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, RemoteError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RemoteError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

/// Token as persisted on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds) after which the access token is invalid.
    pub expires_at: i64,
}

impl StoredToken {
    pub fn is_fresh_at(&self, now: i64) -> bool {
        self.expires_at > now + TOKEN_EXPIRY_MARGIN_SECS
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now().timestamp())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// JSON file holding the persisted token.
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the token, treating a missing or unreadable file as "no token".
    pub fn load(&self) -> Option<StoredToken> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("Ignoring unreadable token file {}: {e}", self.path.display());
                None
            }
        }
    }

    pub fn save(&self, token: &StoredToken) -> Result<(), RemoteError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RemoteError::Config(format!("cannot create {}: {e}", parent.display())))?;
        }
        let content = serde_json::to_string_pretty(token).map_err(|e| RemoteError::InvalidData(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| RemoteError::Config(format!("cannot write {}: {e}", self.path.display())))
    }

    pub fn remove(&self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!("Failed to remove token file {}: {e}", self.path.display());
            }
        }
    }
}

/// Hands out access tokens and runs the consent flow when needed.
pub struct Authorizer {
    secrets: Option<ClientSecrets>,
    store: TokenStore,
    http: reqwest::Client,
    cached: Mutex<Option<StoredToken>>,
    prompt: Option<mpsc::UnboundedSender<String>>,
    flow_timeout: Duration,
}

impl Authorizer {
    pub fn new(secrets: Option<ClientSecrets>, store: TokenStore, http: reqwest::Client, flow_timeout: Duration) -> Self {
        Self {
            secrets,
            store,
            http,
            cached: Mutex::new(None),
            prompt: None,
            flow_timeout,
        }
    }

    /// Send consent URLs to `prompt` in addition to logging them.
    pub fn with_prompt(mut self, prompt: mpsc::UnboundedSender<String>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Return a usable access token without user interaction.
    ///
    /// Uses the cached or stored token, refreshing it when possible. When
    /// there is none, fails with [`RemoteError::Unauthorized`] instead of
    /// starting the consent flow.
    pub async fn access_token(&self) -> Result<String, RemoteError> {
        let mut cached = self.cached.lock().await;
        self.usable_token(&mut cached).await?.ok_or_else(|| RemoteError::Unauthorized {
            status: 401,
            message: "no valid token, sign-in required".to_string(),
        })
    }

    /// Return a usable access token, running the consent flow if needed.
    pub async fn authorize(&self) -> Result<String, RemoteError> {
        let mut cached = self.cached.lock().await;
        if let Some(access) = self.usable_token(&mut cached).await? {
            return Ok(access);
        }

        let token = self.run_consent_flow().await?;
        let access = token.access_token.clone();
        *cached = Some(token);
        Ok(access)
    }

    async fn usable_token(&self, cached: &mut Option<StoredToken>) -> Result<Option<String>, RemoteError> {
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(Some(token.access_token.clone()));
        }

        let current = cached.take().or_else(|| self.store.load());
        if let Some(token) = current.as_ref().filter(|t| t.is_fresh()) {
            let access = token.access_token.clone();
            *cached = current;
            return Ok(Some(access));
        }

        let Some(refresh_token) = current.as_ref().and_then(|t| t.refresh_token.clone()) else {
            return Ok(None);
        };
        match self.refresh(&refresh_token).await {
            Ok(token) => {
                self.store.save(&token)?;
                let access = token.access_token.clone();
                *cached = Some(token);
                Ok(Some(access))
            }
            Err(e) => {
                warn!("Token refresh failed: {e}");
                // Keep the refresh token around for the next attempt
                *cached = current;
                Ok(None)
            }
        }
    }

    /// Forget every token and always run the consent flow.
    pub async fn force_reauthorize(&self) -> Result<(), RemoteError> {
        let mut cached = self.cached.lock().await;
        *cached = None;
        self.store.remove();

        let token = self.run_consent_flow().await?;
        *cached = Some(token);
        info!("Re-authorization complete");
        Ok(())
    }

    fn secrets(&self) -> Result<&ClientSecrets, RemoteError> {
        self.secrets
            .as_ref()
            .filter(|s| s.is_complete())
            .ok_or_else(|| RemoteError::Config("Google client_id/client_secret or credentials_file required".to_string()))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<StoredToken, RemoteError> {
        let secrets = self.secrets()?;
        debug!("Refreshing access token");
        let resp = self
            .http
            .post(&secrets.token_uri)
            .form(&[
                ("client_id", secrets.client_id.as_str()),
                ("client_secret", secrets.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let token = parse_token_response(resp).await?;
        Ok(StoredToken {
            access_token: token.access_token,
            refresh_token: token.refresh_token.or_else(|| Some(refresh_token.to_string())),
            expires_at: expires_at(token.expires_in),
        })
    }

    async fn run_consent_flow(&self) -> Result<StoredToken, RemoteError> {
        let secrets = self.secrets()?.clone();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| RemoteError::Reauthorization(format!("cannot bind redirect listener: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| RemoteError::Reauthorization(e.to_string()))?;
        let redirect_uri = format!("http://{addr}");
        let state = uuid::Uuid::new_v4().simple().to_string();

        let auth_url = consent_url(&secrets, &redirect_uri, &state)?;
        info!("Authorization required, open: {auth_url}");
        if let Some(prompt) = &self.prompt {
            let _ = prompt.send(auth_url.clone());
        }

        let (mut stream, _) = tokio::time::timeout(self.flow_timeout, listener.accept())
            .await
            .map_err(|_| RemoteError::Reauthorization("timed out waiting for consent".to_string()))?
            .map_err(|e| RemoteError::Reauthorization(e.to_string()))?;

        let outcome = self.handle_redirect(&secrets, &mut stream, &redirect_uri, &state).await;
        let message = match &outcome {
            Ok(_) => "Authorization complete. You can close this window.".to_string(),
            Err(e) => format!("Authorization failed: {e}"),
        };
        if let Err(e) = respond_with_message(&mut stream, &message).await {
            debug!("Failed to answer the redirect request: {e}");
        }

        let token = outcome?;
        self.store.save(&token)?;
        Ok(token)
    }

    async fn handle_redirect(
        &self,
        secrets: &ClientSecrets,
        stream: &mut TcpStream,
        redirect_uri: &str,
        state: &str,
    ) -> Result<StoredToken, RemoteError> {
        let request = read_request_head(stream).await?;
        let params = parse_redirect_params(&request)?;

        if let Some(error) = params.get("error") {
            let desc = params
                .get("error_description")
                .map(|d| format!(" ({d})"))
                .unwrap_or_default();
            return Err(RemoteError::Reauthorization(format!("{error}{desc}")));
        }
        if params.get("state").map(String::as_str) != Some(state) {
            return Err(RemoteError::Reauthorization("invalid OAuth state".to_string()));
        }
        let code = params
            .get("code")
            .ok_or_else(|| RemoteError::Reauthorization("missing authorization code".to_string()))?;

        let resp = self
            .http
            .post(&secrets.token_uri)
            .form(&[
                ("client_id", secrets.client_id.as_str()),
                ("client_secret", secrets.client_secret.as_str()),
                ("code", code.as_str()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let token = parse_token_response(resp).await?;
        Ok(StoredToken {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: expires_at(token.expires_in),
        })
    }
}

fn expires_at(expires_in: u64) -> i64 {
    Utc::now().timestamp() + i64::try_from(expires_in).unwrap_or(i64::MAX / 2)
}

fn consent_url(secrets: &ClientSecrets, redirect_uri: &str, state: &str) -> Result<String, RemoteError> {
    Url::parse_with_params(
        &secrets.auth_uri,
        [
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", TASKS_SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ],
    )
    .map(|url| url.to_string())
    .map_err(|e| RemoteError::Config(format!("invalid auth_uri: {e}")))
}

async fn parse_token_response(resp: reqwest::Response) -> Result<TokenResponse, RemoteError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(RemoteError::Reauthorization(format_oauth_error(status.as_u16(), &body)));
    }
    resp.json().await.map_err(|e| RemoteError::InvalidData(e.to_string()))
}

async fn read_request_head(stream: &mut TcpStream) -> Result<String, RemoteError> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream
            .read(&mut chunk)
            .await
            .map_err(|e| RemoteError::Reauthorization(e.to_string()))?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.len() >= REDIRECT_READ_LIMIT {
            break;
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

async fn respond_with_message(stream: &mut TcpStream, message: &str) -> std::io::Result<()> {
    let body = format!("{message}\n");
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Extract the query parameters of the redirect request line
/// (`GET /?code=...&state=... HTTP/1.1`).
pub(crate) fn parse_redirect_params(request: &str) -> Result<HashMap<String, String>, RemoteError> {
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .ok_or_else(|| RemoteError::Reauthorization("malformed redirect request".to_string()))?;
    let url = Url::parse("http://127.0.0.1")
        .and_then(|base| base.join(path))
        .map_err(|e| RemoteError::Reauthorization(format!("malformed redirect path: {e}")))?;
    Ok(url.query_pairs().into_owned().collect())
}

pub(crate) fn format_oauth_error(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {status}");
    }

    let summary = match serde_json::from_str::<TokenErrorResponse>(trimmed) {
        Ok(TokenErrorResponse {
            error,
            error_description: Some(desc),
        }) => format!("{desc} ({error})"),
        Ok(err) => err.error,
        Err(_) => truncate_error(trimmed),
    };
    format!("HTTP {status}: {summary}")
}

pub(crate) fn truncate_error(message: &str) -> String {
    let mut out = message.replace(['\n', '\r'], " ");
    if out.chars().count() > 240 {
        out = out.chars().take(240).collect();
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_secrets_from_installed_json() {
        let json = r#"{"installed":{"client_id":"abc.apps.googleusercontent.com","client_secret":"s3cret","redirect_uris":["http://localhost"]}}"#;
        let secrets = ClientSecrets::from_json(json).unwrap();
        assert_eq!(secrets.client_id, "abc.apps.googleusercontent.com");
        assert_eq!(secrets.client_secret, "s3cret");
        assert_eq!(secrets.token_uri, OAUTH_TOKEN_URL);
    }

    #[test]
    fn test_client_secrets_without_client_section() {
        let err = ClientSecrets::from_json(r#"{"other":{}}"#).unwrap_err();
        assert!(matches!(err, RemoteError::Config(_)));
    }

    #[test]
    fn test_token_freshness_margin() {
        let token = StoredToken {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: 1_000,
        };
        assert!(token.is_fresh_at(900));
        assert!(!token.is_fresh_at(940));
        assert!(!token.is_fresh_at(2_000));
    }

    #[test]
    fn test_parse_redirect_params_decodes_query() {
        let request = "GET /?state=xyz&code=4%2F0Ab-c&scope=a+b HTTP/1.1\r\nHost: 127.0.0.1\r\n\r\n";
        let params = parse_redirect_params(request).unwrap();
        assert_eq!(params.get("state").map(String::as_str), Some("xyz"));
        assert_eq!(params.get("code").map(String::as_str), Some("4/0Ab-c"));
        assert_eq!(params.get("scope").map(String::as_str), Some("a b"));
    }

    #[test]
    fn test_parse_redirect_params_rejects_empty_request() {
        assert!(parse_redirect_params("").is_err());
    }

    #[test]
    fn test_format_oauth_error_prefers_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Token has been expired or revoked."}"#;
        assert_eq!(
            format_oauth_error(400, body),
            "HTTP 400: Token has been expired or revoked. (invalid_grant)"
        );
        assert_eq!(format_oauth_error(500, "  "), "HTTP 500");
    }

    #[test]
    fn test_consent_url_carries_scope_and_state() {
        let secrets = ClientSecrets::new("id", "secret");
        let url = consent_url(&secrets, "http://127.0.0.1:5000", "st4te").unwrap();
        assert!(url.starts_with(OAUTH_AUTH_URL));
        assert!(url.contains("state=st4te"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Ftasks"));
    }

    #[tokio::test]
    async fn test_access_token_without_token_never_prompts() {
        let path = std::env::temp_dir().join(format!("taskboard-token-{}.json", uuid::Uuid::new_v4()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let auth = Authorizer::new(
            None,
            TokenStore::new(&path),
            reqwest::Client::new(),
            Duration::from_secs(300),
        )
        .with_prompt(tx);

        let err = tokio::time::timeout(Duration::from_secs(5), auth.access_token())
            .await
            .expect("access_token must not wait for a browser")
            .unwrap_err();

        assert!(err.is_authorization());
        assert!(rx.try_recv().is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_access_token_uses_stored_token() {
        let path = std::env::temp_dir().join(format!("taskboard-token-{}.json", uuid::Uuid::new_v4()));
        let store = TokenStore::new(&path);
        store
            .save(&StoredToken {
                access_token: "stored".to_string(),
                refresh_token: None,
                expires_at: Utc::now().timestamp() + 3_600,
            })
            .unwrap();
        let auth = Authorizer::new(None, store.clone(), reqwest::Client::new(), Duration::from_secs(300));

        assert_eq!(auth.access_token().await.unwrap(), "stored");
        store.remove();
    }

    #[test]
    fn test_token_store_round_trip_and_remove() {
        let path = std::env::temp_dir().join(format!("taskboard-token-{}.json", uuid::Uuid::new_v4()));
        let store = TokenStore::new(&path);
        assert!(store.load().is_none());

        let token = StoredToken {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: 42,
        };
        store.save(&token).unwrap();
        assert_eq!(store.load(), Some(token));

        store.remove();
        assert!(store.load().is_none());
    }
}
