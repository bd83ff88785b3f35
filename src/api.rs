use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::redirect::Policy;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Config;
use crate::encoding::{Payload, PartValue};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request cancelled")]
    Cancelled,
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// One call against the backend, independent of the HTTP client used.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Payload,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str, body: Payload) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path, Payload::Empty)
    }

    pub fn post(path: &str, body: Payload) -> Self {
        Self::new(Method::POST, path, body)
    }

    pub fn put(path: &str, body: Payload) -> Self {
        Self::new(Method::PUT, path, body)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path, Payload::Empty)
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Path plus encoded query string, e.g. `/api/update_product?id=3`.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, crate::encoding::url_encode(&self.query))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx, or a redirect the client did not follow.
    pub fn is_accepted(&self) -> bool {
        self.status.is_success() || self.status.is_redirection()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Issue `request`, giving up as soon as `cancel` fires.
    async fn send(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse, ApiError>;
}

/// reqwest-backed transport. Redirects are never followed and the session
/// cookie is kept in `session_file` between runs.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: Url,
    jar: Arc<Jar>,
    session_file: Option<PathBuf>,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("session_file", &self.session_file)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        Self::build(base_url, false, Duration::from_secs(30), None)
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let transport = Self::build(
            cfg.base_url()?,
            cfg.api.accept_invalid_certs,
            Duration::from_secs(cfg.api.timeout_secs),
            Some(cfg.session_file()),
        )?;
        transport.restore_session()?;
        Ok(transport)
    }

    fn build(
        base_url: Url,
        accept_invalid_certs: bool,
        timeout: Duration,
        session_file: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .user_agent("frontrunner/0.1")
            .redirect(Policy::none())
            .cookie_provider(Arc::clone(&jar))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            jar,
            session_file,
        })
    }

    fn restore_session(&self) -> anyhow::Result<()> {
        let Some(path) = &self.session_file else {
            return Ok(());
        };
        let saved = match std::fs::read_to_string(path) {
            Ok(saved) => saved,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        for cookie in saved.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            self.jar.add_cookie_str(cookie, &self.base_url);
        }
        debug!(path = %path.display(), "restored session cookie");
        Ok(())
    }

    async fn persist_session(&self) {
        let Some(path) = &self.session_file else {
            return;
        };
        let result = match self.jar.cookies(&self.base_url) {
            Some(value) => write_private(path, value.as_bytes()).await,
            None => match fs::remove_file(path).await {
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        if let Err(err) = result {
            warn!(?err, path = %path.display(), "failed to persist session cookie");
        }
    }

    pub fn build_request(&self, request: &ApiRequest) -> Result<reqwest::Request, ApiError> {
        let mut url = self.base_url.join(&request.path)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        let builder = self.http.request(request.method.clone(), url);
        let builder = match &request.body {
            Payload::Empty => builder,
            Payload::UrlEncoded(pairs) => builder.form(pairs),
            Payload::Json(value) => builder.json(value),
            Payload::Multipart(parts) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    form = match &part.value {
                        PartValue::Text(text) => form.text(part.name.clone(), text.clone()),
                        PartValue::File {
                            file_name,
                            mime,
                            bytes,
                        } => form.part(
                            part.name.clone(),
                            reqwest::multipart::Part::bytes(bytes.clone())
                                .file_name(file_name.clone())
                                .mime_str(mime)?,
                        ),
                    };
                }
                builder.multipart(form)
            }
        };
        Ok(builder.build()?)
    }

    async fn execute(&self, request: reqwest::Request) -> Result<ApiResponse, ApiError> {
        let res = self.http.execute(request).await?;
        let status = res.status();
        let body = res.bytes().await?;
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

/// Write the session file readable by the owner only.
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        // create with 0600 before any secret lands in it
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .mode(0o600)
            .open(path)
            .await?;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }
    fs::write(path, contents).await
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse, ApiError> {
        let built = self.build_request(&request)?;
        debug!(method = %built.method(), url = %built.url(), "sending request");
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            res = self.execute(built) => res?,
        };
        debug!(status = %response.status, "received response");
        self.persist_session().await;
        Ok(response)
    }
}
