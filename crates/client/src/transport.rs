use std::time::Duration;

use reqwest::{Method, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::{ClientError, Result},
    session::Session,
};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Root of the REST API, e.g. `http://127.0.0.1:8000/api`.
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("finman/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Single point of egress for backend calls.
///
/// Reads the access token from the [`Session`] before every request and
/// attaches it as a bearer credential. It never writes to the session and
/// never retries.
#[derive(Clone, Debug)]
pub struct Transport {
    base_url: String,
    http: reqwest::Client,
    session: Session,
}

impl Transport {
    pub fn new(config: &TransportConfig, session: Session) -> Result<Self> {
        let parsed = Url::parse(&config.base_url)
            .map_err(|err| ClientError::InvalidRequest(format!("invalid base_url: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidRequest(format!(
                "unsupported base_url scheme: {}",
                parsed.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| {
                ClientError::InvalidRequest(format!("failed to build http client: {err}"))
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issues one request and decodes the JSON body of a successful answer.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<T> {
        let res = self.send(method, path, query, body).await?;
        res.json::<T>()
            .await
            .map_err(|err| ClientError::InvalidResponse(format!("{path}: {err}")))
    }

    /// Same as [`Transport::request`] but ignores the response body.
    pub async fn request_unit(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<()> {
        self.send(method, path, query, body).await?;
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = encode(body)?;
        self.request(Method::POST, path, &[], Some(&body)).await
    }

    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let body = encode(body)?;
        self.request_unit(Method::POST, path, &[], Some(&body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = encode(body)?;
        self.request(Method::PATCH, path, &[], Some(&body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.request_unit(Method::DELETE, path, &[], None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Response> {
        let mut req = self.http.request(method.clone(), self.url(path));
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let access = self.session.access().await;
        let authenticated = access.is_some();
        if let Some(token) = access {
            req = req.bearer_auth(token);
        }

        tracing::debug!(%method, path, authenticated, "sending request");
        let res = req.send().await.map_err(ClientError::NetworkUnavailable)?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        tracing::debug!(%method, path, status = status.as_u16(), "request failed");
        let payload = read_payload(res).await?;
        Err(ClientError::from_status(status, payload))
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|err| ClientError::InvalidRequest(format!("failed to encode body: {err}")))
}

/// Reads an error body without interpreting it.
async fn read_payload(res: Response) -> Result<Value> {
    let text = res.text().await.map_err(ClientError::NetworkUnavailable)?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}
