//! Remote entity fetcher over REST
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `list`    | `GET {base}{path}` |
//! | `get`     | `GET {base}{path}/{id}` |
//! | `create`  | `POST {base}{path}` |
//! | `update`  | `PUT {base}{path}/{id}` |
//! | `delete`  | `DELETE {base}{path}/{id}` |
//!
//! Every request carries `Authorization: Bearer <token>` when the session
//! holds a token. A `401` clears the token.

use super::mapping::{error_message, unwrap_list, unwrap_record};
use crate::config::{ApiConfig, EndpointConfig};
use crate::core::auth::Session;
use crate::core::entity::Entity;
use crate::core::error::{AuthError, DashboardError, FetchError, Result};
use crate::core::service::EntityService;
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client bound to one backend and one session
///
/// Cheap to clone; every screen's service holds its own clone.
///
/// # Example
///
/// ```rust,ignore
/// let client = ApiClient::new("https://shop.example.com/api", session)?;
/// let orders = HttpEntityService::<Order>::new(client, EndpointConfig::new("/orders"));
/// let all = orders.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT, session)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Session,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn from_config(api: &ApiConfig, session: Session) -> Result<Self> {
        Self::with_timeout(&api.base_url, Duration::from_secs(api.timeout_secs), session)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// URL of one record; the id is percent-encoded as a single path segment
    pub fn record_url(&self, path: &str, id: &str) -> Result<String> {
        let mut url = Url::parse(&self.url(path)).map_err(|e| {
            DashboardError::Internal(format!("invalid endpoint URL {}: {}", self.url(path), e))
        })?;
        url.path_segments_mut()
            .map_err(|_| DashboardError::Internal(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .push(id);
        Ok(url.into())
    }

    /// Send a request to `path` and decode the JSON body (`Value::Null` when empty)
    pub async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        self.send_to(method, self.url(path), body).await
    }

    /// Send a request to one record of `path`
    pub async fn send_record(
        &self,
        method: Method,
        path: &str,
        id: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.send_to(method, self.record_url(path, id)?, body).await
    }

    async fn send_to(&self, method: Method, url: String, body: Option<&Value>) -> Result<Value> {
        let mut request = self.http.request(method.clone(), &url);

        if let Some(auth) = self.session.bearer() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, "sending request");
        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "request failed");
            FetchError::Network {
                url: url.clone(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| FetchError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(%method, %url, status = status.as_u16(), bytes = text.len(), "received response");

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%url, "token rejected, clearing session");
            if let Err(e) = self.session.logout() {
                tracing::warn!(error = %e, "failed to clear session token");
            }
            return Err(AuthError::Unauthorized.into());
        }

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            tracing::warn!(%method, %url, status = status.as_u16(), %message, "backend returned an error");
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            FetchError::Decode {
                entity_type: url,
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// [`EntityService`] backed by one REST endpoint
pub struct HttpEntityService<R> {
    client: ApiClient,
    endpoint: EndpointConfig,
    _marker: PhantomData<fn() -> R>,
}

impl<R> std::fmt::Debug for HttpEntityService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEntityService")
            .field("base_url", &self.client.base_url)
            .field("path", &self.endpoint.path)
            .finish()
    }
}

impl<R> HttpEntityService<R>
where
    R: Entity + DeserializeOwned,
{
    pub fn new(client: ApiClient, endpoint: EndpointConfig) -> Self {
        Self {
            client,
            endpoint,
            _marker: PhantomData,
        }
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    fn decode(&self, value: Value) -> Result<R> {
        serde_json::from_value(self.endpoint.fields.to_local(value)).map_err(|e| {
            FetchError::Decode {
                entity_type: R::resource_name().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl<R> EntityService<R> for HttpEntityService<R>
where
    R: Entity + DeserializeOwned,
{
    async fn list(&self) -> Result<Vec<R>> {
        let body = self.client.send(Method::GET, &self.endpoint.path, None).await?;
        let items = unwrap_list(body, self.endpoint.envelope.as_deref()).ok_or_else(|| {
            FetchError::Decode {
                entity_type: R::resource_name().to_string(),
                message: "response does not contain a list".to_string(),
            }
        })?;

        let records = items
            .into_iter()
            .map(|item| self.decode(item))
            .collect::<Result<Vec<R>>>()?;
        tracing::debug!(entity = R::resource_name(), count = records.len(), "listed records");
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        match self
            .client
            .send_record(Method::GET, &self.endpoint.path, id, None)
            .await {
            Ok(body) => self.decode(unwrap_record(body)).map(Some),
            Err(DashboardError::Fetch(FetchError::Status { status: 404, .. })) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create(&self, payload: Value) -> Result<R> {
        let body = self.endpoint.fields.to_backend(payload);
        let response = self
            .client
            .send(Method::POST, &self.endpoint.path, Some(&body))
            .await?;
        self.decode(unwrap_record(response))
    }

    async fn update(&self, id: &str, payload: Value) -> Result<R> {
        let body = self.endpoint.fields.to_backend(payload);
        let response = self
            .client
            .send_record(Method::PUT, &self.endpoint.path, id, Some(&body))
            .await?;

        match unwrap_record(response) {
            // Some endpoints answer 204; read the record back
            Value::Null => self.get(id).await?.ok_or_else(|| {
                FetchError::NotFound {
                    entity_type: R::resource_name_singular().to_string(),
                    id: id.to_string(),
                }
                .into()
            }),
            record => self.decode(record),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .send_record(Method::DELETE, &self.endpoint.path, id, None)
            .await?;
        Ok(())
    }
}
