//! JSON-over-HTTP implementation of [`RemoteAdapter`].
//!
//! Routes, relative to the configured base URL:
//!
//! | Kind                   | Collection path                 |
//! |------------------------|---------------------------------|
//! | company parameters     | `company-parameters/{kind}`     |
//! | roles                  | `roles`                         |
//! | users                  | `admin/users`                   |
//! | news                   | `news`                          |
//!
//! `GET` lists, `POST` creates, `PATCH {path}/{id}` updates and
//! `DELETE {path}/{id}` removes. Responses may be bare or wrapped in
//! `{ "data": ... }`.

use std::sync::Arc;

use jobboard_core::{EntityKind, ManagedEntity, RecordId};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;
use uuid::Uuid;

use super::{RemoteAdapter, RemoteError};
use crate::config::ApiConfig;

/// Header carrying a per-call correlation id.
const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// HTTP client for the job-board backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Envelope<B> {
    Wrapped { data: B },
    Bare(B),
}

impl<B> Envelope<B> {
    fn into_inner(self) -> B {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| RemoteError::Request(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL all routes are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build the URL for a collection, or for one record when `id` is set.
    fn endpoint(&self, kind: EntityKind, id: Option<&RecordId>) -> Result<Url, RemoteError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| RemoteError::Request("API base URL cannot have a path".to_string()))?;
            segments.pop_if_empty().extend(resource_segments(kind));
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> (RequestBuilder, String) {
        let request_id = Uuid::new_v4().to_string();
        let builder = self
            .inner
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, &request_id);
        (builder, request_id)
    }

    async fn send<B: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        request_id: &str,
    ) -> Result<B, RemoteError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(request_id, status = status.as_u16(), "Backend responded");

        if status.is_success() {
            let body: Envelope<B> = response
                .json()
                .await
                .map_err(|e| RemoteError::Response(format!("Failed to parse response: {e}")))?;
            return Ok(body.into_inner());
        }

        Err(parse_error(response, request_id).await)
    }
}

fn resource_segments(kind: EntityKind) -> Vec<&'static str> {
    match kind {
        EntityKind::Role => vec!["roles"],
        EntityKind::User => vec!["admin", "users"],
        EntityKind::News => vec!["news"],
        parameter => vec!["company-parameters", parameter.as_str()],
    }
}

/// Map a non-success response to a [`RemoteError`].
async fn parse_error(response: Response, request_id: &str) -> RemoteError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });
    warn!(request_id, status = status.as_u16(), %message, "Backend call failed");

    match status {
        StatusCode::NOT_FOUND => RemoteError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            RemoteError::Rejected(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized(message),
        _ => RemoteError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pull a human message out of `{ "message": .. }` or `{ "error": .. }`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .into_iter()
        .find_map(|field| value.get(field)?.as_str().map(str::to_owned))
        .filter(|m| !m.trim().is_empty())
}

impl<T> RemoteAdapter<T> for ApiClient
where
    T: ManagedEntity + DeserializeOwned,
    T::Draft: Serialize,
    T::Patch: Serialize,
{
    #[instrument(skip_all, fields(kind = %kind))]
    async fn list(&self, kind: EntityKind) -> Result<Vec<T>, RemoteError> {
        let url = self.endpoint(kind, None)?;
        let (builder, request_id) = self.request(Method::GET, url);
        self.send(builder, &request_id).await
    }

    #[instrument(skip_all, fields(kind = %kind))]
    async fn create(&self, kind: EntityKind, draft: &T::Draft) -> Result<T, RemoteError> {
        let url = self.endpoint(kind, None)?;
        let (builder, request_id) = self.request(Method::POST, url);
        self.send(builder.json(draft), &request_id).await
    }

    #[instrument(skip_all, fields(kind = %kind, id = %id))]
    async fn update(
        &self,
        kind: EntityKind,
        id: &RecordId,
        patch: &T::Patch,
    ) -> Result<T, RemoteError> {
        let url = self.endpoint(kind, Some(id))?;
        let (builder, request_id) = self.request(Method::PATCH, url);
        self.send(builder.json(patch), &request_id).await
    }

    #[instrument(skip_all, fields(kind = %kind, id = %id))]
    async fn remove(&self, kind: EntityKind, id: &RecordId) -> Result<(), RemoteError> {
        let url = self.endpoint(kind, Some(id))?;
        let (builder, request_id) = self.request(Method::DELETE, url);
        let response = builder.send().await?;
        let status = response.status();
        debug!(request_id, status = status.as_u16(), "Backend responded");

        if status.is_success() {
            return Ok(());
        }
        Err(parse_error(response, &request_id).await)
    }
}
