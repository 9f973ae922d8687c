//! REST access to `/api/notifications`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use hirepulse_core::config::ClientConfig;
use hirepulse_core::error::{AppError, ErrorKind};
use hirepulse_core::result::AppResult;
use hirepulse_core::types::{ApiErrorResponse, ApiResponse, NotificationId, PageRequest, PageResponse};
use hirepulse_entity::{Notification, NotificationFilter};

/// Notification REST operations used by the client store.
#[async_trait]
pub trait NotificationApi: Send + Sync + 'static {
    /// `GET /notifications`
    async fn list(
        &self,
        filter: &NotificationFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// `PATCH /notifications/{id}/read`
    async fn mark_read(&self, id: NotificationId) -> AppResult<()>;

    /// `PATCH /notifications/mark-all-read`
    async fn mark_all_read(&self) -> AppResult<u64>;

    /// `DELETE /notifications/{id}`
    async fn delete(&self, id: NotificationId) -> AppResult<()>;
}

#[derive(Deserialize)]
struct Updated {
    updated: u64,
}

/// [`NotificationApi`] over HTTP with a bearer credential.
#[derive(Clone)]
pub struct HttpNotificationApi {
    http: reqwest::Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

impl std::fmt::Debug for HttpNotificationApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpNotificationApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpNotificationApi {
    /// Build a client for `config.base_url` (e.g. `http://host/api`).
    pub fn new(config: &ClientConfig, token: impl Into<String>) -> AppResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| {
            AppError::configuration(format!("Invalid API base url '{base_url}': {e}"))
        })?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
            timeout: Duration::from_secs(config.request_timeout_seconds.max(1)),
        })
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| AppError::configuration(format!("Invalid url '{raw}': {e}")))
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, url: Url) -> AppResult<T> {
        let response = self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transport, "Request failed", e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transport, "Failed to read body", e))?;

        if !status.is_success() {
            return Err(status_error(status, &bytes));
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.data)
    }
}

/// Map a non-success response to the matching error kind.
pub fn status_error(status: StatusCode, body: &[u8]) -> AppError {
    let message = serde_json::from_slice::<ApiErrorResponse>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string());
    let message = if message.is_empty() {
        status.to_string()
    } else {
        message
    };

    match status {
        StatusCode::BAD_REQUEST => AppError::validation(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::authentication(message),
        StatusCode::NOT_FOUND => AppError::not_found(message),
        _ => AppError::external_service(format!("HTTP {status}: {message}")),
    }
}

#[async_trait]
impl NotificationApi for HttpNotificationApi {
    async fn list(
        &self,
        filter: &NotificationFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let mut url = self.endpoint("/notifications")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(kind) = filter.kind {
                pairs.append_pair("type", kind.as_str());
            }
            if let Some(query) = filter.normalized_query() {
                pairs.append_pair("query", &query);
            }
            pairs
                .append_pair("page", &page.page.to_string())
                .append_pair("limit", &page.limit.to_string());
        }
        self.send(Method::GET, url).await
    }

    async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        let url = self.endpoint(&format!("/notifications/{id}/read"))?;
        let _: serde_json::Value = self.send(Method::PATCH, url).await?;
        Ok(())
    }

    async fn mark_all_read(&self) -> AppResult<u64> {
        let url = self.endpoint("/notifications/mark-all-read")?;
        let updated: Updated = self.send(Method::PATCH, url).await?;
        Ok(updated.updated)
    }

    async fn delete(&self, id: NotificationId) -> AppResult<()> {
        let url = self.endpoint(&format!("/notifications/{id}"))?;
        let _: serde_json::Value = self.send(Method::DELETE, url).await?;
        Ok(())
    }
}
