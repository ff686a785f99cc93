//! HTTP implementation of the pull transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use finboard_core::config::api::ApiConfig;
use finboard_core::config::sync::SyncConfig;
use finboard_core::{AppError, AppResult, ErrorKind};
use finboard_entity::api::{MarkAllReadResponse, Snapshot, UnreadCountResponse};

use crate::token::SessionToken;

use super::transport::PullTransport;

/// REST client for the notification API, authenticated with the shared
/// session token.
#[derive(Debug, Clone)]
pub struct HttpPullClient {
    http: reqwest::Client,
    base_url: String,
    page_size: usize,
    token: SessionToken,
}

impl HttpPullClient {
    /// Build a client from configuration.
    pub fn new(api: &ApiConfig, sync: &SyncConfig, token: SessionToken) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            page_size: sync.page_size,
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Map an HTTP response into the client error taxonomy.
    async fn check(&self, response: reqwest::Response) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AppError::authentication(format!("Notification API rejected session: {status}"))
            }
            StatusCode::NOT_FOUND => {
                AppError::not_found(format!("Notification not found: {body}"))
            }
            _ => AppError::external_service(format!(
                "Notification API error {status}: {body}"
            )),
        })
    }

    fn request_error(e: reqwest::Error) -> AppError {
        // A connect or timeout failure is a transport problem, not an API
        // response; the engine degrades rather than treating it as fatal.
        let kind = if e.is_connect() || e.is_timeout() {
            ErrorKind::Transport
        } else {
            ErrorKind::ExternalService
        };
        AppError::with_source(kind, format!("Notification API request failed: {e}"), e)
    }
}

#[async_trait]
impl PullTransport for HttpPullClient {
    async fn fetch_snapshot(&self) -> AppResult<Snapshot> {
        let response = self
            .http
            .get(self.url("/notifications"))
            .query(&[
                ("page_size", self.page_size.to_string()),
                ("is_read", "false".to_string()),
            ])
            .bearer_auth(self.token.get())
            .send()
            .await
            .map_err(Self::request_error)?;

        self.check(response)
            .await?
            .json::<Snapshot>()
            .await
            .map_err(Self::request_error)
    }

    async fn fetch_unread_count(&self) -> AppResult<u64> {
        let response = self
            .http
            .get(self.url("/notifications/unread-count"))
            .bearer_auth(self.token.get())
            .send()
            .await
            .map_err(Self::request_error)?;

        let body = self
            .check(response)
            .await?
            .json::<UnreadCountResponse>()
            .await
            .map_err(Self::request_error)?;
        Ok(body.count)
    }

    async fn mark_read(&self, id: &str) -> AppResult<()> {
        let response = self
            .http
            .post(self.url(&format!("/notifications/{id}/read")))
            .bearer_auth(self.token.get())
            .send()
            .await
            .map_err(Self::request_error)?;

        self.check(response).await?;
        Ok(())
    }

    async fn mark_all_read(&self) -> AppResult<u64> {
        let response = self
            .http
            .post(self.url("/notifications/mark-all-read"))
            .bearer_auth(self.token.get())
            .send()
            .await
            .map_err(Self::request_error)?;

        let body = self
            .check(response)
            .await?
            .json::<MarkAllReadResponse>()
            .await
            .map_err(Self::request_error)?;
        Ok(body.count)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/notifications/{id}")))
            .bearer_auth(self.token.get())
            .send()
            .await
            .map_err(Self::request_error)?;

        self.check(response).await?;
        Ok(())
    }
}
