//! HTTP implementation of the notification API.

use async_trait::async_trait;
use serde::Deserialize;

use tickethub_core::error::{AppError, ErrorKind};
use tickethub_core::result::AppResult;
use tickethub_core::types::filter::NotificationFilter;
use tickethub_core::types::pagination::{PageRequest, PageResponse};
use tickethub_entity::notification::Notification;

use crate::session::Credential;

use super::api::NotificationApi;

/// Notification API client over the TicketHub REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpNotificationApi {
    client: reqwest::Client,
    api_base: String,
}

/// Wire shape of the list endpoint response.
#[derive(Debug, Deserialize)]
struct ListResponse {
    notifications: Vec<Notification>,
    current_page: u64,
    total_pages: u64,
    has_next_page: bool,
    #[serde(default)]
    total_items: u64,
}

impl HttpNotificationApi {
    /// Create a client against the given API base URL.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    fn network(context: &str, e: reqwest::Error) -> AppError {
        AppError::with_source(ErrorKind::Network, context.to_string(), e)
    }
}

#[async_trait]
impl NotificationApi for HttpNotificationApi {
    async fn list(
        &self,
        credential: &Credential,
        page: PageRequest,
        filter: &NotificationFilter,
    ) -> AppResult<PageResponse<Notification>> {
        let mut query = vec![
            ("page", page.page.to_string()),
            ("page_size", page.page_size.to_string()),
        ];
        query.extend(filter.query_pairs());

        let body: ListResponse = self
            .client
            .get(self.url("/notifications"))
            .bearer_auth(credential.token())
            .query(&query)
            .send()
            .await
            .map_err(|e| Self::network("Notification list request failed", e))?
            .error_for_status()
            .map_err(|e| Self::network("Notification list rejected", e))?
            .json()
            .await
            .map_err(|e| Self::network("Notification list body unreadable", e))?;

        Ok(PageResponse {
            items: body.notifications,
            page: body.current_page,
            page_size: page.page_size,
            total_items: body.total_items,
            total_pages: body.total_pages,
            has_next: body.has_next_page,
            has_previous: body.current_page > 1,
        })
    }

    async fn mark_read(&self, credential: &Credential, id: &str) -> AppResult<()> {
        self.client
            .patch(self.url(&format!("/notifications/{id}/read")))
            .bearer_auth(credential.token())
            .send()
            .await
            .map_err(|e| Self::network("Mark-read request failed", e))?
            .error_for_status()
            .map_err(|e| Self::network("Mark-read rejected", e))?;
        Ok(())
    }

    async fn mark_all_read(&self, credential: &Credential) -> AppResult<()> {
        self.client
            .patch(self.url("/notifications/read-all"))
            .bearer_auth(credential.token())
            .send()
            .await
            .map_err(|e| Self::network("Mark-all-read request failed", e))?
            .error_for_status()
            .map_err(|e| Self::network("Mark-all-read rejected", e))?;
        Ok(())
    }

    async fn delete(&self, credential: &Credential, id: &str) -> AppResult<()> {
        self.client
            .delete(self.url(&format!("/notifications/{id}")))
            .bearer_auth(credential.token())
            .send()
            .await
            .map_err(|e| Self::network("Delete request failed", e))?
            .error_for_status()
            .map_err(|e| Self::network("Delete rejected", e))?;
        Ok(())
    }
}
