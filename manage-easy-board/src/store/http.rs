//! HTTP client for the Manage Easy Cloud Functions.
//!
//! Each store operation is one HTTP function taking a JSON body:
//! `listWorks`, `createWork`, `updateWork`, `deleteWork`.

use super::WorkStore;
use crate::config::StoreConfig;
use crate::error::{BoardError, Result};
use crate::types::{NewWork, WorkFilter, WorkId, WorkItem, WorkPatch};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, instrument};

/// Extract a human-readable message from a JSON error body.
///
/// Tries `error`, then `message`, then falls back to the raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = json.get("error").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = json.get("message").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }
    body.to_string()
}

#[derive(Serialize)]
struct ListRequest<'a> {
    filter: &'a WorkFilter,
}

#[derive(Deserialize)]
struct ListResponse {
    works: Vec<WorkItem>,
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    data: &'a NewWork,
}

#[derive(Deserialize)]
struct CreateResponse {
    id: WorkId,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    id: &'a WorkId,
    data: &'a WorkPatch,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    id: &'a WorkId,
}

/// Work item store backed by the Cloud Functions API
#[derive(Debug, Clone)]
pub struct HttpWorkStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpWorkStore {
    /// Create a client from store configuration
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("manage-easy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// URL of one function
    fn function_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(name))
    }

    /// Map an HTTP response to a `BoardError` based on status code.
    ///
    /// A 404 is only a missing work item when the call addressed one by `id`.
    async fn check_response(
        &self,
        response: reqwest::Response,
        id: Option<&WorkId>,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body);

        match (status_code, id) {
            (401 | 403, _) => Err(BoardError::Unauthorized(message)),
            (404, Some(id)) => {
                debug!(id = %id, reason = %message, "store reports missing work item");
                Err(BoardError::not_found(id.as_str()))
            }
            _ => Err(BoardError::Api {
                status: status_code,
                body: message,
            }),
        }
    }

    /// POST `body` to function `name` and return the checked response
    async fn call<B: Serialize + ?Sized>(
        &self,
        name: &str,
        id: Option<&WorkId>,
        body: &B,
    ) -> Result<reqwest::Response> {
        let mut request = self.client.post(self.function_url(name)).json(body);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        self.check_response(response, id).await
    }

    async fn call_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        name: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.call(name, None, body).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl WorkStore for HttpWorkStore {
    #[instrument(skip(self))]
    async fn list_works(&self, filter: &WorkFilter) -> Result<Vec<WorkItem>> {
        let response: ListResponse = self.call_json("listWorks", &ListRequest { filter }).await?;
        debug!(count = response.works.len(), "listed work items");
        Ok(response.works)
    }

    #[instrument(skip(self, work), fields(title = %work.title))]
    async fn create_work(&self, work: &NewWork) -> Result<WorkItem> {
        work.validate()?;
        let response: CreateResponse = self.call_json("createWork", &CreateRequest { data: work }).await?;
        debug!(id = %response.id, "created work item");
        Ok(WorkItem::from_new(response.id, work, Utc::now()))
    }

    #[instrument(skip(self))]
    async fn update_work(&self, id: &WorkId, patch: &WorkPatch) -> Result<()> {
        self.call("updateWork", Some(id), &UpdateRequest { id, data: patch })
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_work(&self, id: &WorkId) -> Result<()> {
        self.call("deleteWork", Some(id), &DeleteRequest { id }).await?;
        Ok(())
    }
}
