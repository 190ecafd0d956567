//! JSON REST implementation of [`RemoteStore`].
//!
//! Talks to any backend exposing the `todos` contract:
//!
//! ```text
//! GET    /todos?userId={owner}
//! POST   /todos            {"userId":..,"title":..,"completed":false}
//! PATCH  /todos/{id}       {"title":..} | {"completed":..}
//! DELETE /todos/{id}
//! ```

use std::time::Duration;

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use todos_proto::task::{NewTask, OwnerId, Task, TaskId, TaskPatch};
use url::Url;

use super::{RemoteStore, StoreError};

/// Default per-request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for the `todos` backend.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: Url,
}

impl HttpStore {
    /// Creates a client for `base_url` with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Url`] if `base_url` does not parse, or
    /// [`StoreError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a client for `base_url` with a custom request timeout.
    ///
    /// # Errors
    ///
    /// See [`HttpStore::new`].
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .user_agent(concat!("todos/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Returns the backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn todos_url(&self) -> Result<Url, StoreError> {
        Ok(self.base_url.join("todos")?)
    }

    fn todo_url(&self, id: TaskId) -> Result<Url, StoreError> {
        Ok(self.base_url.join(&format!("todos/{id}"))?)
    }

    async fn send<B: serde::Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Response, StoreError> {
        tracing::debug!(%method, %url, "remote request");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn patch(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, StoreError> {
        let response = self
            .send(Method::PATCH, self.todo_url(id)?, Some(patch))
            .await?;
        Self::decode(response).await
    }
}

impl RemoteStore for HttpStore {
    async fn fetch_all(&self, owner: OwnerId) -> Result<Vec<Task>, StoreError> {
        let mut url = self.todos_url()?;
        url.query_pairs_mut()
            .append_pair("userId", &owner.to_string());
        let response = self.send(Method::GET, url, None::<&()>).await?;
        Self::decode(response).await
    }

    async fn create(&self, owner: OwnerId, title: &str) -> Result<Task, StoreError> {
        let body = NewTask {
            user_id: owner,
            title: title.to_string(),
            completed: false,
        };
        let response = self
            .send(Method::POST, self.todos_url()?, Some(&body))
            .await?;
        Self::decode(response).await
    }

    async fn update_title(&self, id: TaskId, title: &str) -> Result<Task, StoreError> {
        self.patch(id, &TaskPatch::title(title)).await
    }

    async fn update_status(&self, id: TaskId, completed: bool) -> Result<Task, StoreError> {
        self.patch(id, &TaskPatch::completed(completed)).await
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        self.send(Method::DELETE, self.todo_url(id)?, None::<&()>)
            .await?;
        Ok(())
    }
}
