//! `reqwest` implementation of [`TodoApi`]

use crate::{
    TodoApi,
    config::ApiConfig,
    error::ApiError,
    models::{
        CommonResponse, GetTasksResponse, ItemData, LoginData, LoginRequest, MeResponse, Task,
        TodoList, UpdateTaskRequest,
    },
};
use reqwest::{
    Client, Method, RequestBuilder, Url,
    header::{HeaderMap, HeaderValue},
};
use serde::{
    Serialize,
    de::{DeserializeOwned, IgnoredAny},
};

/// Header carrying the API key
const API_KEY_HEADER: &str = "API-KEY";

/// HTTP client for the todolists API
///
/// Keeps session cookies between calls, so a successful login authenticates
/// every later request made through the same instance (or its clones).
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    config: ApiConfig,
    base: Url,
}

impl HttpTodoApi {
    /// Create a client for `config`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the API key is not a valid header
    /// value, the base URL cannot carry a path, or the TLS backend cannot be
    /// initialised.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Transport(format!("invalid base URL: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "base URL cannot carry a path: {base}"
            )));
        }

        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(api_key)
                .map_err(|e| ApiError::Transport(format!("invalid API key header: {e}")))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            base,
        })
    }

    /// The configuration this client was built with
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// URL of the resource under the base path
    ///
    /// Each segment is percent-encoded on its own, so an id containing `/`,
    /// `?` or `#` stays a single segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, path = url.path(), "Sending API request");
        self.client.request(method, url)
    }

    fn request_with_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> RequestBuilder {
        self.request(method, url).json(body)
    }

    /// Send a request and decode a 2xx JSON body
    async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                body
            };
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a request answered with a `CommonResponse` and decode its `data`
    ///
    /// The result code is checked before `data` is decoded, since rejected
    /// responses usually carry an empty payload.
    async fn execute_envelope<D: DeserializeOwned>(request: RequestBuilder) -> Result<D, ApiError> {
        let response: CommonResponse<Option<serde_json::Value>> = Self::execute(request).await?;
        let data = Self::accept(response)?;
        Ok(serde_json::from_value(data.unwrap_or_default())?)
    }

    /// Unwrap a `CommonResponse`, turning a non-zero result code into an error
    fn accept<D>(response: CommonResponse<D>) -> Result<D, ApiError> {
        if response.is_success() {
            Ok(response.data)
        } else {
            Err(ApiError::Rejected {
                result_code: response.result_code,
                messages: response.messages,
            })
        }
    }
}

impl TodoApi for HttpTodoApi {
    async fn fetch_lists(&self) -> Result<Vec<TodoList>, ApiError> {
        Self::execute(self.request(Method::GET, self.endpoint(&["todo-lists"]))).await
    }

    async fn create_list(&self, title: &str) -> Result<TodoList, ApiError> {
        let body = serde_json::json!({ "title": title });
        let url = self.endpoint(&["todo-lists"]);
        let data: ItemData<TodoList> =
            Self::execute_envelope(self.request_with_body(Method::POST, url, &body)).await?;
        Ok(data.item)
    }

    async fn delete_list(&self, list_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["todo-lists", list_id]);
        let _: IgnoredAny = Self::execute_envelope(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn rename_list(&self, list_id: &str, title: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["todo-lists", list_id]);
        let body = serde_json::json!({ "title": title });
        let _: IgnoredAny =
            Self::execute_envelope(self.request_with_body(Method::PUT, url, &body)).await?;
        Ok(())
    }

    async fn fetch_tasks(&self, list_id: &str) -> Result<Vec<Task>, ApiError> {
        let url = self.endpoint(&["todo-lists", list_id, "tasks"]);
        let response: GetTasksResponse = Self::execute(self.request(Method::GET, url)).await?;

        match response.error {
            Some(error) if !error.is_empty() => Err(ApiError::Rejected {
                result_code: 1,
                messages: vec![error],
            }),
            _ => Ok(response.items),
        }
    }

    async fn create_task(&self, list_id: &str, title: &str) -> Result<Task, ApiError> {
        let url = self.endpoint(&["todo-lists", list_id, "tasks"]);
        let body = serde_json::json!({ "title": title });
        let data: ItemData<Task> =
            Self::execute_envelope(self.request_with_body(Method::POST, url, &body)).await?;
        Ok(data.item)
    }

    async fn delete_task(&self, list_id: &str, task_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["todo-lists", list_id, "tasks", task_id]);
        let _: IgnoredAny = Self::execute_envelope(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn update_task(
        &self,
        list_id: &str,
        task_id: &str,
        patch: &UpdateTaskRequest,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["todo-lists", list_id, "tasks", task_id]);
        let _: IgnoredAny =
            Self::execute_envelope(self.request_with_body(Method::PUT, url, patch)).await?;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<u64, ApiError> {
        let url = self.endpoint(&["auth", "login"]);
        let data: LoginData =
            Self::execute_envelope(self.request_with_body(Method::POST, url, request)).await?;
        Ok(data.user_id)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let _: IgnoredAny =
            Self::execute_envelope(self.request(Method::DELETE, self.endpoint(&["auth", "login"])))
                .await?;
        Ok(())
    }

    async fn me(&self) -> Result<MeResponse, ApiError> {
        Self::execute_envelope(self.request(Method::GET, self.endpoint(&["auth", "me"]))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ApiConfig::new("http://localhost:1").unwrap().with_api_key("k");
        let api = HttpTodoApi::new(&config).unwrap();
        assert_eq!(api.config().api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_invalid_api_key_header() {
        let config = ApiConfig::new("http://localhost:1")
            .unwrap()
            .with_api_key("bad\nkey");
        assert!(matches!(HttpTodoApi::new(&config), Err(ApiError::Transport(_))));
    }

    #[test]
    fn test_endpoint_encodes_each_segment() {
        let config = ApiConfig::new("http://localhost:1/api/1.1").unwrap();
        let api = HttpTodoApi::new(&config).unwrap();

        let url = api.endpoint(&["todo-lists", "a/b?c#d", "tasks"]);
        assert_eq!(url.path(), "/api/1.1/todo-lists/a%2Fb%3Fc%23d/tasks");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let config = ApiConfig::new("http://localhost:1").unwrap();
        let api = HttpTodoApi::new(&config).unwrap();
        assert_eq!(api.endpoint(&["auth", "me"]).as_str(), "http://localhost:1/auth/me");
    }

    #[test]
    fn test_accept_rejects_non_zero_result_code() {
        let response = CommonResponse {
            result_code: 1,
            data: (),
            messages: vec!["nope".to_string()],
            fields_errors: None,
        };
        assert_eq!(
            HttpTodoApi::accept(response),
            Err(ApiError::Rejected {
                result_code: 1,
                messages: vec!["nope".to_string()],
            })
        );
    }
}
