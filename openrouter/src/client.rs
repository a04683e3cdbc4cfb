//! OpenRouter API client struct, builder, and request methods.

use std::fmt;

use openrouter_types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatCompletionStreamChunk, CompletionRequest,
    CompletionResponse, CompletionStreamChunk, CreditsData, DataEnvelope, EndpointData,
    GenerationData, ModelData, OpenRouterError, StreamChunk,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::http_error::{error_from_response, map_reqwest_error};
use crate::sse::DEFAULT_MAX_LINE_BYTES;
use crate::stream::StreamReader;

/// Default OpenRouter API base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
const ENV_BASE_URL: &str = "OPENROUTER_BASE_URL";
const ENV_SITE_URL: &str = "OPENROUTER_SITE_URL";
const ENV_SITE_TITLE: &str = "OPENROUTER_SITE_TITLE";

const APPLICATION_JSON: &str = "application/json";
const EVENT_STREAM: &str = "text/event-stream";

/// Client for the OpenRouter completion, chat completion and metadata APIs.
///
/// # Example
///
/// ```no_run
/// use openrouter::OpenRouter;
///
/// let client = OpenRouter::new("sk-or-...")
///     .site_url("https://example.com")
///     .site_title("Example App");
/// ```
#[derive(Clone)]
pub struct OpenRouter {
    /// API key; sent as a bearer token when non-empty.
    pub(crate) api_key: String,
    /// API base URL (override for testing or proxies).
    pub(crate) base_url: String,
    /// Sent as `HTTP-Referer` for app attribution.
    pub(crate) site_url: Option<String>,
    /// Sent as `X-Title` for app attribution.
    pub(crate) site_title: Option<String>,
    /// Longest SSE line a stream reader accepts.
    pub(crate) max_stream_line_bytes: usize,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl OpenRouter {
    /// Create a new client with the given API key and default settings.
    ///
    /// Default base URL: `https://openrouter.ai/api/v1`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            site_url: None,
            site_title: None,
            max_stream_line_bytes: DEFAULT_MAX_LINE_BYTES,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from `OPENROUTER_API_KEY` and the optional
    /// `OPENROUTER_BASE_URL`, `OPENROUTER_SITE_URL` and `OPENROUTER_SITE_TITLE`.
    pub fn from_env() -> Result<Self, OpenRouterError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, OpenRouterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(ENV_API_KEY)
            .ok_or_else(|| OpenRouterError::Config(format!("{ENV_API_KEY} is not set")))?;
        let mut client = Self::new(api_key);
        if let Some(url) = non_empty(ENV_BASE_URL) {
            client = client.base_url(url);
        }
        if let Some(url) = non_empty(ENV_SITE_URL) {
            client = client.site_url(url);
        }
        if let Some(title) = non_empty(ENV_SITE_TITLE) {
            client = client.site_title(title);
        }
        Ok(client)
    }

    /// Override the API base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Attribute requests to a site, sent as the `HTTP-Referer` header.
    #[must_use]
    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }

    /// Attribute requests to an app name, sent as the `X-Title` header.
    #[must_use]
    pub fn site_title(mut self, title: impl Into<String>) -> Self {
        self.site_title = Some(title.into());
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, connection pool).
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Cap the length of a single line in a streamed response.
    #[must_use]
    pub fn max_stream_line_bytes(mut self, max: usize) -> Self {
        self.max_stream_line_bytes = max;
        self
    }

    /// Send a text completion and wait for the full response.
    ///
    /// Fails with [`OpenRouterError::StreamNotSupported`] if the request has
    /// `stream` enabled; use [`completion_stream`](Self::completion_stream).
    pub async fn completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, OpenRouterError> {
        if request.stream == Some(true) {
            return Err(OpenRouterError::StreamNotSupported);
        }
        let url = self.url("/completions");
        tracing::debug!(url = %url, model = %request.model, "sending completion request");
        self.post_json(&url, &request).await
    }

    /// Send a chat completion and wait for the full response.
    ///
    /// Fails with [`OpenRouterError::StreamNotSupported`] if the request has
    /// `stream` enabled; use [`chat_completion_stream`](Self::chat_completion_stream).
    pub async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenRouterError> {
        if request.stream == Some(true) {
            return Err(OpenRouterError::StreamNotSupported);
        }
        let url = self.url("/chat/completions");
        tracing::debug!(url = %url, model = %request.model, "sending chat completion request");
        self.post_json(&url, &request).await
    }

    /// Start a streaming text completion.
    ///
    /// `stream` is forced on regardless of the request's value. An error
    /// status fails here and no reader is returned.
    pub async fn completion_stream(
        &self,
        mut request: CompletionRequest,
    ) -> Result<StreamReader<CompletionStreamChunk>, OpenRouterError> {
        request.stream = Some(true);
        let url = self.url("/completions");
        tracing::debug!(
            url = %url,
            model = %request.model,
            "sending streaming completion request"
        );
        self.open_stream(&url, &request).await
    }

    /// Start a streaming chat completion.
    ///
    /// `stream` is forced on regardless of the request's value. An error
    /// status fails here and no reader is returned.
    pub async fn chat_completion_stream(
        &self,
        mut request: ChatCompletionRequest,
    ) -> Result<StreamReader<ChatCompletionStreamChunk>, OpenRouterError> {
        request.stream = Some(true);
        let url = self.url("/chat/completions");
        tracing::debug!(
            url = %url,
            model = %request.model,
            "sending streaming chat completion request"
        );
        self.open_stream(&url, &request).await
    }

    /// Account balance.
    pub async fn credits(&self) -> Result<CreditsData, OpenRouterError> {
        self.get_data("/credits", None).await
    }

    /// All models available through OpenRouter.
    pub async fn models(&self) -> Result<Vec<ModelData>, OpenRouterError> {
        self.get_data("/models", None).await
    }

    /// Providers serving one model, e.g. `model_endpoints("openai", "gpt-4o")`.
    pub async fn model_endpoints(
        &self,
        author: &str,
        slug: &str,
    ) -> Result<EndpointData, OpenRouterError> {
        self.get_data(&format!("/models/{author}/{slug}/endpoints"), None).await
    }

    /// Cost and timing of a finished generation, by the `id` of its response.
    pub async fn generation(&self, id: &str) -> Result<GenerationData, OpenRouterError> {
        self.get_data("/generation", Some(("id", id))).await
    }

    /// Build an endpoint URL from the base URL and a `/`-prefixed path.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// Start a request with auth and attribution headers.
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.request(method, url);
        if !self.api_key.is_empty() {
            req = req.header(AUTHORIZATION, format!("Bearer {}", self.api_key));
        }
        if let Some(site_url) = &self.site_url {
            req = req.header("HTTP-Referer", site_url);
        }
        if let Some(site_title) = &self.site_title {
            req = req.header("X-Title", site_title);
        }
        req
    }

    /// Start a POST carrying `body` as JSON.
    fn post<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::RequestBuilder, OpenRouterError> {
        let body = serde_json::to_vec(body).map_err(OpenRouterError::Encode)?;
        Ok(self
            .request(reqwest::Method::POST, url)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .body(body))
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, OpenRouterError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let response = self
            .post(url, body)?
            .header(ACCEPT, APPLICATION_JSON)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_response(response).await
    }

    async fn get_data<R>(
        &self,
        path: &str,
        query: Option<(&str, &str)>,
    ) -> Result<R, OpenRouterError>
    where
        R: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(url = %url, "sending GET request");
        let mut req = self
            .request(reqwest::Method::GET, &url)
            .header(ACCEPT, APPLICATION_JSON);
        if let Some(query) = query {
            req = req.query(&[query]);
        }
        let response = req.send().await.map_err(map_reqwest_error)?;
        let envelope: DataEnvelope<R> = decode_response(response).await?;
        Ok(envelope.data)
    }

    async fn open_stream<B, T>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<StreamReader<T>, OpenRouterError>
    where
        B: Serialize,
        T: StreamChunk,
    {
        let response = self
            .post(url, body)?
            .header(ACCEPT, EVENT_STREAM)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }
        tracing::debug!(url = %url, status = status.as_u16(), kind = T::KIND, "stream opened");
        Ok(StreamReader::from_response(response, self.max_stream_line_bytes))
    }
}

/// Decode a success body, or map an error status.
async fn decode_response<R: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<R, OpenRouterError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(OpenRouterError::Decode)
}

impl fmt::Debug for OpenRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouter")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("site_url", &self.site_url)
            .field("site_title", &self.site_title)
            .field("max_stream_line_bytes", &self.max_stream_line_bytes)
            .finish_non_exhaustive()
    }
}
