use crate::config::ClientConfig;
use crate::decorator::{merge_headers, FetchOptions};
use crate::error::{FetchError, Result};
use crate::inspector::inspect;
use crate::response::BufferedResponse;
use crate::token::TokenStore;
use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;
use tracing::{debug, instrument, warn};
use url::Url;

/// GraphQL operation payload.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest<V = Value> {
    pub query: String,
    pub variables: Option<V>,
    pub operation_name: Option<String>,
}

impl GraphQLRequest<Value> {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }
}

impl<V> GraphQLRequest<V> {
    pub fn with_variables<W>(self, variables: W) -> GraphQLRequest<W> {
        GraphQLRequest {
            query: self.query,
            variables: Some(variables),
            operation_name: self.operation_name,
        }
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
}

/// HTTP client that authenticates every request from a token store and turns
/// error envelopes in the response body into [`FetchError::GraphQL`].
#[derive(Debug, Clone)]
pub struct FetchClient<S> {
    http: reqwest::Client,
    store: S,
    config: ClientConfig,
}

impl<S: TokenStore> FetchClient<S> {
    pub fn new(store: S) -> Result<Self> {
        Self::with_config(store, ClientConfig::default())
    }

    pub fn with_config(store: S, config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        Ok(Self::with_http_client(builder.build()?, store, config))
    }

    /// Reuses an existing `reqwest::Client` (connection pool, proxies, TLS).
    pub fn with_http_client(http: reqwest::Client, store: S, config: ClientConfig) -> Self {
        Self {
            http,
            store,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Final headers for `options`, with the token read from the store now.
    pub fn decorate(&self, options: &FetchOptions) -> Result<HeaderMap> {
        let token = self.store.get(&self.config.token_key);
        if token.is_none() {
            debug!(key = %self.config.token_key, policy = ?self.config.missing_token, "no token stored");
        }
        merge_headers(&options.headers, token.as_deref(), self.config.missing_token)
    }

    /// Decorates and sends the request, buffering the response body.
    /// The body is not inspected.
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn send(&self, url: &str, options: FetchOptions) -> Result<BufferedResponse> {
        let url = Url::parse(url)?;
        let headers = self.decorate(&options)?;

        let mut request = self.http.request(options.method, url).headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }
        let resp = request.send().await?;
        debug!(status = %resp.status(), "response received");
        BufferedResponse::from_reqwest(resp).await
    }

    /// Sends the request and fails with the normalized error when the body
    /// carries an error envelope. On success the response body is still
    /// readable by the caller.
    #[instrument(skip(self, options))]
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> Result<BufferedResponse> {
        let response = self.send(url, options).await?;
        if let Some(err) = inspect(&response.bytes())? {
            warn!(status = %response.status(), code = %err.status_code, "request returned errors");
            return Err(FetchError::GraphQL(err));
        }
        Ok(response)
    }

    /// Posts a GraphQL operation and decodes its `data` field.
    pub async fn graphql<V, T>(&self, url: &str, request: &GraphQLRequest<V>) -> Result<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let options = FetchOptions::post().json(request)?;
        let response = self.fetch(url, options).await?;
        let body: GraphQLResponse<T> = response.json()?;
        body.data.ok_or(FetchError::MissingData)
    }
}
