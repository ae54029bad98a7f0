//! HTTP client for the Storm on Demand API.

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use storm_core::{
    docs_uri, method_uri, render_breadcrumbs, ApiFault, MethodCatalog, ParamBag, ParamRequirement,
    RequestEnvelope, StormError, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_DOCS_URL,
};
use tracing::debug;

/// Normalize a server URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// The port a request to `url` will effectively use.
fn effective_port(url: &str) -> u16 {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let authority = without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme);

    if let Some((_, port)) = authority.rsplit_once(':') {
        if let Ok(port) = port.parse() {
            return port;
        }
    }

    if url.starts_with("http://") {
        80
    } else {
        443
    }
}

/// Result of storing a request under a caller-chosen key.
#[derive(Debug, Clone)]
pub struct StoredRequest {
    /// The key the result was stored under
    pub key: String,
    /// The data returned by the request
    pub result: Value,
    /// Previous data under the same key, if any was displaced
    pub overwritten: Option<Value>,
}

/// HTTP client for the Storm on Demand REST API.
///
/// The client carries basic-auth credentials, the current API method, and a
/// mutable parameter bag. A request goes out as a JSON POST when parameters
/// are set and as a plain GET otherwise.
///
/// # Retry Logic
///
/// Requests that fail due to connection errors or timeouts are retried with
/// a linearly increasing delay. HTTP-level errors (4xx/5xx) and API faults
/// are not retried.
///
/// # Examples
///
/// ```no_run
/// use stormctl::client::StormClient;
///
/// # async fn example() -> anyhow::Result<()> {
/// let mut client = StormClient::new("api_user", "api_pass", "storm/server/list")?;
/// client.add_param("page_size", "999");
///
/// let listing = client.request().await?;
/// println!("{}", listing["item_count"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StormClient {
    client: Client,
    base_url: String,
    docs_url: String,
    version: String,
    username: String,
    password: String,
    method: String,
    params: ParamBag,
    stored: HashMap<String, Value>,
    max_retries: u32,
    retry_delay: Duration,
}

impl StormClient {
    /// Create a client with default endpoint, version, and timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        method: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_API_VERSION.to_string(),
            username.into(),
            password.into(),
            method.into(),
            30,
            3,
            Duration::from_millis(500),
        )
    }

    /// Create a client with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Base URL of the API (e.g. "https://api.stormondemand.com")
    /// * `version` - API version path segment (e.g. "v1")
    /// * `username` / `password` - Basic-auth credentials
    /// * `method` - Initial API method (e.g. "storm/server/list")
    /// * `timeout_secs` - Request timeout in seconds
    /// * `max_retries` - Maximum number of retry attempts for failed requests
    /// * `retry_delay` - Initial delay between retries (grows linearly)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    #[allow(clippy::too_many_arguments)]
    pub fn with_config(
        api_url: String,
        version: String,
        username: String,
        password: String,
        method: String,
        timeout_secs: u64,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("stormctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: normalize_url(&api_url),
            docs_url: DEFAULT_DOCS_URL.to_string(),
            version,
            username,
            password,
            method: method.trim_matches('/').to_string(),
            params: ParamBag::new(),
            stored: HashMap::new(),
            max_retries,
            retry_delay,
        })
    }

    /// Override the documentation base URL (method catalog).
    pub fn with_docs_url(mut self, docs_url: impl Into<String>) -> Self {
        self.docs_url = normalize_url(&docs_url.into());
        self
    }

    /// The API method requests currently target.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The API version in use.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The full request URI for the current method.
    pub fn uri(&self) -> String {
        method_uri(&self.base_url, &self.version, &self.method)
    }

    /// Set a parameter for the current method, overwriting any prior value.
    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.set(key, value);
    }

    /// Merge a batch of parameters into the current set.
    pub fn bulk_params<I, K, V>(&mut self, params: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.params.merge(params);
    }

    /// Remove a parameter.
    ///
    /// Returns `true` if the parameter was set. Removing the last parameter
    /// flips subsequent requests back to GET.
    pub fn remove_param(&mut self, key: &str) -> bool {
        self.params.remove(key)
    }

    /// The currently set parameters.
    pub fn params(&self) -> &ParamBag {
        &self.params
    }

    /// Remove all parameters.
    pub fn clear_params(&mut self) {
        self.params.clear();
    }

    /// Switch to a new API method.
    ///
    /// Parameters are cleared unless `keep_params` is set, since they
    /// rarely apply across methods.
    pub fn new_method(&mut self, method: impl Into<String>, keep_params: bool) {
        if !keep_params {
            self.clear_params();
        }
        self.method = method.into().trim_matches('/').to_string();
    }

    /// Server, port, method, and parameters currently set, for debugging.
    pub fn debug_info(&self) -> String {
        let mut info = format!("Full URI: {}\n", self.uri());
        info.push_str(&format!("Port: {}\n", effective_port(&self.base_url)));
        info.push_str("Parameters as follows:\n");

        if self.params.is_empty() {
            info.push_str("No Parameters\n");
        } else {
            for (key, value) in self.params.iter() {
                match value {
                    Value::String(s) => info.push_str(&format!("{} => {}\n", key, s)),
                    other => info.push_str(&format!("{} => {}\n", key, other)),
                }
            }
        }

        info.push_str("=== End Params ===\n");
        info
    }

    /// Process an HTTP response and extract the decoded body.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The HTTP status code indicates failure (4xx or 5xx)
    /// - The response body cannot be read or is not JSON
    /// - The body carries an embedded API fault
    async fn handle_response(response: Response, endpoint: &str) -> Result<Value> {
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", endpoint))?;

        if !status.is_success() {
            let error_msg = match status {
                StatusCode::NOT_FOUND => format!("Endpoint {} not found", endpoint),
                StatusCode::BAD_REQUEST => format!("Bad request to {}: {}", endpoint, text),
                StatusCode::UNAUTHORIZED => {
                    format!("Unauthorized: check credentials for {}", endpoint)
                }
                StatusCode::FORBIDDEN => format!("Access forbidden to {}", endpoint),
                StatusCode::INTERNAL_SERVER_ERROR => {
                    format!("Server error at {}: {}", endpoint, text)
                }
                StatusCode::SERVICE_UNAVAILABLE => format!("Service unavailable at {}", endpoint),
                _ => format!("HTTP {} error at {}: {}", status, endpoint, text),
            };
            return Err(anyhow::anyhow!(error_msg));
        }

        let data: Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON response from {}", endpoint))?;

        if let Some(fault) = data.as_object().and_then(ApiFault::from_response) {
            return Err(StormError::from(fault).into());
        }

        Ok(data)
    }

    /// Execute an HTTP request with automatic retry logic.
    ///
    /// Only connection-related failures (connect errors, timeouts) are
    /// retried; the delay grows linearly with each attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if all retry attempts fail.
    async fn execute_with_retry<F, Fut>(&self, endpoint: &str, request_fn: F) -> Result<Value>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<Response, reqwest::Error>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match request_fn().await {
                Ok(response) => {
                    return Self::handle_response(response, endpoint).await;
                }
                Err(e) => {
                    let should_retry = e.is_connect() || e.is_timeout() || e.is_request();
                    last_error = Some(e);

                    if attempt < self.max_retries && should_retry {
                        debug!(endpoint, attempt, "retrying after connection failure");
                        tokio::time::sleep(self.retry_delay * (attempt + 1)).await;
                        continue;
                    } else {
                        break;
                    }
                }
            }
        }

        Err(anyhow::anyhow!(
            "Failed to reach {} after {} attempts: {}",
            endpoint,
            self.max_retries + 1,
            last_error.unwrap()
        ))
    }

    /// Call the current API method and decode the response.
    ///
    /// Sends a JSON POST of the parameter envelope when parameters are set,
    /// a plain GET otherwise. Basic-auth credentials are attached either way.
    pub async fn request(&self) -> Result<Value> {
        let url = self.uri();
        let endpoint = self.method.clone();
        debug!(%url, params = self.params.len(), "dispatching API request");

        if self.params.is_empty() {
            self.execute_with_retry(&endpoint, || {
                self.client
                    .get(&url)
                    .basic_auth(&self.username, Some(&self.password))
                    .send()
            })
            .await
        } else {
            let envelope = RequestEnvelope::new(self.params.clone());
            self.execute_with_retry(&endpoint, || {
                self.client
                    .post(&url)
                    .basic_auth(&self.username, Some(&self.password))
                    .json(&envelope)
                    .send()
            })
            .await
        }
    }

    /// Call the current method and also render the response as breadcrumbs.
    ///
    /// # Returns
    ///
    /// Returns the decoded data together with its display rendering.
    pub async fn request_rendered(&self) -> Result<(Value, String)> {
        let data = self.request().await?;
        let rendered = render_breadcrumbs(&data);
        Ok((data, rendered))
    }

    /// Call the current method and store the result under `key`.
    ///
    /// If the key is already in use, the prior data is displaced and handed
    /// back in [`StoredRequest::overwritten`].
    pub async fn store_request(&mut self, key: impl Into<String>) -> Result<StoredRequest> {
        let key = key.into();
        if key.is_empty() {
            return Err(anyhow::anyhow!("Storage key cannot be empty"));
        }

        let result = self.request().await?;
        let overwritten = self.stored.insert(key.clone(), result.clone());

        Ok(StoredRequest {
            key,
            result,
            overwritten,
        })
    }

    /// A stored result by key.
    pub fn stored(&self, key: &str) -> Option<&Value> {
        self.stored.get(key)
    }

    /// All stored results.
    pub fn stored_all(&self) -> &HashMap<String, Value> {
        &self.stored
    }

    /// The keys currently in use for stored results.
    pub fn stored_keys(&self) -> Vec<&String> {
        self.stored.keys().collect()
    }

    /// Drop a stored result.
    ///
    /// Returns `true` if the key existed.
    pub fn remove_stored(&mut self, key: &str) -> bool {
        self.stored.remove(key).is_some()
    }

    /// Fetch and parse the method catalog for the configured API version.
    ///
    /// The catalog is served from the public documentation endpoint and
    /// needs no credentials.
    pub async fn fetch_catalog(&self) -> Result<MethodCatalog> {
        let url = docs_uri(&self.docs_url, &self.version);
        let endpoint = "docs.json";
        debug!(%url, "fetching method catalog");

        let docs = self
            .execute_with_retry(endpoint, || self.client.get(&url).send())
            .await?;

        MethodCatalog::from_value(docs).map_err(Into::into)
    }

    /// List every available API method, grouped as published.
    pub async fn list_methods(&self) -> Result<Vec<(String, Vec<String>)>> {
        Ok(self.fetch_catalog().await?.method_names())
    }

    /// Parameter requirements for a method (defaults to the current one).
    pub async fn list_method_params(
        &self,
        method: Option<&str>,
    ) -> Result<Vec<(String, ParamRequirement)>> {
        let method = method.unwrap_or(&self.method);
        let catalog = self.fetch_catalog().await?;
        catalog.params_for(method).map_err(Into::into)
    }
}
