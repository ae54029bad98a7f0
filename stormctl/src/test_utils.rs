//! Test utilities for CLI testing
//!
//! Provides a mock Storm API server and helpers for exercising the client
//! without touching the real service.

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{Path as AxumPath, State},
    http::{HeaderMap, Method, StatusCode},
    response::Json,
    routing::any,
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// One request as seen by the mock server
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// API method path, e.g. "storm/server/list"
    pub method: String,
    /// HTTP verb used
    pub http_method: String,
    /// Raw Authorization header, if any
    pub authorization: Option<String>,
    /// Decoded JSON body, if any
    pub body: Option<Value>,
}

/// Mock server state
#[derive(Debug, Clone)]
pub struct MockServerState {
    /// Canned responses by API method path
    pub responses: Arc<Mutex<HashMap<String, Value>>>,
    /// Canned docs.json catalog
    pub docs: Arc<Mutex<Value>>,
    /// Every request the server has seen
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl Default for MockServerState {
    fn default() -> Self {
        let mut responses = HashMap::new();

        responses.insert(
            "storm/server/list".to_string(),
            json!({
                "items": [
                    {"domain": "web01.example.com", "uniq_id": "2UF3GG"},
                    {"domain": "db01.example.com", "uniq_id": "8KT2ZN"},
                ],
                "item_count": 2,
                "item_total": 2,
                "page_num": 1,
                "page_size": 25,
                "page_total": 1,
            }),
        );
        responses.insert(
            "account/details".to_string(),
            json!({"accnt": 123456, "active": 1}),
        );
        responses.insert(
            "storm/server/reboot".to_string(),
            json!({
                "error_class": "LW::Exception::RecordNotFound",
                "full_message": "Record 'server' not found",
            }),
        );

        let docs = json!({
            "Storm/Server": {
                "__methods": {
                    "list": {
                        "__input": {
                            "page_num": {"optional": 1},
                            "page_size": {"optional": 1},
                        }
                    },
                    "create": {
                        "__input": {
                            "domain": {},
                            "image_id": {"required_if": {"backup_id": null}},
                        }
                    },
                }
            },
            "Account": {
                "__methods": {
                    "details": {"__input": {}}
                }
            }
        });

        Self {
            responses: Arc::new(Mutex::new(responses)),
            docs: Arc::new(Mutex::new(docs)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock Storm API server
#[derive(Debug)]
pub struct MockServer {
    state: MockServerState,
    port: u16,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    /// Create a new mock server
    pub fn new() -> Self {
        Self {
            state: MockServerState::default(),
            port: 0, // Will be assigned when server starts
        }
    }

    /// Start the mock server and return the address
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        // Give the server a moment to start and verify it's running
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
        }

        Ok((self, server_url))
    }

    /// Get the server port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the server state
    pub fn state(&self) -> &MockServerState {
        &self.state
    }

    /// Requests captured so far
    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Create the mock server router.
    ///
    /// A single wildcard route mirrors the real URL scheme,
    /// `/{version}/{method}.json`, with `docs.json` doubling as the catalog
    /// endpoint.
    fn create_router(&self) -> Router {
        Router::new()
            .route("/:version/*method", any(api_handler))
            .with_state(self.state.clone())
    }
}

async fn api_handler(
    AxumPath((_version, method)): AxumPath<(String, String)>,
    State(state): State<MockServerState>,
    http_method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    let method = method
        .strip_suffix(".json")
        .unwrap_or(method.as_str())
        .trim_matches('/')
        .to_string();

    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let decoded_body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };

    state.requests.lock().unwrap().push(CapturedRequest {
        method: method.clone(),
        http_method: http_method.to_string(),
        authorization,
        body: decoded_body,
    });

    if method == "docs" {
        return Ok(Json(state.docs.lock().unwrap().clone()));
    }

    let responses = state.responses.lock().unwrap();
    match responses.get(&method) {
        Some(response) => Ok(Json(response.clone())),
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StormClient;

    /// Basic-auth header for "api_user" / "api_pass"
    pub const EXPECTED_AUTH: &str = "Basic YXBpX3VzZXI6YXBpX3Bhc3M=";

    fn mock_client(server_url: &str, method: &str) -> StormClient {
        StormClient::with_config(
            server_url.to_string(),
            "v1".to_string(),
            "api_user".to_string(),
            "api_pass".to_string(),
            method.to_string(),
            5,
            0,
            Duration::from_millis(10),
        )
        .unwrap()
        .with_docs_url(server_url)
    }

    #[tokio::test]
    async fn test_request_without_params_is_get() {
        let (server, url) = MockServer::new().start().await.unwrap();
        let client = mock_client(&url, "storm/server/list");

        let data = client.request().await.unwrap();
        assert_eq!(data["item_count"], 2);

        let captured = server.captured();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].http_method, "GET");
        assert_eq!(captured[0].method, "storm/server/list");
        assert!(captured[0].body.is_none());
    }

    #[tokio::test]
    async fn test_request_with_params_is_post_with_envelope() {
        let (server, url) = MockServer::new().start().await.unwrap();
        let mut client = mock_client(&url, "storm/server/list");
        client.add_param("page_size", "999");

        client.request().await.unwrap();

        let captured = server.captured();
        assert_eq!(captured[0].http_method, "POST");
        assert_eq!(
            captured[0].body,
            Some(json!({"params": {"page_size": "999"}}))
        );
    }

    #[tokio::test]
    async fn test_basic_auth_attached() {
        let (server, url) = MockServer::new().start().await.unwrap();
        let client = mock_client(&url, "account/details");

        client.request().await.unwrap();

        let captured = server.captured();
        assert_eq!(captured[0].authorization.as_deref(), Some(EXPECTED_AUTH));
    }

    #[tokio::test]
    async fn test_api_fault_surfaces_as_error() {
        let (_server, url) = MockServer::new().start().await.unwrap();
        let client = mock_client(&url, "storm/server/reboot");

        let err = client.request().await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("LW::Exception::RecordNotFound"));
        assert!(message.contains("Record 'server' not found"));
    }

    #[tokio::test]
    async fn test_unknown_method_is_http_error() {
        let (_server, url) = MockServer::new().start().await.unwrap();
        let client = mock_client(&url, "storm/server/bogus");

        assert!(client.request().await.is_err());
    }

    #[tokio::test]
    async fn test_catalog_fetch_and_parse() {
        let (_server, url) = MockServer::new().start().await.unwrap();
        let client = mock_client(&url, "storm/server/list");

        let methods = client.list_methods().await.unwrap();
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].0, "Storm/Server");
        assert_eq!(methods[0].1, ["list", "create"]);

        let params = client.list_method_params(None).await.unwrap();
        assert_eq!(params.len(), 2);
    }

    #[tokio::test]
    async fn test_store_request_reports_overwrite() {
        let (_server, url) = MockServer::new().start().await.unwrap();
        let mut client = mock_client(&url, "storm/server/list");

        let first = client.store_request("servers").await.unwrap();
        assert!(first.overwritten.is_none());
        assert_eq!(first.result["item_count"], 2);

        let second = client.store_request("servers").await.unwrap();
        assert_eq!(second.overwritten, Some(first.result));
        assert_eq!(client.stored_keys(), vec!["servers"]);
    }
}
