//! Shared test helpers for license client tests.

#![allow(dead_code)]

use serde_json::Value;
use toolgate_license::{ClientConfig, LicenseClient, VALIDATE_PATH};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts a backend stub that answers every validation request with `status` and `body`.
pub async fn backend_returning(status: u16, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VALIDATE_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

/// Starts a backend stub that answers with a raw, non-JSON body.
pub async fn backend_returning_raw(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VALIDATE_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

/// Creates a client pointed at the given base URL.
pub fn client_for(base_url: &str) -> LicenseClient {
    LicenseClient::new(ClientConfig::new(base_url)).unwrap()
}

/// Returns a base URL on which nothing is listening.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
