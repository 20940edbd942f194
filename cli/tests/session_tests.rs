use std::io::Cursor;

use serde_json::{Value, json};
use toolgate_cli::{DEMO_LICENSE_KEY, SessionEnd, run_session};
use toolgate_license::{ClientConfig, LicenseClient, VALIDATE_PATH};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Spin up a backend stub answering every validation with `body`.
async fn spawn_backend(status: u16, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VALIDATE_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

/// Run a session against `server` with scripted input, returning the outcome and transcript.
async fn run_scripted(server: &MockServer, script: &str) -> (SessionEnd, LicenseClient, String) {
    let mut client = LicenseClient::new(ClientConfig::new(server.uri())).unwrap();
    let mut out = Vec::new();
    let end = run_session(&mut client, Cursor::new(script.to_string()), &mut out)
        .await
        .unwrap();
    (end, client, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn session_processes_until_quit() {
    let server = spawn_backend(200, json!({"valid": true, "apiCallsLeft": 5, "daysRemaining": 30})).await;

    let (end, client, transcript) = run_scripted(&server, "LIC-GOOD\nhello\n\nworld\nquit\n").await;

    assert_eq!(end, SessionEnd::Quit);
    assert_eq!(client.api_calls_left(), Some(3));
    assert!(transcript.contains("License activated successfully"));
    assert!(transcript.contains("API calls remaining: 5"));
    assert!(transcript.contains("License expires in: 30 days"));
    assert!(transcript.contains("Processed result for: hello"));
    assert!(transcript.contains("Processed result for: world"));
    assert!(transcript.contains("API calls remaining: 3"));
}

#[tokio::test]
async fn session_stops_when_quota_exhausted() {
    let server = spawn_backend(200, json!({"valid": true, "apiCallsLeft": 1})).await;

    let (end, _, transcript) = run_scripted(&server, "LIC-GOOD\nfirst\nsecond\nthird\n").await;

    assert_eq!(end, SessionEnd::Unauthorized);
    assert!(transcript.contains("Processed result for: first"));
    assert!(!transcript.contains("Processed result for: second"));
    assert!(transcript.contains("No API calls remaining"));
    assert_eq!(end.exit_code(), 1);
}

#[tokio::test]
async fn session_reports_activation_failure() {
    let server = spawn_backend(200, json!({"valid": false, "message": "Invalid license key"})).await;

    let (end, client, transcript) = run_scripted(&server, "LIC-BAD\nhello\n").await;

    assert_eq!(end, SessionEnd::ActivationFailed);
    assert!(!client.is_licensed());
    assert!(transcript.contains("License validation failed"));
    assert!(transcript.contains("Invalid license key"));
    assert!(transcript.contains("code 200"));
    assert!(!transcript.contains("Processed result"));
}

#[tokio::test]
async fn demo_sentinel_sends_demo_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VALIDATE_PATH))
        .and(body_partial_json(json!({"licenseKey": DEMO_LICENSE_KEY})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"valid": false, "message": "Invalid license key"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (end, _, transcript) = run_scripted(&server, "demo\n").await;

    assert_eq!(end, SessionEnd::ActivationFailed);
    assert!(transcript.contains("Demo Mode"));
}

#[tokio::test]
async fn session_ends_quietly_on_eof() {
    let server = spawn_backend(200, json!({"valid": true, "apiCallsLeft": 2})).await;

    let (end, client, _) = run_scripted(&server, "LIC-GOOD\nonce\n").await;

    assert_eq!(end, SessionEnd::Quit);
    assert_eq!(client.api_calls_left(), Some(1));
}
