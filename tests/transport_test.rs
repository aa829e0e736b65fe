//! Transport core behavior: authentication placement, retry policy and
//! two-level response validation, exercised against a mock server.

mod common;

use common::{TEST_API_KEY, TEST_EMAIL, TEST_JWT, signed_client};
use elestio_client::{Client, Error};
use serde_json::json;
use wiremock::matchers::{bearer_token, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn token_is_sent_in_header_and_query_parameter() {
    let server = MockServer::start().await;
    let client = signed_client(&server).await;

    // The mock only matches when the session token shows up in BOTH
    // places, plus the standard JSON headers.
    Mock::given(method("POST"))
        .and(path("/api/projects/getList"))
        .and(bearer_token(TEST_JWT))
        .and(query_param("jwt", TEST_JWT))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "data": {"projects": []},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let projects = client.project().list().await.expect("list should succeed");
    assert!(projects.is_empty());

    server.verify().await;
}

#[tokio::test]
async fn get_retries_on_500_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/servers/getTemplates"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/servers/getTemplates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instances": [{"id": 11, "title": "PostgreSQL"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::unsigned_with_base_url(server.uri());
    let templates = client
        .service()
        .templates()
        .await
        .expect("third attempt should succeed");
    assert_eq!(templates.len(), 1);

    server.verify().await;
}

#[tokio::test]
async fn get_retries_on_408_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/servers/getTemplates"))
        .respond_with(ResponseTemplate::new(408))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/servers/getTemplates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instances": [{"id": 11, "title": "PostgreSQL"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::unsigned_with_base_url(server.uri());
    let result = client.service().templates().await;
    assert!(result.is_ok(), "unexpected result: {result:?}");

    server.verify().await;
}

#[tokio::test]
async fn get_gives_up_after_three_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/servers/getTemplates"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = Client::unsigned_with_base_url(server.uri());
    let result = client.service().templates().await;
    assert!(
        matches!(&result, Err(Error::RequestFailed { status: 503, .. })),
        "unexpected result: {result:?}"
    );

    server.verify().await;
}

#[tokio::test]
async fn get_does_not_retry_on_4xx() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/servers/getTemplates"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::unsigned_with_base_url(server.uri());
    let result = client.service().templates().await;
    assert!(
        matches!(&result, Err(Error::RequestFailed { status: 404, .. })),
        "unexpected result: {result:?}"
    );

    server.verify().await;
}

#[tokio::test]
async fn post_is_never_retried() {
    let server = MockServer::start().await;
    let client = signed_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/projects/getList"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.project().list().await;
    assert!(
        matches!(&result, Err(Error::RequestFailed { status: 500, .. })),
        "unexpected result: {result:?}"
    );

    server.verify().await;
}

#[tokio::test]
async fn ko_envelope_fails_even_on_http_200() {
    let server = MockServer::start().await;
    let client = signed_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/projects/getList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "KO",
            "message": "token expired",
        })))
        .mount(&server)
        .await;

    let result = client.project().list().await;
    assert!(
        matches!(&result, Err(Error::Api { status: 200, message }) if message == "token expired"),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn non_2xx_maps_to_request_failed_with_body() {
    let server = MockServer::start().await;
    let client = signed_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/projects/getList"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let result = client.project().list().await;
    assert!(
        matches!(&result, Err(Error::RequestFailed { status: 403, body }) if body == "forbidden"),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let server = MockServer::start().await;
    let client = signed_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/projects/getList"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let result = client.project().list().await;
    assert!(
        matches!(&result, Err(Error::Decode { .. })),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn sign_in_rejection_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/checkAPIToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "KO",
            "message": "invalid api key",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = Client::with_base_url(server.uri(), TEST_EMAIL, TEST_API_KEY).await;
    assert!(
        matches!(&result, Err(Error::Api { message, .. }) if message == "invalid api key"),
        "unexpected result: {:?}",
        result.err()
    );

    server.verify().await;
}

#[tokio::test]
async fn sign_in_without_token_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/checkAPIToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
        .mount(&server)
        .await;

    let result = Client::with_base_url(server.uri(), TEST_EMAIL, TEST_API_KEY).await;
    assert!(
        matches!(&result, Err(Error::Decode { .. })),
        "unexpected result: {:?}",
        result.err()
    );
}
