//! HTTP transport tests against a local mock server.

use mockito::Matcher;
use scholar_harvest::config::{ClientConfig, Config, PacingConfig};
use scholar_harvest::utils::{HttpClient, HttpTransport, RetryPolicy};
use scholar_harvest::{ScholarClient, ScholarError, Transport};
use std::sync::Arc;
use std::time::Duration;

fn transport(attempts: u32) -> HttpTransport {
    let client = HttpClient::new(&ClientConfig::default()).unwrap();
    HttpTransport::new(client, RetryPolicy::new(attempts, Duration::from_millis(10)))
}

#[tokio::test]
async fn test_ok_returns_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/citations")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>ok</html>")
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/citations?hl=en&user=abc", server.url());
    let body = tokio_test::assert_ok!(transport(3).get(&url).await);

    assert_eq!(body, "<html>ok</html>");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/citations")
        .match_query(Matcher::Any)
        .with_status(429)
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/citations?user=abc", server.url());
    let error = tokio_test::assert_err!(transport(3).get(&url).await);

    assert!(matches!(error, ScholarError::RateLimited));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_retried_up_to_bound() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/citations")
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let url = format!("{}/citations?user=abc", server.url());
    let result = transport(3).get(&url).await;

    assert!(matches!(
        result,
        Err(ScholarError::Unreachable {
            status: 503,
            attempts: 3
        })
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_follows_mirror() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/citations")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user".into(), "MIRROR1".into()),
            Matcher::UrlEncoded("hl".into(), "en".into()),
        ]))
        .with_status(200)
        .with_body(r#"<div id="gsc_prf_in">Rosalind Franklin</div><div class="gsc_prf_il">King's College London</div>"#)
        .expect(1)
        .create_async()
        .await;

    let mut config = Config::default();
    config.pacing = PacingConfig::none();
    let mut client = ScholarClient::with_transport(Arc::new(transport(1)), &config).unwrap();
    client.set_mirror(&server.url()).unwrap();

    let profile = client.profile("MIRROR1&hl=de").await.unwrap();

    assert_eq!(profile.id, "MIRROR1");
    assert_eq!(profile.name, "Rosalind Franklin");
    assert_eq!(profile.affiliation, "King's College London");
    mock.assert_async().await;
}
