//! End-to-end retry behavior against a live mock server
//!
//! Delays are kept to a few milliseconds; exact delay arithmetic is covered
//! by the executor's unit tests on a paused clock.

mod common;

use common::{app_path, client_for, fast_policy, load_response_fixture};
use layer_client::observability::AttemptOutcome;
use layer_client::{AttemptError, BackoffPolicy, Error};
use pretty_assertions::assert_eq;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_retries_server_errors_until_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(app_path("users/1234/conversations")))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(app_path("users/1234/conversations")))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_response_fixture("conversations")),
        )
        .with_priority(2)
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, observer) = client_for(&mock_server.uri(), fast_policy(3));

    let conversations = client
        .conversations()
        .list_for_user("1234")
        .await
        .expect("third attempt should succeed");
    assert_eq!(conversations.len(), 2);

    let records = observer.records();
    assert_eq!(records.len(), 3);
    assert_eq!(
        records.iter().map(|r| r.status()).collect::<Vec<_>>(),
        vec![Some(503), Some(503), Some(200)]
    );
    assert_eq!(
        records.iter().map(|r| r.attempt).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(records[2].succeeded);
    assert_eq!(records[0].delay, Duration::ZERO);
    assert_eq!(records[1].delay, Duration::from_millis(2));
    assert_eq!(records[2].delay, Duration::from_millis(4));

    mock_server.verify().await;
}

#[tokio::test]
async fn test_exhaustion_aggregates_every_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .expect(4)
        .mount(&mock_server)
        .await;

    let (client, observer) = client_for(&mock_server.uri(), fast_policy(4));

    let err = client.webhooks().list().await.unwrap_err();

    let failure = err.as_aggregated().expect("expected aggregated failure");
    assert_eq!(failure.len(), 4);
    for (index, attempt) in failure.attempts().iter().enumerate() {
        assert_eq!(attempt.attempt(), index as u32);
        assert_eq!(attempt.status(), Some(500));
    }
    assert!(err.is_retryable());
    assert_eq!(err.to_string().matches("\n\n").count(), 3);
    assert!(observer.records().iter().all(|r| !r.succeeded));

    mock_server.verify().await;
}

#[tokio::test]
async fn test_client_errors_are_retried_too() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let (client, _) = client_for(&mock_server.uri(), fast_policy(2));

    let err = client
        .conversations()
        .delete("f3cc7b32-3c92-11e4-baad-164230d1df67")
        .await
        .unwrap_err();

    let failure = err.as_aggregated().unwrap();
    assert!(failure.is_client_error_cluster());
    assert!(!err.is_retryable());

    mock_server.verify().await;
}

#[tokio::test]
async fn test_status_399_is_not_accepted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(399))
        .expect(2)
        .mount(&mock_server)
        .await;

    let (client, _) = client_for(&mock_server.uri(), fast_policy(2));

    let err = client.identities().get("frodo").await.unwrap_err();

    assert_eq!(err.as_aggregated().unwrap().last_status(), Some(399));
    mock_server.verify().await;
}

#[tokio::test]
async fn test_zero_attempts_still_sends_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mock_server)
        .await;

    let policy = BackoffPolicy::new(0, Duration::from_secs(30), Duration::from_secs(60));
    let (client, observer) = client_for(&mock_server.uri(), policy);

    let err = client.webhooks().list().await.unwrap_err();

    assert_eq!(err.as_aggregated().unwrap().len(), 1);
    assert_eq!(observer.len(), 1);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_transport_errors_are_recorded_and_retried() {
    // Reserve a port, then close it so connections are refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (client, observer) = client_for(&format!("http://{}", addr), fast_policy(3));

    let err = client.conversations().list_for_user("1234").await.unwrap_err();

    match &err {
        Error::Exhausted(failure) => {
            assert_eq!(failure.len(), 3);
            assert!(
                failure
                    .attempts()
                    .iter()
                    .all(|a| matches!(a, AttemptError::Transport { .. }))
            );
            assert_eq!(failure.last_status(), None);
        }
        other => panic!("Expected Exhausted, got {:?}", other),
    }
    assert!(err.is_retryable());
    assert!(err.to_string().contains("Transport Error"));

    let records = observer.records();
    assert_eq!(records.len(), 3);
    assert!(
        records
            .iter()
            .all(|r| matches!(r.outcome, AttemptOutcome::TransportError(_)))
    );
}
