//! The HTTP identity adapter against a mock identity service.

use std::time::Duration;

use httpmock::prelude::*;
use modkit::TracedClient;
use serde_json::json;
use url::Url;

use time_tracker::domain::passport::Passport;
use time_tracker::domain::ports::{IdentityLookupError, IdentityPort};
use time_tracker::infra::identity::HttpIdentityClient;

fn adapter(base: &str, timeout: Duration) -> HttpIdentityClient {
    HttpIdentityClient::new(
        TracedClient::with_timeout(timeout).unwrap(),
        Url::parse(base).unwrap(),
    )
}

fn passport() -> Passport {
    Passport::parse("1234 567890").unwrap()
}

#[tokio::test]
async fn lookup_sends_passport_parts_and_trace_header() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/info")
            .query_param("passportSerie", "1234")
            .query_param("passportNumber", "567890")
            .header_exists("traceparent");
        then.status(200).json_body(json!({
            "surname": "Ivanov",
            "name": "Ivan",
            "patronymic": "Ivanovich",
            "address": "Moscow"
        }));
    });

    let profile = adapter(&server.url("/info"), Duration::from_secs(2))
        .lookup(&passport())
        .await
        .unwrap();

    mock.assert();
    assert_eq!(profile.surname, "Ivanov");
    assert_eq!(profile.patronymic.as_deref(), Some("Ivanovich"));
}

#[tokio::test]
async fn missing_patronymic_is_none() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/info");
        then.status(200).json_body(json!({
            "surname": "Smith",
            "name": "John",
            "address": "London"
        }));
    });

    let profile = adapter(&server.url("/info"), Duration::from_secs(2))
        .lookup(&passport())
        .await
        .unwrap();
    assert_eq!(profile.patronymic, None);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/info");
        then.status(404);
    });

    let err = adapter(&server.url("/info"), Duration::from_secs(2))
        .lookup(&passport())
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityLookupError::Status(404)));
}

#[tokio::test]
async fn unparsable_body_is_malformed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/info");
        then.status(200).json_body(json!({ "surname": "OnlySurname" }));
    });

    let err = adapter(&server.url("/info"), Duration::from_secs(2))
        .lookup(&passport())
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityLookupError::Malformed(_)));
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/info");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(json!({"surname": "S", "name": "N", "address": "A"}));
    });

    let err = adapter(&server.url("/info"), Duration::from_millis(200))
        .lookup(&passport())
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityLookupError::Transport(_)));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let err = adapter("http://127.0.0.1:9/info", Duration::from_millis(500))
        .lookup(&passport())
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityLookupError::Transport(_)));
}
