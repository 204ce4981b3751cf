//! Integration tests for the API client against a mock HTTP server.

use chrono::NaiveDate;
use httpmock::prelude::*;
use salon_dashboard::api::auth::request_token;
use salon_dashboard::api::{ApiClient, BookingQuery, ClientRegistry, CustomerQuery};
use salon_dashboard::config::AppConfig;
use salon_dashboard::error::{ApiError, LoginError};
use salon_dashboard::format;
use salon_dashboard::models::booking::total_revenue;
use salon_dashboard::session::Session;
use std::time::Duration;

fn test_config(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.api.base_url = server.base_url();
    config
}

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&test_config(server), "tok")
}

fn booking_json(id: i64, amount: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "date": "2026-08-20",
        "time": "14:30",
        "status": "sln-b-approved",
        "amount": amount,
        "duration": "1h",
        "services": [
            {"service_id": 7, "service_name": "Facial", "start_at": "14:30", "service_price": amount}
        ],
        "admin_note": null
    })
}

fn range() -> BookingQuery {
    BookingQuery::range(
        NaiveDate::from_ymd_opt(2026, 7, 26).unwrap(),
        NaiveDate::from_ymd_opt(2026, 8, 25).unwrap(),
    )
}

#[tokio::test]
async fn get_customers_parses_items_envelope() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/customers")
            .header("Access-Token", "tok")
            .query_param("search", "jane")
            .query_param("search_type", "contains")
            .query_param("orderby", "first_name_last_name");
        then.status(200).json_body(serde_json::json!({
            "items": [
                {"id": 1, "first_name": "Jane", "last_name": "Doe", "email": "jane@example.com",
                 "phone": "555-0100", "address": "1 Main St", "note": "", "bookings": [101]}
            ]
        }));
    });

    let customers = client(&server)
        .get_customers(&CustomerQuery::search("jane"))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].full_name(), "Jane Doe");
    assert_eq!(customers[0].bookings, vec![101]);
}

async fn error_for_status(server: &MockServer, status: u16) -> ApiError {
    let mut mock = server.mock(|when, then| {
        when.method(GET).path("/services");
        then.status(status);
    });

    // Fresh client per status so the cache cannot interfere.
    let err = client(server).get_services().await.unwrap_err();
    mock.delete();
    err
}

#[tokio::test]
async fn status_codes_map_to_error_classes() {
    let server = MockServer::start();

    assert!(matches!(error_for_status(&server, 401).await, ApiError::Authentication));
    assert!(matches!(error_for_status(&server, 404).await, ApiError::NotFound));
    assert!(matches!(
        error_for_status(&server, 500).await,
        ApiError::Server { status: 500 }
    ));
    assert!(matches!(
        error_for_status(&server, 503).await,
        ApiError::Server { status: 503 }
    ));
    assert!(matches!(error_for_status(&server, 418).await, ApiError::Api { status: 418 }));
}

#[tokio::test]
async fn rate_limit_carries_retry_after_hint() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/bookings");
        then.status(429).header("Retry-After", "30");
    });

    let err = client(&server).get_bookings(&range()).await.unwrap_err();
    match err {
        ApiError::RateLimited { retry_after } => assert_eq!(retry_after, Some(30)),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn schema_mismatch_is_a_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/bookings");
        // Booking records missing required fields must not silently default.
        then.status(200)
            .json_body(serde_json::json!({"items": [{"id": 1}]}));
    });

    let err = client(&server).get_bookings(&range()).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn identical_read_within_ttl_hits_cache() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/bookings");
        then.status(200)
            .json_body(serde_json::json!({"items": [booking_json(101, 85.5)]}));
    });

    let client = client(&server);
    let first = client.get_bookings(&range()).await.unwrap();
    let second = client.get_bookings(&range()).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    mock.assert_hits(1);
}

#[tokio::test]
async fn different_arguments_bypass_the_cache() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/bookings");
        then.status(200).json_body(serde_json::json!({"items": []}));
    });

    let client = client(&server);
    client.get_bookings(&range()).await.unwrap();
    client.get_bookings(&range().for_customer(7)).await.unwrap();

    mock.assert_hits(2);
}

#[tokio::test]
async fn update_booking_true_only_on_exactly_200() {
    let server = MockServer::start();
    let booking: salon_dashboard::models::Booking = serde_json::from_value(booking_json(101, 85.5)).unwrap();
    let update = booking.note_update("follow up");

    let mut ok = server.mock(|when, then| {
        when.method(PUT)
            .path("/bookings/101")
            .header("Access-Token", "tok")
            .json_body_partial(r#"{"admin_note": "follow up", "status": "sln-b-approved"}"#);
        then.status(200);
    });
    assert!(client(&server).update_booking(101, &update).await.unwrap());
    ok.assert();
    ok.delete();

    // 202 is a success status but not an update confirmation.
    server.mock(|when, then| {
        when.method(PUT).path("/bookings/101");
        then.status(202);
    });
    assert!(!client(&server).update_booking(101, &update).await.unwrap());
}

#[tokio::test]
async fn update_booking_server_error_propagates() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/bookings/101");
        then.status(500);
    });

    let booking: salon_dashboard::models::Booking = serde_json::from_value(booking_json(101, 85.5)).unwrap();
    let err = client(&server)
        .update_booking(101, &booking.note_update("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 500 }));
}

#[tokio::test]
async fn update_booking_invalidates_bookings_cache() {
    let server = MockServer::start();
    let bookings_mock = server.mock(|when, then| {
        when.method(GET).path("/bookings");
        then.status(200)
            .json_body(serde_json::json!({"items": [booking_json(101, 85.5)]}));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/bookings/101");
        then.status(200);
    });

    let client = client(&server);
    let booking = &client.get_bookings(&range()).await.unwrap()[0];
    let update = booking.note_update("updated");

    assert!(client.update_booking(101, &update).await.unwrap());

    // The next read must go back to the network, not the cache.
    client.get_bookings(&range()).await.unwrap();
    bookings_mock.assert_hits(2);
}

#[tokio::test]
async fn upcoming_bookings_pass_the_hours_window() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/bookings/upcoming")
            .query_param("hours", "48");
        then.status(200)
            .json_body(serde_json::json!({"items": [booking_json(300, 40.0)]}));
    });

    let upcoming = client(&server).get_upcoming_bookings(48).await.unwrap();
    mock.assert();
    assert_eq!(upcoming[0].id, 300);
}

#[tokio::test]
async fn services_become_an_id_name_map() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/services");
        then.status(200).json_body(serde_json::json!({
            "items": [{"id": 7, "name": "Facial"}, {"id": 8, "name": "Massage"}]
        }));
    });

    let services = client(&server).get_services().await.unwrap();
    assert_eq!(services.get(&7).map(String::as_str), Some("Facial"));
    assert_eq!(services.len(), 2);
}

#[tokio::test]
async fn health_check_never_errors() {
    let server = MockServer::start();
    let mut mock = server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200).json_body(serde_json::json!({"message": "all good"}));
    });

    let (healthy, message) = client(&server).get_api_health().await;
    assert!(healthy);
    assert_eq!(message, "all good");
    mock.delete();

    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(503);
    });

    // Fresh client: the previous result is cached per instance.
    let (healthy, message) = client(&server).get_api_health().await;
    assert!(!healthy);
    assert_eq!(message, "HTTP 503");
}

#[tokio::test]
async fn stats_endpoint_is_cached() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/bookings/stats");
        then.status(200).json_body(serde_json::json!({
            "total_bookings": 12, "total_revenue": 1234.5, "approved": 10, "cancelled": 2
        }));
    });

    let client = client(&server);
    let start = NaiveDate::from_ymd_opt(2026, 7, 26).unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();

    let stats = client.get_booking_stats(start, end).await.unwrap();
    let again = client.get_booking_stats(start, end).await.unwrap();

    assert_eq!(stats.total_bookings, 12);
    assert_eq!(again.total_revenue, 1234.5);
    mock.assert_hits(1);
}

#[tokio::test]
async fn login_status_shapes() {
    let server = MockServer::start();
    let timeout = Duration::from_secs(5);

    let mut created = server.mock(|when, then| {
        when.method(GET)
            .path("/login")
            .query_param("name", "laura")
            .query_param("password", "secret");
        then.status(201).json_body(serde_json::json!({"access_token": "tok-abc"}));
    });
    let token = request_token(&server.base_url(), timeout, "laura", "secret").await.unwrap();
    assert_eq!(token, "tok-abc");
    created.assert();
    created.delete();

    server.mock(|when, then| {
        when.method(GET).path("/login");
        then.status(404);
    });
    let err = request_token(&server.base_url(), timeout, "laura", "bad").await.unwrap_err();
    assert!(matches!(err, LoginError::InvalidCredentials));
}

#[tokio::test]
async fn login_unexpected_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/login");
        then.status(500);
    });

    let err = request_token(&server.base_url(), Duration::from_secs(5), "laura", "secret")
        .await
        .unwrap_err();
    assert!(matches!(err, LoginError::Unexpected(500)));
}

#[tokio::test]
async fn client_registry_reuses_one_instance_per_token() {
    let server = MockServer::start();
    let registry = ClientRegistry::new(test_config(&server));

    let a = registry.client_for("tok");
    let b = registry.client_for("tok");
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn end_to_end_login_then_dashboard_revenue() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/login");
        then.status(201).json_body(serde_json::json!({"access_token": "tok-e2e"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/bookings").header("Access-Token", "tok-e2e");
        then.status(200).json_body(serde_json::json!({
            "items": [booking_json(1, 1000.0), booking_json(2, 234.5)]
        }));
    });

    // Login and store the token in the session.
    let token = request_token(&server.base_url(), Duration::from_secs(5), "laura", "secret")
        .await
        .unwrap();
    let mut session = Session::new();
    session.set_token(token);
    assert!(session.is_logged_in());

    // Dashboard fetch through the per-token registry.
    let registry = ClientRegistry::new(test_config(&server));
    let client = registry.client_for(session.token().unwrap());
    let bookings = client.get_bookings(&range()).await.unwrap();

    let revenue = total_revenue(&bookings);
    assert_eq!(format::currency(revenue), "$1,234.50");
}
