#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use booking_tool::{Agenda, Booking, http_api};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::Sao_Paulo;
use serde_json::json;
use tower::util::ServiceExt;

fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Sao_Paulo
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn new_router() -> axum::Router {
    let agenda = Agenda::new();
    let state = http_api::AppState::new(agenda);
    http_api::router(state)
}

#[tokio::test]
async fn booking_lifecycle_via_http_api() {
    let app = new_router();
    let booking = Booking::new(1, "HTTP Demo", local(2025, 1, 4, 10, 0));

    // Create booking
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bookings")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&booking).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let created: Booking = serde_json::from_slice(&bytes).unwrap();
    // Creation normalizes: the Saturday request gets the Monday opening slot.
    assert_eq!(created.scheduled_at, Some(local(2025, 1, 6, 9, 0)));

    // Fetch created booking
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/bookings/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let fetched: Booking = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(fetched.id, 1);
    assert_eq!(fetched.title, "HTTP Demo");

    // Delete the booking
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/bookings/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Ensure the booking is gone
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/bookings/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], json!("not_found"));
}

#[tokio::test]
async fn duplicate_booking_creation_conflicts() {
    let app = new_router();
    let booking = Booking::new(1, "HTTP Demo", local(2025, 1, 8, 14, 0));
    let payload = serde_json::to_vec(&booking).unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bookings")
                .header("content-type", "application/json")
                .body(Body::from(payload.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bookings")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn calendar_adjust_endpoint_applies_business_rules() {
    let app = new_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calendar/adjust")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_vec(&json!({ "timestamp": local(2025, 1, 3, 19, 0) })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let adjusted: DateTime<Utc> = serde_json::from_value(body["adjusted"].clone()).unwrap();
    assert_eq!(adjusted, local(2025, 1, 6, 9, 0));
}

#[tokio::test]
async fn calendar_advance_endpoint_skips_weekends() {
    let app = new_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calendar/advance")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_vec(&json!({
                        "timestamp": local(2025, 1, 3, 10, 0),
                        "days": 1
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let adjusted: DateTime<Utc> = serde_json::from_value(body["adjusted"].clone()).unwrap();
    assert_eq!(adjusted, local(2025, 1, 6, 10, 0));
}

#[tokio::test]
async fn metadata_update_rejects_invalid_hours() {
    let app = new_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/metadata")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_vec(&json!({
                        "agenda_name": "Broken",
                        "agenda_description": "",
                        "timezone": "America/Sao_Paulo",
                        "hours": { "open_hour": 20, "close_hour": 8 }
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
