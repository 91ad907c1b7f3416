//! Integration tests for request handling that completes before storage.
//!
//! No database is needed: the app runs on a pool that never connects.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{
    bridge_request, create_offline_app, get_request_with_auth, json_request_with_auth,
    parse_response_body, token_for, TRUSTED_ORIGIN,
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn test_liveness_check() {
    let app = create_offline_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_responses_carry_security_and_request_id_headers() {
    let app = create_offline_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health/live")
                .header("X-Request-ID", "req-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    let csp = headers[header::CONTENT_SECURITY_POLICY].to_str().unwrap();
    assert!(csp.starts_with("frame-ancestors 'self'"));
    assert!(csp.contains(TRUSTED_ORIGIN));
    assert!(headers.get(header::X_FRAME_OPTIONS).is_none());
    assert_eq!(headers["x-request-id"], "req-1");
}

#[tokio::test]
async fn test_user_routes_require_token() {
    let app = create_offline_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/me/invitations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_user_routes_reject_bad_token() {
    let app = create_offline_app();

    let response = app
        .oneshot(get_request_with_auth("/api/v1/me/invitations", "not-a-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_add_guest_rejects_bad_mobile_before_storage() {
    let app = create_offline_app();
    let token = token_for(Uuid::new_v4(), None);

    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/invitations/{}/guests", Uuid::new_v4()),
            json!({ "name": "Meera", "mobile": "call me maybe" }),
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "mobile");
}

#[tokio::test]
async fn test_link_without_any_phone_is_rejected() {
    let app = create_offline_app();
    let token = token_for(Uuid::new_v4(), None);

    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/me/invitations/link",
            json!({}),
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(
        body["message"],
        "A phone number is required to link invitations"
    );
}

#[tokio::test]
async fn test_link_ignores_phone_in_body() {
    let app = create_offline_app();
    let token = token_for(Uuid::new_v4(), None);

    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/me/invitations/link",
            json!({ "phone": "+91 98765 43210" }),
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(
        body["message"],
        "A phone number is required to link invitations"
    );
}

#[tokio::test]
async fn test_bridge_rejects_untrusted_origin() {
    let app = create_offline_app();

    let response = app
        .oneshot(bridge_request(
            Uuid::new_v4(),
            "https://evil.example.com",
            None,
            json!({ "type": "REQUEST_INITIAL_WISHES_DATA", "payload": {} }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bridge_checks_origin_before_decoding() {
    let app = create_offline_app();

    let response = app
        .oneshot(bridge_request(
            Uuid::new_v4(),
            "https://evil.example.com",
            None,
            json!({ "type": "NOT_A_MESSAGE" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bridge_rejects_missing_origin() {
    let app = create_offline_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!(
                    "/api/v1/invitations/{}/wishes/messages",
                    Uuid::new_v4()
                ))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "type": "REQUEST_WISHES_REFRESH", "payload": {} }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bridge_rejects_unknown_message_type() {
    let app = create_offline_app();

    let response = app
        .oneshot(bridge_request(
            Uuid::new_v4(),
            TRUSTED_ORIGIN,
            None,
            json!({ "type": "DELETE_ALL_WISHES", "payload": {} }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_bridge_rejects_malformed_guest_header() {
    let app = create_offline_app();

    let response = app
        .oneshot(bridge_request(
            Uuid::new_v4(),
            TRUSTED_ORIGIN,
            Some("guest-42"),
            json!({ "type": "REQUEST_WISHES_REFRESH", "payload": {} }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
