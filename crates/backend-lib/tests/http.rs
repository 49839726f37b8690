// ==========================
// crates/backend-lib/tests/http.rs
// ==========================
//! Full HTTP surface tests driven through the router.
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use forum_backend_lib::{
    config::Settings, router::create_router, storage::FlatFileStorage, AppState,
};

fn test_app(temp_dir: &TempDir) -> (Router, Arc<AppState<FlatFileStorage>>) {
    let settings = Settings {
        token_secret: "http-test-secret".to_string(),
        ..Settings::default()
    };
    let storage = FlatFileStorage::new(temp_dir.path()).unwrap();
    let state = Arc::new(AppState::new(storage, settings));
    (create_router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_list_requires_room() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = test_app(&temp_dir);

    let (status, body) = send(&app, "GET", "/messages", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Room ID is required");
}

#[tokio::test]
async fn test_create_then_fetch_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = test_app(&temp_dir);

    let (status, created) = send(
        &app,
        "POST",
        "/messages",
        Some(json!({"author": "Anon", "message": "hi", "room": "lobby"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["room"], "lobby");
    assert_eq!(created["message"], "hi");
    assert_eq!(created["edited"], false);
    // no client pseudo-identity supplied
    assert_eq!(created["userId"], "anonymous");
    let message_id = created["messageId"].as_str().unwrap().to_string();
    assert!(!message_id.is_empty());

    let (status, fetched) = send(&app, "GET", &format!("/messages/{message_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["messageId"], message_id.as_str());
    assert_eq!(fetched["message"], "hi");
}

#[tokio::test]
async fn test_create_rejects_missing_fields() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = test_app(&temp_dir);

    for body in [
        json!({"message": "hi", "room": "lobby"}),
        json!({"author": "Anon", "room": "lobby"}),
        json!({"author": "Anon", "message": "hi"}),
        json!({"author": "Anon", "message": "   ", "room": "lobby"}),
    ] {
        let (status, response) = send(&app, "POST", "/messages", Some(body), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Author, message, and room are required");
    }
}

#[tokio::test]
async fn test_listing_is_room_scoped_and_oldest_first() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = test_app(&temp_dir);

    for (room, text) in [("lobby", "one"), ("lobby", "two"), ("random", "three")] {
        let (status, _) = send(
            &app,
            "POST",
            "/messages",
            Some(json!({"author": "Anon", "message": text, "room": room})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, listed) = send(&app, "GET", "/messages?room=lobby", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["message"], "one");
    assert_eq!(listed[1]["message"], "two");
    assert!(listed.iter().all(|m| m["room"] == "lobby"));
    let first = chrono::DateTime::parse_from_rfc3339(listed[0]["timestamp"].as_str().unwrap());
    let second = chrono::DateTime::parse_from_rfc3339(listed[1]["timestamp"].as_str().unwrap());
    assert!(first.unwrap() <= second.unwrap());
}

#[tokio::test]
async fn test_fetch_unknown_message_is_404() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = test_app(&temp_dir);

    let (status, body) = send(&app, "GET", "/messages/no-such-id", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Message not found");
}

/// The ownership scenario end to end: edit by owner, edit and delete by
/// a non-owner, delete by owner, fetch after delete.
#[tokio::test]
async fn test_ownership_gates_edit_and_delete() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = test_app(&temp_dir);

    let (status, created) = send(
        &app,
        "POST",
        "/messages",
        Some(json!({"author": "Anon", "message": "hi", "room": "lobby", "userId": "u1"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["messageId"].as_str().unwrap().to_string();

    // owner edit succeeds and stamps the edit metadata
    let (status, edited) = send(
        &app,
        "PUT",
        &format!("/messages/{id}"),
        Some(json!({"message": "hi there", "userId": "u1"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["message"], "hi there");
    assert_eq!(edited["edited"], true);
    let created_at =
        chrono::DateTime::parse_from_rfc3339(edited["timestamp"].as_str().unwrap()).unwrap();
    let last_edited_at =
        chrono::DateTime::parse_from_rfc3339(edited["lastEditedAt"].as_str().unwrap()).unwrap();
    assert!(last_edited_at >= created_at);

    // non-owner edit is forbidden and changes nothing
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/messages/{id}"),
        Some(json!({"message": "hack", "userId": "u2"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You can only edit your own messages");

    let (_, fetched) = send(&app, "GET", &format!("/messages/{id}"), None, None).await;
    assert_eq!(fetched["message"], "hi there");

    // non-owner delete is forbidden; the message survives
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/messages/{id}"),
        Some(json!({"userId": "u2"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You can only delete your own messages");

    let (status, _) = send(&app, "GET", &format!("/messages/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);

    // owner delete removes it for good
    let (status, confirmation) = send(
        &app,
        "DELETE",
        &format!("/messages/{id}"),
        Some(json!({"userId": "u1"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmation["success"], true);
    assert_eq!(confirmation["messageId"], id.as_str());

    let (status, _) = send(&app, "GET", &format!("/messages/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_without_user_id_is_forbidden() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = test_app(&temp_dir);

    let (_, created) = send(
        &app,
        "POST",
        "/messages",
        Some(json!({"author": "Anon", "message": "hi", "room": "lobby", "userId": "u1"})),
        None,
    )
    .await;
    let id = created["messageId"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/messages/{id}"),
        Some(json!({"message": "sneaky"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_edit_and_delete_unknown_message_are_404() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = test_app(&temp_dir);

    let (status, _) = send(
        &app,
        "PUT",
        "/messages/ghost",
        Some(json!({"message": "boo", "userId": "u1"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        "/messages/ghost",
        Some(json!({"userId": "u1"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// The registration/login scenario, including the authenticated create
/// path forcing authorship from the verified token.
#[tokio::test]
async fn test_register_login_and_authenticated_create() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = test_app(&temp_dir);

    let (status, registered) = send(
        &app,
        "POST",
        "/auth/register",
        Some(json!({"username": "a", "password": "p"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["success"], true);
    assert_eq!(registered["username"], "a");
    let user_id = registered["userId"].as_str().unwrap().to_string();
    // the hash never leaves the server
    assert!(registered.get("passwordHash").is_none());

    // duplicate username never creates a second identity
    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        Some(json!({"username": "a", "password": "q"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already taken");

    let (status, login) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({"username": "a", "password": "p"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["success"], true);
    assert_eq!(login["userId"], user_id.as_str());
    let token = login["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    // a client-supplied author is ignored on the authenticated path
    let (status, created) = send(
        &app,
        "POST",
        "/messages",
        Some(json!({"author": "Impostor", "message": "hi", "room": "lobby", "userId": "fake"})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["author"], "a");
    assert_eq!(created["userId"], user_id.as_str());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = test_app(&temp_dir);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        Some(json!({"username": "a", "password": "p"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (wrong_password_status, wrong_password_body) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({"username": "a", "password": "nope"})),
        None,
    )
    .await;
    let (unknown_user_status, unknown_user_body) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({"username": "nobody", "password": "p"})),
        None,
    )
    .await;

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password_body, unknown_user_body);
}

#[tokio::test]
async fn test_auth_routes_reject_missing_fields() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = test_app(&temp_dir);

    for route in ["/auth/register", "/auth/login"] {
        let (status, _) = send(&app, "POST", route, Some(json!({"username": "a"})), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "POST", route, Some(json!({"password": "p"})), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_create_with_bad_bearer_tokens() {
    let temp_dir = TempDir::new().unwrap();
    let (app, state) = test_app(&temp_dir);

    let body = json!({"author": "Anon", "message": "hi", "room": "lobby"});

    // forged token: signature check fails
    let forged = forum_backend_lib::auth::TokenSigner::new(b"someone-elses-secret")
        .issue("u1", "mallory")
        .unwrap();
    let (status, response) = send(&app, "POST", "/messages", Some(body.clone()), Some(&forged)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["error"], "Invalid token");

    // header present but no usable token
    let request = Request::builder()
        .method("POST")
        .uri("/messages")
        .header(header::AUTHORIZATION, "Bearer")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // a valid token still works after the failures above
    let token = state.tokens.issue("u9", "niner").unwrap();
    let (status, created) = send(&app, "POST", "/messages", Some(body), Some(&token)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["author"], "niner");
}

#[tokio::test]
async fn test_index_route() {
    let temp_dir = TempDir::new().unwrap();
    let (app, _) = test_app(&temp_dir);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
