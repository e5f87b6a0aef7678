//! HTTP-level tests for request submission, the live snapshot and
//! completion.

mod common;

use axum::http::StatusCode;
use common::{artist_with_session, body_json, get, post_auth, post_json, submit, token_for};
use serde_json::json;

fn titles(json: &serde_json::Value) -> Vec<String> {
    json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["song_title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn snapshot_orders_by_tip_then_arrival() {
    let app = common::build_test_app();
    let session_id = artist_with_session(&app, 1, "nova").await;
    submit(&app, session_id, "A", 500).await;
    submit(&app, session_id, "B", 2000).await;
    submit(&app, session_id, "C", 2000).await;

    let response = get(app, &format!("/api/v1/sessions/{session_id}/queue")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(titles(&json), ["B", "C", "A"]);
    assert_eq!(json["data"]["total_value"], 4500);
    assert_eq!(json["data"]["queued_count"], 3);
}

#[tokio::test]
async fn limit_truncates_snapshot() {
    let app = common::build_test_app();
    let session_id = artist_with_session(&app, 1, "nova").await;
    for (title, tip) in [("a", 100), ("b", 600), ("c", 300), ("d", 500), ("e", 200), ("f", 400)] {
        submit(&app, session_id, title, tip).await;
    }

    let json = body_json(get(app, &format!("/api/v1/sessions/{session_id}/queue?limit=5")).await).await;
    assert_eq!(titles(&json), ["b", "d", "f", "c", "e"]);
    assert_eq!(json["data"]["queued_count"], 6);
}

#[tokio::test]
async fn submitted_request_is_trimmed() {
    let app = common::build_test_app();
    let session_id = artist_with_session(&app, 1, "nova").await;

    let response = post_json(
        app,
        &format!("/api/v1/sessions/{session_id}/requests"),
        json!({ "song_title": "  Wonderwall  ", "tip_amount": 1500, "requester_name": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["song_title"], "Wonderwall");
    assert!(json["data"]["requester_name"].is_null());
    assert_eq!(json["data"]["completed"], false);
    assert_eq!(json["data"]["session_id"], session_id);
}

#[tokio::test]
async fn non_positive_tip_is_invalid_amount() {
    let app = common::build_test_app();
    let session_id = artist_with_session(&app, 1, "nova").await;

    for tip in [0, -500] {
        let response = post_json(
            app.clone(),
            &format!("/api/v1/sessions/{session_id}/requests"),
            json!({ "song_title": "Song", "tip_amount": tip }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_AMOUNT");
    }

    let json = body_json(get(app, &format!("/api/v1/sessions/{session_id}/queue")).await).await;
    assert_eq!(json["data"]["queued_count"], 0);
}

#[tokio::test]
async fn empty_title_is_validation_error() {
    let app = common::build_test_app();
    let session_id = artist_with_session(&app, 1, "nova").await;

    let response = post_json(
        app,
        &format!("/api/v1/sessions/{session_id}/requests"),
        json!({ "song_title": "", "tip_amount": 100 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn request_to_ended_session_is_closed() {
    let app = common::build_test_app();
    let session_id = artist_with_session(&app, 1, "nova").await;
    post_auth(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/end"),
        &token_for(1),
    )
    .await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/requests"),
        json!({ "song_title": "Late", "tip_amount": 100 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "SESSION_CLOSED");

    let response = post_json(
        app,
        "/api/v1/sessions/424242/requests",
        json!({ "song_title": "Nowhere", "tip_amount": 100 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_session_snapshot_is_404() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/sessions/99/queue").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn completed_item_leaves_the_queue_for_good() {
    let app = common::build_test_app();
    let session_id = artist_with_session(&app, 1, "nova").await;
    let first = submit(&app, session_id, "First", 900).await;
    submit(&app, session_id, "Second", 100).await;
    let uri = format!("/api/v1/queue-items/{first}/complete");

    let response = post_auth(app.clone(), &uri, &token_for(1)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["completed"], true);
    assert!(json["data"]["completed_at"].is_string());

    let again = post_auth(app.clone(), &uri, &token_for(1)).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let json = body_json(get(app, &format!("/api/v1/sessions/{session_id}/queue")).await).await;
    assert_eq!(titles(&json), ["Second"]);
    assert_eq!(json["data"]["total_value"], 100);
}

#[tokio::test]
async fn completion_requires_the_owner() {
    let app = common::build_test_app();
    let session_id = artist_with_session(&app, 1, "nova").await;
    let item = submit(&app, session_id, "Song", 100).await;

    let uri = format!("/api/v1/queue-items/{item}/complete");
    let response = post_auth(app.clone(), &uri, &token_for(2)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(app, &uri, json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn oversized_tips_are_refused_and_the_session_can_still_end() {
    let app = common::build_test_app();
    let session_id = artist_with_session(&app, 1, "nova").await;
    let huge = i64::MAX / 2 + 1;

    for _ in 0..2 {
        let response = post_json(
            app.clone(),
            &format!("/api/v1/sessions/{session_id}/requests"),
            json!({ "song_title": "Song", "tip_amount": huge }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_AMOUNT");
    }
    submit(&app, session_id, "Song", 1_000_000).await;

    let response = get(app.clone(), &format!("/api/v1/sessions/{session_id}/queue")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/end"),
        &token_for(1),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["total_earnings"], 1_000_000);

    let response = post_auth(app, "/api/v1/sessions", &token_for(1)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn non_positive_limit_is_validation_error() {
    let app = common::build_test_app();
    let session_id = artist_with_session(&app, 1, "nova").await;
    submit(&app, session_id, "Song", 100).await;

    for limit in ["0", "-1"] {
        let response = get(
            app.clone(),
            &format!("/api/v1/sessions/{session_id}/queue?limit={limit}"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn undecodable_input_uses_the_error_envelope() {
    let app = common::build_test_app();
    let session_id = artist_with_session(&app, 1, "nova").await;
    let uri = format!("/api/v1/sessions/{session_id}/requests");

    for body in [
        json!({ "song_title": "Song", "tip_amount": 5.5 }),
        json!({ "song_title": "Song" }),
        json!({ "song_title": 7, "tip_amount": 100 }),
    ] {
        let response = post_json(app.clone(), &uri, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
        assert!(json["error"].is_string());
    }

    let response = get(app.clone(), &format!("/api/v1/sessions/{session_id}/queue?limit=abc")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let json = body_json(get(app, &format!("/api/v1/sessions/{session_id}/queue")).await).await;
    assert_eq!(json["data"]["queued_count"], 0);
}
