// ABOUTME: Integration tests for the chat route and the agent tool loop
// ABOUTME: Drives the endpoint end-to-end with a scripted LLM provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{scripted_resources, Script};
use healthadvice_server::routes::chat::ChatReplyBody;
use healthadvice_server::server::build_router;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn post_chat(router: axum::Router, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

// ============================================================================
// End-to-End Tool Loop Tests
// ============================================================================

#[tokio::test]
async fn test_chat_bmi_tool_result_reaches_reply() {
    let resources = scripted_resources(vec![
        Script::ToolCall("calculate_bmi", json!({"weight": 70, "height": 175})),
        Script::EchoLastMessage,
    ]);
    let router = build_router(resources);

    let (status, body) = post_chat(
        router,
        &json!({"message": "What is the BMI for 70kg and 175cm?"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let reply: ChatReplyBody = serde_json::from_value(body).unwrap();
    assert!(reply.reply.contains("22.9"), "reply was: {}", reply.reply);
    assert!(reply.reply.contains("calculate_bmi"));
}

#[tokio::test]
async fn test_chat_sleep_debt_goal_met() {
    let resources = scripted_resources(vec![
        Script::ToolCall("sleep_debt", json!({"goal_hours": 8, "actual_hours": 9})),
        Script::EchoLastMessage,
    ]);
    let router = build_router(resources);

    let (status, body) = post_chat(router, &json!({"message": "I slept 9h, goal 8h"})).await;

    assert_eq!(status, StatusCode::OK);
    let reply: ChatReplyBody = serde_json::from_value(body).unwrap();
    assert!(reply.reply.contains("Goal met"), "reply was: {}", reply.reply);
    assert!(!reply.reply.contains("Sleep debt:"));
}

#[tokio::test]
async fn test_chat_plain_text_reply_without_tools() {
    let resources = scripted_resources(vec![Script::Text("Just drink some water.")]);
    let router = build_router(resources);

    let (status, body) = post_chat(router, &json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Just drink some water.");
}

#[tokio::test]
async fn test_chat_multiple_sequential_tool_calls() {
    let resources = scripted_resources(vec![
        Script::ToolCall("water_goal", json!({"weight_kg": 70})),
        Script::ToolCall("target_hr", json!({"age": 30})),
        Script::EchoLastMessage,
    ]);
    let router = build_router(resources);

    let (status, body) = post_chat(router, &json!({"message": "hydration and HR please"})).await;

    assert_eq!(status, StatusCode::OK);
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.contains("Target zone 95-161 bpm."));
}

// ============================================================================
// Fault Handling Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_tool_surfaces_as_internal_error() {
    let resources = scripted_resources(vec![Script::ToolCall("no_such_tool", json!({}))]);
    let router = build_router(resources);

    let (status, body) = post_chat(router, &json!({"message": "anything"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_invalid_tool_arguments_stay_in_band() {
    // Bad arguments are the tool's own guidance string, not a fault
    let resources = scripted_resources(vec![
        Script::ToolCall("calculate_bmi", json!({"weight": "seventy"})),
        Script::EchoLastMessage,
    ]);
    let router = build_router(resources);

    let (status, body) = post_chat(router, &json!({"message": "bmi?"})).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].as_str().unwrap().contains("Invalid arguments"));
}

#[tokio::test]
async fn test_malformed_request_body_is_client_error() {
    let resources = scripted_resources(vec![]);
    let router = build_router(resources);

    let (status, _) = post_chat(router, &json!({"msg": "wrong field"})).await;
    assert!(status.is_client_error());
}

// ============================================================================
// Health Route
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let resources = scripted_resources(vec![]);
    let router = build_router(resources);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}
