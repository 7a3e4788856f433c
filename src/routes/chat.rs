// ABOUTME: Chat route handler forwarding user messages to the agent executor
// ABOUTME: Stateless request/reply; no conversation history is retained
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! Chat route
//!
//! `POST /chat` takes `{"message": string}` and returns `{"reply": string}`.
//! Each request runs one full agent loop; nothing is kept between calls.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::server::ServerResources;

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    /// Free-text user message
    pub message: String,
}

/// Chat reply body
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReplyBody {
    /// Final text produced by the agent loop
    pub reply: String,
}

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create the chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/chat", post(Self::chat))
            .with_state(resources)
    }

    /// Run the agent loop for one message
    async fn chat(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ChatRequestBody>,
    ) -> Result<Json<ChatReplyBody>, AppError> {
        info!("Chat request ({} chars)", request.message.len());
        let reply = resources.executor.invoke(&request.message).await?;
        Ok(Json(ChatReplyBody { reply }))
    }
}
