// ABOUTME: Server resources and axum router assembly
// ABOUTME: Wires the agent executor, CORS policy, and request tracing together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! # Server Assembly
//!
//! Builds the shared [`ServerResources`] (agent executor over the tool
//! catalog and LLM provider) and the axum router, then serves it. The chat
//! endpoint is CORS-restricted to the configured frontend origin.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::agent::AgentExecutor;
use crate::config::ServerConfig;
use crate::llm::{AzureOpenAiProvider, LlmProvider};
use crate::routes::{ChatRoutes, HealthRoutes};
use crate::tools::ToolCatalog;

/// Shared state handed to every route
pub struct ServerResources {
    /// Agent executor answering chat requests
    pub executor: AgentExecutor,
    /// Loaded configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Build resources from configuration and environment credentials
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM provider is not configured or the tool
    /// catalog cannot be built.
    pub async fn from_env(config: ServerConfig) -> Result<Self> {
        let provider: Arc<dyn LlmProvider> = Arc::new(
            AzureOpenAiProvider::from_env().context("LLM provider configuration")?,
        );
        let catalog = Arc::new(
            ToolCatalog::from_config(&config)
                .await
                .context("Tool catalog startup")?,
        );
        let executor = AgentExecutor::new(provider, catalog);
        Ok(Self { executor, config })
    }

    /// Build resources with an explicit provider and catalog (used by tests)
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        catalog: Arc<ToolCatalog>,
        config: ServerConfig,
    ) -> Self {
        Self {
            executor: AgentExecutor::new(provider, catalog),
            config,
        }
    }
}

/// Assemble the full router with CORS and tracing layers
#[must_use]
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let cors = resources.config.cors_origin.parse::<HeaderValue>().map_or_else(
        |_| CorsLayer::new(),
        |origin| {
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        },
    );

    Router::new()
        .merge(ChatRoutes::routes(resources).layer(cors))
        .merge(HealthRoutes::routes())
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured port and serve until shutdown
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr = format!("0.0.0.0:{}", resources.config.http_port);
    let router = build_router(resources);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, router)
        .await
        .context("Server terminated")?;
    Ok(())
}
