// ABOUTME: Web search adapter with a keyed backend and a keyless fallback
// ABOUTME: Backend chosen once at startup; every fault is rendered as a search-error string
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! # Web Search Adapter
//!
//! Wraps a preferred search backend (SerpAPI, needs `SERPAPI_API_KEY`) with a
//! keyless fallback (the DuckDuckGo Instant Answer API). The backend is
//! selected once at startup. This is the one adapter with an explicit local
//! recovery policy: any fault from the backend is caught and returned as a
//! `"Search error: ..."` string so the model can keep going.

use std::env;

use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;

/// Environment variable holding the SerpAPI key
const SERPAPI_KEY_ENV: &str = "SERPAPI_API_KEY";

/// SerpAPI search endpoint
const SERPAPI_URL: &str = "https://serpapi.com/search.json";

/// DuckDuckGo Instant Answer endpoint (keyless)
const DUCKDUCKGO_URL: &str = "https://api.duckduckgo.com/";

/// Search backend selected at startup
pub enum SearchBackend {
    /// SerpAPI with an API key
    SerpApi {
        /// API key for serpapi.com
        api_key: String,
    },
    /// Keyless DuckDuckGo Instant Answer API
    DuckDuckGo,
}

impl SearchBackend {
    /// Select the backend from the environment: SerpAPI when a key is set,
    /// DuckDuckGo otherwise
    #[must_use]
    pub fn from_env() -> Self {
        match env::var(SERPAPI_KEY_ENV) {
            Ok(api_key) if !api_key.is_empty() => {
                info!("Web search backend: SerpAPI");
                Self::SerpApi { api_key }
            }
            _ => {
                info!("Web search backend: DuckDuckGo ({SERPAPI_KEY_ENV} not set)");
                Self::DuckDuckGo
            }
        }
    }

    /// Backend identifier for logging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SerpApi { .. } => "serpapi",
            Self::DuckDuckGo => "duckduckgo",
        }
    }

    /// Search the web and return the first result snippet; faults become a
    /// `"Search error: ..."` string
    pub async fn web_search(&self, client: &Client, query: &str) -> String {
        match self.run(client, query).await {
            Ok(snippet) => snippet,
            Err(e) => format!("Search error: {e}"),
        }
    }

    /// Issue the query against the selected backend
    async fn run(&self, client: &Client, query: &str) -> Result<String, AppError> {
        match self {
            Self::SerpApi { api_key } => Self::run_serpapi(client, query, api_key).await,
            Self::DuckDuckGo => Self::run_duckduckgo(client, query).await,
        }
    }

    async fn run_serpapi(client: &Client, query: &str, api_key: &str) -> Result<String, AppError> {
        let url = format!(
            "{SERPAPI_URL}?engine=google&q={}&api_key={}",
            urlencoding::encode(query),
            urlencoding::encode(api_key)
        );
        let payload: Value = client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::external_service("SerpAPI", e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::external_service("SerpAPI", format!("JSON parse error: {e}")))?;

        Ok(extract_serpapi_snippet(&payload))
    }

    async fn run_duckduckgo(client: &Client, query: &str) -> Result<String, AppError> {
        let url = format!(
            "{DUCKDUCKGO_URL}?q={}&format=json&no_html=1",
            urlencoding::encode(query)
        );
        let payload: Value = client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::external_service("DuckDuckGo", e.to_string()))?
            .json()
            .await
            .map_err(|e| {
                AppError::external_service("DuckDuckGo", format!("JSON parse error: {e}"))
            })?;

        Ok(extract_duckduckgo_snippet(&payload))
    }
}

/// Best snippet from a SerpAPI response: answer box first, then the first
/// organic result
pub(crate) fn extract_serpapi_snippet(payload: &Value) -> String {
    if let Some(answer) = payload
        .get("answer_box")
        .and_then(|b| b.get("answer").or_else(|| b.get("snippet")))
        .and_then(Value::as_str)
    {
        return answer.to_owned();
    }

    payload
        .get("organic_results")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .and_then(|r| r.get("snippet"))
        .and_then(Value::as_str)
        .map_or_else(|| "No results found.".to_owned(), ToOwned::to_owned)
}

/// Best snippet from a DuckDuckGo Instant Answer response
pub(crate) fn extract_duckduckgo_snippet(payload: &Value) -> String {
    if let Some(abstract_text) = payload
        .get("AbstractText")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        return abstract_text.to_owned();
    }

    payload
        .get("RelatedTopics")
        .and_then(Value::as_array)
        .and_then(|topics| topics.first())
        .and_then(|t| t.get("Text"))
        .and_then(Value::as_str)
        .map_or_else(|| "No results found.".to_owned(), ToOwned::to_owned)
}
