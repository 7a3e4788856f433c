// ABOUTME: Generic REST GET tool fetching the text body of a caller-supplied URL
// ABOUTME: Deliberately permissive; transport faults propagate to the HTTP layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! # Generic REST GET
//!
//! Fetches the raw text body of an arbitrary caller-supplied URL. This tool
//! is deliberately permissive: the model may point it at any host. The trust
//! assumption is a single-tenant backend whose only caller is the model
//! itself; a deployment that needs isolation should put an allowlist here.

use reqwest::Client;
use url::Url;

use crate::errors::AppError;

/// Fetch the text body of an HTTP GET request
///
/// # Errors
///
/// Returns an error if the URL does not parse, the request fails, or the
/// body cannot be read as text.
pub async fn requests_get(client: &Client, url: &str) -> Result<String, AppError> {
    let parsed = Url::parse(url).map_err(|e| AppError::invalid_input(format!("Invalid URL: {e}")))?;

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| AppError::external_service("REST GET", e.to_string()))?;

    response
        .text()
        .await
        .map_err(|e| AppError::external_service("REST GET", format!("Failed to read body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let client = Client::new();
        let err = requests_get(&client, "not a url").await.unwrap_err();
        assert_eq!(err.http_status(), 400);
    }
}
