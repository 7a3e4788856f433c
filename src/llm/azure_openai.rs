// ABOUTME: Azure OpenAI LLM provider implementation with native tool calling
// ABOUTME: Speaks the OpenAI chat-completions wire format against a deployment endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! # Azure `OpenAI` Provider
//!
//! Implementation of the [`LlmProvider`] trait for Azure-hosted `OpenAI`
//! deployments. Azure exposes the standard chat-completions API scoped under
//! a deployment name and authenticated with an `api-key` header.
//!
//! ## Configuration
//!
//! - `AZURE_OPENAI_ENDPOINT`: resource endpoint, e.g. `https://myres.openai.azure.com`
//! - `AZURE_OPENAI_DEPLOYMENT_NAME`: chat model deployment
//! - `AZURE_OPENAI_API_KEY`: API key for the resource
//! - `AZURE_OPENAI_API_VERSION`: optional, defaults to a stable version
//! - `AZURE_OPENAI_EMBEDDING_DEPLOYMENT`: optional, used by [`EmbeddingClient`]

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{
    ChatMessage, ChatRequest, ChatResponseWithTools, FunctionCall, LlmProvider, TokenUsage, Tool,
};
use crate::errors::AppError;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Environment variable for the Azure `OpenAI` resource endpoint
const ENDPOINT_ENV: &str = "AZURE_OPENAI_ENDPOINT";

/// Environment variable for the chat deployment name
const DEPLOYMENT_ENV: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";

/// Environment variable for the API key
const API_KEY_ENV: &str = "AZURE_OPENAI_API_KEY";

/// Environment variable for the API version (optional)
const API_VERSION_ENV: &str = "AZURE_OPENAI_API_VERSION";

/// Environment variable for the embeddings deployment (optional)
const EMBEDDING_DEPLOYMENT_ENV: &str = "AZURE_OPENAI_EMBEDDING_DEPLOYMENT";

/// Default API version when not overridden
const DEFAULT_API_VERSION: &str = "2024-06-01";

/// Connection timeout for the Azure endpoint
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (tool-heavy completions can be slow)
const REQUEST_TIMEOUT_SECS: u64 = 300;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// Chat-completions request body
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

/// Tool definition in the request
#[derive(Debug, Clone, Serialize)]
struct OpenAiTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAiFunction,
}

/// Function definition within a tool
#[derive(Debug, Clone, Serialize)]
struct OpenAiFunction {
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Value>,
}

/// Message structure in the request
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// Chat-completions response body
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

/// Choice in the response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in the response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

/// Tool call in the response
#[derive(Debug, Clone, Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunctionCall,
}

/// Function call details in the response
#[derive(Debug, Clone, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

/// Usage statistics in the response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Error response body
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the Azure `OpenAI` provider
#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://myres.openai.azure.com`
    pub endpoint: String,
    /// Chat model deployment name
    pub deployment: String,
    /// API key for the resource
    pub api_key: String,
    /// API version query parameter
    pub api_version: String,
    /// Sampling temperature applied to every request
    pub temperature: f32,
}

impl AzureOpenAiConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint, deployment name, or API key is
    /// missing from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        let endpoint = env::var(ENDPOINT_ENV)
            .map_err(|_| AppError::config_missing(format!("{ENDPOINT_ENV} is not set")))?;
        let deployment = env::var(DEPLOYMENT_ENV)
            .map_err(|_| AppError::config_missing(format!("{DEPLOYMENT_ENV} is not set")))?;
        let api_key = env::var(API_KEY_ENV)
            .map_err(|_| AppError::config_missing(format!("{API_KEY_ENV} is not set")))?;
        let api_version =
            env::var(API_VERSION_ENV).unwrap_or_else(|_| DEFAULT_API_VERSION.to_owned());

        Ok(Self {
            endpoint,
            deployment,
            api_key,
            api_version,
            temperature: 0.7,
        })
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Azure `OpenAI` chat-completions provider
pub struct AzureOpenAiProvider {
    client: Client,
    config: AzureOpenAiConfig,
}

impl AzureOpenAiProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: AzureOpenAiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or the HTTP
    /// client cannot be created.
    pub fn from_env() -> Result<Self, AppError> {
        let config = AzureOpenAiConfig::from_env()?;
        info!(
            "Initializing Azure OpenAI provider: endpoint={}, deployment={}",
            config.endpoint, config.deployment
        );
        Self::new(config)
    }

    /// Build the deployment-scoped API URL for a given operation
    fn api_url(&self, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            operation,
            self.config.api_version
        )
    }

    /// Convert internal messages to the wire format
    fn convert_messages(messages: &[ChatMessage]) -> Vec<OpenAiMessage> {
        messages.iter().map(OpenAiMessage::from).collect()
    }

    /// Convert internal [`Tool`] descriptors to the wire format
    fn convert_tools(tools: &[Tool]) -> Vec<OpenAiTool> {
        tools
            .iter()
            .flat_map(|tool| {
                tool.function_declarations.iter().map(|func| OpenAiTool {
                    tool_type: "function".to_owned(),
                    function: OpenAiFunction {
                        name: func.name.clone(),
                        description: func.description.clone(),
                        parameters: func.parameters.clone(),
                    },
                })
            })
            .collect()
    }

    /// Convert wire tool calls to internal [`FunctionCall`] values
    fn convert_tool_calls(tool_calls: &[OpenAiToolCall]) -> Vec<FunctionCall> {
        tool_calls
            .iter()
            .map(|call| {
                debug!(
                    tool_call_id = %call.id,
                    function_name = %call.function.name,
                    "Converting tool call to FunctionCall"
                );
                let args: Value =
                    serde_json::from_str(&call.function.arguments).unwrap_or_default();
                FunctionCall {
                    name: call.function.name.clone(),
                    args,
                }
            })
            .collect()
    }

    /// Parse an error response from the API into an [`AppError`]
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 | 403 => AppError::auth_invalid(format!(
                    "Azure OpenAI authentication failed: {}",
                    error_response.error.message
                )),
                400 => AppError::invalid_input(format!(
                    "Azure OpenAI validation error: {}",
                    error_response.error.message
                )),
                404 => AppError::not_found(format!(
                    "Deployment or endpoint ({})",
                    error_response.error.message
                )),
                _ => AppError::external_service(
                    "AzureOpenAI",
                    format!("{} - {}", error_type, error_response.error.message),
                ),
            }
        } else {
            AppError::external_service(
                "AzureOpenAI",
                format!(
                    "API error ({}): {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
            )
        }
    }
}

#[async_trait]
impl LlmProvider for AzureOpenAiProvider {
    fn name(&self) -> &'static str {
        "azure-openai"
    }

    fn default_model(&self) -> &str {
        &self.config.deployment
    }

    async fn complete_with_tools(
        &self,
        request: &ChatRequest,
        tools: Option<&[Tool]>,
    ) -> Result<ChatResponseWithTools, AppError> {
        let converted_messages = Self::convert_messages(&request.messages);
        let openai_tools = tools.map(Self::convert_tools);

        let openai_request = OpenAiRequest {
            messages: converted_messages,
            temperature: request.temperature.or(Some(self.config.temperature)),
            max_tokens: request.max_tokens,
            tool_choice: openai_tools.as_ref().map(|_| "auto".to_owned()),
            tools: openai_tools,
        };

        debug!(
            "Sending chat completion to deployment {} with {} messages, tools={}",
            self.config.deployment,
            request.messages.len(),
            tools.is_some()
        );

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .header("api-key", &self.config.api_key)
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach Azure OpenAI: {}", e);
                if e.is_connect() {
                    AppError::external_service(
                        "AzureOpenAI",
                        format!("Cannot connect to {}", self.config.endpoint),
                    )
                } else {
                    AppError::external_service("AzureOpenAI", format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service("AzureOpenAI", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse Azure OpenAI response: {} - body: {}",
                e,
                &body[..body.len().min(500)]
            );
            AppError::external_service("AzureOpenAI", format!("Failed to parse response: {e}"))
        })?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service("AzureOpenAI", "API returned no choices"))?;

        let function_calls = choice.message.tool_calls.map(|calls| {
            info!("Model returned {} tool calls", calls.len());
            Self::convert_tool_calls(&calls)
        });

        Ok(ChatResponseWithTools {
            content: choice.message.content,
            function_calls,
            model: openai_response.model,
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

// ============================================================================
// Embeddings
// ============================================================================

/// Embeddings request body
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
}

/// Embeddings response body
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

/// One embedding vector in the response
#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
    index: usize,
}

/// Client for the Azure `OpenAI` embeddings endpoint
///
/// Used by the PDF knowledge base to embed document chunks at startup and
/// queries at retrieval time.
pub struct EmbeddingClient {
    client: Client,
    endpoint: String,
    deployment: String,
    api_key: String,
    api_version: String,
}

impl EmbeddingClient {
    /// Create an embeddings client from environment variables
    ///
    /// Reuses the chat resource endpoint and key; the deployment comes from
    /// `AZURE_OPENAI_EMBEDDING_DEPLOYMENT`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint, key, or embedding deployment is not
    /// configured, or the HTTP client cannot be created.
    pub fn from_env() -> Result<Self, AppError> {
        let endpoint = env::var(ENDPOINT_ENV)
            .map_err(|_| AppError::config_missing(format!("{ENDPOINT_ENV} is not set")))?;
        let api_key = env::var(API_KEY_ENV)
            .map_err(|_| AppError::config_missing(format!("{API_KEY_ENV} is not set")))?;
        let deployment = env::var(EMBEDDING_DEPLOYMENT_ENV).map_err(|_| {
            AppError::config_missing(format!("{EMBEDDING_DEPLOYMENT_ENV} is not set"))
        })?;
        let api_version =
            env::var(API_VERSION_ENV).unwrap_or_else(|_| DEFAULT_API_VERSION.to_owned());

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            deployment,
            api_key,
            api_version,
        })
    }

    /// Embed a batch of texts, preserving input order
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails or the response cannot be
    /// parsed.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AppError> {
        let url = format!(
            "{}/openai/deployments/{}/embeddings?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        );

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&EmbeddingRequest { input: texts })
            .send()
            .await
            .map_err(|e| {
                AppError::external_service("AzureOpenAI", format!("Embedding request failed: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service("AzureOpenAI", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(AzureOpenAiProvider::parse_error_response(status, &body));
        }

        let parsed: EmbeddingResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::external_service("AzureOpenAI", format!("Failed to parse embeddings: {e}"))
        })?;

        let mut vectors = vec![Vec::new(); texts.len()];
        for datum in parsed.data {
            if datum.index < vectors.len() {
                vectors[datum.index] = datum.embedding;
            }
        }
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_tools_flattens_declarations() {
        let tool = Tool {
            function_declarations: vec![
                super::super::FunctionDeclaration {
                    name: "calculate_bmi".to_owned(),
                    description: "Compute Body-Mass Index (kg/m²).".to_owned(),
                    parameters: Some(serde_json::json!({"type": "object"})),
                },
                super::super::FunctionDeclaration {
                    name: "target_hr".to_owned(),
                    description: "Target heart-rate zone.".to_owned(),
                    parameters: None,
                },
            ],
        };

        let converted = AzureOpenAiProvider::convert_tools(&[tool]);
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].function.name, "calculate_bmi");
        assert_eq!(converted[0].tool_type, "function");
    }

    #[test]
    fn test_convert_tool_calls_parses_arguments() {
        let calls = vec![OpenAiToolCall {
            id: "call_1".to_owned(),
            function: OpenAiFunctionCall {
                name: "calculate_bmi".to_owned(),
                arguments: r#"{"weight": 70, "height": 175}"#.to_owned(),
            },
        }];

        let converted = AzureOpenAiProvider::convert_tool_calls(&calls);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].name, "calculate_bmi");
        assert_eq!(converted[0].args["weight"], 70);
    }

    #[test]
    fn test_parse_error_response_auth() {
        let body = r#"{"error": {"message": "bad key", "type": "invalid_request_error"}}"#;
        let err =
            AzureOpenAiProvider::parse_error_response(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(err.http_status(), 401);
    }
}
