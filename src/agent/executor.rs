// ABOUTME: Agent executor running the multi-turn tool-calling loop
// ABOUTME: Feeds tool results back to the model until it produces a text reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! # Agent Executor
//!
//! Runs the bounded tool-calling loop for a single chat request: the model is
//! offered the tool catalog, requested calls are executed against shared
//! resources, and results are appended to the conversation until the model
//! responds with text (or the iteration bound is hit).
//!
//! Each request is stateless; no conversation history is retained between
//! calls.

use std::sync::Arc;

use tracing::info;

use crate::errors::AppError;
use crate::llm::{
    prompts, ChatMessage, ChatRequest, FunctionCall, FunctionResponse, LlmProvider, Tool,
};
use crate::tools::ToolCatalog;

/// Maximum number of tool call iterations before forcing a text response
const MAX_TOOL_ITERATIONS: usize = 10;

/// Agent executor pairing an LLM provider with the tool catalog
pub struct AgentExecutor {
    provider: Arc<dyn LlmProvider>,
    catalog: Arc<ToolCatalog>,
    tools: Vec<Tool>,
}

impl AgentExecutor {
    /// Create an executor for the given provider and catalog
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, catalog: Arc<ToolCatalog>) -> Self {
        let tools = vec![Tool {
            function_declarations: catalog.descriptors(),
        }];
        Self {
            provider,
            catalog,
            tools,
        }
    }

    /// Run the agent loop for a single user message and return the reply text
    ///
    /// # Errors
    ///
    /// Returns an error if an LLM call fails or a tool execution faults
    /// (tools with a local recovery policy render their own error strings
    /// instead).
    pub async fn invoke(&self, message: &str) -> Result<String, AppError> {
        let mut messages = vec![
            ChatMessage::system(prompts::system_prompt()),
            ChatMessage::user(message),
        ];

        for iteration in 0..MAX_TOOL_ITERATIONS {
            let request = ChatRequest::new(messages.clone());
            let response = self
                .provider
                .complete_with_tools(&request, Some(&self.tools))
                .await?;

            if let Some(ref function_calls) = response.function_calls {
                if !function_calls.is_empty() {
                    info!(
                        "Iteration {}: executing {} tool calls",
                        iteration,
                        function_calls.len()
                    );

                    let function_responses = self.execute_function_calls(function_calls).await?;

                    // Keep any assistant text that accompanied the calls
                    if let Some(ref text) = response.content {
                        if !text.is_empty() {
                            messages.push(ChatMessage::assistant(text));
                        }
                    }

                    Self::add_function_responses_to_messages(&mut messages, &function_responses);
                    continue;
                }
            }

            // No function calls - we have a text response
            return Ok(response.content.unwrap_or_default());
        }

        info!("Agent loop hit the iteration bound without a final text reply");
        Ok(String::new())
    }

    /// Execute a batch of function calls and collect their responses
    async fn execute_function_calls(
        &self,
        function_calls: &[FunctionCall],
    ) -> Result<Vec<FunctionResponse>, AppError> {
        let mut responses = Vec::with_capacity(function_calls.len());
        for function_call in function_calls {
            info!("Executing tool: {}", function_call.name);
            let output = self
                .catalog
                .execute(&function_call.name, function_call.args.clone())
                .await
                .map_err(|e| AppError::internal(format!("Tool execution failed: {e}")))?;
            responses.push(FunctionResponse {
                name: function_call.name.clone(),
                response: serde_json::json!({ "output": output }),
            });
        }
        Ok(responses)
    }

    /// Add function responses as user messages for the next LLM iteration
    fn add_function_responses_to_messages(
        messages: &mut Vec<ChatMessage>,
        function_responses: &[FunctionResponse],
    ) {
        for func_response in function_responses {
            let response_text =
                serde_json::to_string(&func_response.response).unwrap_or_else(|_| "{}".to_owned());
            messages.push(ChatMessage::user(format!(
                "[Tool Result for {}]: {}",
                func_response.name, response_text
            )));
        }
    }
}
