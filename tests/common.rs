// ABOUTME: Shared test helpers: scripted LLM provider and server resource builders
// ABOUTME: Lets integration tests drive the agent loop deterministically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs, dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use healthadvice_server::config::environment::{DataConfig, ServerConfig};
use healthadvice_server::errors::AppError;
use healthadvice_server::llm::{
    ChatRequest, ChatResponseWithTools, FunctionCall, LlmProvider, Tool,
};
use healthadvice_server::server::ServerResources;
use healthadvice_server::tools::dataset::ExerciseDataset;
use healthadvice_server::tools::search::SearchBackend;
use healthadvice_server::tools::ToolCatalog;

/// One step of a scripted conversation
pub enum Script {
    /// Request the named tool with the given arguments
    ToolCall(&'static str, Value),
    /// Reply with the content of the last message in the request
    /// (after a tool call, that is the tool result message)
    EchoLastMessage,
    /// Reply with fixed text
    Text(&'static str),
}

/// Deterministic LLM provider driven by a script; an exhausted script
/// replies with plain text so loops always terminate
pub struct ScriptedProvider {
    scripts: Mutex<VecDeque<Script>>,
}

impl ScriptedProvider {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
        }
    }
}

fn text_response(text: String) -> ChatResponseWithTools {
    ChatResponseWithTools {
        content: Some(text),
        function_calls: None,
        model: "scripted-model".to_owned(),
        usage: None,
        finish_reason: Some("stop".to_owned()),
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete_with_tools(
        &self,
        request: &ChatRequest,
        _tools: Option<&[Tool]>,
    ) -> Result<ChatResponseWithTools, AppError> {
        let script = self.scripts.lock().unwrap().pop_front();
        let response = match script {
            Some(Script::ToolCall(name, args)) => ChatResponseWithTools {
                content: None,
                function_calls: Some(vec![FunctionCall {
                    name: name.to_owned(),
                    args,
                }]),
                model: "scripted-model".to_owned(),
                usage: None,
                finish_reason: Some("tool_calls".to_owned()),
            },
            Some(Script::EchoLastMessage) => text_response(
                request
                    .messages
                    .last()
                    .map(|m| m.content.clone())
                    .unwrap_or_default(),
            ),
            Some(Script::Text(text)) => text_response(text.to_owned()),
            None => text_response("done".to_owned()),
        };
        Ok(response)
    }
}

/// Configuration pointing at nonexistent data paths
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        cors_origin: "http://localhost:3000".to_owned(),
        data: DataConfig {
            exercises_csv: PathBuf::from("does/not/exist.csv"),
            docs_dir: PathBuf::from("does/not/exist"),
        },
    }
}

/// Catalog over empty local data, DuckDuckGo backend, no PDF index
pub fn test_catalog() -> ToolCatalog {
    ToolCatalog::new(
        reqwest::Client::new(),
        ExerciseDataset::new(PathBuf::from("does/not/exist.csv")),
        SearchBackend::DuckDuckGo,
        None,
    )
}

/// Server resources wired to a scripted provider
pub fn scripted_resources(scripts: Vec<Script>) -> Arc<ServerResources> {
    Arc::new(ServerResources::new(
        Arc::new(ScriptedProvider::new(scripts)),
        Arc::new(test_catalog()),
        test_config(),
    ))
}
