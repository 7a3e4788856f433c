// ABOUTME: System prompt used by the agent loop for every chat request
// ABOUTME: Keeps the assistant persona and tool-usage guidance in one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! System prompt for the HealthAdvice assistant

/// System prompt prepended to every conversation
const SYSTEM_PROMPT: &str = "You are a helpful health and fitness assistant. \
You have access to tools for body metrics, nutrition, exercise lookups, web \
search, and document retrieval. Use a tool whenever it answers the user's \
question more precisely than you can from memory, then reply in plain, \
friendly language. Include the tool's numeric results verbatim in your reply.";

/// Get the system prompt for the agent loop
#[must_use]
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}
