// ABOUTME: Agent module organization for the tool-calling loop
// ABOUTME: Re-exports the executor driving multi-turn tool execution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! Agent loop around the LLM provider

/// Multi-turn tool execution loop
pub mod executor;

pub use executor::AgentExecutor;
