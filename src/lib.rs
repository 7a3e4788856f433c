// ABOUTME: Main library entry point for the HealthAdvice agent backend
// ABOUTME: Exposes the chat endpoint, the tool catalog, and the LLM agent loop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

#![deny(unsafe_code)]

//! # HealthAdvice Agent Backend
//!
//! A thin HTTP backend exposing a single chat endpoint backed by an LLM
//! tool-calling agent. User messages are forwarded to an Azure OpenAI
//! deployment which may invoke a fixed catalog of tools before producing a
//! final textual reply.
//!
//! ## Architecture
//!
//! - **Tools**: fitness/nutrition calculators, an offline exercise dataset,
//!   recipe and barcode lookups, web search, a generic REST fetch, a
//!   restricted math evaluator, a code sandbox, and a PDF knowledge base
//! - **Agent**: a bounded multi-turn tool loop around the LLM provider
//! - **LLM**: `OpenAI`-compatible chat completions against an Azure deployment
//! - **Routes**: `POST /chat` and `GET /health`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use healthadvice_server::config::environment::ServerConfig;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env()?;
//! println!("HealthAdvice backend configured for port {}", config.http_port);
//! # Ok(())
//! # }
//! ```
//!
//! The server binary (`healthadvice-server`) wires this together with
//! environment credentials for the model backend.

/// Agent executor running the multi-turn tool loop
pub mod agent;
/// Environment-based configuration management
pub mod config;
/// Unified error handling (error codes, HTTP mapping, response bodies)
pub mod errors;
/// LLM provider abstraction and the Azure OpenAI implementation
pub mod llm;
/// Logging configuration and structured logging setup
pub mod logging;
/// HTTP route handlers
pub mod routes;
/// Server resources and router assembly
pub mod server;
/// Tool catalog: descriptors plus execution against shared resources
pub mod tools;
