// ABOUTME: Route module organization for the HealthAdvice HTTP surface
// ABOUTME: Chat endpoint plus health checks, each in its own domain module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! HTTP routes
//!
//! Each domain module contains route definitions and thin handlers that
//! delegate to the agent executor.

/// Chat endpoint backed by the agent loop
pub mod chat;
/// Health check and system status routes
pub mod health;

pub use chat::ChatRoutes;
pub use health::HealthRoutes;
