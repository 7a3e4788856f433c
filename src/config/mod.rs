// ABOUTME: Configuration module organization for the HealthAdvice backend
// ABOUTME: Re-exports the environment-based server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! Configuration management

/// Environment-based configuration management
pub mod environment;

pub use environment::ServerConfig;
