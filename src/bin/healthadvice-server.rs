// ABOUTME: Server binary wiring configuration, logging, and the agent backend
// ABOUTME: Starts the HTTP surface for the HealthAdvice chat service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! # HealthAdvice Server Binary
//!
//! Starts the chat backend: loads environment configuration, initializes
//! logging, builds the tool catalog and LLM provider, and serves the HTTP
//! endpoints.

use anyhow::Result;
use clap::Parser;
use healthadvice_server::{config::environment::ServerConfig, logging, server};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "healthadvice-server")]
#[command(about = "HealthAdvice agent backend - LLM tool-calling chat API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Force debug-level logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Container environments sometimes pass unexpected arguments; fall back
    // to defaults rather than refusing to start
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Argument parsing failed: {e}");
            eprintln!("Using default configuration");
            Args {
                http_port: None,
                debug: false,
            }
        }
    };

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    let mut logging_config = logging::LoggingConfig::from_env();
    if args.debug {
        logging_config.level = "debug".into();
    }
    logging_config.init()?;

    info!("Starting HealthAdvice agent backend");
    info!("{}", config.summary());

    let resources = Arc::new(server::ServerResources::from_env(config).await?);
    server::run(resources).await
}
