// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! Environment-based configuration management for production deployment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default HTTP port when `HTTP_PORT` is not set
const DEFAULT_HTTP_PORT: u16 = 8000;

/// Default allowed CORS origin for the chat endpoint
const DEFAULT_CORS_ORIGIN: &str = "https://project-healthadvice.vercel.app";

/// Default location of the exercise dataset snapshot
const DEFAULT_EXERCISES_CSV: &str = "data/exercises.csv";

/// Default location of the PDF knowledge base
const DEFAULT_DOCS_DIR: &str = "docs";

/// Server configuration loaded from environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP port the server binds to
    pub http_port: u16,
    /// Origin allowed to call the chat endpoint from a browser
    pub cors_origin: String,
    /// Local data files consumed by tools
    pub data: DataConfig,
}

/// Locations of local data consumed by tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Exercise dataset CSV (columns `name,target`); may be absent
    pub exercises_csv: PathBuf,
    /// Directory scanned for `*.pdf` knowledge-base files; may be absent
    pub docs_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `HTTP_PORT` is set but not a valid port number.
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid HTTP_PORT value: {port}"))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_owned());

        let exercises_csv = env::var("EXERCISES_CSV")
            .map_or_else(|_| PathBuf::from(DEFAULT_EXERCISES_CSV), PathBuf::from);
        let docs_dir =
            env::var("DOCS_DIR").map_or_else(|_| PathBuf::from(DEFAULT_DOCS_DIR), PathBuf::from);

        Ok(Self {
            http_port,
            cors_origin,
            data: DataConfig {
                exercises_csv,
                docs_dir,
            },
        })
    }

    /// One-line configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={}, cors_origin={}, exercises_csv={}, docs_dir={}",
            self.http_port,
            self.cors_origin,
            self.data.exercises_csv.display(),
            self.data.docs_dir.display()
        )
    }
}
