// ABOUTME: Code-execution tool delegating to an external Python interpreter
// ABOUTME: Captures interpreter output; no additional containment at this layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! # Code Execution Sandbox
//!
//! Runs a code snippet in an externally supplied `python3` interpreter
//! subprocess and returns what it printed. No containment is added at this
//! layer beyond what the interpreter process itself provides; the trust
//! assumption matches the REST GET tool (single-tenant, model-only caller).
//! Failure to launch the interpreter propagates; errors raised *inside* the
//! snippet come back as the interpreter's own stderr text so the model can
//! read them.

use tokio::process::Command;

use crate::errors::AppError;

/// Interpreter binary the tool delegates to
const PYTHON_BIN: &str = "python3";

/// Execute a Python snippet and return its printed output
///
/// # Errors
///
/// Returns an error if the interpreter cannot be launched.
pub async fn run_python(code: &str) -> Result<String, AppError> {
    let output = Command::new(PYTHON_BIN)
        .arg("-c")
        .arg(code)
        .output()
        .await
        .map_err(|e| {
            AppError::external_service(
                "PythonSandbox",
                format!("failed to launch {PYTHON_BIN}: {e}"),
            )
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if stdout.is_empty() {
        Ok(String::from_utf8_lossy(&output.stderr).into_owned())
    } else {
        Ok(stdout)
    }
}
