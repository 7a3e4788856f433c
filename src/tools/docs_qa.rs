// ABOUTME: PDF knowledge base built at startup from docs/*.pdf
// ABOUTME: External text extraction and embeddings; cosine top-3 retrieval at query time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! # Document QA over Local PDFs
//!
//! Builds an immutable retrieval index once at process start from whatever
//! PDF files are present in the configured directory. Text extraction and
//! chunk embeddings are delegated to external capabilities (the PDF library
//! and the model backend's embeddings endpoint); retrieval is cosine
//! similarity over the in-memory snapshot. Absence of PDFs yields no index
//! and a fixed sentinel reply, never a fault.

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm::EmbeddingClient;

/// Number of chunks retrieved per query
const TOP_K: usize = 3;

/// Characters of each retrieved chunk included in the reply
const EXCERPT_CHARS: usize = 500;

/// Target chunk size when splitting extracted text
const CHUNK_CHARS: usize = 1000;

/// Separator between retrieved excerpts
const SEPARATOR: &str = "\n---\n";

/// Embedding batch size per API call
const EMBED_BATCH: usize = 16;

/// Reply when no index was built at startup
const NO_PDFS_REPLY: &str = "No PDFs found in ./docs.";

/// One embedded chunk of document text
struct DocChunk {
    text: String,
    embedding: Vec<f32>,
}

/// Immutable PDF retrieval index for the process lifetime
pub struct DocsIndex {
    embedder: EmbeddingClient,
    chunks: Vec<DocChunk>,
}

impl DocsIndex {
    /// Build the index from `*.pdf` files under `docs_dir`
    ///
    /// Returns `Ok(None)` when the directory holds no PDFs (or no extractable
    /// text); the tool then answers with a fixed sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error if a present PDF cannot be read or the embeddings
    /// backend fails; startup aborts rather than serving a silently empty
    /// index.
    pub async fn build(docs_dir: &Path) -> Result<Option<Self>, AppError> {
        let pattern = format!("{}/*.pdf", docs_dir.display());
        let paths: Vec<PathBuf> = glob(&pattern)
            .map_err(|e| AppError::invalid_input(format!("Bad docs pattern: {e}")))?
            .filter_map(Result::ok)
            .collect();

        if paths.is_empty() {
            info!("No PDFs under {}; document QA disabled", docs_dir.display());
            return Ok(None);
        }

        let mut texts = Vec::new();
        for path in &paths {
            let text = pdf_extract::extract_text(path).map_err(|e| {
                AppError::internal(format!("Failed to extract text from {}: {e}", path.display()))
            })?;
            texts.extend(chunk_text(&text));
        }

        if texts.is_empty() {
            warn!(
                "PDFs under {} contained no extractable text; document QA disabled",
                docs_dir.display()
            );
            return Ok(None);
        }

        let embedder = EmbeddingClient::from_env()?;
        let mut chunks = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBED_BATCH) {
            let vectors = embedder.embed(batch).await?;
            for (text, embedding) in batch.iter().zip(vectors) {
                chunks.push(DocChunk {
                    text: text.clone(),
                    embedding,
                });
            }
        }

        info!(
            "Document QA index ready: {} chunks from {} PDFs",
            chunks.len(),
            paths.len()
        );
        Ok(Some(Self { embedder, chunks }))
    }

    /// Retrieve the top chunks for a query and join their excerpts
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be embedded.
    pub async fn answer(&self, query: &str) -> Result<String, AppError> {
        let query_vec = self
            .embedder
            .embed(&[query.to_owned()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::internal("Embeddings backend returned no vector"))?;

        let mut scored: Vec<(f32, &DocChunk)> = self
            .chunks
            .iter()
            .map(|chunk| (cosine(&query_vec, &chunk.embedding), chunk))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .iter()
            .take(TOP_K)
            .map(|(_, chunk)| excerpt(&chunk.text))
            .collect::<Vec<_>>()
            .join(SEPARATOR))
    }
}

/// Answer a query against an optional index, with the no-PDFs sentinel
///
/// # Errors
///
/// Returns an error if retrieval against a built index fails.
pub async fn docs_qa(index: Option<&DocsIndex>, query: &str) -> Result<String, AppError> {
    match index {
        Some(index) => index.answer(query).await,
        None => Ok(NO_PDFS_REPLY.to_owned()),
    }
}

/// Split extracted text into chunks of roughly `CHUNK_CHARS` characters on
/// whitespace boundaries
fn chunk_text(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > CHUNK_CHARS {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// First `EXCERPT_CHARS` characters of a chunk, on a char boundary
fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}

/// Cosine similarity of two vectors; zero-length input scores zero
fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
