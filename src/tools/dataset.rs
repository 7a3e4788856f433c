// ABOUTME: Offline exercise dataset accessor with one-time lazy loading
// ABOUTME: Serves keyword and muscle-group lookups over a local CSV snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! # Exercise Dataset Accessor
//!
//! Loads a local CSV snapshot of exercises (columns `name,target`) exactly
//! once per process and answers substring lookups over it. A missing file is
//! not an error: the table is simply empty and every search reports no
//! matches.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{info, warn};

/// Maximum number of names returned by either search
const MAX_RESULTS: usize = 5;

/// Raw CSV row shape
#[derive(Debug, Deserialize)]
struct Row {
    name: String,
    target: String,
}

/// One exercise with lowercase projections for case-insensitive matching
#[derive(Debug, Clone)]
pub struct ExerciseRecord {
    /// Exercise name as it appears in the dataset
    pub name: String,
    /// Target muscle group
    pub target: String,
    name_low: String,
    target_low: String,
}

/// Process-lifetime exercise table, loaded on first access
pub struct ExerciseDataset {
    path: PathBuf,
    table: OnceLock<Vec<ExerciseRecord>>,
}

impl ExerciseDataset {
    /// Create an accessor for the dataset at the given path
    ///
    /// Nothing is read until the first search.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            table: OnceLock::new(),
        }
    }

    /// The loaded table; the one-time load is idempotent under concurrent
    /// first access
    fn table(&self) -> &[ExerciseRecord] {
        self.table.get_or_init(|| Self::load(&self.path))
    }

    /// Read the CSV into memory; a missing or unreadable file yields an
    /// empty table
    fn load(path: &Path) -> Vec<ExerciseRecord> {
        if !path.exists() {
            warn!(
                "Exercise dataset not found at {}; searches will return no matches",
                path.display()
            );
            return Vec::new();
        }

        let mut reader = match csv::Reader::from_path(path) {
            Ok(reader) => reader,
            Err(e) => {
                warn!("Failed to open exercise dataset {}: {e}", path.display());
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for row in reader.deserialize::<Row>() {
            match row {
                Ok(row) => {
                    let name_low = row.name.to_lowercase();
                    let target_low = row.target.to_lowercase();
                    records.push(ExerciseRecord {
                        name: row.name,
                        target: row.target,
                        name_low,
                        target_low,
                    });
                }
                Err(e) => warn!("Skipping malformed dataset row: {e}"),
            }
        }

        info!(
            "Loaded {} exercises from {}",
            records.len(),
            path.display()
        );
        records
    }

    /// Find exercises whose name contains the keyword, first matches up to
    /// the result cap, newline-joined
    #[must_use]
    pub fn search_by_name(&self, query: &str) -> String {
        let query_low = query.to_lowercase();
        let names: Vec<&str> = self
            .table()
            .iter()
            .filter(|r| r.name_low.contains(&query_low))
            .take(MAX_RESULTS)
            .map(|r| r.name.as_str())
            .collect();

        if names.is_empty() {
            format!("No matches for {query}.")
        } else {
            names.join("\n")
        }
    }

    /// Up to five exercises targeting a muscle group, randomly sampled when
    /// more than five match
    #[must_use]
    pub fn search_by_muscle(&self, muscle: &str) -> String {
        let muscle_low = muscle.to_lowercase();
        let hits: Vec<&ExerciseRecord> = self
            .table()
            .iter()
            .filter(|r| r.target_low.contains(&muscle_low))
            .collect();

        if hits.is_empty() {
            return format!("No exercises for {muscle}.");
        }

        let mut rng = rand::thread_rng();
        hits.choose_multiple(&mut rng, MAX_RESULTS.min(hits.len()))
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
