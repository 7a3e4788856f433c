// ABOUTME: Tool catalog: descriptor list plus match-based async dispatch
// ABOUTME: Holds the shared resources every tool executes against
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! # Tool Catalog
//!
//! The fixed, ordered collection of tools advertised to the model. Each tool
//! is a named descriptor (`FunctionDeclaration` with a JSON-schema argument
//! shape) mapped to an async handler executed against the catalog's shared
//! resources.
//!
//! Argument validation failures never fault: they become the tool's own
//! guidance string so the model can correct itself. External-dependency
//! faults follow each tool's policy — web search and the math evaluator
//! recover locally; the recipe, barcode, REST GET, sandbox, and document QA
//! tools propagate.

/// Deterministic fitness and nutrition calculators
pub mod calculators;
/// Offline exercise dataset accessor
pub mod dataset;
/// PDF knowledge base
pub mod docs_qa;
/// Recipe and barcode lookups
pub mod lookups;
/// Generic REST GET
pub mod rest;
/// Code execution sandbox
pub mod sandbox;
/// Web search adapter
pub mod search;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::ServerConfig;
use crate::errors::AppError;
use crate::llm::FunctionDeclaration;

use calculators::{
    BmiParams, CalorieParams, ConvertParams, HiitParams, MacroParams, OneRepMaxParams,
    SleepParams, TargetHrParams, Vo2MaxParams, WaterParams,
};
use dataset::ExerciseDataset;
use docs_qa::DocsIndex;
use search::SearchBackend;

/// Arguments for the dataset keyword search
#[derive(Debug, serde::Deserialize)]
struct QueryParams {
    query: String,
}

/// Arguments for the muscle-group search
#[derive(Debug, serde::Deserialize)]
struct MuscleParams {
    muscle: String,
}

/// Arguments for the recipe lookup
#[derive(Debug, serde::Deserialize)]
struct IngredientParams {
    ingredient: String,
}

/// Arguments for the barcode lookup
#[derive(Debug, serde::Deserialize)]
struct BarcodeParams {
    barcode: String,
}

/// Arguments for the REST GET tool
#[derive(Debug, serde::Deserialize)]
struct UrlParams {
    url: String,
}

/// Arguments for the sandbox tool
#[derive(Debug, serde::Deserialize)]
struct CodeParams {
    code: String,
}

/// Arguments for the math evaluator
#[derive(Debug, serde::Deserialize)]
struct ExpressionParams {
    expression: String,
}

/// Parse a tool's argument object; failures render as a guidance string for
/// the model rather than a fault
fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {e}"))
}

/// Shared resources plus the fixed tool set
pub struct ToolCatalog {
    http: reqwest::Client,
    dataset: ExerciseDataset,
    search: SearchBackend,
    docs: Option<DocsIndex>,
}

impl ToolCatalog {
    /// Assemble a catalog from already-built resources
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        dataset: ExerciseDataset,
        search: SearchBackend,
        docs: Option<DocsIndex>,
    ) -> Self {
        Self {
            http,
            dataset,
            search,
            docs,
        }
    }

    /// Build the catalog for server startup: shared HTTP client, dataset
    /// accessor, search backend selection, and the PDF index
    ///
    /// # Errors
    ///
    /// Returns an error if the PDF index build fails (present PDFs that
    /// cannot be read or embedded).
    pub async fn from_config(config: &ServerConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::new();
        let dataset = ExerciseDataset::new(config.data.exercises_csv.clone());
        let search = SearchBackend::from_env();
        let docs = DocsIndex::build(&config.data.docs_dir).await?;
        Ok(Self::new(http, dataset, search, docs))
    }

    /// Execute a tool by name against the shared resources
    ///
    /// # Errors
    ///
    /// Returns an error for unknown tool names and for external faults in
    /// tools without a local recovery policy.
    pub async fn execute(&self, name: &str, args: Value) -> Result<String, AppError> {
        match name {
            "calculate_bmi" => Ok(match parse_args::<BmiParams>(args) {
                Ok(p) => calculators::calculate_bmi(p.weight, p.height),
                Err(msg) => msg,
            }),
            "free_db_search" => Ok(match parse_args::<QueryParams>(args) {
                Ok(p) => self.dataset.search_by_name(&p.query),
                Err(msg) => msg,
            }),
            "exercises_by_muscle" => Ok(match parse_args::<MuscleParams>(args) {
                Ok(p) => self.dataset.search_by_muscle(&p.muscle),
                Err(msg) => msg,
            }),
            "recipes_by_ingredient" => match parse_args::<IngredientParams>(args) {
                Ok(p) => lookups::recipes_by_ingredient(&self.http, &p.ingredient).await,
                Err(msg) => Ok(msg),
            },
            "product_by_barcode" => match parse_args::<BarcodeParams>(args) {
                Ok(p) => lookups::product_by_barcode(&self.http, &p.barcode).await,
                Err(msg) => Ok(msg),
            },
            "estimate_calories" => Ok(match parse_args::<CalorieParams>(args) {
                Ok(p) => calculators::estimate_calories(
                    p.weight, p.height, p.age, &p.gender, p.activity,
                ),
                Err(msg) => msg,
            }),
            "target_hr" => Ok(match parse_args::<TargetHrParams>(args) {
                Ok(p) => calculators::target_hr(p.age),
                Err(msg) => msg,
            }),
            "unit_convert" => Ok(match parse_args::<ConvertParams>(args) {
                Ok(p) => calculators::unit_convert(p.value, &p.unit),
                Err(msg) => msg,
            }),
            "water_goal" => Ok(match parse_args::<WaterParams>(args) {
                Ok(p) => calculators::water_goal(p.weight_kg),
                Err(msg) => msg,
            }),
            "macro_split" => Ok(match parse_args::<MacroParams>(args) {
                Ok(p) => calculators::macro_split(p.calories, &p.split),
                Err(msg) => msg,
            }),
            "workout_split" => Ok(calculators::workout_split()),
            "one_rep_max" => Ok(match parse_args::<OneRepMaxParams>(args) {
                Ok(p) => calculators::one_rep_max(p.weight, p.reps),
                Err(msg) => msg,
            }),
            "vo2max" => Ok(match parse_args::<Vo2MaxParams>(args) {
                Ok(p) => calculators::vo2max(p.age, &p.gender, p.resting_hr),
                Err(msg) => msg,
            }),
            "rpe_table" => Ok(calculators::rpe_table()),
            "hiit_plan" => Ok(match parse_args::<HiitParams>(args) {
                Ok(p) => calculators::hiit_plan(p.work, p.rest, p.rounds),
                Err(msg) => msg,
            }),
            "stretch_routine" => Ok(calculators::stretch_routine()),
            "sleep_debt" => Ok(match parse_args::<SleepParams>(args) {
                Ok(p) => calculators::sleep_debt(p.goal_hours, p.actual_hours),
                Err(msg) => msg,
            }),
            "web_search" => Ok(match parse_args::<QueryParams>(args) {
                Ok(p) => self.search.web_search(&self.http, &p.query).await,
                Err(msg) => msg,
            }),
            "requests_get" => match parse_args::<UrlParams>(args) {
                Ok(p) => rest::requests_get(&self.http, &p.url).await,
                Err(msg) => Ok(msg),
            },
            "python_repl" => match parse_args::<CodeParams>(args) {
                Ok(p) => sandbox::run_python(&p.code).await,
                Err(msg) => Ok(msg),
            },
            "calc_tool" => Ok(match parse_args::<ExpressionParams>(args) {
                Ok(p) => evaluate_expression(&p.expression),
                Err(msg) => msg,
            }),
            "docs_qa" => match parse_args::<QueryParams>(args) {
                Ok(p) => docs_qa::docs_qa(self.docs.as_ref(), &p.query).await,
                Err(msg) => Ok(msg),
            },
            _ => Err(AppError::not_found(format!("Tool '{name}'"))),
        }
    }

    /// The ordered descriptor list advertised to the model
    #[must_use]
    pub fn descriptors(&self) -> Vec<FunctionDeclaration> {
        let mut declarations = Vec::with_capacity(22);
        declarations.extend(Self::body_metric_descriptors());
        declarations.extend(Self::dataset_descriptors());
        declarations.extend(Self::lookup_descriptors());
        declarations.extend(Self::training_descriptors());
        declarations.extend(Self::augmented_descriptors());
        declarations
    }

    /// Body metrics and nutrition
    fn body_metric_descriptors() -> Vec<FunctionDeclaration> {
        vec![
            FunctionDeclaration {
                name: "calculate_bmi".to_owned(),
                description: "Compute Body-Mass Index (kg/m²).".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {
                        "weight": {"type": "number", "description": "kg"},
                        "height": {"type": "number", "description": "cm"}
                    },
                    "required": ["weight", "height"]
                })),
            },
            FunctionDeclaration {
                name: "estimate_calories".to_owned(),
                description: "Mifflin-St Jeor BMR × activity factor.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {
                        "weight": {"type": "number", "description": "kg"},
                        "height": {"type": "number", "description": "cm"},
                        "age": {"type": "integer"},
                        "gender": {"type": "string"},
                        "activity": {"type": "number", "description": "Activity factor 1.2–1.9"}
                    },
                    "required": ["weight", "height", "age", "gender", "activity"]
                })),
            },
            FunctionDeclaration {
                name: "target_hr".to_owned(),
                description: "50–85 % of theoretical max (220-age).".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {"age": {"type": "integer"}},
                    "required": ["age"]
                })),
            },
            FunctionDeclaration {
                name: "unit_convert".to_owned(),
                description: "kg↔lb & cm↔in converter.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {
                        "value": {"type": "number"},
                        "unit": {"type": "string", "description": "kg,lb,cm,in"}
                    },
                    "required": ["value", "unit"]
                })),
            },
            FunctionDeclaration {
                name: "water_goal".to_owned(),
                description: "35 ml/kg daily hydration guideline.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {"weight_kg": {"type": "number"}},
                    "required": ["weight_kg"]
                })),
            },
            FunctionDeclaration {
                name: "macro_split".to_owned(),
                description: "Grams carbs/protein/fat for kcal & % split.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {
                        "calories": {"type": "integer"},
                        "split": {"type": "string", "description": "e.g. 40/30/30"}
                    },
                    "required": ["calories"]
                })),
            },
        ]
    }

    /// Offline exercise dataset
    fn dataset_descriptors() -> Vec<FunctionDeclaration> {
        vec![
            FunctionDeclaration {
                name: "free_db_search".to_owned(),
                description: "Find exercises whose name contains a keyword.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {"query": {"type": "string"}},
                    "required": ["query"]
                })),
            },
            FunctionDeclaration {
                name: "exercises_by_muscle".to_owned(),
                description: "Up to 5 exercises targeting a muscle group.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {"muscle": {"type": "string"}},
                    "required": ["muscle"]
                })),
            },
        ]
    }

    /// Free public REST APIs
    fn lookup_descriptors() -> Vec<FunctionDeclaration> {
        vec![
            FunctionDeclaration {
                name: "recipes_by_ingredient".to_owned(),
                description: "List up to 5 meals containing an ingredient (TheMealDB)."
                    .to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {"ingredient": {"type": "string"}},
                    "required": ["ingredient"]
                })),
            },
            FunctionDeclaration {
                name: "product_by_barcode".to_owned(),
                description: "Open Food Facts product + nutriscore.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {"barcode": {"type": "string"}},
                    "required": ["barcode"]
                })),
            },
        ]
    }

    /// Strength and cardio calculators plus static references
    fn training_descriptors() -> Vec<FunctionDeclaration> {
        vec![
            FunctionDeclaration {
                name: "workout_split".to_owned(),
                description: "Balanced 7-day push/pull/legs/full programme.".to_owned(),
                parameters: Some(json!({"type": "object", "properties": {}})),
            },
            FunctionDeclaration {
                name: "one_rep_max".to_owned(),
                description: "Epley 1-RM estimate.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {
                        "weight": {"type": "number", "description": "kg"},
                        "reps": {"type": "integer"}
                    },
                    "required": ["weight", "reps"]
                })),
            },
            FunctionDeclaration {
                name: "vo2max".to_owned(),
                description: "VO₂ max from HRmax/HRrest ratio (Uth–Sorensen).".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {
                        "age": {"type": "integer"},
                        "gender": {"type": "string"},
                        "resting_hr": {"type": "integer"}
                    },
                    "required": ["age", "gender", "resting_hr"]
                })),
            },
            FunctionDeclaration {
                name: "rpe_table".to_owned(),
                description: "RPE 6-10 to %1-RM quick-ref.".to_owned(),
                parameters: Some(json!({"type": "object", "properties": {}})),
            },
            FunctionDeclaration {
                name: "hiit_plan".to_owned(),
                description: "Summarise a HIIT block total time.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {
                        "work": {"type": "integer", "description": "sec"},
                        "rest": {"type": "integer", "description": "sec"},
                        "rounds": {"type": "integer"}
                    },
                    "required": ["work", "rest", "rounds"]
                })),
            },
            FunctionDeclaration {
                name: "stretch_routine".to_owned(),
                description: "5-move full-body stretch sequence.".to_owned(),
                parameters: Some(json!({"type": "object", "properties": {}})),
            },
            FunctionDeclaration {
                name: "sleep_debt".to_owned(),
                description: "Report daily sleep debt vs. goal.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {
                        "goal_hours": {"type": "number", "default": 8},
                        "actual_hours": {"type": "number"}
                    },
                    "required": ["actual_hours"]
                })),
            },
        ]
    }

    /// Search, REST fetch, code execution, math, and document QA
    fn augmented_descriptors() -> Vec<FunctionDeclaration> {
        vec![
            FunctionDeclaration {
                name: "web_search".to_owned(),
                description: "Search the web and return the first result snippet.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {"query": {"type": "string"}},
                    "required": ["query"]
                })),
            },
            FunctionDeclaration {
                name: "requests_get".to_owned(),
                description: "Fetch the text body of an HTTP GET to the given URL.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {"url": {"type": "string"}},
                    "required": ["url"]
                })),
            },
            FunctionDeclaration {
                name: "python_repl".to_owned(),
                description: "Execute Python code and return printed output.".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {"code": {"type": "string"}},
                    "required": ["code"]
                })),
            },
            FunctionDeclaration {
                name: "calc_tool".to_owned(),
                description: "Evaluate math expressions (sin, sqrt, etc.).".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {"expression": {"type": "string"}},
                    "required": ["expression"]
                })),
            },
            FunctionDeclaration {
                name: "docs_qa".to_owned(),
                description: "Answer questions from PDFs in ./docs (top-3 snippets).".to_owned(),
                parameters: Some(json!({
                    "type": "object",
                    "properties": {"query": {"type": "string"}},
                    "required": ["query"]
                })),
            },
        ]
    }
}

/// Evaluate a restricted math expression; the evaluator exposes a fixed
/// math-function namespace and no general execution
fn evaluate_expression(expression: &str) -> String {
    match meval::eval_str(expression) {
        Ok(value) => value.to_string(),
        Err(e) => format!("Error: {e}"),
    }
}
