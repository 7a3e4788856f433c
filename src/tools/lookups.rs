// ABOUTME: Recipe and food-product lookups against free public REST APIs
// ABOUTME: One GET per call, JSON parsed into a one-line natural-language summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! # Meal and Barcode Lookups
//!
//! Thin query wrappers around TheMealDB (recipes by ingredient) and Open Food
//! Facts (product by barcode). Each call is fire-and-forget: no retries, no
//! caching, and transport faults propagate to the caller. Response parsing is
//! split out so fixtures can be tested without a network.

use reqwest::Client;
use serde_json::Value;

use crate::errors::AppError;

/// TheMealDB ingredient filter endpoint
const MEALDB_FILTER_URL: &str = "https://www.themealdb.com/api/json/v1/1/filter.php";

/// Open Food Facts product endpoint
const OPENFOODFACTS_PRODUCT_URL: &str = "https://world.openfoodfacts.org/api/v0/product";

/// Maximum number of recipe names included in a summary
const MAX_RECIPES: usize = 5;

/// List up to five meals containing an ingredient
///
/// # Errors
///
/// Returns an error if the request fails or the body is not JSON.
pub async fn recipes_by_ingredient(client: &Client, ingredient: &str) -> Result<String, AppError> {
    let url = format!(
        "{MEALDB_FILTER_URL}?i={}",
        urlencoding::encode(ingredient)
    );
    let payload: Value = client
        .get(&url)
        .send()
        .await
        .map_err(|e| AppError::external_service("TheMealDB", e.to_string()))?
        .json()
        .await
        .map_err(|e| AppError::external_service("TheMealDB", format!("JSON parse error: {e}")))?;

    Ok(summarize_meals(&payload))
}

/// Look up a product name and nutrition grade by barcode
///
/// # Errors
///
/// Returns an error if the request fails or the body is not JSON.
pub async fn product_by_barcode(client: &Client, barcode: &str) -> Result<String, AppError> {
    let url = format!(
        "{OPENFOODFACTS_PRODUCT_URL}/{}.json",
        urlencoding::encode(barcode)
    );
    let payload: Value = client
        .get(&url)
        .send()
        .await
        .map_err(|e| AppError::external_service("OpenFoodFacts", e.to_string()))?
        .json()
        .await
        .map_err(|e| {
            AppError::external_service("OpenFoodFacts", format!("JSON parse error: {e}"))
        })?;

    Ok(summarize_product(&payload))
}

/// Render a TheMealDB filter response as a comma-separated name list
pub(crate) fn summarize_meals(payload: &Value) -> String {
    let names: Vec<&str> = payload
        .get("meals")
        .and_then(Value::as_array)
        .map(|meals| {
            meals
                .iter()
                .filter_map(|meal| meal.get("strMeal").and_then(Value::as_str))
                .take(MAX_RECIPES)
                .collect()
        })
        .unwrap_or_default();

    if names.is_empty() {
        "No recipes.".to_owned()
    } else {
        names.join(", ")
    }
}

/// Render an Open Food Facts product response as name plus nutrition grade
///
/// Any `status` other than 1 means the product is unknown, regardless of
/// other fields present.
pub(crate) fn summarize_product(payload: &Value) -> String {
    if payload.get("status").and_then(Value::as_i64) != Some(1) {
        return "Product not found.".to_owned();
    }

    let product = payload.get("product");
    let name = product
        .and_then(|p| p.get("product_name"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown");
    let grade = product
        .and_then(|p| p.get("nutriscore_grade"))
        .and_then(Value::as_str)
        .unwrap_or("?");

    format!("{name} – Nutriscore {}", grade.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize_meals_joins_up_to_five() {
        let payload = json!({"meals": [
            {"strMeal": "Chicken Handi"},
            {"strMeal": "Chicken Congee"},
            {"strMeal": "Katsu Chicken Curry"},
            {"strMeal": "Chicken Alfredo"},
            {"strMeal": "Chicken Fajita Mac"},
            {"strMeal": "Chicken Basquaise"}
        ]});
        let summary = summarize_meals(&payload);
        assert_eq!(summary.split(", ").count(), 5);
        assert!(summary.starts_with("Chicken Handi"));
        assert!(!summary.contains("Basquaise"));
    }

    #[test]
    fn test_summarize_meals_null_means_none() {
        assert_eq!(summarize_meals(&json!({"meals": null})), "No recipes.");
        assert_eq!(summarize_meals(&json!({})), "No recipes.");
    }

    #[test]
    fn test_summarize_product_found() {
        let payload = json!({
            "status": 1,
            "product": {"product_name": "Nutella", "nutriscore_grade": "e"}
        });
        assert_eq!(summarize_product(&payload), "Nutella – Nutriscore E");
    }

    #[test]
    fn test_summarize_product_not_found_regardless_of_fields() {
        let payload = json!({
            "status": 0,
            "product": {"product_name": "Ghost Product", "nutriscore_grade": "a"}
        });
        assert_eq!(summarize_product(&payload), "Product not found.");
        assert_eq!(summarize_product(&json!({})), "Product not found.");
    }

    #[test]
    fn test_summarize_product_missing_fields() {
        let payload = json!({"status": 1, "product": {}});
        assert_eq!(summarize_product(&payload), "Unknown – Nutriscore ?");
    }
}
