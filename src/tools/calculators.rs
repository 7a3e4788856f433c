// ABOUTME: Deterministic fitness and nutrition calculators exposed as agent tools
// ABOUTME: Pure closed-form formulas with fixed output formatting per tool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthAdvice

//! # Body-Metrics and Nutrition Calculators
//!
//! Pure functions behind the calculator tools. Each validates nothing beyond
//! its typed inputs and renders one formatted sentence; the exact decimal
//! precision of every output is part of the tool contract.

use serde::Deserialize;

/// kg per lb
const KG_PER_LB: f64 = 2.204_62;

/// cm per inch
const CM_PER_IN: f64 = 2.54;

/// Daily hydration guideline in ml per kg of body weight
const HYDRATION_ML_PER_KG: f64 = 35.0;

// ============================================================================
// Argument Types
// ============================================================================

/// Arguments for [`calculate_bmi`]
#[derive(Debug, Deserialize)]
pub struct BmiParams {
    /// Body weight in kg
    pub weight: f64,
    /// Height in cm
    pub height: f64,
}

/// Arguments for [`estimate_calories`]
#[derive(Debug, Deserialize)]
pub struct CalorieParams {
    /// Body weight in kg
    pub weight: f64,
    /// Height in cm
    pub height: f64,
    /// Age in years
    pub age: i64,
    /// Gender ("male"/"female", prefix-matched on 'm')
    pub gender: String,
    /// Activity factor 1.2-1.9
    pub activity: f64,
}

/// Arguments for [`target_hr`]
#[derive(Debug, Deserialize)]
pub struct TargetHrParams {
    /// Age in years
    pub age: i64,
}

/// Arguments for [`unit_convert`]
#[derive(Debug, Deserialize)]
pub struct ConvertParams {
    /// Value to convert
    pub value: f64,
    /// Source unit: kg, lb, cm or in
    pub unit: String,
}

/// Arguments for [`water_goal`]
#[derive(Debug, Deserialize)]
pub struct WaterParams {
    /// Body weight in kg
    pub weight_kg: f64,
}

/// Arguments for [`macro_split`]
#[derive(Debug, Deserialize)]
pub struct MacroParams {
    /// Daily calorie target
    pub calories: i64,
    /// Percent split "carbs/protein/fat"
    #[serde(default = "default_split")]
    pub split: String,
}

fn default_split() -> String {
    "40/30/30".to_owned()
}

/// Arguments for [`one_rep_max`]
#[derive(Debug, Deserialize)]
pub struct OneRepMaxParams {
    /// Weight lifted in kg
    pub weight: f64,
    /// Repetitions performed
    pub reps: i64,
}

/// Arguments for [`vo2max`]
#[derive(Debug, Deserialize)]
pub struct Vo2MaxParams {
    /// Age in years
    pub age: i64,
    /// Gender (accepted for interface stability; the ratio formula is
    /// gender-free)
    pub gender: String,
    /// Resting heart rate in bpm
    pub resting_hr: i64,
}

/// Arguments for [`hiit_plan`]
#[derive(Debug, Deserialize)]
pub struct HiitParams {
    /// Work interval in seconds
    pub work: i64,
    /// Rest interval in seconds
    pub rest: i64,
    /// Number of rounds
    pub rounds: i64,
}

/// Arguments for [`sleep_debt`]
#[derive(Debug, Deserialize)]
pub struct SleepParams {
    /// Nightly sleep goal in hours
    #[serde(default = "default_sleep_goal")]
    pub goal_hours: f64,
    /// Hours actually slept
    pub actual_hours: f64,
}

fn default_sleep_goal() -> f64 {
    8.0
}

// ============================================================================
// Calculators
// ============================================================================

/// Body-Mass Index in kg/m², one decimal
#[must_use]
pub fn calculate_bmi(weight: f64, height: f64) -> String {
    let bmi = weight / (height / 100.0).powi(2);
    format!("Your BMI is {bmi:.1}.")
}

/// Mifflin-St Jeor basal metabolic rate times an activity factor
#[must_use]
pub fn estimate_calories(weight: f64, height: f64, age: i64, gender: &str, activity: f64) -> String {
    let gender_term = if gender.to_lowercase().starts_with('m') {
        5.0
    } else {
        -161.0
    };
    let bmr = 10.0 * weight + 6.25 * height - 5.0 * age as f64 + gender_term;
    format!("Maintenance ≈ {:.0} kcal/d.", bmr * activity)
}

/// Target heart-rate zone at 50-85% of the theoretical max (220 - age)
#[must_use]
pub fn target_hr(age: i64) -> String {
    let max_hr = 220 - age;
    let low = (0.5 * max_hr as f64) as i64;
    let high = (0.85 * max_hr as f64) as i64;
    format!("Target zone {low}-{high} bpm.")
}

/// Bidirectional kg/lb and cm/in conversion, one decimal each side
#[must_use]
pub fn unit_convert(value: f64, unit: &str) -> String {
    match unit.to_lowercase().as_str() {
        "kg" => format!("{value:.1} kg ≈ {:.1} lb", value * KG_PER_LB),
        "lb" => format!("{value:.1} lb ≈ {:.1} kg", value / KG_PER_LB),
        "cm" => format!("{value:.1} cm ≈ {:.1} in", value / CM_PER_IN),
        "in" => format!("{value:.1} in ≈ {:.1} cm", value * CM_PER_IN),
        _ => "Unit must be kg, lb, cm or in.".to_owned(),
    }
}

/// Daily hydration goal at 35 ml per kg of body weight
#[must_use]
pub fn water_goal(weight_kg: f64) -> String {
    let ml = weight_kg * HYDRATION_ML_PER_KG;
    format!("Target ≈ {:.2} L ({ml:.0} ml).", ml / 1000.0)
}

/// Grams of carbs/protein/fat for a calorie target and a percent split
///
/// Carbs and protein count 4 kcal/g, fat 9 kcal/g. The split must parse as
/// three numbers summing to 100 within 0.1; anything else yields a guidance
/// string.
#[must_use]
pub fn macro_split(calories: i64, split: &str) -> String {
    let fields: Vec<&str> = split.split('/').collect();
    let parsed: Option<Vec<f64>> = fields
        .iter()
        .map(|s| s.trim().parse::<f64>().ok())
        .collect();
    let Some(parsed) = parsed.filter(|p| p.len() == 3) else {
        return "Split like 40/30/30.".to_owned();
    };
    let (c, p, f) = (parsed[0], parsed[1], parsed[2]);
    if (c + p + f - 100.0).abs() > 0.1 {
        return "Percents must sum to 100.".to_owned();
    }
    let calories = calories as f64;
    format!(
        "{:.0} g carbs, {:.0} g protein, {:.0} g fat.",
        calories * c / 4.0 / 100.0,
        calories * p / 4.0 / 100.0,
        calories * f / 9.0 / 100.0
    )
}

/// Balanced 7-day push/pull/legs programme
#[must_use]
pub fn workout_split() -> String {
    [
        "Mon Push",
        "Tue Pull",
        "Wed Legs",
        "Thu Rest/Mobility",
        "Fri Upper Hypertrophy",
        "Sat Lower Hypertrophy",
        "Sun Active Recovery",
    ]
    .join("\n")
}

/// Epley one-rep-max estimate
#[must_use]
pub fn one_rep_max(weight: f64, reps: i64) -> String {
    format!("1-RM ≈ {:.1} kg", weight * (1.0 + reps as f64 / 30.0))
}

/// VO₂ max from the HRmax/HRrest ratio (Uth-Sorensen)
///
/// The gender argument is accepted but does not enter the formula; the ratio
/// method is gender-free.
#[must_use]
pub fn vo2max(age: i64, _gender: &str, resting_hr: i64) -> String {
    let v = 15.3 * (220 - age) as f64 / resting_hr as f64;
    format!("VO₂ max ≈ {v:.1} ml/kg/min")
}

/// RPE 6-10 to percent-of-1-RM quick reference
#[must_use]
pub fn rpe_table() -> String {
    (6..=10)
        .map(|r| format!("RPE {r} ≈ {}% 1-RM", 100 - (r - 6) * 5))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Total duration of a HIIT block, rendered minutes:seconds
#[must_use]
pub fn hiit_plan(work: i64, rest: i64, rounds: i64) -> String {
    let total = (work + rest) * rounds;
    format!("{rounds}×{work}/{rest}s → {}:{:02} min", total / 60, total % 60)
}

/// Five-move full-body stretch sequence
#[must_use]
pub fn stretch_routine() -> String {
    [
        "Cat-Cow ×10",
        "World’s Greatest Stretch ×5/side",
        "Hip Flexor 30 s/side",
        "Hamstring Doorway 30 s/side",
        "Shoulder Pass-throughs ×15",
    ]
    .join("\n")
}

/// Daily sleep debt against a nightly goal
#[must_use]
pub fn sleep_debt(goal_hours: f64, actual_hours: f64) -> String {
    let debt = goal_hours - actual_hours;
    if debt <= 0.0 {
        "Goal met! 🎉".to_owned()
    } else {
        format!("Sleep debt: {debt:.1} h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_one_decimal() {
        assert_eq!(calculate_bmi(70.0, 175.0), "Your BMI is 22.9.");
        assert_eq!(calculate_bmi(80.0, 180.0), "Your BMI is 24.7.");
    }

    #[test]
    fn test_bmi_matches_formula() {
        for (w, h) in [(55.0, 160.0), (92.5, 183.0), (70.0, 175.0)] {
            let expected = w / (h / 100.0_f64).powi(2);
            assert_eq!(calculate_bmi(w, h), format!("Your BMI is {expected:.1}."));
        }
    }

    #[test]
    fn test_calories_gender_term() {
        // BMR male: 10*70 + 6.25*175 - 5*30 + 5 = 1648.75; x1.2 = 1978.5 -> 1978
        assert_eq!(
            estimate_calories(70.0, 175.0, 30, "male", 1.2),
            "Maintenance ≈ 1978 kcal/d."
        );
        // BMR female: 10*70 + 6.25*175 - 5*30 - 161 = 1482.75; x1.2 = 1779.3 -> 1779
        assert_eq!(
            estimate_calories(70.0, 175.0, 30, "Female", 1.2),
            "Maintenance ≈ 1779 kcal/d."
        );
        // Prefix match is case-insensitive
        assert_eq!(
            estimate_calories(70.0, 175.0, 30, "M", 1.2),
            "Maintenance ≈ 1978 kcal/d."
        );
    }

    #[test]
    fn test_target_hr_truncates() {
        // max 190 -> 95 and 161.5 -> 161
        assert_eq!(target_hr(30), "Target zone 95-161 bpm.");
    }

    #[test]
    fn test_unit_convert_all_units() {
        assert_eq!(unit_convert(70.0, "kg"), "70.0 kg ≈ 154.3 lb");
        assert_eq!(unit_convert(154.3, "lb"), "154.3 lb ≈ 70.0 kg");
        assert_eq!(unit_convert(175.0, "cm"), "175.0 cm ≈ 68.9 in");
        assert_eq!(unit_convert(68.9, "in"), "68.9 in ≈ 175.0 cm");
        assert_eq!(unit_convert(1.0, "stone"), "Unit must be kg, lb, cm or in.");
    }

    #[test]
    fn test_unit_convert_case_insensitive() {
        assert_eq!(unit_convert(70.0, "KG"), "70.0 kg ≈ 154.3 lb");
    }

    #[test]
    fn test_unit_convert_round_trip() {
        // kg -> lb -> kg reproduces the original at display precision
        let lb = 70.0 * 2.204_62;
        let back = lb / 2.204_62;
        assert_eq!(format!("{back:.1}"), "70.0");
    }

    #[test]
    fn test_water_goal() {
        assert_eq!(water_goal(70.0), "Target ≈ 2.45 L (2450 ml).");
    }

    #[test]
    fn test_macro_split_valid() {
        assert_eq!(
            macro_split(2000, "40/30/30"),
            "200 g carbs, 150 g protein, 67 g fat."
        );
    }

    #[test]
    fn test_macro_split_conserves_calories() {
        // Gram values at 4/4/9 kcal per g recover the calorie target before rounding
        let (calories, c, p, f) = (2500.0_f64, 50.0, 25.0, 25.0);
        let grams_c = calories * c / 4.0 / 100.0;
        let grams_p = calories * p / 4.0 / 100.0;
        let grams_f = calories * f / 9.0 / 100.0;
        let total = grams_c * 4.0 + grams_p * 4.0 + grams_f * 9.0;
        assert!((total - calories).abs() < 1e-9);
    }

    #[test]
    fn test_macro_split_rejects_bad_sum() {
        assert_eq!(macro_split(2000, "50/30/30"), "Percents must sum to 100.");
    }

    #[test]
    fn test_macro_split_rejects_unparseable() {
        assert_eq!(macro_split(2000, "forty/30/30"), "Split like 40/30/30.");
        assert_eq!(macro_split(2000, "40/60"), "Split like 40/30/30.");
        assert_eq!(macro_split(2000, "40/30/20/10"), "Split like 40/30/30.");
    }

    #[test]
    fn test_macro_split_tolerance() {
        // Within 0.1 of 100 is accepted
        assert_eq!(
            macro_split(2000, "40.05/30/30"),
            "200 g carbs, 150 g protein, 67 g fat."
        );
    }

    #[test]
    fn test_one_rep_max_epley() {
        assert_eq!(one_rep_max(100.0, 5), "1-RM ≈ 116.7 kg");
        assert_eq!(one_rep_max(60.0, 1), "1-RM ≈ 62.0 kg");
    }

    #[test]
    fn test_vo2max_ignores_gender() {
        let male = vo2max(30, "male", 60);
        let female = vo2max(30, "female", 60);
        assert_eq!(male, female);
        assert_eq!(male, "VO₂ max ≈ 48.4 ml/kg/min");
    }

    #[test]
    fn test_rpe_table_lines() {
        let table = rpe_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "RPE 6 ≈ 100% 1-RM");
        assert_eq!(lines[4], "RPE 10 ≈ 80% 1-RM");
    }

    #[test]
    fn test_hiit_plan_zero_pads_seconds() {
        // (40+20)*8 = 480s -> 8:00
        assert_eq!(hiit_plan(40, 20, 8), "8×40/20s → 8:00 min");
        // (30+15)*7 = 315s -> 5:15
        assert_eq!(hiit_plan(30, 15, 7), "7×30/15s → 5:15 min");
        // (20+10)*1 = 30s -> 0:30
        assert_eq!(hiit_plan(20, 10, 1), "1×20/10s → 0:30 min");
    }

    #[test]
    fn test_sleep_debt() {
        assert_eq!(sleep_debt(8.0, 9.0), "Goal met! 🎉");
        assert_eq!(sleep_debt(8.0, 8.0), "Goal met! 🎉");
        assert_eq!(sleep_debt(8.0, 6.5), "Sleep debt: 1.5 h");
    }

    #[test]
    fn test_static_tools_shape() {
        assert_eq!(workout_split().lines().count(), 7);
        assert!(workout_split().contains("Thu Rest/Mobility"));
        assert_eq!(stretch_routine().lines().count(), 5);
    }
}
