//! Weather calculation engine.
//!
//! Stateless, deterministic, pure-function engine with seven calculation
//! kinds. Each kind has an explicit field-level validation contract checked
//! before its formula runs. Outside a formula's physical validity range the
//! engine degrades to a passthrough value with a descriptive note rather
//! than an error: a "feels-like" refinement is meaningless there, not
//! erroneous.

use std::collections::BTreeSet;

use serde_json::{json, Value};

use crate::calc::engine::{CalcError, CalculationEngine};
use crate::calc::types::{CalculationInput, CalculationResult};

const MODULE: &str = "weather";

const SUPPORTED: [&str; 7] = [
    "temperature_conversion",
    "heat_index",
    "wind_chill",
    "dew_point",
    "comfort_index",
    "weather_summary",
    "pressure_trend",
];

/// Optimal comfort bands the comfort index scores against.
const OPTIMAL_TEMP_C: f64 = 21.0;
const OPTIMAL_HUMIDITY_PCT: f64 = 50.0;
const OPTIMAL_WIND_MIN_MS: f64 = 0.5;
const OPTIMAL_WIND_MAX_MS: f64 = 3.0;

/// Heat index applies from 80°F upward (NOAA guidance).
const HEAT_INDEX_FLOOR_F: f64 = 80.0;
/// Wind chill applies at or below 10°C and at or above 4.8 km/h wind
/// (Environment Canada guidance).
const WIND_CHILL_CEILING_C: f64 = 10.0;
const WIND_CHILL_MIN_KMH: f64 = 4.8;

/// Magnus approximation constants for dew point over water.
const MAGNUS_B: f64 = 17.62;
const MAGNUS_C: f64 = 243.12;

pub struct WeatherEngine;

impl CalculationEngine for WeatherEngine {
    fn calculate(&self, input: &CalculationInput) -> Result<CalculationResult, CalcError> {
        let data = match input.calc_type.as_str() {
            "temperature_conversion" => convert_temperature(&input.data)?,
            "heat_index" => heat_index(&input.data)?,
            "wind_chill" => wind_chill(&input.data)?,
            "dew_point" => dew_point(&input.data)?,
            "comfort_index" => comfort_index(&input.data)?,
            "weather_summary" => weather_summary(&input.data)?,
            "pressure_trend" => pressure_trend(&input.data)?,
            other => {
                return Err(CalcError::UnsupportedCalculation {
                    module: MODULE.to_string(),
                    calc_type: other.to_string(),
                })
            }
        };

        Ok(CalculationResult::ok(data))
    }

    fn validate_input(&self, input: &CalculationInput) -> bool {
        let data = &input.data;
        match input.calc_type.as_str() {
            "temperature_conversion" => {
                finite(data, "value") && unit(data, "from") && unit(data, "to")
            }
            "heat_index" => finite(data, "temperature") && fraction(data, "humidity"),
            "wind_chill" => finite(data, "temperature") && non_negative(data, "wind_speed"),
            // Magnus diverges at 0% humidity, so dew point requires (0, 100].
            "dew_point" => {
                finite(data, "temperature")
                    && fraction(data, "humidity")
                    && number(data, "humidity").map(|h| h > 0.0).unwrap_or(false)
            }
            "comfort_index" => {
                finite(data, "temperature")
                    && fraction(data, "humidity")
                    && non_negative(data, "wind_speed")
            }
            "weather_summary" => {
                finite(data, "temperature")
                    && optional(data, "humidity", |d| fraction(d, "humidity"))
                    && optional(data, "wind_speed", |d| non_negative(d, "wind_speed"))
            }
            "pressure_trend" => data
                .as_array()
                .map(|samples| {
                    samples.len() >= 2
                        && samples
                            .iter()
                            .all(|s| s.as_f64().map(f64::is_finite).unwrap_or(false))
                })
                .unwrap_or(false),
            _ => false,
        }
    }

    fn supported_calculations(&self) -> BTreeSet<String> {
        SUPPORTED.iter().map(|s| s.to_string()).collect()
    }
}

// --- field extraction -----------------------------------------------------

fn number(data: &Value, field: &str) -> Option<f64> {
    data.get(field).and_then(Value::as_f64)
}

fn finite(data: &Value, field: &str) -> bool {
    number(data, field).map(f64::is_finite).unwrap_or(false)
}

fn fraction(data: &Value, field: &str) -> bool {
    number(data, field)
        .map(|v| v.is_finite() && (0.0..=100.0).contains(&v))
        .unwrap_or(false)
}

fn non_negative(data: &Value, field: &str) -> bool {
    number(data, field)
        .map(|v| v.is_finite() && v >= 0.0)
        .unwrap_or(false)
}

fn optional(data: &Value, field: &str, check: impl Fn(&Value) -> bool) -> bool {
    data.get(field).is_none() || check(data)
}

fn require(data: &Value, field: &str) -> Result<f64, CalcError> {
    number(data, field)
        .filter(|v| v.is_finite())
        .ok_or_else(|| CalcError::MissingField {
            field: field.to_string(),
        })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// --- calculations ---------------------------------------------------------

fn convert_temperature(data: &Value) -> Result<Value, CalcError> {
    let value = require(data, "value")?;
    let from = unit_name(data, "from")?;
    let to = unit_name(data, "to")?;

    let celsius = match from {
        "celsius" => value,
        "fahrenheit" => (value - 32.0) * 5.0 / 9.0,
        "kelvin" => value - 273.15,
        _ => unreachable!("unit_name only returns known units"),
    };

    let converted = match to {
        "celsius" => celsius,
        "fahrenheit" => celsius * 9.0 / 5.0 + 32.0,
        "kelvin" => celsius + 273.15,
        _ => unreachable!("unit_name only returns known units"),
    };

    Ok(json!({
        "value": round2(converted),
        "from": from,
        "to": to,
    }))
}

fn unit(data: &Value, field: &str) -> bool {
    matches!(
        data.get(field).and_then(Value::as_str),
        Some("celsius" | "fahrenheit" | "kelvin")
    )
}

fn unit_name<'a>(data: &'a Value, field: &str) -> Result<&'a str, CalcError> {
    match data.get(field).and_then(Value::as_str) {
        Some(unit @ ("celsius" | "fahrenheit" | "kelvin")) => Ok(unit),
        Some(other) => Err(CalcError::OutOfRange {
            field: field.to_string(),
            message: format!("unknown temperature unit '{}'", other),
        }),
        None => Err(CalcError::MissingField {
            field: field.to_string(),
        }),
    }
}

/// NOAA/Rothfusz heat index regression, computed in °F, reported in °C.
fn heat_index(data: &Value) -> Result<Value, CalcError> {
    let temp_c = require(data, "temperature")?;
    let humidity = require(data, "humidity")?;

    let temp_f = temp_c * 9.0 / 5.0 + 32.0;
    if temp_f < HEAT_INDEX_FLOOR_F {
        return Ok(json!({
            "heat_index": round2(temp_c),
            "unit": "celsius",
            "note": "Heat index applies from 80°F upward; temperature returned unchanged",
        }));
    }

    let t = temp_f;
    let r = humidity;
    let hi_f = -42.379 + 2.04901523 * t + 10.14333127 * r
        - 0.22475541 * t * r
        - 6.83783e-3 * t * t
        - 5.481717e-2 * r * r
        + 1.22874e-3 * t * t * r
        + 8.5282e-4 * t * r * r
        - 1.99e-6 * t * t * r * r;

    Ok(json!({
        "heat_index": round2((hi_f - 32.0) * 5.0 / 9.0),
        "unit": "celsius",
    }))
}

/// Environment Canada wind chill; temperature in °C, wind in km/h.
fn wind_chill(data: &Value) -> Result<Value, CalcError> {
    let temp_c = require(data, "temperature")?;
    let wind_kmh = require(data, "wind_speed")?;

    if temp_c > WIND_CHILL_CEILING_C || wind_kmh < WIND_CHILL_MIN_KMH {
        return Ok(json!({
            "wind_chill": round2(temp_c),
            "unit": "celsius",
            "note": "Wind chill applies at or below 10°C with wind of at least 4.8 km/h; temperature returned unchanged",
        }));
    }

    let v = wind_kmh.powf(0.16);
    let chill = 13.12 + 0.6215 * temp_c - 11.37 * v + 0.3965 * temp_c * v;

    Ok(json!({
        "wind_chill": round2(chill),
        "unit": "celsius",
    }))
}

/// Magnus approximation for dew point over water.
fn dew_point(data: &Value) -> Result<Value, CalcError> {
    let temp_c = require(data, "temperature")?;
    let humidity = require(data, "humidity")?;

    let gamma = (humidity / 100.0).ln() + MAGNUS_B * temp_c / (MAGNUS_C + temp_c);
    let dew = MAGNUS_C * gamma / (MAGNUS_B - gamma);

    Ok(json!({
        "dew_point": round2(dew),
        "unit": "celsius",
    }))
}

/// Heuristic 0–100 score for how far conditions sit from the optimal
/// bands (21°C, 50% humidity, 0.5–3 m/s wind).
fn comfort_index(data: &Value) -> Result<Value, CalcError> {
    let temp_c = require(data, "temperature")?;
    let humidity = require(data, "humidity")?;
    let wind_ms = require(data, "wind_speed")?;

    let temp_penalty = (temp_c - OPTIMAL_TEMP_C).abs() * 3.0;
    let humidity_penalty = (humidity - OPTIMAL_HUMIDITY_PCT).abs() * 0.4;
    let wind_penalty = if wind_ms < OPTIMAL_WIND_MIN_MS {
        (OPTIMAL_WIND_MIN_MS - wind_ms) * 4.0
    } else if wind_ms > OPTIMAL_WIND_MAX_MS {
        (wind_ms - OPTIMAL_WIND_MAX_MS) * 5.0
    } else {
        0.0
    };

    let score = (100.0 - temp_penalty - humidity_penalty - wind_penalty).clamp(0.0, 100.0);

    let label = if score >= 80.0 {
        "very comfortable"
    } else if score >= 60.0 {
        "comfortable"
    } else if score >= 40.0 {
        "tolerable"
    } else {
        "uncomfortable"
    };

    // Factors are clamped per-component, independently of the aggregate.
    Ok(json!({
        "score": round2(score),
        "label": label,
        "factors": {
            "temperature": round2((100.0 - temp_penalty).clamp(0.0, 100.0)),
            "humidity": round2((100.0 - humidity_penalty).clamp(0.0, 100.0)),
            "wind": round2((100.0 - wind_penalty).clamp(0.0, 100.0)),
        },
    }))
}

/// Free-text conditions summary with recommendation and alert lists
/// derived from fixed threshold rules.
fn weather_summary(data: &Value) -> Result<Value, CalcError> {
    let temp_c = require(data, "temperature")?;
    let humidity = number(data, "humidity");
    let wind_ms = number(data, "wind_speed");
    let conditions = data.get("conditions").and_then(Value::as_str);

    let band = if temp_c >= 30.0 {
        "hot"
    } else if temp_c >= 20.0 {
        "warm"
    } else if temp_c >= 10.0 {
        "mild"
    } else if temp_c >= 0.0 {
        "cool"
    } else {
        "cold"
    };

    let mut summary = format!("{} at {:.1}°C", capitalize(band), temp_c);
    if let Some(h) = humidity {
        summary.push_str(&format!(", {:.0}% humidity", h));
    }
    if let Some(w) = wind_ms {
        summary.push_str(&format!(", wind {:.1} m/s", w));
    }
    if let Some(c) = conditions {
        summary.push_str(&format!(" ({})", c));
    }

    let mut recommendations = Vec::new();
    let mut alerts = Vec::new();

    if temp_c >= 30.0 {
        recommendations.push("Stay hydrated and avoid prolonged sun exposure".to_string());
    }
    if temp_c <= 0.0 {
        recommendations.push("Dress in insulated layers".to_string());
    }
    if humidity.map(|h| h > 80.0).unwrap_or(false) {
        recommendations.push("Expect muggy conditions; plan indoor breaks".to_string());
    }
    if wind_ms.map(|w| w > 8.0).unwrap_or(false) {
        recommendations.push("Secure loose outdoor items".to_string());
    }

    if temp_c >= 35.0 {
        alerts.push("Extreme heat".to_string());
    }
    if temp_c <= -10.0 {
        alerts.push("Extreme cold".to_string());
    }
    if wind_ms.map(|w| w >= 15.0).unwrap_or(false) {
        alerts.push("Damaging winds possible".to_string());
    }

    Ok(json!({
        "summary": summary,
        "recommendations": recommendations,
        "alerts": alerts,
    }))
}

/// Classify a pressure history (hPa, oldest first) by comparing the mean
/// of the most recent 3 samples against the mean of the prior 3, with a
/// ±1 hPa stable deadband and a ±3 hPa rapid threshold.
fn pressure_trend(data: &Value) -> Result<Value, CalcError> {
    let samples: Vec<f64> = data
        .as_array()
        .ok_or_else(|| CalcError::MissingField {
            field: "data".to_string(),
        })?
        .iter()
        .filter_map(Value::as_f64)
        .collect();

    if samples.len() < 6 {
        return Ok(json!({
            "trend": "stable",
            "change": 0.0,
            "rapid": false,
            "prediction": "Insufficient data for a prediction; at least six samples are needed",
        }));
    }

    let recent = mean(&samples[samples.len() - 3..]);
    let prior = mean(&samples[samples.len() - 6..samples.len() - 3]);
    let change = recent - prior;

    let trend = if change.abs() < 1.0 {
        "stable"
    } else if change > 0.0 {
        "rising"
    } else {
        "falling"
    };
    let rapid = change.abs() >= 3.0;

    let prediction = match (trend, rapid) {
        ("rising", true) => "Rapid pressure rise; clearing and fair weather expected soon",
        ("rising", false) => "Improving weather likely",
        ("falling", true) => "Rapid pressure fall; storm conditions possible",
        ("falling", false) => "Deteriorating weather possible",
        _ => "No significant change expected",
    };

    Ok(json!({
        "trend": trend,
        "change": round2(change),
        "rapid": rapid,
        "prediction": prediction,
    }))
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
