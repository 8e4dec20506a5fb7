use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One calculation request, routed by `module` and `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Calculation kind within the module (e.g., "dew_point").
    #[serde(rename = "type")]
    pub calc_type: String,
    /// Target module name (e.g., "weather").
    pub module: String,
    /// Kind-specific payload; the engine's validator defines its shape.
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

/// Timing and provenance attached to every dispatched result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationMetadata {
    pub calculation_type: String,
    /// Unix milliseconds at completion.
    pub timestamp: u64,
    /// Wall-clock duration measured by the dispatcher, never by engines.
    pub processing_time_ms: u64,
}

/// Outcome of a calculation. Always returned, never thrown: `success:
/// false` is the normal error path, so batch and UI callers inspect every
/// outcome uniformly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResult {
    pub success: bool,
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CalculationMetadata>,
}

impl CalculationResult {
    /// Successful result carrying `data`; metadata is filled by the
    /// dispatcher.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: None,
        }
    }

    /// Encoded failure carrying a human-readable reason.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(reason.into()),
            metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_wire_shape_uses_type_key() {
        let input: CalculationInput = serde_json::from_value(json!({
            "type": "dew_point",
            "module": "weather",
            "data": { "temperature": 20.0, "humidity": 60.0 }
        }))
        .unwrap();
        assert_eq!(input.calc_type, "dew_point");
        assert!(input.options.is_none());

        let round_tripped = serde_json::to_value(&input).unwrap();
        assert_eq!(round_tripped["type"], "dew_point");
    }

    #[test]
    fn test_fail_encodes_error() {
        let result = CalculationResult::fail("boom");
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.error.as_deref(), Some("boom"));
    }
}
