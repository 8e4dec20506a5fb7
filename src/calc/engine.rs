use std::collections::BTreeSet;

use thiserror::Error;

use crate::calc::types::{CalculationInput, CalculationResult};

/// Errors internal to the calculation layer.
///
/// These never escape the dispatcher as `Err`: every variant is encoded
/// into a failed [`CalculationResult`] before reaching a caller.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("No calculation module registered under '{module}'")]
    ModuleNotFound { module: String },

    #[error("Invalid input for module '{module}' calculation '{calc_type}'")]
    InvalidInput { module: String, calc_type: String },

    #[error("Calculation '{calc_type}' is not supported by module '{module}'")]
    UnsupportedCalculation { module: String, calc_type: String },

    #[error("Missing or malformed field '{field}'")]
    MissingField { field: String },

    #[error("Field '{field}' out of range: {message}")]
    OutOfRange { field: String, message: String },

    #[error("Cross-module calculation is not implemented")]
    NotImplemented,

    #[error("Engine failure: {message}")]
    EngineFailure { message: String },
}

/// Capability contract every calculation engine implements to be
/// dispatchable.
///
/// Engines are synchronous, stateless, and deterministic; they never
/// suspend. Registration happens at startup (or later) via
/// [`crate::CalculationDispatcher::register`], so new modules plug in
/// without touching the dispatcher.
pub trait CalculationEngine: Send + Sync {
    /// Run one calculation. Engines may pre-fill result metadata, but the
    /// dispatcher always overwrites the processing time with its own
    /// measurement.
    fn calculate(&self, input: &CalculationInput) -> Result<CalculationResult, CalcError>;

    /// Field-level validation, checked by the dispatcher before
    /// `calculate` runs; invalid input never reaches the formulas.
    fn validate_input(&self, input: &CalculationInput) -> bool;

    /// Calculation kinds this engine supports.
    fn supported_calculations(&self) -> BTreeSet<String>;
}
