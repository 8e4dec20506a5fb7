//! Calculation dispatch: typed requests routed to per-module engines.
//!
//! All failures come back encoded in [`CalculationResult`]; nothing in
//! this layer raises to its caller.

mod dispatcher;
mod engine;
pub mod engines;
mod types;

pub use dispatcher::CalculationDispatcher;
pub use engine::{CalcError, CalculationEngine};
pub use types::{CalculationInput, CalculationMetadata, CalculationResult};
