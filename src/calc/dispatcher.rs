//! Single entry point for all client-side calculations.
//!
//! Resolves a module name to a registered engine, validates the input,
//! times the call end-to-end, and encodes every failure into the returned
//! [`CalculationResult`] — callers never handle calculation exceptions.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use parking_lot::RwLock;
use serde_json::Value;

use crate::calc::engine::{CalcError, CalculationEngine};
use crate::calc::engines::WeatherEngine;
use crate::calc::types::{CalculationInput, CalculationMetadata, CalculationResult};
use crate::clock::now_millis;

/// Registry of per-module calculation engines plus the dispatch loop.
///
/// Explicitly constructed and dependency-injected; no global instance.
/// The registry is mutated only by [`register`](Self::register); dispatch
/// is read-only over it.
#[derive(Default)]
pub struct CalculationDispatcher {
    engines: RwLock<BTreeMap<String, Arc<dyn CalculationEngine>>>,
}

impl CalculationDispatcher {
    /// Empty dispatcher; modules arrive via [`register`](Self::register).
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with the stock engines registered.
    ///
    /// Currently that is the `weather` module; finance, ml, and analytics
    /// engines register here once they exist, without dispatcher changes.
    pub fn with_default_engines() -> Self {
        let dispatcher = Self::new();
        dispatcher.register("weather", Arc::new(WeatherEngine));
        dispatcher
    }

    /// Add or overwrite the engine registered under `module`.
    pub fn register(&self, module: &str, engine: Arc<dyn CalculationEngine>) {
        let replaced = self
            .engines
            .write()
            .insert(module.to_string(), engine)
            .is_some();
        tracing::info!(module, replaced, "Registered calculation engine");
    }

    /// Run one calculation; the result encodes any failure.
    ///
    /// `metadata.processing_time_ms` is measured here, from dispatch entry
    /// to completion, and overwrites anything an engine set — timing is
    /// dispatcher-authoritative.
    pub async fn calculate(&self, input: &CalculationInput) -> CalculationResult {
        let started = Instant::now();

        let engine = self.engines.read().get(&input.module).cloned();
        let mut result = match engine {
            None => CalculationResult::fail(
                CalcError::ModuleNotFound {
                    module: input.module.clone(),
                }
                .to_string(),
            ),
            Some(engine) => {
                if !engine.validate_input(input) {
                    CalculationResult::fail(
                        CalcError::InvalidInput {
                            module: input.module.clone(),
                            calc_type: input.calc_type.clone(),
                        }
                        .to_string(),
                    )
                } else {
                    match engine.calculate(input) {
                        Ok(result) => result,
                        Err(err) => {
                            tracing::debug!(
                                module = %input.module,
                                calc_type = %input.calc_type,
                                %err,
                                "Engine reported failure"
                            );
                            CalculationResult::fail(err.to_string())
                        }
                    }
                }
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let metadata = result.metadata.get_or_insert_with(|| CalculationMetadata {
            calculation_type: String::new(),
            timestamp: 0,
            processing_time_ms: 0,
        });
        metadata.processing_time_ms = elapsed_ms;
        if metadata.calculation_type.is_empty() {
            metadata.calculation_type = input.calc_type.clone();
        }
        if metadata.timestamp == 0 {
            metadata.timestamp = now_millis();
        }

        result
    }

    /// Run every input; output order equals input order.
    ///
    /// A settle-all join: one input's failure never loses or corrupts the
    /// results of its siblings.
    pub async fn batch_calculate(&self, inputs: &[CalculationInput]) -> Vec<CalculationResult> {
        join_all(inputs.iter().map(|input| self.calculate(input))).await
    }

    /// Reserved extension seam for calculations spanning modules.
    ///
    /// Always fails with `NotImplemented`; this is a documented open seam,
    /// not a defect.
    pub async fn cross_module_calculate(
        &self,
        _modules: &[String],
        _calc_type: &str,
        _data: &Value,
    ) -> CalculationResult {
        CalculationResult::fail(CalcError::NotImplemented.to_string())
    }

    /// Supported calculations per registered module.
    pub fn all_calculations(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.engines
            .read()
            .iter()
            .map(|(name, engine)| (name.clone(), engine.supported_calculations()))
            .collect()
    }

    /// Supported calculations of one module, if registered.
    pub fn module_calculations(&self, module: &str) -> Option<BTreeSet<String>> {
        self.engines
            .read()
            .get(module)
            .map(|engine| engine.supported_calculations())
    }

    /// Whether `module` is registered and supports `calc_type`.
    pub fn is_calculation_supported(&self, module: &str, calc_type: &str) -> bool {
        self.module_calculations(module)
            .is_some_and(|kinds| kinds.contains(calc_type))
    }

    /// Registered module names, sorted.
    pub fn modules(&self) -> Vec<String> {
        self.engines.read().keys().cloned().collect()
    }
}
