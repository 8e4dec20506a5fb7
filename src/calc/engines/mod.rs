//! Concrete calculation engines, one per module.
//!
//! Only the weather engine exists today; finance, ml, and analytics
//! engines slot in through [`crate::CalculationDispatcher::register`]
//! when their modules land.

mod weather;

pub use weather::WeatherEngine;
