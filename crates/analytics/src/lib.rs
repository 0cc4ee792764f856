//! # Quantview CAPM Engine
//!
//! This crate computes the market-risk side of the dashboard: daily returns,
//! normalized growth curves, beta/alpha regressions against a benchmark and
//! the CAPM expected return.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no knowledge of the price provider or the UI. It depends
//!   only on `core-types` and `configuration`.
//! - **Stateless calculation:** `CapmEngine` holds its constants and nothing
//!   else. Every table it reads is rebuilt per request by the caller.
//!
//! ## Public API
//!
//! - `daily_return`, `normalize`, `annualized_mean`: return-series helpers.
//! - `CapmEngine`: regression, market return and expected return.
//! - `CapmReport`, `ScatterPoint`: plain outputs for the table and chart consumers.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod returns;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{CapmEngine, expected_return};
pub use error::AnalyticsError;
pub use report::{CapmReport, ScatterPoint};
pub use returns::{annualized_mean, daily_return, normalize};
