//! # Rentwise Analytics Engine
//!
//! The financial model behind every listing card, search filter and detail
//! page: mortgage payment, rent roll, NOI, cash flow, cap rate, cash-on-cash
//! ROI, DSCR and first-year principal paydown.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every operation is a pure function of its inputs. Nothing is
//!   cached and nothing is mutated, so calls for different properties can run on any thread.
//! - **No new failure modes:** Calculations return plain `f64` values. The three
//!   division-by-zero cases (zero rate, zero down payment, zero debt service) have defined
//!   fallbacks; every other input is passed through the formulas unvalidated.
//!
//! ## Public API
//!
//! - `MetricsEngine`: `compute_metrics` and `dynamic_cash_flow`.
//! - Formula primitives: `down_payment`, `monthly_mortgage_payment`, `total_monthly_rent`,
//!   `total_operating_expenses`, `yearly_principal_paydown`, `full_yearly_roi`.
//! - `amortization_schedule` and `unit_rent_breakdown` for the detail view.
//! - `CalculatedMetrics`, `MetricsCard`, `RoundedMetrics`: the output records, and
//!   `round_half_away` for displaying any other engine value the same way.

// Declare the modules that constitute this crate.
pub mod breakdown;
pub mod engine;
pub mod error;
pub mod report;
pub mod schedule;

// Re-export the key components to create a clean, public-facing API.
pub use breakdown::{UnitRentLine, effective_rent, unit_rent_breakdown};
pub use engine::{
    MetricsEngine, down_payment, full_yearly_roi, monthly_mortgage_payment, total_monthly_rent,
    total_operating_expenses, yearly_principal_paydown,
};
pub use error::AnalyticsError;
pub use report::{CalculatedMetrics, MetricsCard, RoundedMetrics, round_half_away};
pub use schedule::{AmortizationYear, amortization_schedule};
