//! # Rentwise Core Types
//!
//! The plain value records that flow into the financial metrics engine: a
//! property's rent roll, its annual operating expenses, and the financing
//! assumptions used to price its mortgage.
//!
//! As a Layer 0 crate, it depends on nothing else in the workspace.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{DownPaymentType, RentCategory, UnitType, VacancyStatus};
pub use error::CoreError;
pub use structs::{
    FinancingDefaults, MortgageParams, OperatingExpenses, Property, PropertyFinancials, RentUnit,
};
