use core_types::{RentCategory, RentUnit, UnitType, VacancyStatus};
use serde::{Deserialize, Serialize};

/// One row of the per-unit rent table on the detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRentLine {
    pub unit_type: UnitType,
    pub rent_category: RentCategory,
    pub vacancy_status: VacancyStatus,
    /// The figure this unit contributes to `total_rent`.
    pub effective_rent: f64,
    /// True when `effective_rent` is a projection rather than collected rent.
    pub is_projected: bool,
}

/// The monthly rent a unit contributes to the rent roll.
///
/// Vacant units count at their projected rent, or nothing if none was given.
pub fn effective_rent(unit: &RentUnit) -> f64 {
    match unit.vacancy_status {
        VacancyStatus::Vacant => unit.projected_rent.unwrap_or(0.0),
        VacancyStatus::Occupied => unit.rent_amount,
    }
}

/// Builds the per-unit breakdown, in rent-roll order.
pub fn unit_rent_breakdown(units: &[RentUnit]) -> Vec<UnitRentLine> {
    units
        .iter()
        .map(|unit| UnitRentLine {
            unit_type: unit.unit_type,
            rent_category: unit.rent_category,
            vacancy_status: unit.vacancy_status,
            effective_rent: effective_rent(unit),
            is_projected: unit.vacancy_status == VacancyStatus::Vacant,
        })
        .collect()
}
