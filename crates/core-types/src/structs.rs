use crate::enums::{DownPaymentType, RentCategory, UnitType, VacancyStatus};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// A single rentable unit on a property's rent roll. Amounts are monthly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentUnit {
    pub unit_type: UnitType,
    /// Rent collected while the unit is occupied.
    pub rent_amount: f64,
    pub rent_category: RentCategory,
    #[serde(default)]
    pub vacancy_status: VacancyStatus,
    /// Rent expected once a vacant unit is leased.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_rent: Option<f64>,
}

impl RentUnit {
    pub fn occupied(unit_type: UnitType, rent_amount: f64) -> Self {
        Self {
            unit_type,
            rent_amount,
            rent_category: RentCategory::MarketValue,
            vacancy_status: VacancyStatus::Occupied,
            projected_rent: None,
        }
    }

    pub fn vacant(unit_type: UnitType, rent_amount: f64, projected_rent: Option<f64>) -> Self {
        Self {
            unit_type,
            rent_amount,
            rent_category: RentCategory::MarketValue,
            vacancy_status: VacancyStatus::Vacant,
            projected_rent,
        }
    }
}

/// Operating expenses of a property.
///
/// Every field is an **annual** total in currency units. Listing forms label
/// these without a period suffix, but they are stored and interpreted per
/// year; the metrics engine divides their sum by 12 for the monthly figure.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingExpenses {
    pub property_taxes: f64,
    pub insurance: f64,
    pub hydro: f64,
    pub gas: f64,
    pub water: f64,
    pub waste_management: f64,
    pub maintenance: f64,
    pub management_fees: f64,
    pub miscellaneous: f64,
}

impl OperatingExpenses {
    /// Field names paired with their annual amounts, in form order.
    pub fn line_items(&self) -> [(&'static str, f64); 9] {
        [
            ("property_taxes", self.property_taxes),
            ("insurance", self.insurance),
            ("hydro", self.hydro),
            ("gas", self.gas),
            ("water", self.water),
            ("waste_management", self.waste_management),
            ("maintenance", self.maintenance),
            ("management_fees", self.management_fees),
            ("miscellaneous", self.miscellaneous),
        ]
    }
}

/// The subset of a property record consumed by the metrics engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyFinancials {
    pub purchase_price: f64,
    #[serde(default)]
    pub units: Vec<RentUnit>,
    #[serde(flatten)]
    pub expenses: OperatingExpenses,
}

/// The financing assumptions used to price a mortgage for one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortgageParams {
    /// Normally equal to `PropertyFinancials::purchase_price`.
    pub purchase_price: f64,
    /// Annual nominal rate in percent (5.5 means 5.5% per year).
    pub mortgage_rate: f64,
    /// Amortization period in whole years.
    pub amortization_period: u32,
    pub down_payment_type: DownPaymentType,
    /// A percentage when `down_payment_type` is `Percent`, otherwise a currency amount.
    pub down_payment_value: f64,
}

/// Financing terms saved on a listing. Any of them may be missing, in which
/// case the caller falls back to search overrides or configured defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingDefaults {
    pub mortgage_rate: Option<f64>,
    pub amortization_period: Option<u32>,
    pub down_payment_type: Option<DownPaymentType>,
    pub down_payment_amount: Option<f64>,
}

/// A listing as supplied by the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub financials: PropertyFinancials,
    #[serde(flatten)]
    pub financing: FinancingDefaults,
}

impl Property {
    /// Checks the rules the listing form enforces before a property is saved.
    ///
    /// The engine never calls this; it is for callers that ingest records
    /// from outside the form and want to flag suspicious ones.
    pub fn validate(&self) -> Result<(), CoreError> {
        let f = &self.financials;
        if !(f.purchase_price > 0.0) {
            return Err(CoreError::InvalidInput(
                "purchase_price".to_string(),
                format!("must be positive, got {}", f.purchase_price),
            ));
        }

        for (index, unit) in f.units.iter().enumerate() {
            if unit.rent_amount < 0.0 {
                return Err(CoreError::InvalidInput(
                    format!("units[{index}].rentAmount"),
                    format!("must not be negative, got {}", unit.rent_amount),
                ));
            }
            match (unit.vacancy_status, unit.projected_rent) {
                (VacancyStatus::Vacant, None) => {
                    return Err(CoreError::InvalidInput(
                        format!("units[{index}].projectedRent"),
                        "is required for a vacant unit".to_string(),
                    ));
                }
                (_, Some(projected)) if projected < 0.0 => {
                    return Err(CoreError::InvalidInput(
                        format!("units[{index}].projectedRent"),
                        format!("must not be negative, got {projected}"),
                    ));
                }
                _ => {}
            }
        }

        if let Some((name, amount)) = f.expenses.line_items().into_iter().find(|(_, v)| *v < 0.0) {
            return Err(CoreError::InvalidInput(
                name.to_string(),
                format!("must not be negative, got {amount}"),
            ));
        }

        if let (Some(DownPaymentType::Percent), Some(pct)) =
            (self.financing.down_payment_type, self.financing.down_payment_amount)
        {
            if !(0.0..=100.0).contains(&pct) {
                return Err(CoreError::InvalidInput(
                    "down_payment_amount".to_string(),
                    format!("percent down payment must be within 0-100, got {pct}"),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_json() -> &'static str {
        r#"{
            "id": "p-1",
            "title": "Fourplex on Elm",
            "purchase_price": 500000,
            "property_taxes": 6000,
            "insurance": 1200,
            "mortgage_rate": 4.5,
            "down_payment_type": "percentage",
            "down_payment_amount": 25,
            "units": [
                {"unitType": "2 Bedroom", "rentAmount": 1800, "rentCategory": "Market Value", "vacancyStatus": "Occupied"},
                {"unitType": "Bachelor", "rentAmount": 0, "rentCategory": "Under Market Value", "vacancyStatus": "Vacant", "projectedRent": 1100}
            ]
        }"#
    }

    #[test]
    fn property_deserializes_from_flat_listing_record() {
        let property: Property = serde_json::from_str(listing_json()).unwrap();

        assert_eq!(property.financials.purchase_price, 500000.0);
        assert_eq!(property.financials.expenses.property_taxes, 6000.0);
        assert_eq!(property.financials.expenses.hydro, 0.0);
        assert_eq!(property.financials.units.len(), 2);
        assert_eq!(property.financials.units[1].projected_rent, Some(1100.0));
        assert_eq!(property.financing.mortgage_rate, Some(4.5));
        assert_eq!(property.financing.amortization_period, None);
        assert_eq!(property.financing.down_payment_type, Some(DownPaymentType::Percent));
    }

    #[test]
    fn validate_accepts_a_well_formed_listing() {
        let property: Property = serde_json::from_str(listing_json()).unwrap();
        assert_eq!(property.validate(), Ok(()));
    }

    #[test]
    fn validate_requires_projected_rent_on_vacant_units() {
        let mut property: Property = serde_json::from_str(listing_json()).unwrap();
        property.financials.units[1].projected_rent = None;

        let err = property.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(field, _) if field == "units[1].projectedRent"));
    }

    #[test]
    fn validate_rejects_negative_expense() {
        let mut property: Property = serde_json::from_str(listing_json()).unwrap();
        property.financials.expenses.water = -10.0;

        let err = property.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(field, _) if field == "water"));
    }

    #[test]
    fn validate_rejects_out_of_range_percent_down() {
        let mut property: Property = serde_json::from_str(listing_json()).unwrap();
        property.financing.down_payment_amount = Some(120.0);
        assert!(property.validate().is_err());
    }
}
