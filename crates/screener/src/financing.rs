use configuration::FinancingSettings;
use core_types::{DownPaymentType, MortgageParams, Property};

/// Financing terms typed into the search panel. Any field left empty falls
/// through to the listing's saved default, then to the configured fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinancingOverrides {
    pub mortgage_rate: Option<f64>,
    pub amortization_period: Option<u32>,
    pub down_payment_type: Option<DownPaymentType>,
    pub down_payment_value: Option<f64>,
}

impl FinancingOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Builds the `MortgageParams` a listing is evaluated with.
///
/// Rate and amortization resolve field by field. The down payment resolves as a
/// (type, value) pair taken from the first source that supplies a value, so a
/// percentage is never read as a dollar amount or the other way round. The
/// purchase price always comes from the listing.
pub fn resolve_financing(
    property: &Property,
    overrides: &FinancingOverrides,
    fallback: &FinancingSettings,
) -> MortgageParams {
    let saved = &property.financing;

    let mortgage_rate = overrides
        .mortgage_rate
        .or(saved.mortgage_rate)
        .unwrap_or(fallback.mortgage_rate);

    let amortization_period = overrides
        .amortization_period
        .or(saved.amortization_period)
        .unwrap_or(fallback.amortization_period);

    let (down_payment_type, down_payment_value) =
        match (overrides.down_payment_value, saved.down_payment_amount) {
            (Some(value), _) => (
                overrides
                    .down_payment_type
                    .or(saved.down_payment_type)
                    .unwrap_or(fallback.down_payment_type),
                value,
            ),
            (None, Some(value)) => (
                saved.down_payment_type.unwrap_or(fallback.down_payment_type),
                value,
            ),
            (None, None) => (fallback.down_payment_type, fallback.down_payment_value),
        };

    MortgageParams {
        purchase_price: property.financials.purchase_price,
        mortgage_rate,
        amortization_period,
        down_payment_type,
        down_payment_value,
    }
}
