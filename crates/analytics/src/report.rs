use crate::error::AnalyticsError;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// The complete set of investment metrics for one (property, financing) pair.
///
/// This struct is the sole output of the `MetricsEngine`. Every field is derived;
/// currency amounts are monthly unless the name says annual, and `roi`,
/// `cap_rate` and `full_yearly_roi` are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculatedMetrics {
    // I. Income
    pub total_rent: f64,
    pub total_expenses: f64,
    pub net_operating_income: f64,
    pub annual_rent: f64,
    pub annual_operating_expenses: f64,

    // II. Financing
    pub down_payment_amount: f64,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub annual_debt_service: f64,

    // III. Cash Flow
    pub monthly_cash_flow: f64,
    pub annual_cash_flow: f64,

    // IV. Returns
    pub roi: f64,
    pub cap_rate: f64,
    pub debt_service_ratio: f64, // a ratio, not a percentage
    pub yearly_principal_paydown: f64,
    pub full_yearly_roi: f64,
}

/// The subset of metrics shown on a listing card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsCard {
    pub monthly_payment: f64,
    pub monthly_cash_flow: f64,
    pub roi: f64,
    pub cap_rate: f64,
}

/// Display-ready metrics: currency and percentages to cents, DSCR to four places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundedMetrics {
    pub total_rent: Decimal,
    pub total_expenses: Decimal,
    pub net_operating_income: Decimal,
    pub annual_rent: Decimal,
    pub annual_operating_expenses: Decimal,
    pub down_payment_amount: Decimal,
    pub loan_amount: Decimal,
    pub monthly_payment: Decimal,
    pub annual_debt_service: Decimal,
    pub monthly_cash_flow: Decimal,
    pub annual_cash_flow: Decimal,
    pub roi: Decimal,
    pub cap_rate: Decimal,
    pub debt_service_ratio: Decimal,
    pub yearly_principal_paydown: Decimal,
    pub full_yearly_roi: Decimal,
}

impl CalculatedMetrics {
    /// Creates a new, zeroed-out bundle.
    /// The zero values double as the fallbacks for the guarded ratios.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card_summary(&self) -> MetricsCard {
        MetricsCard {
            monthly_payment: self.monthly_payment,
            monthly_cash_flow: self.monthly_cash_flow,
            roi: self.roi,
            cap_rate: self.cap_rate,
        }
    }

    /// Rounds every displayed metric half away from zero.
    ///
    /// Fails on the first metric that is NaN, infinite, or too large for a
    /// `Decimal`, which only happens for inputs upstream validation would reject.
    pub fn rounded(&self) -> Result<RoundedMetrics, AnalyticsError> {
        Ok(RoundedMetrics {
            total_rent: to_decimal("total_rent", self.total_rent, 2)?,
            total_expenses: to_decimal("total_expenses", self.total_expenses, 2)?,
            net_operating_income: to_decimal("net_operating_income", self.net_operating_income, 2)?,
            annual_rent: to_decimal("annual_rent", self.annual_rent, 2)?,
            annual_operating_expenses: to_decimal(
                "annual_operating_expenses",
                self.annual_operating_expenses,
                2,
            )?,
            down_payment_amount: to_decimal("down_payment_amount", self.down_payment_amount, 2)?,
            loan_amount: to_decimal("loan_amount", self.loan_amount, 2)?,
            monthly_payment: to_decimal("monthly_payment", self.monthly_payment, 2)?,
            annual_debt_service: to_decimal("annual_debt_service", self.annual_debt_service, 2)?,
            monthly_cash_flow: to_decimal("monthly_cash_flow", self.monthly_cash_flow, 2)?,
            annual_cash_flow: to_decimal("annual_cash_flow", self.annual_cash_flow, 2)?,
            roi: to_decimal("roi", self.roi, 2)?,
            cap_rate: to_decimal("cap_rate", self.cap_rate, 2)?,
            debt_service_ratio: to_decimal("debt_service_ratio", self.debt_service_ratio, 4)?,
            yearly_principal_paydown: to_decimal(
                "yearly_principal_paydown",
                self.yearly_principal_paydown,
                2,
            )?,
            full_yearly_roi: to_decimal("full_yearly_roi", self.full_yearly_roi, 2)?,
        })
    }
}

/// Rounds `value` to `dp` places, half away from zero.
///
/// `None` for NaN, infinities and magnitudes a `Decimal` cannot hold.
pub fn round_half_away(value: f64, dp: u32) -> Option<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}

fn to_decimal(name: &'static str, value: f64, dp: u32) -> Result<Decimal, AnalyticsError> {
    round_half_away(value, dp).ok_or(AnalyticsError::NonFinite(name))
}
