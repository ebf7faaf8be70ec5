use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The layout of a rentable unit. Informational only; it never enters the math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    Bachelor,
    #[serde(rename = "1 Bedroom")]
    OneBedroom,
    #[serde(rename = "2 Bedroom")]
    TwoBedroom,
    #[serde(rename = "3 Bedroom+")]
    ThreeBedroomPlus,
    Other,
}

impl UnitType {
    pub fn label(&self) -> &'static str {
        match self {
            UnitType::Bachelor => "Bachelor",
            UnitType::OneBedroom => "1 Bedroom",
            UnitType::TwoBedroom => "2 Bedroom",
            UnitType::ThreeBedroomPlus => "3 Bedroom+",
            UnitType::Other => "Other",
        }
    }
}

/// Whether a unit's rent is at or below market. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RentCategory {
    #[serde(rename = "Market Value")]
    MarketValue,
    #[serde(rename = "Under Market Value")]
    UnderMarketValue,
}

impl RentCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RentCategory::MarketValue => "Market Value",
            RentCategory::UnderMarketValue => "Under Market Value",
        }
    }
}

/// Selects which rent figure a unit contributes to the rent roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VacancyStatus {
    #[default]
    Occupied,
    Vacant,
}

impl VacancyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VacancyStatus::Occupied => "Occupied",
            VacancyStatus::Vacant => "Vacant",
        }
    }
}

/// How `MortgageParams::down_payment_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DownPaymentType {
    /// A percentage of the purchase price, normally 0-100.
    #[default]
    #[serde(alias = "percent", alias = "percentage")]
    Percent,
    /// An absolute currency amount.
    #[serde(alias = "fixed")]
    Fixed,
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for VacancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for RentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for DownPaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownPaymentType::Percent => f.write_str("percent"),
            DownPaymentType::Fixed => f.write_str("fixed"),
        }
    }
}

impl FromStr for DownPaymentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percent" | "percentage" | "%" => Ok(DownPaymentType::Percent),
            "fixed" | "amount" | "$" => Ok(DownPaymentType::Fixed),
            _ => Err(CoreError::UnknownLabel {
                kind: "down payment type",
                label: s.to_string(),
            }),
        }
    }
}
