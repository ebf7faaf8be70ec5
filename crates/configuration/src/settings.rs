use crate::error::ConfigError;
use core_types::DownPaymentType;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub financing: FinancingSettings,
    pub screening: ScreeningSettings,
    pub logging: LoggingSettings,
}

/// Financing terms used when a listing has no saved default for a field
/// and the search did not override it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FinancingSettings {
    /// Annual nominal rate in percent.
    pub mortgage_rate: f64,
    /// Amortization period in years.
    pub amortization_period: u32,
    pub down_payment_type: DownPaymentType,
    /// Percent of price or currency amount, depending on `down_payment_type`.
    pub down_payment_value: f64,
}

/// Default search filters and ordering for the screener.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScreeningSettings {
    pub price: MetricRange,
    pub cash_flow: MetricRange,
    pub roi: MetricRange,
    pub cap_rate: MetricRange,
    pub dscr: MetricRange,
    pub sort_by: SortKey,
}

/// An inclusive numeric range. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetricRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// The metric a screen is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CashFlow,
    Roi,
    CapRate,
    Dscr,
    Price,
}

/// Contains parameters for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set (e.g. "info", "screener=debug").
    pub level: String,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with sensible defaults.

impl Default for FinancingSettings {
    fn default() -> Self {
        Self {
            mortgage_rate: 5.0,
            amortization_period: 25,
            down_payment_type: DownPaymentType::Percent,
            down_payment_value: 20.0,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl MetricRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Inclusive on both ends. NaN fails any present bound but passes an open range.
    pub fn contains(&self, value: f64) -> bool {
        let above_min = self.min.is_none_or(|min| value >= min);
        let below_max = self.max.is_none_or(|max| value <= max);
        above_min && below_max
    }

    /// Keeps each bound of `self`, falling back to the matching bound of `other`.
    pub fn or(self, other: MetricRange) -> MetricRange {
        MetricRange {
            min: self.min.or(other.min),
            max: self.max.or(other.max),
        }
    }
}

impl Config {
    /// Rejects settings the listing form itself would refuse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.financing;
        if f.amortization_period == 0 {
            return Err(ConfigError::ValidationError(
                "financing.amortization_period must be at least 1 year".to_string(),
            ));
        }
        if !f.mortgage_rate.is_finite() || f.mortgage_rate < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "financing.mortgage_rate must be a non-negative percentage, got {}",
                f.mortgage_rate
            )));
        }
        match f.down_payment_type {
            DownPaymentType::Percent if !(0.0..=100.0).contains(&f.down_payment_value) => {
                return Err(ConfigError::ValidationError(format!(
                    "financing.down_payment_value must be within 0-100 for a percent down payment, got {}",
                    f.down_payment_value
                )));
            }
            DownPaymentType::Fixed if !(f.down_payment_value >= 0.0) => {
                return Err(ConfigError::ValidationError(format!(
                    "financing.down_payment_value must not be negative, got {}",
                    f.down_payment_value
                )));
            }
            _ => {}
        }

        let s = &self.screening;
        for (name, range) in [
            ("price", s.price),
            ("cash_flow", s.cash_flow),
            ("roi", s.roi),
            ("cap_rate", s.cap_rate),
            ("dscr", s.dscr),
        ] {
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min > max {
                    return Err(ConfigError::ValidationError(format!(
                        "screening.{name}: min ({min}) exceeds max ({max})"
                    )));
                }
            }
        }

        Ok(())
    }
}
