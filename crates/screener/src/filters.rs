use crate::error::ScreenerError;
use analytics::CalculatedMetrics;
use configuration::{MetricRange, ScreeningSettings};
use core_types::Property;

/// Numeric range filters from the search panel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricFilters {
    pub price: MetricRange,
    pub cash_flow: MetricRange,
    pub roi: MetricRange,
    pub cap_rate: MetricRange,
    pub dscr: MetricRange,
}

impl MetricFilters {
    pub fn from_settings(settings: &ScreeningSettings) -> Self {
        Self {
            price: settings.price,
            cash_flow: settings.cash_flow,
            roi: settings.roi,
            cap_rate: settings.cap_rate,
            dscr: settings.dscr,
        }
    }

    /// Keeps every bound set here, taking the rest from `defaults`.
    pub fn or(self, defaults: MetricFilters) -> Self {
        Self {
            price: self.price.or(defaults.price),
            cash_flow: self.cash_flow.or(defaults.cash_flow),
            roi: self.roi.or(defaults.roi),
            cap_rate: self.cap_rate.or(defaults.cap_rate),
            dscr: self.dscr.or(defaults.dscr),
        }
    }

    /// True when no filter has a bound, so every listing passes.
    pub fn is_open(&self) -> bool {
        self.named().iter().all(|(_, range)| range.is_open())
    }

    fn named(&self) -> [(&'static str, MetricRange); 5] {
        [
            ("price", self.price),
            ("cash_flow", self.cash_flow),
            ("roi", self.roi),
            ("cap_rate", self.cap_rate),
            ("dscr", self.dscr),
        ]
    }

    pub fn validate(&self) -> Result<(), ScreenerError> {
        for (name, range) in self.named() {
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min > max {
                    return Err(ScreenerError::InvalidFilter { name, min, max });
                }
            }
        }
        Ok(())
    }

    /// Returns the name of the first filter the listing fails, if any.
    ///
    /// Cash flow is compared monthly, ROI and cap rate in percent.
    pub fn first_rejection(
        &self,
        property: &Property,
        metrics: &CalculatedMetrics,
    ) -> Option<&'static str> {
        let values = [
            property.financials.purchase_price,
            metrics.monthly_cash_flow,
            metrics.roi,
            metrics.cap_rate,
            metrics.debt_service_ratio,
        ];
        self.named()
            .into_iter()
            .zip(values)
            .find(|((_, range), value)| !range.contains(*value))
            .map(|((name, _), _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{FinancingDefaults, PropertyFinancials};

    fn listing(price: f64) -> Property {
        Property {
            id: "p".to_string(),
            title: String::new(),
            financials: PropertyFinancials {
                purchase_price: price,
                ..Default::default()
            },
            financing: FinancingDefaults::default(),
        }
    }

    #[test]
    fn open_filters_accept_everything() {
        let metrics = CalculatedMetrics {
            roi: f64::NAN,
            ..Default::default()
        };
        assert_eq!(MetricFilters::default().first_rejection(&listing(1.0), &metrics), None);
    }

    #[test]
    fn first_failing_filter_is_named() {
        let filters = MetricFilters {
            price: MetricRange::new(None, Some(600_000.0)),
            roi: MetricRange::at_least(5.0),
            dscr: MetricRange::at_least(1.2),
            ..Default::default()
        };
        let metrics = CalculatedMetrics {
            roi: 4.0,
            debt_service_ratio: 1.0,
            ..Default::default()
        };

        assert_eq!(filters.first_rejection(&listing(700_000.0), &metrics), Some("price"));
        assert_eq!(filters.first_rejection(&listing(500_000.0), &metrics), Some("roi"));
    }

    #[test]
    fn any_bound_makes_filters_closed() {
        assert!(MetricFilters::default().is_open());
        let filters = MetricFilters {
            dscr: MetricRange::new(None, Some(3.0)),
            ..Default::default()
        };
        assert!(!filters.is_open());
    }

    #[test]
    fn inverted_filter_fails_validation() {
        let filters = MetricFilters {
            cap_rate: MetricRange::new(Some(8.0), Some(4.0)),
            ..Default::default()
        };
        assert_eq!(
            filters.validate(),
            Err(ScreenerError::InvalidFilter {
                name: "cap_rate",
                min: 8.0,
                max: 4.0
            })
        );
    }

    #[test]
    fn explicit_bounds_override_defaults() {
        let cli = MetricFilters {
            roi: MetricRange::at_least(8.0),
            ..Default::default()
        };
        let defaults = MetricFilters {
            roi: MetricRange::at_least(2.0),
            dscr: MetricRange::at_least(1.1),
            ..Default::default()
        };
        let merged = cli.or(defaults);
        assert_eq!(merged.roi, MetricRange::at_least(8.0));
        assert_eq!(merged.dscr, MetricRange::at_least(1.1));
    }
}
