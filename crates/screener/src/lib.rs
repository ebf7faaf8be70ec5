//! # Rentwise Screener
//!
//! The search side of the listing site: resolves financing for every listing,
//! runs it through the metrics engine, drops listings outside the requested
//! ranges and orders what is left.
//!
//! Listings are independent of one another, so a screen is evaluated in
//! parallel with `rayon`. Nothing is cached between screens; memoizing by
//! (listing, financing) belongs to whoever owns the listing store.

use analytics::{CalculatedMetrics, MetricsEngine};
use configuration::{Config, FinancingSettings, MetricRange, SortKey};
use core_types::{MortgageParams, Property};
use rayon::prelude::*;
use std::cmp::Ordering;

pub mod error;
pub mod filters;
pub mod financing;

pub use error::ScreenerError;
pub use filters::MetricFilters;
pub use financing::{FinancingOverrides, resolve_financing};

/// A listing that passed every filter, with the terms and metrics it was judged on.
#[derive(Debug, Clone)]
pub struct ScreenedProperty<'a> {
    pub property: &'a Property,
    pub params: MortgageParams,
    pub metrics: CalculatedMetrics,
}

/// Filters and ranks listings by their computed investment metrics.
#[derive(Debug, Clone)]
pub struct Screener {
    engine: MetricsEngine,
    fallback: FinancingSettings,
    filters: MetricFilters,
    sort_by: SortKey,
}

impl Screener {
    /// Creates a screener using the configured fallback terms, filters and order.
    pub fn new(config: &Config) -> Self {
        Self {
            engine: MetricsEngine::new(),
            fallback: config.financing,
            filters: MetricFilters::from_settings(&config.screening),
            sort_by: config.screening.sort_by,
        }
    }

    pub fn with_filters(mut self, filters: MetricFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Evaluates, filters and ranks `properties` under the given search overrides.
    ///
    /// An empty slice yields an empty result.
    pub fn screen<'a>(
        &self,
        properties: &'a [Property],
        overrides: &FinancingOverrides,
    ) -> Result<Vec<ScreenedProperty<'a>>, ScreenerError> {
        self.filters.validate()?;
        let filtering = !self.filters.is_open();

        let mut matches: Vec<ScreenedProperty<'a>> = properties
            .par_iter()
            .filter_map(|property| {
                let params = resolve_financing(property, overrides, &self.fallback);
                let metrics = self.engine.compute_metrics(&property.financials, &params);

                let rejection = if filtering {
                    self.filters.first_rejection(property, &metrics)
                } else {
                    None
                };
                match rejection {
                    Some(filter) => {
                        tracing::debug!(property = %property.id, filter, "listing filtered out");
                        None
                    }
                    None => Some(ScreenedProperty {
                        property,
                        params,
                        metrics,
                    }),
                }
            })
            .collect();

        let sort_by = self.sort_by;
        matches.sort_by(|a, b| compare_for(sort_by, a, b));

        tracing::info!(
            listings = properties.len(),
            matched = matches.len(),
            filtering,
            overridden = !overrides.is_empty(),
            sort_by = ?sort_by,
            "screen complete"
        );
        Ok(matches)
    }

    /// Whether a listing's monthly cash flow falls in `range`.
    ///
    /// Uses the cash-flow-only path, so it agrees with `screen` while being
    /// cheap enough to rerun on every slider movement.
    pub fn cash_flow_matches(
        &self,
        property: &Property,
        overrides: &FinancingOverrides,
        range: &MetricRange,
    ) -> bool {
        let params = resolve_financing(property, overrides, &self.fallback);
        range.contains(self.engine.dynamic_cash_flow(&property.financials, &params))
    }

    /// The listings whose monthly cash flow falls in `range`, in input order.
    pub fn filter_by_cash_flow<'a>(
        &self,
        properties: &'a [Property],
        overrides: &FinancingOverrides,
        range: &MetricRange,
    ) -> Vec<&'a Property> {
        properties
            .par_iter()
            .filter(|property| self.cash_flow_matches(property, overrides, range))
            .collect()
    }
}

fn sort_value(key: SortKey, entry: &ScreenedProperty<'_>) -> f64 {
    match key {
        SortKey::CashFlow => entry.metrics.monthly_cash_flow,
        SortKey::Roi => entry.metrics.roi,
        SortKey::CapRate => entry.metrics.cap_rate,
        SortKey::Dscr => entry.metrics.debt_service_ratio,
        SortKey::Price => entry.property.financials.purchase_price,
    }
}

/// Best first: highest metric, except price which is cheapest first. NaN sorts last.
fn compare_for(key: SortKey, a: &ScreenedProperty<'_>, b: &ScreenedProperty<'_>) -> Ordering {
    let (x, y) = (sort_value(key, a), sort_value(key, b));
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if key == SortKey::Price => x.total_cmp(&y),
        (false, false) => y.total_cmp(&x),
    }
}
