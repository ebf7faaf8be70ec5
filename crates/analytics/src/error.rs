use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    #[error("Metric '{0}' is not a finite number and cannot be rounded for display")]
    NonFinite(&'static str),

    #[error("An amortization schedule needs a term of at least one year, got {0}")]
    InvalidTerm(u32),
}
