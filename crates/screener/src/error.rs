use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ScreenerError {
    #[error("Filter '{name}' is inverted: min ({min}) exceeds max ({max})")]
    InvalidFilter { name: &'static str, min: f64, max: f64 },
}
