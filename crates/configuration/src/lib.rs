use config::{Environment, File, FileFormat};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    Config, FinancingSettings, LoggingSettings, MetricRange, ScreeningSettings, SortKey,
};

/// The file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "rentwise.toml";

/// Loads the application configuration.
///
/// Reads `path`, or `rentwise.toml` in the working directory when no path is
/// given, then layers `RENTWISE__<SECTION>__<KEY>` environment variables on
/// top, e.g. `RENTWISE__FINANCING__MORTGAGE_RATE=4.25`. Every key has a
/// default, so only an explicitly named file has to exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let (name, required) = match path {
        Some(p) => (p.to_string_lossy().into_owned(), true),
        None => (DEFAULT_CONFIG_FILE.to_string(), false),
    };
    tracing::debug!(file = %name, required, "loading configuration");

    let builder = config::Config::builder()
        .add_source(File::with_name(&name).required(required))
        .add_source(
            Environment::with_prefix("RENTWISE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    finish(builder)
}

/// Parses configuration from TOML text, without consulting the environment.
pub fn load_config_from_str(toml: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::DownPaymentType;

    #[test]
    fn empty_file_yields_defaults() {
        let config = load_config_from_str("").unwrap();

        assert_eq!(config.financing, FinancingSettings::default());
        assert_eq!(config.financing.mortgage_rate, 5.0);
        assert_eq!(config.financing.amortization_period, 25);
        assert_eq!(config.screening.sort_by, SortKey::CashFlow);
        assert!(config.screening.roi.is_open());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn sections_override_defaults() {
        let config = load_config_from_str(
            r#"
            [financing]
            mortgage_rate = 6.25
            down_payment_type = "fixed"
            down_payment_value = 90000

            [screening]
            sort_by = "cap_rate"

            [screening.cash_flow]
            min = 0

            [screening.price]
            max = 750000
            "#,
        )
        .unwrap();

        assert_eq!(config.financing.mortgage_rate, 6.25);
        assert_eq!(config.financing.amortization_period, 25);
        assert_eq!(config.financing.down_payment_type, DownPaymentType::Fixed);
        assert_eq!(config.financing.down_payment_value, 90_000.0);
        assert_eq!(config.screening.sort_by, SortKey::CapRate);
        assert_eq!(config.screening.cash_flow, MetricRange::at_least(0.0));
        assert_eq!(config.screening.price, MetricRange::new(None, Some(750_000.0)));
    }

    #[test]
    fn zero_amortization_period_is_rejected() {
        let err = load_config_from_str("[financing]\namortization_period = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("amortization_period")));
    }

    #[test]
    fn percent_down_payment_above_hundred_is_rejected() {
        let err = load_config_from_str("[financing]\ndown_payment_value = 120").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = load_config_from_str("[screening.roi]\nmin = 10\nmax = 5").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("screening.roi")));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let config = load_config(Some(Path::new("definitely/not/here.toml")));
        assert!(matches!(config, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = MetricRange::new(Some(1.0), Some(2.0));
        assert!(range.contains(1.0));
        assert!(range.contains(2.0));
        assert!(!range.contains(2.0001));
        assert!(!range.contains(f64::NAN));
        assert!(MetricRange::default().contains(f64::NAN));
    }

    #[test]
    fn range_or_fills_missing_bounds() {
        let cli = MetricRange::new(Some(3.0), None);
        let configured = MetricRange::new(Some(1.0), Some(9.0));
        assert_eq!(cli.or(configured), MetricRange::new(Some(3.0), Some(9.0)));
    }
}
