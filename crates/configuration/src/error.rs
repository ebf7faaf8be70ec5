use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file or an environment override could not be read or deserialized.
    #[error("Failed to read rentwise settings: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid rentwise settings: {0}")]
    ValidationError(String),
}
