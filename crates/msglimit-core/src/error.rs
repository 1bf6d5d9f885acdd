use thiserror::Error;

/// A convenience `Result` alias using [`MsgLimitError`].
pub type MsgLimitResult<T> = Result<T, MsgLimitError>;

/// Top-level error type for msglimit.
///
/// The trimmer itself never fails; every variant belongs to the settings
/// layer, the command surface or the binary.
#[derive(Error, Debug)]
pub enum MsgLimitError {
    /// A numeric setter was given a value that is not a finite number.
    /// Nothing is mutated when this is returned.
    #[error("{field} must be a finite number, got '{value}'")]
    InvalidNumericInput {
        /// Human-readable name of the setting (e.g. "Limit").
        field: &'static str,
        /// The raw argument as received.
        value: String,
    },

    /// No command is registered under the requested name.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// The persisted settings document has an unexpected shape.
    #[error("Settings error: {0}")]
    Settings(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
