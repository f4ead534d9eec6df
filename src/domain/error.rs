//! Domain error types.

/// Top-level error type for quantkit.
#[derive(Debug, thiserror::Error)]
pub enum QuantError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("invalid input: prices and signals must be the same length (prices={prices}, signals={signals})")]
    LengthMismatch { prices: usize, signals: usize },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("invalid contract: {reason}")]
    InvalidContract { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("price source error: {reason}")]
    DataSource { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl QuantError {
    pub(crate) fn input(reason: impl Into<String>) -> Self {
        QuantError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        QuantError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn contract(reason: impl Into<String>) -> Self {
        QuantError::InvalidContract {
            reason: reason.into(),
        }
    }

    /// True for the InvalidInput family, which includes length mismatches.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            QuantError::InvalidInput { .. } | QuantError::LengthMismatch { .. }
        )
    }
}

impl From<&QuantError> for std::process::ExitCode {
    fn from(err: &QuantError) -> Self {
        let code: u8 = match err {
            QuantError::Io(_) => 1,
            QuantError::ConfigParse { .. } | QuantError::ConfigInvalid { .. } => 2,
            QuantError::DataSource { .. } => 3,
            QuantError::InvalidInput { .. }
            | QuantError::LengthMismatch { .. }
            | QuantError::InvalidParameter { .. } => 4,
            QuantError::UnknownStrategy { .. } => 5,
            QuantError::InvalidContract { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
