//! Domain error types.
//!
//! The indicator engine and signal generator never fail; everything here
//! belongs to the layers around them (config, market data, storage, input).

/// Top-level error type for signaldesk.
#[derive(Debug, thiserror::Error)]
pub enum SignaldeskError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("market data error for {pair}: {reason}")]
    MarketData { pair: String, reason: String },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignaldeskError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<&SignaldeskError> for std::process::ExitCode {
    fn from(err: &SignaldeskError) -> Self {
        let code: u8 = match err {
            SignaldeskError::Io(_) => 1,
            SignaldeskError::ConfigParse { .. }
            | SignaldeskError::ConfigMissing { .. }
            | SignaldeskError::ConfigInvalid { .. } => 2,
            SignaldeskError::MarketData { .. } | SignaldeskError::Storage { .. } => 3,
            SignaldeskError::InvalidInput { .. } => 4,
            SignaldeskError::NotFound { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
