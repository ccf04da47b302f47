//! Domain error types.
//!
//! Absent or insufficient price history is never an error; every such case has a
//! sentinel result. Only malformed input shapes and bad configuration end up here.

/// Top-level error type for trendcast.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
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

    #[error("invalid parameter {name}: {reason}")]
    InvalidParam { name: String, reason: String },

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn invalid_param(name: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidParam {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the shape of a request rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidParam { .. } | EngineError::UnknownStrategy(_)
        )
    }
}

impl From<&EngineError> for std::process::ExitCode {
    fn from(err: &EngineError) -> Self {
        let code: u8 = match err {
            EngineError::Io(_) => 1,
            EngineError::ConfigParse { .. }
            | EngineError::ConfigMissing { .. }
            | EngineError::ConfigInvalid { .. } => 2,
            EngineError::InvalidParam { .. } | EngineError::UnknownStrategy(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}
