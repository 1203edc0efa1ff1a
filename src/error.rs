use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A stage left the document in a state no stage may produce.
    #[error("invariant violated after {stage}: {message}")]
    Invariant { stage: String, message: String },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn invariant(stage: &str, message: impl Into<String>) -> Self {
        EngineError::Invariant {
            stage: stage.to_string(),
            message: message.into(),
        }
    }
}
