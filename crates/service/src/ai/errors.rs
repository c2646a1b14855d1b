use thiserror::Error;

/// Assistant failures. They never reach an HTTP caller: `AiService` swaps in a fallback.
#[derive(Debug, Error)]
pub enum AiError {
    /// Transport failure, timeout, or the upstream said it is overloaded.
    #[error("assistant unavailable: {0}")]
    Unavailable(String),
    #[error("assistant rejected the request: {0}")]
    Upstream(String),
    #[error("unusable assistant answer: {0}")]
    Parse(String),
}

impl AiError {
    pub fn kind(&self) -> &'static str {
        match self {
            AiError::Unavailable(_) => "unavailable",
            AiError::Upstream(_) => "upstream",
            AiError::Parse(_) => "parse",
        }
    }
}
