use thiserror::Error;

/// Calculator failures.
///
/// Everything except `UnknownToken` is shown to the user as the single
/// `Error` display; the variant is kept for logging.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    #[error("malformed number: {0:?}")]
    MalformedNumber(String),

    #[error("unknown token: {0:?}")]
    UnknownToken(String),
}

impl CalcError {
    pub(crate) fn domain(message: impl Into<String>) -> Self {
        Self::InvalidDomain(message.into())
    }
}
