use thiserror::Error;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    RecurError(#[from] curtain_recur::error::RecurError),

    #[error("Rule rejected: {}", .0.join(" "))]
    Invalid(Vec<String>),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

impl ServiceError {
    /// Validation messages, when the error is a rejected rule or edit.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Invalid(messages) => messages,
            _ => &[],
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
