use thiserror::Error;

/// Errors raised while parsing explicit caller input.
///
/// Expansion, merging, and validation never fail; see `Frequency::Malformed`
/// and `validate_rule`.
#[derive(Error, Debug)]
pub enum RecurError {
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Unknown weekday code: {0}")]
    UnknownWeekday(String),

    #[error("Unknown frequency: {0}")]
    UnknownFrequency(String),
}

pub type RecurResult<T> = std::result::Result<T, RecurError>;
