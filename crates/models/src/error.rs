use thiserror::Error;

/// A missing or malformed field, caught before anything is written
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    #[error("parent {0} does not exist")]
    MissingParent(&'static str),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    #[error("{0} rating has not been chosen")]
    MissingRating(&'static str),

    #[error("admission round must be between 1 and 4, got {0}")]
    InvalidRound(u8),

    #[error("admission year must be a Buddhist-calendar year between 2500 and 2700, got {0}")]
    AdmissionYearOutOfRange(u16),

    #[error("unknown study year: {0}")]
    InvalidStudyYear(String),

    #[error("unknown degree type: {0}")]
    UnknownDegreeType(String),

    #[error("unknown review type: {0}")]
    UnknownReviewType(String),

    #[error("round {round} does not accept {extras} details")]
    ExtrasRoundMismatch { round: u8, extras: &'static str },

    #[error("GPAX must be between 0.00 and 4.00, got {0}")]
    GpaxOutOfRange(f64),

    #[error("score for {subject} must be between 0 and 100, got {value}")]
    ScoreOutOfRange { subject: String, value: f64 },

    #[error("score subject code must not be empty")]
    EmptySubject,
}
