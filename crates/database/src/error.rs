use models::{error::ValidationError, wizard::FormError};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The review form was driven out of order
    #[error(transparent)]
    Form(FormError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("not allowed to {0}")]
    Forbidden(&'static str),

    #[error("database error: {0}")]
    Transport(#[from] DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(validation) => Self::Validation(validation),
            other => Self::Form(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
