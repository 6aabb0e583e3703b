use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::ServiceError;
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing or invalid bearer token")]
    Unauthorized,

    #[error("Admin role required")]
    AdminOnly,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::AdminOnly => StatusCode::FORBIDDEN,
            AppError::Service(err) => match err {
                ServiceError::Validation(_) | ServiceError::Form(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
                ServiceError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<models::error::ValidationError> for AppError {
    fn from(err: models::error::ValidationError) -> Self {
        AppError::Service(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Service(ServiceError::Transport(e)) => {
                error!("Database error: {e}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod test {
    use super::*;
    use models::error::ValidationError;
    use sea_orm::DbErr;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::AdminOnly, StatusCode::FORBIDDEN),
            (
                ValidationError::EmptyName("faculty name").into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::not_found("program", "x").into(),
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::Forbidden("delete another user's review").into(),
                StatusCode::FORBIDDEN,
            ),
            (
                ServiceError::Transport(DbErr::Custom("down".to_string())).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
