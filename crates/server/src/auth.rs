use crate::{error::AppError, state::AppState};
use axum::{extract::FromRequestParts, http::request::Parts};
use database::services::profile::ProfileService;
use models::viewer::Viewer;
use tower_oauth2_resource_server::claims::DefaultClaims;

/// Token subject of the request, as validated by the resource server layer
pub fn subject(parts: &Parts) -> Result<String, AppError> {
    parts
        .extensions
        .get::<DefaultClaims>()
        .and_then(|claims| claims.sub.clone())
        .ok_or(AppError::Unauthorized)
}

/// Token subject of a signed-in user, without a profile lookup
pub struct Subject(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Subject {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        subject(parts).map(Subject)
    }
}

/// The signed-in user with their role resolved from the profile table
pub struct CurrentUser(pub Viewer);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let sub = subject(parts)?;
        let viewer = ProfileService::viewer(&state.db, &sub).await?;
        Ok(CurrentUser(viewer))
    }
}

/// A signed-in user holding the admin role
pub struct AdminUser(pub Viewer);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(viewer) = CurrentUser::from_request_parts(parts, state).await?;
        if !viewer.is_admin() {
            return Err(AppError::AdminOnly);
        }
        Ok(AdminUser(viewer))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_missing_claims_is_unauthorized() {
        let (parts, _) = Request::new(()).into_parts();
        assert!(matches!(subject(&parts), Err(AppError::Unauthorized)));
    }
}
