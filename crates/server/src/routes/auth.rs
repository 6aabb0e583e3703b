use crate::{
    auth::{CurrentUser, Subject},
    dtos::auth::{MeResponse, ProfileRequest},
    error::AppResult,
    state::AppState,
};
use axum::{Json, extract::State};
use database::services::profile::ProfileService;

/// The signed-in user and their role
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Successfully authenticated", body = MeResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT")
    ),
    security(("jwt" = [])),
    tag = "Authentication"
)]
pub async fn me(CurrentUser(viewer): CurrentUser) -> Json<MeResponse> {
    Json(viewer.into())
}

/// Creates or refreshes the caller's profile after sign-in
#[utoipa::path(
    post,
    path = "/me",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile stored", body = MeResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT")
    ),
    security(("jwt" = [])),
    tag = "Authentication"
)]
pub async fn sign_in(
    State(state): State<AppState>,
    Subject(sub): Subject,
    Json(body): Json<ProfileRequest>,
) -> AppResult<Json<MeResponse>> {
    ProfileService::upsert_profile(&state.db, &sub, body.into()).await?;

    let viewer = ProfileService::viewer(&state.db, &sub).await?;
    Ok(Json(viewer.into()))
}
