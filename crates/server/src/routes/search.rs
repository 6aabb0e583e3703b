use crate::{
    dtos::search::{SearchHitResponse, SearchParams, SubjectResponse},
    error::AppResult,
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
};
use database::services::search::SearchService;
use models::subject::Subject;

/// Search universities, faculties and programs by name
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Up to 15 ranked results", body = Vec<SearchHitResponse>)
    ),
    tag = "Search"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<SearchHitResponse>>> {
    let hits = SearchService::search(&state.db, &params.q).await?;
    Ok(Json(hits.into_iter().map(Into::into).collect()))
}

/// Exam subjects a reviewer can report a score for
#[utoipa::path(
    get,
    path = "/subjects",
    responses(
        (status = 200, description = "Known subject codes", body = Vec<SubjectResponse>)
    ),
    tag = "Search"
)]
pub async fn subjects() -> Json<Vec<SubjectResponse>> {
    Json(Subject::all().into_iter().map(Into::into).collect())
}
