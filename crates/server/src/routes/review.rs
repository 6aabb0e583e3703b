use crate::{
    auth::CurrentUser,
    dtos::review::{
        CreateReviewRequest, FeedItemResponse, FeedParams, ListParams, ReviewResponse,
        SummaryResponse, UniversitySummaryResponse,
    },
    error::AppResult,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::review::ReviewService;
use uuid::Uuid;

/// List the reviews of a program
#[utoipa::path(
    get,
    path = "/programs/{id}/reviews",
    params(("id" = Uuid, Path, description = "Program ID"), ListParams),
    responses(
        (status = 200, description = "Reviews retrieved successfully", body = Vec<ReviewResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "Reviews"
)]
pub async fn list_program_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<ReviewResponse>>> {
    let options = params.into_options(state.config.feed_page_size);
    let reviews = ReviewService::list_by_program(&state.db, id, options).await?;
    Ok(Json(reviews.into_iter().map(Into::into).collect()))
}

/// Submit a review for a program as the signed-in user
#[utoipa::path(
    post,
    path = "/programs/{id}/reviews",
    params(("id" = Uuid, Path, description = "Program ID")),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review stored", body = ReviewResponse),
        (status = 400, description = "A required field is missing or out of range"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 404, description = "Program not found")
    ),
    security(("jwt" = [])),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<ReviewResponse>)> {
    let content = body.review.normalized();
    let review = ReviewService::insert(&state.db, &viewer, id, &content).await?;
    Ok((StatusCode::CREATED, Json(review.into())))
}

/// Rating summary of a program
#[utoipa::path(
    get,
    path = "/programs/{id}/summary",
    params(("id" = Uuid, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Summary computed", body = SummaryResponse)
    ),
    tag = "Reviews"
)]
pub async fn program_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SummaryResponse>> {
    Ok(Json(ReviewService::summarize_program(&state.db, id).await?.into()))
}

/// Rating summaries of every university
#[utoipa::path(
    get,
    path = "/universities/summaries",
    responses(
        (status = 200, description = "Summaries computed", body = Vec<UniversitySummaryResponse>)
    ),
    tag = "Reviews"
)]
pub async fn university_summaries(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UniversitySummaryResponse>>> {
    let summaries = ReviewService::summarize_universities(&state.db).await?;

    let mut response: Vec<_> = summaries
        .into_iter()
        .map(|(university_id, summary)| UniversitySummaryResponse {
            university_id,
            summary: summary.into(),
        })
        .collect();
    response.sort_by_key(|s| s.university_id);

    Ok(Json(response))
}

/// Reviews across all programs with their catalog names
#[utoipa::path(
    get,
    path = "/reviews",
    params(FeedParams),
    responses(
        (status = 200, description = "Feed page retrieved successfully", body = Vec<FeedItemResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "Reviews"
)]
pub async fn feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> AppResult<Json<Vec<FeedItemResponse>>> {
    let query = params.into_query(state.config.feed_page_size)?;
    let items = ReviewService::list_feed(&state.db, query).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// Delete a review. Authors may delete their own, admins any.
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted or already gone"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Review belongs to another user")
    ),
    security(("jwt" = [])),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    ReviewService::delete(&state.db, id, &viewer).await?;
    Ok(StatusCode::NO_CONTENT)
}
