use chrono::NaiveDateTime;
use database::services::review::{
    CatalogContext, FeedItem, FeedQuery, ListOptions, SortBy, StoredReview,
};
use models::{
    error::ValidationError,
    review::{ReviewContent, ReviewType, normalize_text},
    stats::ReviewSummary,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Largest page a caller may ask for
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    /// Admission or study review, tagged by `review_type`
    #[schema(value_type = Object)]
    pub review: ReviewContent,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub program_id: Uuid,
    pub user_id: String,
    pub review_type: String,
    #[schema(value_type = Object)]
    pub review: ReviewContent,
    pub rating_academic: u8,
    pub rating_social: u8,
    pub rating_facility: u8,
    pub rating_total: f64,
    pub created_at: NaiveDateTime,
}

impl From<StoredReview> for ReviewResponse {
    fn from(stored: StoredReview) -> Self {
        Self {
            id: stored.id,
            program_id: stored.program_id,
            user_id: stored.user_id,
            review_type: stored.content.review_type().to_string(),
            rating_academic: stored.legacy.academic.value(),
            rating_social: stored.legacy.social.value(),
            rating_facility: stored.legacy.facility.value(),
            rating_total: stored.rating_total,
            created_at: stored.created_at,
            review: stored.content,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedItemResponse {
    #[serde(flatten)]
    pub review: ReviewResponse,
    pub program_name: String,
    pub campus: String,
    pub department_name: String,
    pub faculty_name: String,
    pub university_id: Option<Uuid>,
    pub university_name: String,
}

impl From<FeedItem> for FeedItemResponse {
    fn from(item: FeedItem) -> Self {
        let CatalogContext {
            program_name,
            campus,
            department_name,
            faculty_name,
            university_id,
            university_name,
        } = item.context;

        Self {
            review: item.review.into(),
            program_name,
            campus,
            department_name,
            faculty_name,
            university_id,
            university_name,
        }
    }
}

/// Averages are `null` when no review supplied the dimension
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub count: usize,
    pub avg_academic: Option<f64>,
    pub avg_social: Option<f64>,
    pub avg_facility: Option<f64>,
    pub avg_overall: Option<f64>,
    pub avg_social_friends: Option<f64>,
    pub avg_cost: Option<f64>,
    pub avg_food: Option<f64>,
    pub avg_environment: Option<f64>,
    pub avg_workload: Option<f64>,
    /// `avg_overall` formatted for display, `-` without data
    pub overall_display: String,
}

impl From<ReviewSummary> for SummaryResponse {
    fn from(summary: ReviewSummary) -> Self {
        Self {
            count: summary.count,
            avg_academic: summary.avg_academic.value(),
            avg_social: summary.avg_social.value(),
            avg_facility: summary.avg_facility.value(),
            avg_overall: summary.avg_overall.value(),
            avg_social_friends: summary.avg_social_friends.value(),
            avg_cost: summary.avg_cost.value(),
            avg_food: summary.avg_food.value(),
            avg_environment: summary.avg_environment.value(),
            avg_workload: summary.avg_workload.value(),
            overall_display: summary.avg_overall.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UniversitySummaryResponse {
    pub university_id: Uuid,
    #[serde(flatten)]
    pub summary: SummaryResponse,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// `latest` (default) or `topRated`
    #[param(value_type = Option<String>)]
    pub sort: Option<SortBy>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl ListParams {
    pub fn into_options(self, default_limit: u64) -> ListOptions {
        ListOptions {
            sort: self.sort.unwrap_or_default(),
            offset: self.offset.unwrap_or(0),
            limit: page_size(self.limit, default_limit),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedParams {
    /// `latest` (default) or `topRated`
    #[param(value_type = Option<String>)]
    pub sort: Option<SortBy>,
    pub university_id: Option<Uuid>,
    /// `admission` or `study`; anything else means all
    pub review_type: Option<String>,
    /// Matches the comment, program name or university name
    pub q: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl FeedParams {
    pub fn into_query(self, default_limit: u64) -> Result<FeedQuery, ValidationError> {
        let review_type = match self.review_type.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(value) => Some(
                value
                    .parse::<ReviewType>()
                    .map_err(|_| ValidationError::UnknownReviewType(value.to_string()))?,
            ),
        };

        Ok(FeedQuery {
            sort: self.sort.unwrap_or_default(),
            university_id: self.university_id,
            review_type,
            text: self.q.as_deref().and_then(normalize_text),
            offset: self.offset.unwrap_or(0),
            limit: page_size(self.limit, default_limit),
        })
    }
}

fn page_size(requested: Option<u64>, default_limit: u64) -> u64 {
    requested.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_feed_params() {
        let params = FeedParams {
            sort: Some(SortBy::TopRated),
            university_id: None,
            review_type: Some("study".to_string()),
            q: Some("  วิศวะ ".to_string()),
            offset: None,
            limit: Some(1000),
        };
        let query = params.into_query(20).unwrap();
        assert_eq!(query.review_type, Some(ReviewType::Study));
        assert_eq!(query.limit, MAX_PAGE_SIZE);
        assert_eq!(query.sort, SortBy::TopRated);
        assert_eq!(query.text.as_deref(), Some("วิศวะ"));

        let all = FeedParams {
            sort: None,
            university_id: None,
            review_type: Some("all".to_string()),
            q: Some(" ".to_string()),
            offset: Some(40),
            limit: None,
        };
        let query = all.into_query(20).unwrap();
        assert_eq!(query.review_type, None);
        assert_eq!(query.text, None);
        assert_eq!((query.offset, query.limit), (40, 20));

        let bad = FeedParams {
            sort: None,
            university_id: None,
            review_type: Some("gossip".to_string()),
            q: None,
            offset: None,
            limit: None,
        };
        assert_eq!(
            bad.into_query(20),
            Err(ValidationError::UnknownReviewType("gossip".to_string()))
        );
    }

    #[test]
    fn test_sort_query_values() {
        let params: ListParams = serde_json::from_str(r#"{"sort":"topRated"}"#).unwrap();
        assert_eq!(params.into_options(20).sort, SortBy::TopRated);
    }
}
