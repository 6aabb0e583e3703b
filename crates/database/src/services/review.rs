use crate::{
    entities::{departments, faculties, programs, reviews, universities},
    error::{ServiceError, ServiceResult},
};
use chrono::{NaiveDateTime, Utc};
use log::{debug, info};
use models::{
    review::{
        AdmissionExtras, AdmissionReview, AdmissionRound, LegacyRatings, Rating, ReviewContent, ReviewShape,
        ReviewType, Scores, StudyReview,
    },
    stats::{RatingSample, ReviewSummary, summarize},
    viewer::Viewer,
    wizard::ReviewForm,
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Select, SelectModel, Selector,
    sea_query::{Expr, Func, SimpleExpr},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Page size used when a caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Newest first
    #[default]
    Latest,
    /// Highest overall score first, newest first on ties
    TopRated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub sort: SortBy,
    pub offset: u64,
    pub limit: u64,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort: SortBy::default(),
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub sort: SortBy,
    pub university_id: Option<Uuid>,
    pub review_type: Option<ReviewType>,
    /// Case-insensitive match on the comment, program name or university name
    pub text: Option<String>,
    pub offset: u64,
    pub limit: u64,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            sort: SortBy::default(),
            university_id: None,
            review_type: None,
            text: None,
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A review as read back from the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredReview {
    pub id: Uuid,
    pub program_id: Uuid,
    pub user_id: String,
    #[serde(flatten)]
    pub content: ReviewContent,
    /// The stored three-dimension columns, see [`ReviewContent::legacy_ratings`]
    pub legacy: LegacyRatings,
    pub rating_total: f64,
    pub created_at: NaiveDateTime,
}

fn column_rating(value: i16, column: &str) -> Result<Rating, DbErr> {
    u8::try_from(value)
        .ok()
        .and_then(Rating::new)
        .ok_or_else(|| DbErr::Type(format!("{column} holds {value}, expected 1-5")))
}

fn required_rating(value: Option<i16>, column: &str) -> Result<Rating, DbErr> {
    column_rating(
        value.ok_or_else(|| DbErr::Type(format!("{column} is missing")))?,
        column,
    )
}

fn sample_rating(value: Option<i16>) -> Option<u8> {
    value.and_then(|v| u8::try_from(v).ok())
}

/// The columns a rating summary reads
#[derive(Debug, FromQueryResult)]
struct RatingRow {
    program_id: Uuid,
    rating_academic: i16,
    rating_social: i16,
    rating_facility: i16,
    rating_overall: Option<i16>,
    rating_social_friends: Option<i16>,
    rating_cost: Option<i16>,
    rating_food: Option<i16>,
    rating_environment: Option<i16>,
    workload_rating: Option<i16>,
}

impl RatingRow {
    fn sample(&self) -> RatingSample {
        RatingSample {
            academic: sample_rating(Some(self.rating_academic)),
            social: sample_rating(Some(self.rating_social)),
            facility: sample_rating(Some(self.rating_facility)),
            overall: sample_rating(self.rating_overall),
            social_friends: sample_rating(self.rating_social_friends),
            cost: sample_rating(self.rating_cost),
            food: sample_rating(self.rating_food),
            environment: sample_rating(self.rating_environment),
            workload: sample_rating(self.workload_rating),
        }
    }
}

/// `lower(column) LIKE pattern`, with `pattern` already lowercased
fn lower_like<C: ColumnTrait>(column: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(pattern)
}

impl TryFrom<reviews::Model> for StoredReview {
    type Error = ServiceError;

    fn try_from(model: reviews::Model) -> Result<Self, Self::Error> {
        let shape = match model.review_type {
            ReviewType::Admission => {
                let round = model
                    .admission_round
                    .and_then(|r| u8::try_from(r).ok())
                    .and_then(|r| AdmissionRound::try_from(r).ok())
                    .ok_or_else(|| DbErr::Type(format!("review {} has no valid round", model.id)))?;
                let year = model
                    .admission_year
                    .and_then(|y| u16::try_from(y).ok())
                    .ok_or_else(|| DbErr::Type(format!("review {} has no valid year", model.id)))?;

                let extras = if round.is_portfolio_round() {
                    AdmissionExtras::Portfolio {
                        project_name: model.project_name.clone(),
                        portfolio_url: model.portfolio_url.clone(),
                        achievements: model.achievements.clone(),
                    }
                } else {
                    let scores = match model.scores.clone() {
                        Some(json) => serde_json::from_value::<Scores>(json)
                            .map_err(|e| DbErr::Type(format!("scores: {e}")))?,
                        None => Scores::new(),
                    };
                    AdmissionExtras::Scores {
                        gpax: model.gpax,
                        scores,
                    }
                };

                ReviewShape::Admission(AdmissionReview {
                    round,
                    year,
                    rating_academic: column_rating(model.rating_academic, "rating_academic")?,
                    rating_social: column_rating(model.rating_social, "rating_social")?,
                    rating_facility: column_rating(model.rating_facility, "rating_facility")?,
                    extras,
                })
            }
            ReviewType::Study => ReviewShape::Study(StudyReview {
                study_year: model.study_year,
                favorite_subjects: model.favorite_subjects.clone(),
                workload_rating: model
                    .workload_rating
                    .map(|r| column_rating(r, "workload_rating"))
                    .transpose()?,
                study_tips: model.study_tips.clone(),
                rating_social_friends: required_rating(
                    model.rating_social_friends,
                    "rating_social_friends",
                )?,
                rating_cost: required_rating(model.rating_cost, "rating_cost")?,
                rating_food: required_rating(model.rating_food, "rating_food")?,
                rating_environment: required_rating(
                    model.rating_environment,
                    "rating_environment",
                )?,
                rating_overall: required_rating(model.rating_overall, "rating_overall")?,
            }),
        };

        Ok(StoredReview {
            id: model.id,
            program_id: model.program_id,
            user_id: model.user_id,
            content: ReviewContent {
                shape,
                comment: model.comment,
            },
            legacy: LegacyRatings {
                academic: column_rating(model.rating_academic, "rating_academic")?,
                social: column_rating(model.rating_social, "rating_social")?,
                facility: column_rating(model.rating_facility, "rating_facility")?,
            },
            rating_total: model.rating_total,
            created_at: model.created_at,
        })
    }
}

/// Names of the catalog records a review hangs off. Empty when a link is broken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogContext {
    pub program_name: String,
    pub campus: String,
    pub department_name: String,
    pub faculty_name: String,
    pub university_id: Option<Uuid>,
    pub university_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    #[serde(flatten)]
    pub review: StoredReview,
    #[serde(flatten)]
    pub context: CatalogContext,
}

/// Lookup tables for denormalizing a page of reviews
#[derive(Debug, Default)]
struct Hierarchy {
    programs: HashMap<Uuid, programs::Model>,
    departments: HashMap<Uuid, departments::Model>,
    faculties: HashMap<Uuid, faculties::Model>,
    universities: HashMap<Uuid, universities::Model>,
}

impl Hierarchy {
    fn resolve(&self, program_id: Uuid) -> CatalogContext {
        let mut context = CatalogContext::default();

        let Some(program) = self.programs.get(&program_id) else {
            return context;
        };
        context.program_name = program.name.clone();
        context.campus = program.campus.clone();

        let Some(department) = self.departments.get(&program.department_id) else {
            return context;
        };
        context.department_name = department.name.clone();

        let Some(faculty) = self.faculties.get(&department.faculty_id) else {
            return context;
        };
        context.faculty_name = faculty.name.clone();

        if let Some(university) = self.universities.get(&faculty.university_id) {
            context.university_id = Some(university.id);
            context.university_name = university.name.clone();
        }
        context
    }
}

pub struct ReviewService;

impl ReviewService {
    fn to_active_model(
        viewer: &Viewer,
        program_id: Uuid,
        content: &ReviewContent,
    ) -> reviews::ActiveModel {
        let legacy = content.legacy_ratings();
        let rating = |r: Rating| i16::from(r.value());
        let optional = |r: Option<Rating>| r.map(rating);

        let mut model = reviews::ActiveModel {
            id: Set(Uuid::now_v7()),
            program_id: Set(program_id),
            user_id: Set(viewer.user_id.clone()),
            review_type: Set(content.review_type()),
            rating_academic: Set(rating(legacy.academic)),
            rating_social: Set(rating(legacy.social)),
            rating_facility: Set(rating(legacy.facility)),
            rating_total: Set(content.overall_score()),
            comment: Set(content.comment.clone()),
            admission_round: Set(None),
            admission_year: Set(None),
            project_name: Set(None),
            portfolio_url: Set(None),
            achievements: Set(None),
            gpax: Set(None),
            scores: Set(None),
            study_year: Set(None),
            favorite_subjects: Set(None),
            workload_rating: Set(None),
            study_tips: Set(None),
            rating_social_friends: Set(None),
            rating_cost: Set(None),
            rating_food: Set(None),
            rating_environment: Set(None),
            rating_overall: Set(None),
            created_at: Set(Utc::now().naive_utc()),
        };

        match &content.shape {
            ReviewShape::Admission(admission) => {
                model.admission_round = Set(Some(i16::from(admission.round.number())));
                model.admission_year = Set(Some(i32::from(admission.year)));
                match &admission.extras {
                    AdmissionExtras::Portfolio {
                        project_name,
                        portfolio_url,
                        achievements,
                    } => {
                        model.project_name = Set(project_name.clone());
                        model.portfolio_url = Set(portfolio_url.clone());
                        model.achievements = Set(achievements.clone());
                    }
                    AdmissionExtras::Scores { gpax, scores } => {
                        model.gpax = Set(*gpax);
                        model.scores = Set((!scores.is_empty()).then(|| {
                            serde_json::Value::Object(
                                scores
                                    .iter()
                                    .map(|(code, value)| (code.clone(), (*value).into()))
                                    .collect(),
                            )
                        }));
                    }
                }
            }
            ReviewShape::Study(study) => {
                model.study_year = Set(study.study_year);
                model.favorite_subjects = Set(study.favorite_subjects.clone());
                model.workload_rating = Set(optional(study.workload_rating));
                model.study_tips = Set(study.study_tips.clone());
                model.rating_social_friends = Set(Some(rating(study.rating_social_friends)));
                model.rating_cost = Set(Some(rating(study.rating_cost)));
                model.rating_food = Set(Some(rating(study.rating_food)));
                model.rating_environment = Set(Some(rating(study.rating_environment)));
                model.rating_overall = Set(Some(rating(study.rating_overall)));
            }
        }

        model
    }

    fn rating_rows(query: Select<reviews::Entity>) -> Selector<SelectModel<RatingRow>> {
        query
            .select_only()
            .columns([
                reviews::Column::ProgramId,
                reviews::Column::RatingAcademic,
                reviews::Column::RatingSocial,
                reviews::Column::RatingFacility,
                reviews::Column::RatingOverall,
                reviews::Column::RatingSocialFriends,
                reviews::Column::RatingCost,
                reviews::Column::RatingFood,
                reviews::Column::RatingEnvironment,
                reviews::Column::WorkloadRating,
            ])
            .into_model::<RatingRow>()
    }

    fn ordered(query: Select<reviews::Entity>, sort: SortBy) -> Select<reviews::Entity> {
        match sort {
            SortBy::Latest => query
                .order_by_desc(reviews::Column::CreatedAt)
                .order_by_desc(reviews::Column::Id),
            SortBy::TopRated => query
                .order_by_desc(reviews::Column::RatingTotal)
                .order_by_desc(reviews::Column::CreatedAt)
                .order_by_desc(reviews::Column::Id),
        }
    }

    /// Stores a review written by `viewer` for a program
    pub async fn insert(
        db: &DatabaseConnection,
        viewer: &Viewer,
        program_id: Uuid,
        content: &ReviewContent,
    ) -> ServiceResult<StoredReview> {
        content.validate()?;

        if programs::Entity::find_by_id(program_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found("program", program_id));
        }

        let model = reviews::Entity::insert(Self::to_active_model(viewer, program_id, content))
            .exec_with_returning(db)
            .await?;

        info!(
            "Stored {} review {} for program {program_id} by {}",
            model.review_type, model.id, viewer.user_id
        );
        StoredReview::try_from(model)
    }

    /// Submits a wizard that is on its comment step (or retrying after a failure),
    /// moving it to success or failure according to the store's answer
    pub async fn submit_form(
        db: &DatabaseConnection,
        viewer: &Viewer,
        program_id: Uuid,
        form: &mut ReviewForm,
    ) -> ServiceResult<StoredReview> {
        let content = form.submit()?;

        match Self::insert(db, viewer, program_id, &content).await {
            Ok(review) => {
                form.finish(Ok(()))?;
                Ok(review)
            }
            Err(e) => {
                form.finish(Err(e.to_string()))?;
                Err(e)
            }
        }
    }

    pub async fn list_by_program(
        db: &DatabaseConnection,
        program_id: Uuid,
        options: ListOptions,
    ) -> ServiceResult<Vec<StoredReview>> {
        let models = Self::ordered(
            reviews::Entity::find().filter(reviews::Column::ProgramId.eq(program_id)),
            options.sort,
        )
        .offset(options.offset)
        .limit(options.limit)
        .all(db)
        .await?;

        debug!("Listed {} reviews of program {program_id}", models.len());
        models.into_iter().map(StoredReview::try_from).collect()
    }

    /// Program ids under some universities, walking faculty → department → program
    async fn program_ids_of_universities(
        db: &DatabaseConnection,
        university_ids: Vec<Uuid>,
    ) -> ServiceResult<Vec<Uuid>> {
        if university_ids.is_empty() {
            return Ok(vec![]);
        }

        let faculty_ids: Vec<Uuid> = faculties::Entity::find()
            .select_only()
            .column(faculties::Column::Id)
            .filter(faculties::Column::UniversityId.is_in(university_ids))
            .into_tuple()
            .all(db)
            .await?;
        if faculty_ids.is_empty() {
            return Ok(vec![]);
        }

        let department_ids: Vec<Uuid> = departments::Entity::find()
            .select_only()
            .column(departments::Column::Id)
            .filter(departments::Column::FacultyId.is_in(faculty_ids))
            .into_tuple()
            .all(db)
            .await?;
        if department_ids.is_empty() {
            return Ok(vec![]);
        }

        Ok(programs::Entity::find()
            .select_only()
            .column(programs::Column::Id)
            .filter(programs::Column::DepartmentId.is_in(department_ids))
            .into_tuple()
            .all(db)
            .await?)
    }

    async fn load_hierarchy(
        db: &DatabaseConnection,
        program_ids: Vec<Uuid>,
    ) -> ServiceResult<Hierarchy> {
        let mut hierarchy = Hierarchy::default();
        if program_ids.is_empty() {
            return Ok(hierarchy);
        }

        hierarchy.programs = programs::Entity::find()
            .filter(programs::Column::Id.is_in(program_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let department_ids: Vec<Uuid> =
            hierarchy.programs.values().map(|p| p.department_id).collect();
        hierarchy.departments = departments::Entity::find()
            .filter(departments::Column::Id.is_in(department_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();

        let faculty_ids: Vec<Uuid> = hierarchy.departments.values().map(|d| d.faculty_id).collect();
        hierarchy.faculties = faculties::Entity::find()
            .filter(faculties::Column::Id.is_in(faculty_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();

        let university_ids: Vec<Uuid> =
            hierarchy.faculties.values().map(|f| f.university_id).collect();
        hierarchy.universities = universities::Entity::find()
            .filter(universities::Column::Id.is_in(university_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(hierarchy)
    }

    /// Reviews across all programs with the names of their catalog records attached
    pub async fn list_feed(
        db: &DatabaseConnection,
        query: FeedQuery,
    ) -> ServiceResult<Vec<FeedItem>> {
        let mut select = reviews::Entity::find();

        if let Some(university_id) = query.university_id {
            let program_ids = Self::program_ids_of_universities(db, vec![university_id]).await?;
            if program_ids.is_empty() {
                debug!("University {university_id} has no programs, feed is empty");
                return Ok(vec![]);
            }
            select = select.filter(reviews::Column::ProgramId.is_in(program_ids));
        }
        if let Some(review_type) = query.review_type {
            select = select.filter(reviews::Column::ReviewType.eq(review_type));
        }
        if let Some(text) = query.text.as_deref() {
            select = select.filter(Self::text_condition(db, text).await?);
        }

        let models = Self::ordered(select, query.sort)
            .offset(query.offset)
            .limit(query.limit)
            .all(db)
            .await?;

        let mut program_ids: Vec<Uuid> = models.iter().map(|m| m.program_id).collect();
        program_ids.sort_unstable();
        program_ids.dedup();
        let hierarchy = Self::load_hierarchy(db, program_ids).await?;

        debug!("Feed page has {} reviews", models.len());
        models
            .into_iter()
            .map(|model| {
                let context = hierarchy.resolve(model.program_id);
                Ok(FeedItem {
                    review: StoredReview::try_from(model)?,
                    context,
                })
            })
            .collect()
    }

    /// Reviews whose comment, program name or university name contains `text`
    async fn text_condition(db: &DatabaseConnection, text: &str) -> ServiceResult<Condition> {
        let pattern = format!("%{}%", text.to_lowercase());

        let (university_ids, mut program_ids): (Vec<Uuid>, Vec<Uuid>) = futures::try_join!(
            universities::Entity::find()
                .select_only()
                .column(universities::Column::Id)
                .filter(lower_like(universities::Column::Name, &pattern))
                .into_tuple::<Uuid>()
                .all(db),
            programs::Entity::find()
                .select_only()
                .column(programs::Column::Id)
                .filter(lower_like(programs::Column::Name, &pattern))
                .into_tuple::<Uuid>()
                .all(db),
        )?;
        program_ids.extend(Self::program_ids_of_universities(db, university_ids).await?);

        debug!("Text {text:?} matches {} programs by name", program_ids.len());
        let mut condition = Condition::any().add(lower_like(reviews::Column::Comment, &pattern));
        if !program_ids.is_empty() {
            condition = condition.add(reviews::Column::ProgramId.is_in(program_ids));
        }
        Ok(condition)
    }

    /// Removes a review. Succeeds without doing anything if it is already gone.
    pub async fn delete(db: &DatabaseConnection, id: Uuid, viewer: &Viewer) -> ServiceResult<()> {
        let Some(review) = reviews::Entity::find_by_id(id).one(db).await? else {
            debug!("Review {id} was already deleted");
            return Ok(());
        };

        if !viewer.can_delete_review(&review.user_id) {
            return Err(ServiceError::Forbidden("delete another user's review"));
        }

        reviews::Entity::delete_by_id(id).exec(db).await?;
        info!("Deleted review {id} (requested by {})", viewer.user_id);
        Ok(())
    }

    pub async fn summarize_program(
        db: &DatabaseConnection,
        program_id: Uuid,
    ) -> ServiceResult<ReviewSummary> {
        let samples: Vec<RatingSample> = Self::rating_rows(
            reviews::Entity::find().filter(reviews::Column::ProgramId.eq(program_id)),
        )
        .all(db)
        .await?
        .iter()
        .map(RatingRow::sample)
        .collect();

        Ok(summarize(&samples))
    }

    /// Summary of every university, including ones without any review
    pub async fn summarize_universities(
        db: &DatabaseConnection,
    ) -> ServiceResult<HashMap<Uuid, ReviewSummary>> {
        let (university_ids, faculty_links, department_links, program_links, reviews) = futures::try_join!(
            universities::Entity::find()
                .select_only()
                .column(universities::Column::Id)
                .into_tuple::<Uuid>()
                .all(db),
            faculties::Entity::find()
                .select_only()
                .columns([faculties::Column::Id, faculties::Column::UniversityId])
                .into_tuple::<(Uuid, Uuid)>()
                .all(db),
            departments::Entity::find()
                .select_only()
                .columns([departments::Column::Id, departments::Column::FacultyId])
                .into_tuple::<(Uuid, Uuid)>()
                .all(db),
            programs::Entity::find()
                .select_only()
                .columns([programs::Column::Id, programs::Column::DepartmentId])
                .into_tuple::<(Uuid, Uuid)>()
                .all(db),
            Self::rating_rows(reviews::Entity::find()).all(db),
        )?;

        let faculty_to_university: HashMap<Uuid, Uuid> = faculty_links.into_iter().collect();
        let department_to_faculty: HashMap<Uuid, Uuid> = department_links.into_iter().collect();
        let program_to_university: HashMap<Uuid, Uuid> = program_links
            .into_iter()
            .filter_map(|(program, department)| {
                let faculty = department_to_faculty.get(&department)?;
                Some((program, *faculty_to_university.get(faculty)?))
            })
            .collect();

        let mut samples: HashMap<Uuid, Vec<RatingSample>> = university_ids
            .into_iter()
            .map(|id| (id, Vec::new()))
            .collect();
        for row in &reviews {
            if let Some(university) = program_to_university.get(&row.program_id) {
                samples
                    .entry(*university)
                    .or_default()
                    .push(row.sample());
            }
        }

        debug!("Summarized {} reviews over {} universities", reviews.len(), samples.len());
        Ok(samples
            .into_iter()
            .map(|(id, samples)| (id, summarize(&samples)))
            .collect())
    }
}
