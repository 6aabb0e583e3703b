use models::review::{ReviewType, StudyYear};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub program_id: Uuid,
    pub user_id: String,
    #[sea_orm(column_type = "Text")]
    pub review_type: ReviewType,

    // Present on every review; study reviews fill them from overall/friends/environment
    pub rating_academic: i16,
    pub rating_social: i16,
    pub rating_facility: i16,
    /// Contribution of this review to an overall average, used for top-rated ordering
    pub rating_total: f64,
    pub comment: Option<String>,

    // Admission shape
    pub admission_round: Option<i16>,
    pub admission_year: Option<i32>,
    pub project_name: Option<String>,
    pub portfolio_url: Option<String>,
    pub achievements: Option<String>,
    pub gpax: Option<f64>,
    pub scores: Option<Json>,

    // Study shape
    #[sea_orm(column_type = "Text", nullable)]
    pub study_year: Option<StudyYear>,
    pub favorite_subjects: Option<String>,
    pub workload_rating: Option<i16>,
    pub study_tips: Option<String>,
    pub rating_social_friends: Option<i16>,
    pub rating_cost: Option<i16>,
    pub rating_food: Option<i16>,
    pub rating_environment: Option<i16>,
    pub rating_overall: Option<i16>,

    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::programs::Entity",
        from = "Column::ProgramId",
        to = "super::programs::Column::Id",
        on_delete = "Cascade"
    )]
    Program,
}

impl Related<super::programs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Program.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
