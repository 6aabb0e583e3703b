use models::{search::SearchHit, subject::Subject};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// At least two characters, otherwise nothing is returned
    pub q: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchHitResponse {
    pub id: String,
    /// `university`, `faculty` or `program`
    pub entity_type: String,
    pub name: String,
    pub subtitle: String,
    pub path: String,
    pub score: u8,
}

impl From<SearchHit> for SearchHitResponse {
    fn from(hit: SearchHit) -> Self {
        Self {
            id: hit.id,
            entity_type: hit.entity_type.as_ref().to_string(),
            name: hit.name,
            subtitle: hit.subtitle,
            path: hit.path,
            score: hit.score,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectResponse {
    pub code: String,
    pub label: String,
    pub group: String,
}

impl From<Subject> for SubjectResponse {
    fn from(subject: Subject) -> Self {
        Self {
            code: subject.code().to_string(),
            label: subject.label().to_string(),
            group: subject.group().name().to_string(),
        }
    }
}
