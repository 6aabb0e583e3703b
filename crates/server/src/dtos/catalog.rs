use chrono::NaiveDateTime;
use database::{
    entities::{departments, faculties, programs, universities},
    services::catalog::{CascadeReport, NewProgram, NewUnit, NewUniversity},
};
use models::{
    catalog::{DegreeType, UniversityType},
    error::ValidationError,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct UniversityResponse {
    pub id: Uuid,
    pub name: String,
    pub name_en: Option<String>,
    /// `Public` or `Private`
    pub university_type: String,
    /// Thai label of the type
    pub type_label: String,
    pub logo_url: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<universities::Model> for UniversityResponse {
    fn from(model: universities::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            name_en: model.name_en,
            university_type: model.university_type.as_str().to_string(),
            type_label: model.university_type.label().to_string(),
            logo_url: model.logo_url,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FacultyResponse {
    pub id: Uuid,
    pub university_id: Uuid,
    pub name: String,
    pub name_en: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<faculties::Model> for FacultyResponse {
    fn from(model: faculties::Model) -> Self {
        Self {
            id: model.id,
            university_id: model.university_id,
            name: model.name,
            name_en: model.name_en,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentResponse {
    pub id: Uuid,
    pub faculty_id: Uuid,
    pub name: String,
    pub name_en: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<departments::Model> for DepartmentResponse {
    fn from(model: departments::Model) -> Self {
        Self {
            id: model.id,
            faculty_id: model.faculty_id,
            name: model.name,
            name_en: model.name_en,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgramResponse {
    pub id: Uuid,
    pub department_id: Uuid,
    pub name: String,
    pub name_en: Option<String>,
    /// Thai degree label, e.g. ปริญญาตรี
    pub degree_type: String,
    pub campus: String,
    pub known_campus: bool,
    pub created_at: NaiveDateTime,
}

impl From<programs::Model> for ProgramResponse {
    fn from(model: programs::Model) -> Self {
        Self {
            id: model.id,
            department_id: model.department_id,
            name: model.name,
            name_en: model.name_en,
            degree_type: model.degree_type.to_string(),
            known_campus: models::catalog::is_known_campus(&model.campus),
            campus: model.campus,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUniversityRequest {
    pub name: String,
    pub name_en: Option<String>,
    /// `Public` (default) or `Private`
    #[schema(value_type = Option<String>)]
    pub university_type: Option<UniversityType>,
    pub logo_url: Option<String>,
}

impl From<CreateUniversityRequest> for NewUniversity {
    fn from(req: CreateUniversityRequest) -> Self {
        Self {
            name: req.name,
            name_en: req.name_en,
            university_type: req.university_type.unwrap_or_default(),
            logo_url: req.logo_url,
        }
    }
}

/// Body for creating a faculty or department
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUnitRequest {
    pub name: String,
    pub name_en: Option<String>,
}

impl From<CreateUnitRequest> for NewUnit {
    fn from(req: CreateUnitRequest) -> Self {
        Self {
            name: req.name,
            name_en: req.name_en,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProgramRequest {
    pub name: String,
    pub name_en: Option<String>,
    /// `Bachelor`, `Master`, `Doctorate` or the Thai label
    pub degree_type: Option<String>,
    pub campus: String,
}

impl CreateProgramRequest {
    pub fn into_new_program(self) -> Result<NewProgram, ValidationError> {
        let degree_type = match self.degree_type.as_deref().map(str::trim) {
            None | Some("") => DegreeType::default(),
            Some(value) => value
                .parse()
                .map_err(|_| ValidationError::UnknownDegreeType(value.to_string()))?,
        };

        Ok(NewProgram {
            name: self.name,
            name_en: self.name_en,
            degree_type,
            campus: self.campus,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CascadeReportResponse {
    pub universities: u64,
    pub faculties: u64,
    pub departments: u64,
    pub programs: u64,
    pub reviews: u64,
}

impl From<CascadeReport> for CascadeReportResponse {
    fn from(report: CascadeReport) -> Self {
        Self {
            universities: report.universities,
            faculties: report.faculties,
            departments: report.departments,
            programs: report.programs,
            reviews: report.reviews,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_degree_type_parsing() {
        let request = |degree: Option<&str>| CreateProgramRequest {
            name: "วศ.บ. วิศวกรรมคอมพิวเตอร์".to_string(),
            name_en: None,
            degree_type: degree.map(str::to_string),
            campus: "บางเขน".to_string(),
        };

        assert_eq!(
            request(None).into_new_program().unwrap().degree_type,
            DegreeType::Bachelor
        );
        assert_eq!(
            request(Some("ปริญญาโท")).into_new_program().unwrap().degree_type,
            DegreeType::Master
        );
        assert_eq!(
            request(Some("Doctorate")).into_new_program().unwrap().degree_type,
            DegreeType::Doctorate
        );
        assert!(request(Some("Diploma")).into_new_program().is_err());
    }
}
