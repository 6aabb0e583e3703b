use crate::{
    entities::{departments, faculties, programs, universities},
    error::ServiceResult,
};
use log::debug;
use models::search::{EntityType, MIN_QUERY_CHARS, SearchCandidate, SearchHit, rank};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};
use std::collections::HashMap;

pub struct SearchService;

impl SearchService {
    /// How many programs a single search looks at
    const PROGRAM_LIMIT: u64 = 100;

    pub async fn search(db: &DatabaseConnection, query: &str) -> ServiceResult<Vec<SearchHit>> {
        if query.trim().chars().count() < MIN_QUERY_CHARS {
            return Ok(vec![]);
        }

        let (universities, faculties, departments, programs) = futures::try_join!(
            universities::Entity::find()
                .order_by_asc(universities::Column::CreatedAt)
                .all(db),
            faculties::Entity::find()
                .order_by_asc(faculties::Column::CreatedAt)
                .all(db),
            departments::Entity::find().all(db),
            programs::Entity::find()
                .order_by_asc(programs::Column::CreatedAt)
                .limit(Self::PROGRAM_LIMIT)
                .all(db),
        )?;

        let candidates = Self::candidates(universities, faculties, departments, programs);
        let hits = rank(candidates, query);
        debug!("Search {query:?} matched {} records", hits.len());
        Ok(hits)
    }

    fn candidates(
        universities: Vec<universities::Model>,
        faculties: Vec<faculties::Model>,
        departments: Vec<departments::Model>,
        programs: Vec<programs::Model>,
    ) -> Vec<SearchCandidate> {
        let university_names: HashMap<_, _> = universities
            .iter()
            .map(|u| (u.id, u.name.clone()))
            .collect();
        let faculty_by_id: HashMap<_, _> = faculties.iter().map(|f| (f.id, f)).collect();
        let faculty_of_department: HashMap<_, _> =
            departments.iter().map(|d| (d.id, d.faculty_id)).collect();

        let mut candidates = Vec::with_capacity(universities.len() + faculties.len() + programs.len());

        for university in &universities {
            candidates.push(SearchCandidate {
                id: university.id.to_string(),
                entity_type: EntityType::University,
                name: university.name.clone(),
                name_en: university.name_en.clone(),
                subtitle: university.name_en.clone().unwrap_or_default(),
                path: format!("/university/{}", university.id),
            });
        }

        for faculty in &faculties {
            candidates.push(SearchCandidate {
                id: faculty.id.to_string(),
                entity_type: EntityType::Faculty,
                name: faculty.name.clone(),
                name_en: faculty.name_en.clone(),
                subtitle: university_names
                    .get(&faculty.university_id)
                    .cloned()
                    .unwrap_or_default(),
                path: format!("/university/{}", faculty.university_id),
            });
        }

        for program in programs {
            let faculty = faculty_of_department
                .get(&program.department_id)
                .and_then(|id| faculty_by_id.get(id));
            let faculty_name = faculty.map(|f| f.name.as_str()).unwrap_or_default();
            let university_name = faculty
                .and_then(|f| university_names.get(&f.university_id))
                .map(String::as_str)
                .unwrap_or_default();

            candidates.push(SearchCandidate {
                id: program.id.to_string(),
                entity_type: EntityType::Program,
                subtitle: format!("{faculty_name} • {university_name}"),
                path: format!("/program/{}", program.id),
                name: program.name,
                name_en: program.name_en,
            });
        }

        candidates
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        services::catalog::{CatalogService, NewProgram, NewUnit, NewUniversity},
        test_support::setup_db,
    };
    use models::catalog::UniversityType;

    #[tokio::test]
    async fn test_university_prefix_beats_program_substring() {
        let db = setup_db().await;

        let chula = CatalogService::create_university(
            &db,
            NewUniversity {
                name: "จุฬาลงกรณ์มหาวิทยาลัย".to_string(),
                name_en: Some("Chulalongkorn University".to_string()),
                university_type: UniversityType::Public,
                logo_url: None,
            },
        )
        .await
        .unwrap();
        let faculty = CatalogService::create_faculty(
            &db,
            chula.id,
            NewUnit {
                name: "คณะวิศวกรรมศาสตร์".to_string(),
                name_en: None,
            },
        )
        .await
        .unwrap();
        let department = CatalogService::create_department(
            &db,
            faculty.id,
            NewUnit {
                name: "ภาควิชาวิศวกรรมคอมพิวเตอร์".to_string(),
                name_en: None,
            },
        )
        .await
        .unwrap();
        let program = CatalogService::create_program(
            &db,
            department.id,
            NewProgram {
                name: "หลักสูตรร่วมจุฬาและมหิดล".to_string(),
                name_en: None,
                degree_type: Default::default(),
                campus: "บางเขน".to_string(),
            },
        )
        .await
        .unwrap();

        let hits = SearchService::search(&db, "จุฬา").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, chula.id.to_string());
        assert_eq!(hits[0].subtitle, "Chulalongkorn University");
        assert_eq!(hits[1].id, program.id.to_string());
        assert_eq!(
            hits[1].subtitle,
            "คณะวิศวกรรมศาสตร์ • จุฬาลงกรณ์มหาวิทยาลัย"
        );
        assert_eq!(hits[1].path, format!("/program/{}", program.id));
    }

    #[tokio::test]
    async fn test_short_query_skips_database() {
        let db = setup_db().await;
        assert!(SearchService::search(&db, " x ").await.unwrap().is_empty());
    }
}
